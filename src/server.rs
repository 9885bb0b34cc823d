//! HTTP API over the resolution pipeline.
//!
//! * `GET /api/suggest?q=<prefix>&limit=<n>` - autocomplete
//! * `GET /api/word/:word?variant=<tag>` - `{word, ipa, examples}`
//! * `GET /api/variants` - known variant tags
//! * `GET /api/health`
//! * `/data/...` - audio and other data files, everything else from the static dir

use crate::boundary::{clamp_limit, parse_variant, sanitize_audio_ref};
use crate::config::Config;
use crate::core::engine::ResolutionPipeline;
use crate::core::types::{Transcriptions, VariantTag, Word};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{error, warn};

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ResolutionPipeline>,
    pub config: Arc<Config>,
}

#[derive(Debug, Deserialize)]
pub struct SuggestQuery {
    pub q: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct WordQuery {
    pub variant: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExampleView {
    pub sentence: String,
    pub audio: String,
    pub dialect: String,
}

#[derive(Debug, Serialize)]
pub struct WordResponse {
    pub word: Word,
    pub ipa: Transcriptions,
    pub examples: Vec<ExampleView>,
}

#[derive(Debug, Serialize)]
pub struct VariantInfo {
    pub tag: VariantTag,
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct VariantsResponse {
    pub default: VariantTag,
    pub variants: Vec<VariantInfo>,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unavailable(String),

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}

pub fn create_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);
    let data_files = ServeDir::new(&state.config.data_dir);

    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/suggest", get(suggest))
        .route("/api/word/:word", get(lookup_word))
        .route("/api/variants", get(list_variants))
        .nest_service("/data", data_files)
        .fallback_service(static_files)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}

async fn health_check() -> Json<&'static str> {
    Json("OK")
}

async fn suggest(
    State(state): State<AppState>,
    Query(query): Query<SuggestQuery>,
) -> Json<Vec<Word>> {
    let Some(prefix) = query.q.as_deref().and_then(Word::parse) else {
        return Json(vec![]);
    };
    let limit = clamp_limit(query.limit, &state.config);
    Json(state.pipeline.suggest(prefix.as_str(), limit))
}

async fn lookup_word(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    Query(query): Query<WordQuery>,
) -> Result<Json<WordResponse>, ApiError> {
    let word = Word::parse(&raw)
        .ok_or_else(|| ApiError::BadRequest("Invalid word parameter".to_string()))?;
    let variant = parse_variant(query.variant.as_deref())
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
        .unwrap_or(state.config.default_variant);

    let pipeline = state.pipeline.clone();
    let result = tokio::task::spawn_blocking(move || pipeline.resolve(&word, Some(variant)))
        .await
        .map_err(|e| {
            error!("resolve task failed: {}", e);
            ApiError::Internal("lookup failed".to_string())
        })?
        .map_err(|e| {
            error!("store error: {}", e);
            ApiError::Unavailable(e.to_string())
        })?;

    let prefix = state.config.audio_url_prefix.trim_end_matches('/');
    let examples = result
        .examples
        .into_iter()
        .filter_map(|example| match sanitize_audio_ref(&example.audio_ref) {
            Some(audio_ref) => Some(ExampleView {
                sentence: example.sentence,
                audio: format!("{prefix}/{audio_ref}"),
                dialect: example.dialect,
            }),
            None => {
                warn!(word = %result.word, audio_ref = %example.audio_ref, "dropping example with unsafe audio path");
                None
            }
        })
        .collect();

    Ok(Json(WordResponse {
        word: result.word,
        ipa: result.transcriptions,
        examples,
    }))
}

async fn list_variants(State(state): State<AppState>) -> Json<VariantsResponse> {
    Json(VariantsResponse {
        default: state.config.default_variant,
        variants: VariantTag::all()
            .map(|tag| VariantInfo { tag, label: tag.label() })
            .collect(),
    })
}
