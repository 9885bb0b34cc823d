use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use uttale_core::catalog::Catalog;
use uttale_core::config::Config;
use uttale_core::core::synthesizer::SynthesizerSet;
use uttale_core::server::{create_router, AppState};
use uttale_core::ResolutionPipeline;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("uttale_core=info,uttale_server=info,tower_http=debug")),
        )
        .init();

    let config = Arc::new(Config::load()?);
    info!(snapshot = %config.snapshot.display(), "loading catalog");
    let catalog = Catalog::load(&config)?;
    info!(words = catalog.index().len(), "catalog ready");

    let pipeline = Arc::new(ResolutionPipeline::new(catalog, SynthesizerSet::default()));

    #[cfg(unix)]
    reload_on_hangup(pipeline.clone(), config.clone());

    let app = create_router(AppState { pipeline, config: config.clone() });

    info!("Starting server on {}", config.bind);
    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Rebuilds the catalog from configuration on SIGHUP and swaps it in.
#[cfg(unix)]
fn reload_on_hangup(pipeline: Arc<ResolutionPipeline>, config: Arc<Config>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut hangups = match signal(SignalKind::hangup()) {
            Ok(stream) => stream,
            Err(e) => {
                error!("cannot listen for SIGHUP: {}", e);
                return;
            }
        };
        while hangups.recv().await.is_some() {
            info!("SIGHUP received, reloading catalog");
            let config = config.clone();
            match tokio::task::spawn_blocking(move || Catalog::rebuild(&config)).await {
                Ok(Ok(catalog)) => {
                    pipeline.reload(catalog);
                }
                Ok(Err(e)) => error!("reload failed, keeping current catalog: {}", e),
                Err(e) => error!("reload task failed: {}", e),
            }
        }
    });
}
