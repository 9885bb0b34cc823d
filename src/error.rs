//! Error types shared across the lookup pipeline, the stores and the service.

use thiserror::Error;

/// Failure of a backing store. Fatal to the lookup call that hit it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Backing store unreachable or not loaded.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// The phoneme model could not process a word.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Input contains a symbol outside the model's alphabet.
    #[error("unsupported symbol {symbol:?} in {word:?}")]
    UnsupportedSymbol { symbol: char, word: String },

    /// The model produced no phonemes.
    #[error("model produced no phonemes for {0:?}")]
    EmptyOutput(String),

    /// Anything else an external model reports.
    #[error("model failure: {0}")]
    Failed(String),
}

/// A phoneme sequence could not be rendered as IPA.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("unmapped phoneme symbol {0:?}")]
    UnmappedSymbol(String),

    #[error("empty phoneme sequence")]
    Empty,
}

/// Snapshot and table I/O.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot encoding error: {0}")]
    Snapshot(#[from] bincode::Error),

    #[error("JSON table error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not persist snapshot: {0}")]
    Persist(#[from] tempfile::PersistError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Building or loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("no lexicon source configured: snapshot {0} does not exist and no lexicon table was given")]
    NoSource(String),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
