//! The lexicon, example store and prefix index published as one unit.

use crate::config::Config;
use crate::core::trie::PrefixIndex;
use crate::error::{CatalogError, PersistenceError, StoreError};
use crate::persistence::{self, Snapshot};
use crate::store::{ExampleStore, LexiconStore, MemoryExamples};
use std::fmt;
use std::fs;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info};

/// Immutable stores plus the index derived from the lexicon's key set.
pub struct Catalog {
    lexicon: Arc<dyn LexiconStore>,
    examples: Arc<dyn ExampleStore>,
    index: PrefixIndex,
}

impl Catalog {
    /// Builds the prefix index from the lexicon's vocabulary.
    pub fn new(
        lexicon: Arc<dyn LexiconStore>,
        examples: Arc<dyn ExampleStore>,
    ) -> Result<Self, StoreError> {
        let index = PrefixIndex::build(lexicon.vocabulary()?);
        Ok(Self { lexicon, examples, index })
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, StoreError> {
        Self::new(Arc::new(snapshot.lexicon), Arc::new(snapshot.examples))
    }

    /// Loads the configured snapshot, or imports the JSON tables when no
    /// snapshot exists yet or a table was modified after it was written.
    /// A fresh import rewrites the snapshot if `write_snapshot` is set.
    pub fn load(config: &Config) -> Result<Self, CatalogError> {
        if config.snapshot.exists() && !tables_newer_than_snapshot(config)? {
            let snapshot = persistence::load_snapshot(&config.snapshot)?;
            return Ok(Self::from_snapshot(snapshot)?);
        }
        Self::import(config)
    }

    /// Rebuilds from the JSON tables whenever a lexicon table is
    /// configured, regardless of the snapshot; otherwise same as [`load`].
    ///
    /// [`load`]: Catalog::load
    pub fn rebuild(config: &Config) -> Result<Self, CatalogError> {
        if config.lexicon_table.is_some() {
            Self::import(config)
        } else {
            Self::load(config)
        }
    }

    fn import(config: &Config) -> Result<Self, CatalogError> {
        let Some(lexicon_path) = &config.lexicon_table else {
            return Err(CatalogError::NoSource(config.snapshot.display().to_string()));
        };
        let lexicon = persistence::import_lexicon_json(lexicon_path)?;
        let examples = match &config.examples_table {
            Some(path) => persistence::import_examples_json(path)?,
            None => MemoryExamples::default(),
        };
        info!(
            words = lexicon.len(),
            example_words = examples.word_count(),
            "imported JSON tables"
        );

        let snapshot = Snapshot { lexicon, examples };
        if config.write_snapshot {
            persistence::save_snapshot(&snapshot, &config.snapshot)?;
        }
        Ok(Self::from_snapshot(snapshot)?)
    }

    pub fn lexicon(&self) -> &dyn LexiconStore {
        self.lexicon.as_ref()
    }

    pub fn examples(&self) -> &dyn ExampleStore {
        self.examples.as_ref()
    }

    pub fn index(&self) -> &PrefixIndex {
        &self.index
    }
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("words", &self.index.len())
            .finish_non_exhaustive()
    }
}

/// True if a configured table that still exists is newer than the snapshot.
fn tables_newer_than_snapshot(config: &Config) -> Result<bool, PersistenceError> {
    let written = fs::metadata(&config.snapshot)?.modified()?;
    let tables = config.lexicon_table.iter().chain(config.examples_table.iter());
    for table in tables {
        if let Ok(modified) = fs::metadata(table).and_then(|m| m.modified()) {
            if modified > written {
                debug!(table = %table.display(), "table is newer than the snapshot");
                return Ok(true);
            }
        }
    }
    Ok(false)
}

/// Shared pointer to the live catalog.
///
/// Readers take a reference-counted snapshot and work on it without
/// further locking; a rebuild builds a complete new [`Catalog`] first and
/// then swaps the pointer, so no reader ever sees a mix of old and new.
pub struct CatalogHandle {
    current: RwLock<Arc<Catalog>>,
}

impl CatalogHandle {
    pub fn new(catalog: Catalog) -> Self {
        Self { current: RwLock::new(Arc::new(catalog)) }
    }

    pub fn current(&self) -> Arc<Catalog> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Publishes `catalog` and returns the one it replaced.
    pub fn replace(&self, catalog: Catalog) -> Arc<Catalog> {
        let next = Arc::new(catalog);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let previous = std::mem::replace(&mut *guard, next);
        info!(words = guard.index().len(), "catalog swapped");
        previous
    }
}

impl fmt::Debug for CatalogHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CatalogHandle").field(&self.current()).finish()
    }
}
