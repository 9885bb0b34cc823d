// File: src/store.rs
//! Read-only keyed stores backing the lookup pipeline.
//!
//! The pipeline only sees the [`LexiconStore`] and [`ExampleStore`] traits.
//! The in-memory implementations here are built once and never mutated, so
//! any number of threads can read them without locking.

use crate::core::types::{ExampleRecord, LexiconRecord, Word};
use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

pub trait LexiconStore: Send + Sync {
    /// The record for `word`, or `None` on a miss.
    fn lookup(&self, word: &Word) -> Result<Option<LexiconRecord>, StoreError>;

    /// Every key in the store, in no particular order.
    fn vocabulary(&self) -> Result<Vec<Word>, StoreError>;
}

pub trait ExampleStore: Send + Sync {
    /// Examples for `word` in arrival order; empty when there are none.
    fn lookup(&self, word: &Word) -> Result<Vec<ExampleRecord>, StoreError>;

    /// True when lookups never leave memory. The pipeline runs these inline
    /// rather than on a thread of their own.
    fn is_resident(&self) -> bool {
        false
    }
}

/// Lexicon held resident in a hash map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryLexicon {
    records: HashMap<Word, LexiconRecord>,
}

impl MemoryLexicon {
    /// Builds the lexicon. The first record for a word wins; later
    /// duplicates are dropped with a warning.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = LexiconRecord>,
    {
        let mut map: HashMap<Word, LexiconRecord> = HashMap::new();
        for record in records {
            if map.contains_key(&record.word) {
                warn!(word = %record.word, "duplicate lexicon entry dropped");
                continue;
            }
            map.insert(record.word.clone(), record);
        }
        Self { records: map }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl LexiconStore for MemoryLexicon {
    fn lookup(&self, word: &Word) -> Result<Option<LexiconRecord>, StoreError> {
        Ok(self.records.get(word).cloned())
    }

    fn vocabulary(&self) -> Result<Vec<Word>, StoreError> {
        Ok(self.records.keys().cloned().collect())
    }
}

/// Example sentences held resident, grouped by word.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryExamples {
    by_word: HashMap<Word, Vec<ExampleRecord>>,
}

impl MemoryExamples {
    /// Groups `(word, example)` pairs by word, keeping arrival order.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Word, ExampleRecord)>,
    {
        let mut by_word: HashMap<Word, Vec<ExampleRecord>> = HashMap::new();
        for (word, example) in entries {
            by_word.entry(word).or_default().push(example);
        }
        Self { by_word }
    }

    /// Number of words with at least one example.
    pub fn word_count(&self) -> usize {
        self.by_word.len()
    }
}

impl ExampleStore for MemoryExamples {
    fn lookup(&self, word: &Word) -> Result<Vec<ExampleRecord>, StoreError> {
        Ok(self.by_word.get(word).cloned().unwrap_or_default())
    }

    fn is_resident(&self) -> bool {
        true
    }
}
