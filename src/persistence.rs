// File: src/persistence.rs
use crate::core::types::{ExampleRecord, LexiconRecord, VariantTag, Word};
use crate::error::PersistenceError;
use crate::store::{MemoryExamples, MemoryLexicon};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Both stores as written to disk. Loaded as one unit so the lexicon and
/// the examples always come from the same build.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub lexicon: MemoryLexicon,
    pub examples: MemoryExamples,
}

/// Writes `snapshot` to `path` through a temporary file in the same
/// directory, so readers never see a partial file.
pub fn save_snapshot(snapshot: &Snapshot, path: &Path) -> Result<(), PersistenceError> {
    let parent_dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        bincode::serialize_into(&mut writer, snapshot)?;
        writer.flush()?;
    }
    temp_file.persist(path)?;
    info!(path = %path.display(), words = snapshot.lexicon.len(), "snapshot written");
    Ok(())
}

pub fn load_snapshot(path: &Path) -> Result<Snapshot, PersistenceError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let snapshot: Snapshot = bincode::deserialize_from(reader)?;
    info!(
        path = %path.display(),
        words = snapshot.lexicon.len(),
        example_words = snapshot.examples.word_count(),
        "snapshot loaded"
    );
    Ok(snapshot)
}

/// Reads a lexicon table shaped `{word: {variant: ipa, ...}, ...}`.
///
/// Keys are case-folded into normal form, so `"Oslo"` is stored as
/// `oslo`; when two keys fold together the first in key order wins. Keys
/// with nothing left after folding and variant columns that are not known
/// tags are skipped with a warning. Empty transcriptions count as missing
/// variants.
pub fn import_lexicon_json(path: &Path) -> Result<MemoryLexicon, PersistenceError> {
    let reader = BufReader::new(File::open(path)?);
    let table: BTreeMap<String, BTreeMap<String, Option<String>>> = serde_json::from_reader(reader)?;
    Ok(lexicon_from_table(table))
}

fn lexicon_from_table(table: BTreeMap<String, BTreeMap<String, Option<String>>>) -> MemoryLexicon {
    let mut skipped_words = 0usize;
    let mut records = Vec::with_capacity(table.len());

    for (raw_word, columns) in table {
        let Some(word) = Word::parse(&raw_word) else {
            skipped_words += 1;
            debug!(word = %raw_word, "lexicon key has no word characters");
            continue;
        };
        if word.as_str() != raw_word {
            debug!(from = %raw_word, to = %word, "lexicon key folded");
        }
        let mut transcriptions = BTreeMap::new();
        for (column, ipa) in columns {
            match (column.parse::<VariantTag>(), ipa) {
                (Ok(tag), Some(ipa)) if !ipa.is_empty() => {
                    transcriptions.insert(tag, ipa);
                }
                (Ok(_), _) => {}
                (Err(_), _) if column == "word" => {}
                (Err(e), _) => warn!(word = %raw_word, "skipping column: {}", e),
            }
        }
        records.push(LexiconRecord { word, transcriptions });
    }

    if skipped_words > 0 {
        warn!(skipped_words, "lexicon keys skipped during import");
    }
    MemoryLexicon::from_records(records)
}

/// Reads an example table shaped `{word: [[sentence, file_name, dialect], ...]}`.
pub fn import_examples_json(path: &Path) -> Result<MemoryExamples, PersistenceError> {
    let reader = BufReader::new(File::open(path)?);
    let table: HashMap<String, Vec<(String, String, String)>> = serde_json::from_reader(reader)?;
    Ok(examples_from_table(table))
}

fn examples_from_table(table: HashMap<String, Vec<(String, String, String)>>) -> MemoryExamples {
    let mut skipped_words = 0usize;
    let mut entries = Vec::new();
    for (raw_word, rows) in table {
        let Some(word) = Word::parse(&raw_word) else {
            skipped_words += 1;
            continue;
        };
        for (sentence, audio_ref, dialect) in rows {
            entries.push((word.clone(), ExampleRecord { sentence, audio_ref, dialect }));
        }
    }

    if skipped_words > 0 {
        warn!(skipped_words, "example keys skipped during import");
    }
    MemoryExamples::from_entries(entries)
}
