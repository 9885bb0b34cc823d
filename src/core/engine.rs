use crate::catalog::{Catalog, CatalogHandle};
use crate::core::converter::TranscriptionConverter;
use crate::core::synthesizer::SynthesizerSet;
use crate::core::types::{FailureReason, ResolutionResult, Transcriptions, VariantTag, Word};
use crate::error::{ConversionError, StoreError};
use std::sync::Arc;
use std::thread;
use tracing::{debug, warn};

/// Resolves words to pronunciations and answers autocomplete queries.
///
/// Exact lexicon hits return every stored variant. Misses go through the
/// variant's phoneme model and the Nofabet converter; failures there end up
/// as an error marker in the result, never as an `Err`. Only an unavailable
/// store fails a call.
#[derive(Debug)]
pub struct ResolutionPipeline {
    catalog: CatalogHandle,
    synthesizers: SynthesizerSet,
    converter: TranscriptionConverter,
}

impl ResolutionPipeline {
    pub fn new(catalog: Catalog, synthesizers: SynthesizerSet) -> Self {
        Self {
            catalog: CatalogHandle::new(catalog),
            synthesizers,
            converter: TranscriptionConverter::new(),
        }
    }

    /// Up to `limit` known words starting with `prefix`, shortest first.
    pub fn suggest(&self, prefix: &str, limit: usize) -> Vec<Word> {
        self.catalog.current().index().suggest(prefix, limit)
    }

    /// Looks `word` up. Both branches read the same catalog. A non-resident
    /// example store is queried on its own thread, alongside the
    /// transcription branch.
    pub fn resolve(
        &self,
        word: &Word,
        variant: Option<VariantTag>,
    ) -> Result<ResolutionResult, StoreError> {
        let catalog = self.catalog.current();

        if catalog.examples().is_resident() {
            return Ok(ResolutionResult {
                word: word.clone(),
                transcriptions: self.transcribe(&catalog, word, variant)?,
                examples: catalog.examples().lookup(word)?,
            });
        }

        let (transcriptions, examples) = thread::scope(|s| {
            let examples = s.spawn(|| catalog.examples().lookup(word));
            let transcriptions = self.transcribe(&catalog, word, variant);
            let examples = examples
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
            (transcriptions, examples)
        });

        Ok(ResolutionResult {
            word: word.clone(),
            transcriptions: transcriptions?,
            examples: examples?,
        })
    }

    fn transcribe(
        &self,
        catalog: &Catalog,
        word: &Word,
        variant: Option<VariantTag>,
    ) -> Result<Transcriptions, StoreError> {
        if let Some(record) = catalog.lexicon().lookup(word)? {
            debug!(%word, variants = record.transcriptions.len(), "lexicon hit");
            return Ok(Transcriptions::Exact(record.transcriptions));
        }

        let model = self.synthesizers.for_variant(variant);
        let phonemes = match model.phonemize(word) {
            Ok(phonemes) => phonemes,
            Err(e) => {
                warn!(%word, model = model.name(), "phoneme model failed: {}", e);
                return Ok(Transcriptions::Error { reason: FailureReason::ModelError });
            }
        };

        match self.converter.convert(&phonemes) {
            Ok(ipa) => {
                debug!(%word, model = model.name(), %phonemes, %ipa, "synthesized");
                Ok(Transcriptions::Synthesized { ipa })
            }
            Err(e) => {
                warn!(%word, model = model.name(), %phonemes, "conversion failed: {}", e);
                let reason = match e {
                    ConversionError::UnmappedSymbol(_) => FailureReason::UnmappedSymbol,
                    ConversionError::Empty => FailureReason::ModelError,
                };
                Ok(Transcriptions::Error { reason })
            }
        }
    }

    /// Swaps in a rebuilt catalog and returns the previous one.
    pub fn reload(&self, catalog: Catalog) -> Arc<Catalog> {
        self.catalog.replace(catalog)
    }
}
