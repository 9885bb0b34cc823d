//! Grapheme-to-phoneme models.
//!
//! The resolution pipeline treats a model as an opaque capability: a word
//! goes in, Nofabet symbols come out, or the model refuses with a
//! [`ModelError`]. Models are registered per [`VariantTag`] in a
//! [`SynthesizerSet`]; variants without their own model use the default.

use crate::core::types::{PhonemeSequence, VariantTag, Word};
use crate::error::ModelError;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub trait PhonemeSynthesizer: Send + Sync {
    /// Phonemizes one normalized word. Implementations hold no per-call
    /// mutable state, so one instance serves all requests.
    fn phonemize(&self, word: &Word) -> Result<PhonemeSequence, ModelError>;

    /// Short identifier used in logs.
    fn name(&self) -> &str;
}

/// Models keyed by variant, with a fallback default.
#[derive(Clone)]
pub struct SynthesizerSet {
    default: Arc<dyn PhonemeSynthesizer>,
    by_variant: HashMap<VariantTag, Arc<dyn PhonemeSynthesizer>>,
}

impl SynthesizerSet {
    pub fn new(default: Arc<dyn PhonemeSynthesizer>) -> Self {
        Self { default, by_variant: HashMap::new() }
    }

    pub fn with_variant(mut self, variant: VariantTag, model: Arc<dyn PhonemeSynthesizer>) -> Self {
        self.by_variant.insert(variant, model);
        self
    }

    /// The model for `variant`, or the default when none is registered.
    pub fn for_variant(&self, variant: Option<VariantTag>) -> &dyn PhonemeSynthesizer {
        variant
            .and_then(|v| self.by_variant.get(&v))
            .unwrap_or(&self.default)
            .as_ref()
    }
}

impl Default for SynthesizerSet {
    fn default() -> Self {
        Self::new(Arc::new(RuleSynthesizer::new()))
    }
}

impl fmt::Debug for SynthesizerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut variants: Vec<String> = self
            .by_variant
            .iter()
            .map(|(tag, model)| format!("{tag}={}", model.name()))
            .collect();
        variants.sort();
        f.debug_struct("SynthesizerSet")
            .field("default", &self.default.name())
            .field("by_variant", &variants)
            .finish()
    }
}

const VOWELS: [char; 9] = ['a', 'e', 'i', 'o', 'u', 'y', 'æ', 'ø', 'å'];

fn is_vowel(c: char) -> bool {
    VOWELS.contains(&c)
}

/// Rule-based Norwegian (Bokmål) grapheme-to-phoneme model.
///
/// Covers the regular spelling-to-sound rules: consonant digraphs and
/// trigraphs, soft `k`/`g`/`sk` before front vowels, retroflex `r`
/// clusters, diphthongs and vowel length by the following consonants.
/// Each hyphen- or apostrophe-separated part gets its own stress: primary
/// on the first part, secondary on later ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleSynthesizer;

impl RuleSynthesizer {
    pub fn new() -> Self {
        Self
    }

    fn fold(c: char) -> char {
        match c {
            'é' | 'è' | 'ê' => 'e',
            'à' | 'á' | 'â' => 'a',
            'ó' | 'ò' | 'ô' => 'o',
            'ü' => 'y',
            'ä' => 'æ',
            'ö' => 'ø',
            _ => c,
        }
    }

    fn is_front(letters: &[char], i: usize) -> bool {
        match letters.get(i) {
            Some('i') | Some('y') => true,
            Some('e') => letters.get(i + 1) == Some(&'i'),
            Some('ø') => letters.get(i + 1) == Some(&'y'),
            _ => false,
        }
    }

    fn diphthong(a: char, b: Option<char>) -> Option<&'static str> {
        match (a, b?) {
            ('e', 'i') => Some("AEJ"),
            ('a', 'i') => Some("AJ"),
            ('a', 'u') => Some("AEW"),
            ('ø', 'y') => Some("OEJ"),
            ('o', 'y') => Some("OJ"),
            ('u', 'i') => Some("UJ"),
            _ => None,
        }
    }

    fn vowel(c: char, long: bool) -> &'static str {
        match (c, long) {
            ('a', true) => "AA", ('a', false) => "A",
            ('e', true) => "EE", ('e', false) => "E",
            ('i', true) => "II", ('i', false) => "I",
            ('o', true) => "OO", ('o', false) => "O",
            ('u', true) => "UU", ('u', false) => "U",
            ('y', true) => "YY", ('y', false) => "Y",
            ('æ', true) => "AEE", ('æ', false) => "AE",
            ('ø', true) => "OEE", ('ø', false) => "OE",
            (_, true) => "AAO", (_, false) => "AO",
        }
    }

    fn consonant(c: char) -> Option<&'static str> {
        match c {
            'b' => Some("B"), 'd' => Some("D"), 'f' => Some("F"),
            'g' => Some("G"), 'h' => Some("H"), 'j' => Some("J"),
            'k' | 'q' => Some("K"), 'l' => Some("L"), 'm' => Some("M"),
            'n' => Some("N"), 'p' => Some("P"), 'r' => Some("R"),
            's' | 'z' => Some("S"), 't' => Some("T"), 'v' | 'w' => Some("V"),
            _ => None,
        }
    }

    /// Phonemizes one separator-free part of a word.
    fn phonemize_part(letters: &[char], stress: char, out: &mut Vec<String>) {
        let mut i = 0;
        let mut stressed_done = false;

        while i < letters.len() {
            let c = letters[i];
            let next = letters.get(i + 1).copied();

            if is_vowel(c) {
                let stressed = !stressed_done;
                stressed_done = true;
                let digit = if stressed { stress } else { '0' };

                if let Some(d) = Self::diphthong(c, next) {
                    out.push(format!("{d}{digit}"));
                    i += 2;
                    continue;
                }

                let symbol = if !stressed && c == 'e' {
                    "AX"
                } else {
                    let following = letters[i + 1..]
                        .iter()
                        .take_while(|&&l| !is_vowel(l))
                        .count();
                    Self::vowel(c, stressed && following <= 1)
                };
                out.push(format!("{symbol}{digit}"));
                i += 1;
                continue;
            }

            // Clusters map to space-separated symbols.
            let rest = &letters[i..];
            let (symbols, consumed) = match rest {
                ['s', 'k', 'j', ..] => ("SJ", 3),
                ['s', 'j', ..] => ("SJ", 2),
                ['s', 'k', ..] if Self::is_front(letters, i + 2) => ("SJ", 2),
                ['k', 'j', ..] | ['t', 'j', ..] => ("KJ", 2),
                ['k', ..] if Self::is_front(letters, i + 1) => ("KJ", 1),
                ['g', 'j', ..] | ['h', 'j', ..] => ("J", 2),
                ['g', ..] if i == 0 && Self::is_front(letters, 1) => ("J", 1),
                ['h', 'v', ..] => ("V", 2),
                ['n', 'g', ..] => ("NG", 2),
                ['n', 'k', ..] => ("NG K", 2),
                ['r', 'd', ..] => ("RD", 2),
                ['r', 'l', ..] => ("RL", 2),
                ['r', 'n', ..] => ("RN", 2),
                ['r', 's', ..] => ("RS", 2),
                ['r', 't', ..] => ("RT", 2),
                ['c', 'k', ..] => ("K", 2),
                ['c', 'h', ..] => ("SJ", 2),
                ['p', 'h', ..] => ("F", 2),
                ['t', 'h', ..] => ("T", 2),
                ['c', ..] if matches!(next, Some('e' | 'i' | 'y')) => ("S", 1),
                ['c', ..] => ("K", 1),
                ['x', ..] => ("K S", 1),
                // Geminates are written once.
                [a, b, ..] if a == b => (Self::consonant(c).unwrap_or(""), 2),
                _ => (Self::consonant(c).unwrap_or(""), 1),
            };
            out.extend(symbols.split_whitespace().map(str::to_string));
            i += consumed;
        }
    }
}

impl PhonemeSynthesizer for RuleSynthesizer {
    fn phonemize(&self, word: &Word) -> Result<PhonemeSequence, ModelError> {
        let mut parts: Vec<Vec<char>> = vec![Vec::new()];
        for raw in word.as_str().chars() {
            if raw == '-' || raw == '\'' {
                parts.push(Vec::new());
                continue;
            }
            let c = Self::fold(raw);
            if !(c.is_ascii_lowercase() || is_vowel(c)) {
                return Err(ModelError::UnsupportedSymbol {
                    symbol: raw,
                    word: word.to_string(),
                });
            }
            if let Some(part) = parts.last_mut() {
                part.push(c);
            }
        }

        let mut out = Vec::new();
        let mut first = true;
        for part in parts.iter().filter(|p| !p.is_empty()) {
            Self::phonemize_part(part, if first { '1' } else { '3' }, &mut out);
            first = false;
        }

        if out.is_empty() {
            return Err(ModelError::EmptyOutput(word.to_string()));
        }
        Ok(PhonemeSequence::new(out))
    }

    fn name(&self) -> &str {
        "rules"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::converter::TranscriptionConverter;
    use crate::core::types::{Dialect, Register};

    fn phonemes(word: &str) -> String {
        RuleSynthesizer::new()
            .phonemize(&Word::parse(word).unwrap())
            .unwrap()
            .to_string()
    }

    #[test]
    fn vowel_length_follows_consonants() {
        assert_eq!(phonemes("katt"), "K A1 T");
        assert_eq!(phonemes("tak"), "T AA1 K");
        assert_eq!(phonemes("katter"), "K A1 T AX0 R");
    }

    #[test]
    fn digraphs_and_soft_consonants() {
        assert_eq!(phonemes("kjøre"), "KJ OEE1 R AX0");
        assert_eq!(phonemes("ski"), "SJ II1");
        assert_eq!(phonemes("skjorte"), "SJ O1 RT AX0");
        assert_eq!(phonemes("hvem"), "V EE1 M");
        assert_eq!(phonemes("gi"), "J II1");
        assert_eq!(phonemes("sang"), "S A1 NG");
        assert_eq!(phonemes("bank"), "B A1 NG K");
    }

    #[test]
    fn diphthongs_are_single_vowels() {
        assert_eq!(phonemes("hei"), "H AEJ1");
        assert_eq!(phonemes("øy"), "OEJ1");
    }

    #[test]
    fn separated_parts_get_secondary_stress() {
        assert_eq!(phonemes("e-post"), "EE1 P O3 S T");
    }

    #[test]
    fn digits_are_rejected() {
        let err = RuleSynthesizer::new()
            .phonemize(&Word::parse("r2d2").unwrap())
            .unwrap_err();
        assert_eq!(err, ModelError::UnsupportedSymbol { symbol: '2', word: "r2d2".into() });
    }

    #[test]
    fn separators_alone_give_empty_output() {
        let err = RuleSynthesizer::new()
            .phonemize(&Word::parse("'-'").unwrap())
            .unwrap_err();
        assert!(matches!(err, ModelError::EmptyOutput(_)));
    }

    #[test]
    fn every_emitted_symbol_converts() {
        let converter = TranscriptionConverter::new();
        let words = [
            "blåbærsyltetøy", "kjærlighet", "skjønnhet", "gjest", "hjerte", "hvalross",
            "restaurant", "sjokolade", "xylofon", "zebra", "cirkus", "chips", "philosoph",
            "thea", "quiz", "wienerbrød", "café", "müsli", "ärlig", "öl", "sauer",
            "hoy", "huis", "bord", "karl", "barn", "kurs", "kort", "ung", "yr", "sykkel",
        ];
        for word in words {
            let seq = RuleSynthesizer::new()
                .phonemize(&Word::parse(word).unwrap())
                .unwrap();
            for symbol in seq.symbols() {
                assert!(converter.is_mapped(symbol), "{word}: {symbol} unmapped");
            }
            assert!(converter.convert(&seq).is_ok(), "{word}");
        }
    }

    struct Fixed(&'static str);

    impl PhonemeSynthesizer for Fixed {
        fn phonemize(&self, _word: &Word) -> Result<PhonemeSequence, ModelError> {
            Ok(PhonemeSequence::parse(self.0))
        }

        fn name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn set_falls_back_to_default_model() {
        let north = VariantTag::new(Dialect::North, Register::Spoken);
        let set = SynthesizerSet::new(Arc::new(Fixed("A1")))
            .with_variant(north, Arc::new(Fixed("E1")));

        assert_eq!(set.for_variant(Some(north)).name(), "E1");
        assert_eq!(set.for_variant(Some(VariantTag::default())).name(), "A1");
        assert_eq!(set.for_variant(None).name(), "A1");
    }
}
