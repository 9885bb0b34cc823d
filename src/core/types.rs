// src/core/types.rs
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Longest word (in chars) accepted at the boundary.
pub const MAX_WORD_CHARS: usize = 100;

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '\''
}

/// A normalized token: case-folded, restricted to letters, digits, hyphen
/// and apostrophe, at most [`MAX_WORD_CHARS`] chars, never empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Word(String);

impl Word {
    /// Normalizes raw user input. Characters outside the alphabet are
    /// dropped rather than rejected; `None` if nothing is left.
    pub fn parse(raw: &str) -> Option<Word> {
        let normalized: String = raw
            .chars()
            .flat_map(char::to_lowercase)
            .filter(|&c| is_word_char(c))
            .take(MAX_WORD_CHARS)
            .collect();
        if normalized.is_empty() {
            None
        } else {
            Some(Word(normalized))
        }
    }

    /// Accepts `s` only if it is already in normal form.
    pub fn from_normalized(s: &str) -> Option<Word> {
        Word::parse(s).filter(|w| w.0 == s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Word {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dialect {
    East,
    North,
    SouthWest,
    Trondersk,
    West,
}

impl Dialect {
    pub const ALL: [Dialect; 5] = [
        Dialect::East,
        Dialect::North,
        Dialect::SouthWest,
        Dialect::Trondersk,
        Dialect::West,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Dialect::East => "e",
            Dialect::North => "n",
            Dialect::SouthWest => "sw",
            Dialect::Trondersk => "t",
            Dialect::West => "w",
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        match code {
            "e" => Some(Dialect::East),
            "n" => Some(Dialect::North),
            "sw" => Some(Dialect::SouthWest),
            "t" => Some(Dialect::Trondersk),
            "w" => Some(Dialect::West),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Dialect::East => "East Norwegian",
            Dialect::North => "North Norwegian",
            Dialect::SouthWest => "South-West Norwegian",
            Dialect::Trondersk => "Trøndersk",
            Dialect::West => "West Norwegian",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Register {
    Written,
    Spoken,
}

impl Register {
    pub fn code(self) -> &'static str {
        match self {
            Register::Written => "written",
            Register::Spoken => "spoken",
        }
    }
}

/// Dialect group × register. Text form is `<dialect>_<register>`, e.g.
/// `e_written`, matching the lexicon's column names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct VariantTag {
    pub dialect: Dialect,
    pub register: Register,
}

impl VariantTag {
    pub const fn new(dialect: Dialect, register: Register) -> Self {
        Self { dialect, register }
    }

    /// Every combination, in canonical order.
    pub fn all() -> impl Iterator<Item = VariantTag> {
        Dialect::ALL.into_iter().flat_map(|dialect| {
            [Register::Written, Register::Spoken]
                .into_iter()
                .map(move |register| VariantTag { dialect, register })
        })
    }

    pub fn label(self) -> String {
        format!("{}, {}", self.dialect.label(), self.register.code())
    }
}

impl Default for VariantTag {
    fn default() -> Self {
        VariantTag::new(Dialect::East, Register::Written)
    }
}

impl fmt::Display for VariantTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.dialect.code(), self.register.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown variant {0:?}")]
pub struct UnknownVariant(pub String);

impl FromStr for VariantTag {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (dialect, register) = s
            .split_once('_')
            .ok_or_else(|| UnknownVariant(s.to_string()))?;
        let dialect = Dialect::from_code(dialect).ok_or_else(|| UnknownVariant(s.to_string()))?;
        let register = match register {
            "written" => Register::Written,
            "spoken" => Register::Spoken,
            _ => return Err(UnknownVariant(s.to_string())),
        };
        Ok(VariantTag { dialect, register })
    }
}

impl From<VariantTag> for String {
    fn from(tag: VariantTag) -> Self {
        tag.to_string()
    }
}

impl TryFrom<String> for VariantTag {
    type Error = UnknownVariant;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Per-variant transcriptions of one lexicon word. Some variants may be
/// missing; that is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconRecord {
    pub word: Word,
    pub transcriptions: BTreeMap<VariantTag, String>,
}

/// One example sentence containing a word, with its audio clip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleRecord {
    pub sentence: String,
    /// Path relative to the audio root.
    pub audio_ref: String,
    pub dialect: String,
}

/// Phoneme symbols in Nofabet notation, e.g. `["K", "A1", "T"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhonemeSequence(Vec<String>);

impl PhonemeSequence {
    pub fn new(symbols: Vec<String>) -> Self {
        Self(symbols)
    }

    /// Splits whitespace-separated model output.
    pub fn parse(text: &str) -> Self {
        text.split_whitespace().map(str::to_string).collect()
    }

    pub fn symbols(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<String> for PhonemeSequence {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for PhonemeSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

/// Why a transcription could not be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    ModelError,
    UnmappedSymbol,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transcriptions {
    /// The full variant mapping of a lexicon hit.
    Exact(BTreeMap<VariantTag, String>),
    Synthesized { ipa: String },
    Error { reason: FailureReason },
}

// Exact hits serialize as the bare variant map, the other two as a tagged marker.
impl Serialize for Transcriptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Transcriptions::Exact(map) => map.serialize(serializer),
            Transcriptions::Synthesized { ipa } => {
                let mut m = serializer.serialize_map(Some(2))?;
                m.serialize_entry("source", "synthesized")?;
                m.serialize_entry("ipa", ipa)?;
                m.end()
            }
            Transcriptions::Error { reason } => {
                let mut m = serializer.serialize_map(Some(2))?;
                m.serialize_entry("source", "error")?;
                m.serialize_entry("reason", reason)?;
                m.end()
            }
        }
    }
}

/// Per-request outcome of a word lookup. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionResult {
    pub word: Word,
    pub transcriptions: Transcriptions,
    pub examples: Vec<ExampleRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_folds_case_and_strips_foreign_characters() {
        assert_eq!(Word::parse("  Blåbær!? ").unwrap().as_str(), "blåbær");
        assert_eq!(Word::parse("o'hara-<script>").unwrap().as_str(), "o'hara-script");
        assert!(Word::parse("?!. ").is_none());
        assert!(Word::parse("").is_none());
    }

    #[test]
    fn parse_truncates_long_input() {
        let long = "a".repeat(MAX_WORD_CHARS + 20);
        assert_eq!(Word::parse(&long).unwrap().as_str().chars().count(), MAX_WORD_CHARS);
    }

    #[test]
    fn from_normalized_rejects_unnormalized_keys() {
        assert!(Word::from_normalized("katt").is_some());
        assert!(Word::from_normalized("Oslo").is_none());
        assert!(Word::from_normalized("to ord").is_none());
    }

    #[test]
    fn variant_tags_round_trip_through_text() {
        for tag in VariantTag::all() {
            assert_eq!(tag.to_string().parse::<VariantTag>().unwrap(), tag);
        }
        assert_eq!(VariantTag::all().count(), 10);
        assert_eq!(VariantTag::default().to_string(), "e_written");
        assert!("x_written".parse::<VariantTag>().is_err());
        assert!("e_sung".parse::<VariantTag>().is_err());
        assert!("ewritten".parse::<VariantTag>().is_err());
    }

    #[test]
    fn transcriptions_serialize_as_map_or_marker() {
        let mut map = BTreeMap::new();
        map.insert(VariantTag::default(), "kɑt".to_string());
        let exact = serde_json::to_value(Transcriptions::Exact(map)).unwrap();
        assert_eq!(exact, serde_json::json!({"e_written": "kɑt"}));

        let synth = serde_json::to_value(Transcriptions::Synthesized { ipa: "ˈʃɪlk".into() }).unwrap();
        assert_eq!(synth, serde_json::json!({"source": "synthesized", "ipa": "ˈʃɪlk"}));

        let err = serde_json::to_value(Transcriptions::Error { reason: FailureReason::ModelError }).unwrap();
        assert_eq!(err, serde_json::json!({"source": "error", "reason": "model_error"}));
    }
}
