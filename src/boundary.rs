//! Request validation in front of the pipeline.
//!
//! Words are normalized by [`Word::parse`](crate::core::types::Word::parse);
//! this module covers the remaining inputs: variant selectors, suggestion
//! limits and audio references coming out of the example store.

use crate::config::Config;
use crate::core::types::{UnknownVariant, VariantTag};
use std::path::{Component, Path};

/// Longest audio reference accepted, in chars.
pub const MAX_AUDIO_REF_CHARS: usize = 255;

/// Parses an optional `variant` query value. Absent or blank means "use
/// the default"; anything else must be a known tag.
pub fn parse_variant(raw: Option<&str>) -> Result<Option<VariantTag>, UnknownVariant> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(tag) => tag.parse().map(Some),
    }
}

/// The requested suggestion count, defaulted and capped by the config.
pub fn clamp_limit(requested: Option<usize>, config: &Config) -> usize {
    requested
        .unwrap_or(config.suggest_limit)
        .min(config.max_suggest_limit)
}

/// Cleans an audio reference read from the example store.
///
/// Strips NUL bytes and surrounding whitespace and caps the length. Returns
/// `None` for empty, absolute or parent-relative paths so a bad store row
/// cannot point outside the audio root.
pub fn sanitize_audio_ref(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(|&c| c != '\0')
        .take(MAX_AUDIO_REF_CHARS)
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() || cleaned.contains('\\') {
        return None;
    }

    let safe = Path::new(cleaned)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    safe.then(|| cleaned.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_default_when_absent() {
        assert_eq!(parse_variant(None).unwrap(), None);
        assert_eq!(parse_variant(Some(" ")).unwrap(), None);
        assert_eq!(parse_variant(Some("sw_spoken")).unwrap().unwrap().to_string(), "sw_spoken");
        assert!(parse_variant(Some("bergensk")).is_err());
    }

    #[test]
    fn limits_are_capped() {
        let config = Config::default();
        assert_eq!(clamp_limit(None, &config), 10);
        assert_eq!(clamp_limit(Some(3), &config), 3);
        assert_eq!(clamp_limit(Some(10_000), &config), 50);
        assert_eq!(clamp_limit(Some(0), &config), 0);
    }

    #[test]
    fn audio_refs_stay_below_the_root() {
        assert_eq!(sanitize_audio_ref(" clips/a b.mp3 \0").as_deref(), Some("clips/a b.mp3"));
        assert_eq!(sanitize_audio_ref("./a.mp3").as_deref(), Some("./a.mp3"));
        assert!(sanitize_audio_ref("../secret").is_none());
        assert!(sanitize_audio_ref("clips/../../etc/passwd").is_none());
        assert!(sanitize_audio_ref("/etc/passwd").is_none());
        assert!(sanitize_audio_ref("..\\win.ini").is_none());
        assert!(sanitize_audio_ref("  ").is_none());
    }

    #[test]
    fn long_refs_are_truncated() {
        let long = "a".repeat(MAX_AUDIO_REF_CHARS + 10);
        assert_eq!(sanitize_audio_ref(&long).unwrap().len(), MAX_AUDIO_REF_CHARS);
    }
}
