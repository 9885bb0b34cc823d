use crate::core::types::PhonemeSequence;
use crate::error::ConversionError;

/// One converted symbol before stress marks are placed.
struct Segment {
    ipa: &'static str,
    vowel: bool,
    stress_mark: Option<char>,
}

/// Stateless Nofabet to IPA converter.
///
/// Vowel symbols may carry a stress digit: `0` unstressed, `1` primary
/// stress with toneme 1, `2` primary stress with toneme 2, `3` secondary
/// stress. Marks are written before the onset of the stressed syllable.
#[derive(Debug, Clone, Copy, Default)]
pub struct TranscriptionConverter;

impl TranscriptionConverter {
    pub fn new() -> Self {
        Self
    }

    /// Converts a full phoneme sequence. Any symbol without a mapping is
    /// reported, never skipped.
    pub fn convert(&self, phonemes: &PhonemeSequence) -> Result<String, ConversionError> {
        if phonemes.is_empty() {
            return Err(ConversionError::Empty);
        }

        let segments = phonemes
            .symbols()
            .iter()
            .map(|symbol| self.segment(symbol))
            .collect::<Result<Vec<_>, _>>()?;

        let mut marks: Vec<Option<char>> = vec![None; segments.len()];
        let mut prev_vowel: Option<usize> = None;
        for (i, seg) in segments.iter().enumerate() {
            if !seg.vowel {
                continue;
            }
            if let Some(mark) = seg.stress_mark {
                // Maximal onset of one consonant; the first syllable takes
                // the whole leading cluster.
                let at = match prev_vowel {
                    None => 0,
                    Some(p) if i - p > 1 => i - 1,
                    Some(_) => i,
                };
                marks[at] = Some(mark);
            }
            prev_vowel = Some(i);
        }

        let mut result = String::new();
        for (seg, mark) in segments.iter().zip(marks) {
            if let Some(mark) = mark {
                result.push(mark);
            }
            result.push_str(seg.ipa);
        }
        Ok(result)
    }

    /// Whether `symbol` (with or without a stress digit) can be converted.
    pub fn is_mapped(&self, symbol: &str) -> bool {
        self.segment(symbol).is_ok()
    }

    fn segment(&self, symbol: &str) -> Result<Segment, ConversionError> {
        let unmapped = || ConversionError::UnmappedSymbol(symbol.to_string());

        let (base, stress) = match symbol.char_indices().last() {
            Some((i, d)) if d.is_ascii_digit() => (&symbol[..i], Some(d)),
            _ => (symbol, None),
        };

        if let Some(ipa) = self.get_vowel(base) {
            let stress_mark = match stress {
                None | Some('0') => None,
                Some('1') => Some('ˈ'),
                Some('2') => Some('²'),
                Some('3') => Some('ˌ'),
                Some(_) => return Err(unmapped()),
            };
            return Ok(Segment { ipa, vowel: true, stress_mark });
        }

        match (self.get_consonant(base), stress) {
            (Some(ipa), None) => Ok(Segment { ipa, vowel: false, stress_mark: None }),
            _ => Err(unmapped()),
        }
    }

    fn get_vowel(&self, s: &str) -> Option<&'static str> {
        match s {
            "A" => Some("ɑ"), "AA" => Some("ɑː"),
            "AE" => Some("æ"), "AEE" => Some("æː"),
            "AEJ" => Some("æɪ"), "AEW" => Some("æʉ"),
            "AJ" => Some("ɑɪ"), "AO" => Some("ɔ"),
            "AAO" => Some("oː"), "AX" => Some("ə"),
            "E" => Some("ɛ"), "EE" => Some("eː"),
            "I" => Some("ɪ"), "II" => Some("iː"),
            "O" => Some("ʊ"), "OO" => Some("uː"),
            "OE" => Some("œ"), "OEE" => Some("øː"),
            "OEJ" => Some("œʏ"), "OJ" => Some("ɔʏ"),
            "U" => Some("ʉ"), "UU" => Some("ʉː"),
            "UJ" => Some("ʉɪ"), "Y" => Some("ʏ"),
            "YY" => Some("yː"),
            _ => None,
        }
    }

    fn get_consonant(&self, s: &str) -> Option<&'static str> {
        match s {
            "B" => Some("b"), "D" => Some("d"), "F" => Some("f"),
            "G" => Some("ɡ"), "H" => Some("h"), "J" => Some("j"),
            "K" => Some("k"), "KJ" => Some("ç"), "L" => Some("l"),
            "M" => Some("m"), "N" => Some("n"), "NG" => Some("ŋ"),
            "P" => Some("p"), "R" => Some("ɾ"), "RD" => Some("ɖ"),
            "RL" => Some("ɭ"), "RN" => Some("ɳ"), "RS" => Some("ʂ"),
            "RT" => Some("ʈ"), "S" => Some("s"), "SJ" => Some("ʃ"),
            "T" => Some("t"), "V" => Some("ʋ"), "W" => Some("w"),
            _ => None,
        }
    }
}
