//! # Origin Key
//!
//! Where a transposition starts from: a key the caller names, or one inferred
//! from the chords themselves.
//!
//! Inference is deliberately simple: the first chord with a recognized root
//! is taken as the tonic. `Dm7 G7 Cmaj7` infers D, not C. There is no
//! statistical or cadence-based key detection.

use serde::{Deserialize, Serialize};

use crate::lexer::{parse_chord_symbol, split_keeping_whitespace, ChordLexer, Segment};
use crate::pitch::{parse_key, PitchClass};

/// Origin of a transposition
///
/// Serialized as `"infer"` or the key's sharp spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Origin {
    /// Take the root of the first recognized chord in the input
    #[default]
    Infer,
    Known(PitchClass),
}

impl Origin {
    /// Parse an origin parameter. Blank or `infer` means [`Origin::Infer`];
    /// anything else must be a key name accepted by [`parse_key`].
    pub fn from_str(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("infer") {
            return Some(Self::Infer);
        }
        parse_key(trimmed).map(Self::Known)
    }

    pub fn known(self) -> Option<PitchClass> {
        match self {
            Self::Known(pitch) => Some(pitch),
            Self::Infer => None,
        }
    }
}

impl From<PitchClass> for Origin {
    fn from(pitch: PitchClass) -> Self {
        Self::Known(pitch)
    }
}

impl From<Origin> for String {
    fn from(origin: Origin) -> Self {
        match origin {
            Origin::Infer => "infer".to_string(),
            Origin::Known(pitch) => pitch.to_string(),
        }
    }
}

impl TryFrom<String> for Origin {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value).ok_or_else(|| format!("not a key name: '{}'", value))
    }
}

impl From<Option<PitchClass>> for Origin {
    fn from(pitch: Option<PitchClass>) -> Self {
        pitch.map_or(Self::Infer, Self::Known)
    }
}

/// Root of the first token that is a chord symbol in its entirety.
///
/// This is the inference rule for whitespace-separated input: tokens such as
/// `Bridge:` or `Amazing` start with a note letter but are not chords, so they
/// are skipped. A chord whose root is not a table note (`Cb7`) is skipped too.
///
/// ```rust
/// use chordshift::{find_origin_key, PitchClass};
///
/// assert_eq!(find_origin_key(&["Dm7", "G7", "Cmaj7"]), Some(PitchClass::D));
/// assert_eq!(find_origin_key(&["Bridge:", "G", "D"]), Some(PitchClass::G));
/// assert_eq!(find_origin_key(&["|", "x2"]), None);
/// ```
pub fn find_origin_key<S: AsRef<str>>(tokens: &[S]) -> Option<PitchClass> {
    tokens
        .iter()
        .find_map(|token| parse_chord_symbol(token.as_ref()).map(|chord| chord.root))
}

/// First chord root in a whitespace-separated chord list.
pub fn infer_from_chord_list(text: &str) -> Option<PitchClass> {
    let tokens: Vec<&str> = split_keeping_whitespace(text)
        .into_iter()
        .filter(|(_, is_space)| !is_space)
        .map(|(token, _)| token)
        .collect();
    find_origin_key(&tokens)
}

/// First chord root in a free-form chart.
pub fn infer_from_chart(text: &str) -> Option<PitchClass> {
    ChordLexer::new(text)
        .tokenize()
        .into_iter()
        .find_map(|located| match located.segment {
            Segment::Chord(chord) => Some(chord.root),
            Segment::Literal(_) => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_recognized_root_wins() {
        assert_eq!(find_origin_key(&["Dm7", "G7", "Cmaj7"]), Some(PitchClass::D));
        assert_eq!(find_origin_key(&["intro", "Bb", "F"]), Some(PitchClass::AS));
        assert_eq!(find_origin_key(&["F#m", "D"]), Some(PitchClass::FS));
    }

    #[test]
    fn test_no_recognized_root() {
        let empty: [&str; 0] = [];
        assert_eq!(find_origin_key(&empty), None);
        assert_eq!(find_origin_key(&["", "la", "H7", "Cb", "Amazing"]), None);
    }

    #[test]
    fn test_accepts_owned_strings() {
        let tokens = vec!["x".to_string(), "Eb".to_string()];
        assert_eq!(find_origin_key(&tokens), Some(PitchClass::DS));
    }

    #[test]
    fn test_chord_list_inference_skips_non_chords() {
        assert_eq!(infer_from_chord_list("Bridge: G D Em C"), Some(PitchClass::G));
        assert_eq!(infer_from_chord_list("   "), None);
    }

    #[test]
    fn test_words_starting_with_a_note_are_not_roots() {
        assert_eq!(find_origin_key(&["Bridge:", "G", "D", "Em", "C"]), Some(PitchClass::G));
        assert_eq!(find_origin_key(&["Amazing", "grace", "G", "D"]), Some(PitchClass::G));
        assert_eq!(find_origin_key(&["Ebony", "F#m7", "B"]), Some(PitchClass::FS));
    }

    #[test]
    fn test_chart_inference_skips_lyrics() {
        assert_eq!(infer_from_chart("Be still\n   Am   F\nmy soul"), Some(PitchClass::A));
        assert_eq!(infer_from_chart("no chords here"), None);
    }

    #[test]
    fn test_origin_parsing() {
        assert_eq!(Origin::from_str(""), Some(Origin::Infer));
        assert_eq!(Origin::from_str("  "), Some(Origin::Infer));
        assert_eq!(Origin::from_str("Db"), Some(Origin::Known(PitchClass::CS)));
        assert_eq!(Origin::from_str("Infer"), Some(Origin::Infer));
        assert_eq!(Origin::from_str("Q"), None);
        assert_eq!(String::from(Origin::Known(PitchClass::AS)), "A#");
        assert_eq!(Origin::from(None::<PitchClass>), Origin::Infer);
        assert_eq!(Origin::Known(PitchClass::E).known(), Some(PitchClass::E));
    }
}
