//! # Transposition Engine
//!
//! Shifts chord roots by a fixed number of semitones and re-spells them.
//!
//! Only the root changes. The quality text is copied verbatim, and the slash
//! bass marker is copied verbatim unless [`BassPolicy::Transpose`] is chosen.
//!
//! ## Offsets
//! A [`Transposition`] stores the upward offset in `0..12`:
//! `offset = (destination - origin + 12) mod 12`, and each root moves to
//! `(root + offset) mod 12`. An offset of 0 leaves text untouched, spelling
//! included, so `Bb` stays `Bb` even with a sharp preference.
//!
//! ## Example
//! ```rust
//! use chordshift::{EnharmonicPreference, PitchClass, Transposition};
//!
//! let up_a_tone = Transposition::between(PitchClass::C, PitchClass::D, EnharmonicPreference::Sharp);
//! assert_eq!(up_a_tone.offset(), 2);
//! assert_eq!(up_a_tone.transpose_token("Am7"), "Bm7");
//! assert_eq!(up_a_tone.transpose_token("lyrics"), "lyrics");
//! ```

use serde::{Deserialize, Serialize};

use crate::lexer::{parse_chord_symbol, split_keeping_whitespace, ChordLexer, ChordSymbol, Segment};
use crate::pitch::{EnharmonicPreference, PitchClass};

/// What to do with the note after a slash (`G/B`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BassPolicy {
    /// Copy the bass marker unchanged (`G/B` up a tone is `A/B`)
    #[default]
    Preserve,
    /// Shift the bass note with the root (`G/B` up a tone is `A/C#`)
    Transpose,
}

/// A fixed semitone shift plus the rules for spelling the result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Transposition {
    offset: u8,
    preference: EnharmonicPreference,
    bass: BassPolicy,
}

impl Transposition {
    /// Shift that carries `origin` onto `destination`, always measured upward.
    pub fn between(origin: PitchClass, destination: PitchClass, preference: EnharmonicPreference) -> Self {
        Self {
            offset: origin.interval_to(destination),
            preference,
            bass: BassPolicy::default(),
        }
    }

    /// Shift by any signed number of semitones, wrapped into `0..12`.
    pub fn by_semitones(semitones: i32, preference: EnharmonicPreference) -> Self {
        Self {
            offset: PitchClass::wrapping(semitones).index(),
            preference,
            bass: BassPolicy::default(),
        }
    }

    pub fn with_bass(mut self, bass: BassPolicy) -> Self {
        self.bass = bass;
        self
    }

    pub fn offset(&self) -> u8 {
        self.offset
    }

    pub fn preference(&self) -> EnharmonicPreference {
        self.preference
    }

    pub fn bass(&self) -> BassPolicy {
        self.bass
    }

    pub fn is_identity(&self) -> bool {
        self.offset == 0
    }

    /// Apply `self` and then `next`. The result spells and treats bass notes
    /// the way `next` does.
    pub fn then(self, next: Transposition) -> Transposition {
        Transposition {
            offset: (self.offset + next.offset) % 12,
            ..next
        }
    }

    /// The shift running the other way with the same spelling rules.
    pub fn inverse(self) -> Transposition {
        Transposition {
            offset: (12 - self.offset) % 12,
            ..self
        }
    }

    pub fn apply(&self, pitch: PitchClass) -> PitchClass {
        pitch.shifted(i32::from(self.offset))
    }

    /// Render a parsed chord with its root (and bass, if enabled) shifted.
    pub fn transpose_symbol(&self, chord: &ChordSymbol<'_>) -> String {
        if self.is_identity() {
            return chord.text.to_string();
        }

        let mut out = String::with_capacity(chord.text.len() + 2);
        out.push_str(self.apply(chord.root).spelling(self.preference));

        match (self.bass, chord.bass) {
            (BassPolicy::Transpose, Some(bass)) => {
                out.push_str(chord.quality);
                out.push('/');
                match bass.pitch {
                    Some(pitch) => out.push_str(self.apply(pitch).spelling(self.preference)),
                    // Not a table note (`/Cb`): leave it as written.
                    None => out.push_str(bass.spelling),
                }
            }
            _ => out.push_str(chord.suffix()),
        }

        tracing::trace!(from = chord.text, to = %out, "transposed chord");
        out
    }

    /// Whole-token transposition: `token` changes only if it is entirely one
    /// chord symbol with a recognized root.
    pub fn transpose_token(&self, token: &str) -> String {
        match parse_chord_symbol(token) {
            Some(chord) => self.transpose_symbol(&chord),
            None => token.to_string(),
        }
    }

    /// Whitespace-separated chord list. Each non-whitespace run is tried as a
    /// whole token; whitespace is copied through exactly.
    pub fn transpose_chord_list(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for (run, is_space) in split_keeping_whitespace(text) {
            if is_space {
                out.push_str(run);
            } else {
                out.push_str(&self.transpose_token(run));
            }
        }
        out
    }

    /// Free-form chart. Chords are replaced in place; all other characters,
    /// including spacing and line breaks, are copied through.
    pub fn transpose_chart(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for located in ChordLexer::new(text).tokenize() {
            match located.segment {
                Segment::Chord(chord) => out.push_str(&self.transpose_symbol(&chord)),
                Segment::Literal(literal) => out.push_str(literal),
            }
        }
        out
    }
}

/// Transpose a single chord token from `origin` to `destination`.
///
/// Returns the token unchanged when it is not a chord symbol or its root is
/// not a recognized note.
///
/// ```rust
/// use chordshift::{transpose_chord, EnharmonicPreference, PitchClass};
///
/// let out = transpose_chord("Bm7/D", PitchClass::B, PitchClass::C, EnharmonicPreference::Sharp);
/// assert_eq!(out, "Cm7/D");
/// ```
pub fn transpose_chord(
    chord: &str,
    origin: PitchClass,
    destination: PitchClass,
    preference: EnharmonicPreference,
) -> String {
    Transposition::between(origin, destination, preference).transpose_token(chord)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SHARP: EnharmonicPreference = EnharmonicPreference::Sharp;
    const FLAT: EnharmonicPreference = EnharmonicPreference::Flat;

    #[test]
    fn test_offset_is_measured_upward() {
        assert_eq!(Transposition::between(PitchClass::C, PitchClass::D, SHARP).offset(), 2);
        assert_eq!(Transposition::between(PitchClass::D, PitchClass::C, SHARP).offset(), 10);
        assert_eq!(Transposition::by_semitones(-1, SHARP).offset(), 11);
        assert_eq!(Transposition::by_semitones(14, SHARP).offset(), 2);
    }

    #[test]
    fn test_root_only_changes() {
        let t = Transposition::by_semitones(2, SHARP);
        assert_eq!(t.transpose_token("C"), "D");
        assert_eq!(t.transpose_token("Am7"), "Bm7");
        assert_eq!(t.transpose_token("Fmaj7"), "Gmaj7");
        assert_eq!(t.transpose_token("E7sus4"), "F#7sus4");
        assert_eq!(t.transpose_token("Bbadd9"), "Cadd9");
    }

    #[test]
    fn test_preference_controls_spelling() {
        let t = Transposition::between(PitchClass::C, PitchClass::FS, FLAT);
        assert_eq!(t.transpose_token("C"), "Gb");
        assert_eq!(t.transpose_token("Am"), "Ebm");

        let t = Transposition::between(PitchClass::C, PitchClass::FS, SHARP);
        assert_eq!(t.transpose_token("C"), "F#");
        assert_eq!(t.transpose_token("Am"), "D#m");
    }

    #[test]
    fn test_identity_keeps_original_spelling() {
        let t = Transposition::between(PitchClass::AS, PitchClass::AS, SHARP);
        assert!(t.is_identity());
        assert_eq!(t.transpose_token("Bb7"), "Bb7");
        assert_eq!(t.transpose_chart("Bb   Eb/G\nla la"), "Bb   Eb/G\nla la");
    }

    #[test]
    fn test_bass_marker_preserved_by_default() {
        let t = Transposition::between(PitchClass::B, PitchClass::C, SHARP);
        assert_eq!(t.transpose_token("Bm7/D"), "Cm7/D");
    }

    #[test]
    fn test_bass_marker_transposed_on_request() {
        let t = Transposition::by_semitones(2, SHARP).with_bass(BassPolicy::Transpose);
        assert_eq!(t.transpose_token("G/B"), "A/C#");
        assert_eq!(t.transpose_token("Bm7/D"), "C#m7/E");
        assert_eq!(t.transpose_token("G/Cb"), "A/Cb");
        assert_eq!(t.transpose_token("Am"), "Bm");
    }

    #[test]
    fn test_unrecognized_tokens_pass_through() {
        let t = Transposition::by_semitones(5, SHARP);
        for token in ["Cb", "E#m", "Hello", "|", "x2", "N.C."] {
            assert_eq!(t.transpose_token(token), token);
        }
    }

    #[test]
    fn test_chord_list_keeps_separators() {
        let t = Transposition::by_semitones(2, SHARP);
        assert_eq!(t.transpose_chord_list("C G Am F"), "D A Bm G");
        assert_eq!(t.transpose_chord_list("  C\t\tG | Am  F\n"), "  D\t\tA | Bm  G\n");
        assert_eq!(t.transpose_chord_list("C verse(G)"), "D verse(G)");
        assert_eq!(t.transpose_chord_list(""), "");
    }

    #[test]
    fn test_chart_keeps_layout() {
        let t = Transposition::by_semitones(2, SHARP);
        assert_eq!(
            t.transpose_chart("C        G\nHello world Am F"),
            "D        A\nHello world Bm G"
        );
        assert_eq!(t.transpose_chart("Be still my soul"), "Be still my soul");
        assert_eq!(t.transpose_chart("(C) [G/B]"), "(D) [A/B]");
        assert_eq!(t.transpose_chart("Cb/G D"), "Cb/G E");
        assert_eq!(t.transpose_chart("C/G7 G/Bm"), "D/G7 A/Bm");
    }

    #[test]
    fn test_composition_and_inverse() {
        let a = Transposition::by_semitones(7, FLAT);
        let b = Transposition::by_semitones(8, FLAT);
        let ab = a.then(b);
        assert_eq!(ab.offset(), 3);
        assert_eq!(ab.transpose_token("Eb"), b.transpose_token(&a.transpose_token("Eb")));

        assert_eq!(a.inverse().offset(), 5);
        assert!(a.then(a.inverse()).is_identity());
        assert!(Transposition::by_semitones(0, FLAT).inverse().is_identity());
    }

    #[test]
    fn test_transpose_chord_free_function() {
        assert_eq!(transpose_chord("Dm7", PitchClass::C, PitchClass::A, SHARP), "Bm7");
        assert_eq!(transpose_chord("Dm7", PitchClass::C, PitchClass::A, FLAT), "Bm7");
        assert_eq!(transpose_chord("Dm7", PitchClass::C, PitchClass::GS, FLAT), "Bbm7");
        assert_eq!(transpose_chord("whatever", PitchClass::C, PitchClass::D, SHARP), "whatever");
    }
}
