//! # Pitch-Class Table
//!
//! The fixed 12-entry chromatic scale shared by every operation in the crate.
//!
//! Each pitch class is an index from 0 (C) to 11 (B) with two spellings, one
//! using a sharp and one using a flat. Naturals have identical spellings.
//!
//! ```text
//! index  0  1   2  3   4  5  6   7  8   9  10  11
//! sharp  C  C#  D  D#  E  F  F#  G  G#  A  A#  B
//! flat   C  Db  D  Eb  E  F  Gb  G  Ab  A  Bb  B
//! ```
//!
//! Only these 17 distinct spellings are notes. `Cb`, `E#`, `Fb` and `B#` are
//! not in the table and are treated as "not a note" everywhere.
//!
//! ## Example
//! ```rust
//! use chordshift::{index_of, spelling_of, EnharmonicPreference, PitchClass};
//!
//! assert_eq!(index_of("Db"), Some(PitchClass::CS));
//! assert_eq!(index_of("C#"), Some(PitchClass::CS));
//! assert_eq!(index_of("H"), None);
//! assert_eq!(spelling_of(PitchClass::AS, EnharmonicPreference::Flat), "Bb");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sharp and flat spelling for each chromatic step, ascending from C.
const CHROMATIC: [(&str, &str); 12] = [
    ("C", "C"),
    ("C#", "Db"),
    ("D", "D"),
    ("D#", "Eb"),
    ("E", "E"),
    ("F", "F"),
    ("F#", "Gb"),
    ("G", "G"),
    ("G#", "Ab"),
    ("A", "A"),
    ("A#", "Bb"),
    ("B", "B"),
];

/// Which enharmonic spelling to emit for non-natural pitch classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnharmonicPreference {
    #[default]
    Sharp,
    Flat,
}

impl EnharmonicPreference {
    /// Parse a preference name: `sharp`, `sharps`, `#`, `flat`, `flats` or `b`.
    /// Case-insensitive; surrounding whitespace is ignored.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sharp" | "sharps" | "#" => Some(Self::Sharp),
            "flat" | "flats" | "b" => Some(Self::Flat),
            _ => None,
        }
    }
}

impl fmt::Display for EnharmonicPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sharp => write!(f, "sharp"),
            Self::Flat => write!(f, "flat"),
        }
    }
}

/// One of the 12 chromatic steps, C = 0 through B = 11.
///
/// The inner index is always in range; every constructor wraps or rejects.
/// Serialized as its sharp spelling (`"C#"`), deserialized from any key name
/// accepted by [`parse_key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PitchClass(u8);

impl PitchClass {
    pub const C: Self = Self(0);
    pub const CS: Self = Self(1);
    pub const D: Self = Self(2);
    pub const DS: Self = Self(3);
    pub const E: Self = Self(4);
    pub const F: Self = Self(5);
    pub const FS: Self = Self(6);
    pub const G: Self = Self(7);
    pub const GS: Self = Self(8);
    pub const A: Self = Self(9);
    pub const AS: Self = Self(10);
    pub const B: Self = Self(11);

    /// All 12 pitch classes in ascending order.
    pub const ALL: [Self; 12] = [
        Self::C,
        Self::CS,
        Self::D,
        Self::DS,
        Self::E,
        Self::F,
        Self::FS,
        Self::G,
        Self::GS,
        Self::A,
        Self::AS,
        Self::B,
    ];

    /// Pitch class for an index in `0..12`, or `None` if out of range.
    pub fn new(index: u8) -> Option<Self> {
        (index < 12).then_some(Self(index))
    }

    /// Pitch class for any semitone count, wrapped into the octave.
    pub fn wrapping(semitones: i32) -> Self {
        Self(semitones.rem_euclid(12) as u8)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// Move up by `semitones` (negative moves down), wrapping around the octave.
    pub fn shifted(self, semitones: i32) -> Self {
        Self::wrapping(i32::from(self.0) + semitones)
    }

    /// Upward distance in semitones from `self` to `other`, in `0..12`.
    pub fn interval_to(self, other: Self) -> u8 {
        (other.0 + 12 - self.0) % 12
    }

    pub fn spelling(self, preference: EnharmonicPreference) -> &'static str {
        spelling_of(self, preference)
    }

    /// True for C, D, E, F, G, A and B.
    pub fn is_natural(self) -> bool {
        let (sharp, flat) = CHROMATIC[self.0 as usize];
        sharp == flat
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(spelling_of(*self, EnharmonicPreference::Sharp))
    }
}

impl From<PitchClass> for String {
    fn from(pitch: PitchClass) -> Self {
        pitch.to_string()
    }
}

impl TryFrom<String> for PitchClass {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse_key(&value).ok_or_else(|| format!("not a key name: '{}'", value))
    }
}

/// Render a pitch class using the requested spelling.
pub fn spelling_of(pitch: PitchClass, preference: EnharmonicPreference) -> &'static str {
    let (sharp, flat) = CHROMATIC[pitch.0 as usize];
    match preference {
        EnharmonicPreference::Sharp => sharp,
        EnharmonicPreference::Flat => flat,
    }
}

/// Look up a note spelling, matching either the sharp or the flat column.
///
/// Case-sensitive and exact: `"c"`, `"C "` and `"Cb"` are all `None`.
pub fn index_of(spelling: &str) -> Option<PitchClass> {
    CHROMATIC
        .iter()
        .position(|&(sharp, flat)| sharp == spelling || flat == spelling)
        .map(|i| PitchClass(i as u8))
}

/// Whether `spelling` is one of the 17 note names in the table.
pub fn is_recognized_note(spelling: &str) -> bool {
    index_of(spelling).is_some()
}

/// Parse a key name into its tonic pitch class.
///
/// Accepts, after trimming whitespace:
/// - a note spelling: `"Eb"`, `"F#"`
/// - a minor key name, whose tonic is its root: `"F#m"`, `"Ebmin"`
/// - the canonical index `"0"` through `"11"`
///
/// Returns `None` for anything else, including the empty string.
///
/// ```rust
/// use chordshift::{parse_key, PitchClass};
///
/// assert_eq!(parse_key("Bb"), Some(PitchClass::AS));
/// assert_eq!(parse_key("C#m"), Some(PitchClass::CS));
/// assert_eq!(parse_key("7"), Some(PitchClass::G));
/// assert_eq!(parse_key(""), None);
/// ```
pub fn parse_key(s: &str) -> Option<PitchClass> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.chars().all(|c| c.is_ascii_digit()) {
        return trimmed.parse::<u8>().ok().and_then(PitchClass::new);
    }

    let tonic = trimmed
        .strip_suffix("min")
        .or_else(|| trimmed.strip_suffix('m'))
        .unwrap_or(trimmed);
    index_of(tonic)
}
