//! # chordshift
//!
//! Transpose chord charts: every chord root moves by the same number of
//! semitones, everything else in the text stays exactly as written.
//!
//! ## Pipeline
//! 1. Split the text into chord candidates ([`lexer`]), either whole
//!    whitespace-separated tokens or chords found inline among lyrics
//! 2. Resolve each root against the 12-entry pitch-class table ([`pitch`])
//! 3. Work out the origin key, given or inferred from the first chord ([`key`])
//! 4. Shift each root and re-spell it with sharps or flats ([`transpose`])
//!
//! ## Example
//! ```rust
//! use chordshift::{transpose_with_options, Mode};
//!
//! let chart = "C        G\nHello world Am F";
//! let out = transpose_with_options(chart, Mode::Chart, "C", "D", "sharp")?;
//! assert_eq!(out, "D        A\nHello world Bm G");
//! # Ok::<(), chordshift::TransposeError>(())
//! ```

pub mod api;
pub mod error;
pub mod key;
pub mod lexer;
pub mod pitch;
pub mod session;
pub mod transpose;

pub use api::{transpose_chart, transpose_chord_list, transpose_with_options, Mode, TranspositionRequest};
pub use error::*;
pub use key::{find_origin_key, Origin};
pub use pitch::{index_of, is_recognized_note, parse_key, spelling_of, EnharmonicPreference, PitchClass};
pub use session::{Section, Session, SessionMode};
pub use transpose::{transpose_chord, BassPolicy, Transposition};
