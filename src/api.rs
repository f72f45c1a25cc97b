//! # Public API
//!
//! Entry points for hosts (a command line, a browser page, an editor) that
//! hand over plain text and parameters and receive plain text back.
//!
//! ## Transposition Functions
//!
//! - [`transpose_chord_list()`] - whitespace-separated chords, whole-token matching
//! - [`transpose_chart()`] - free-form chart with lyrics, chords replaced in place
//! - [`transpose_with_options()`] - either mode, parameters given as strings
//!
//! Nothing is retained between calls. Persisting the last-used parameters is
//! up to the caller; see [`crate::session`].
//!
//! ## Typical Usage
//!
//! ```rust
//! use chordshift::{transpose_chart, EnharmonicPreference, Origin, PitchClass, TranspositionRequest};
//!
//! let request = TranspositionRequest::new(
//!     Origin::Known(PitchClass::C),
//!     PitchClass::D,
//!     EnharmonicPreference::Sharp,
//! );
//! let chart = "C        G\nHello world Am F";
//! assert_eq!(transpose_chart(chart, &request)?, "D        A\nHello world Bm G");
//! # Ok::<(), chordshift::TransposeError>(())
//! ```
//!
//! ## Origin Inference
//!
//! With [`Origin::Infer`] the first recognized chord root is taken as the
//! origin. If there is none, [`TransposeError::OriginKeyNotIdentifiable`] is
//! returned and no output is produced.

use serde::{Deserialize, Serialize};

use crate::key::{infer_from_chart, infer_from_chord_list, Origin};
use crate::pitch::{parse_key, EnharmonicPreference, PitchClass};
use crate::transpose::{BassPolicy, Transposition};
use crate::TransposeError;

/// How input text is split into chord candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Whitespace-separated tokens, each one a chord only if it matches in full
    ChordList,
    /// Chords anywhere in prose, replaced in place
    Chart,
}

impl Mode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim() {
            "list" | "chord-list" => Some(Self::ChordList),
            "chart" => Some(Self::Chart),
            _ => None,
        }
    }
}

/// Parameters for one transposition call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TranspositionRequest {
    pub origin: Origin,
    pub destination: PitchClass,
    #[serde(default)]
    pub preference: EnharmonicPreference,
    #[serde(default)]
    pub bass: BassPolicy,
}

impl TranspositionRequest {
    pub fn new(origin: Origin, destination: PitchClass, preference: EnharmonicPreference) -> Self {
        Self {
            origin,
            destination,
            preference,
            bass: BassPolicy::default(),
        }
    }

    /// Build a request from caller strings.
    ///
    /// - `origin`: a key name, or blank to infer
    /// - `destination`: a key name (required)
    /// - `preference`: `sharp` or `flat`
    ///
    /// ```rust
    /// use chordshift::{Origin, PitchClass, TranspositionRequest, TransposeError};
    ///
    /// let request = TranspositionRequest::parse("", "Eb", "flat")?;
    /// assert_eq!(request.origin, Origin::Infer);
    /// assert_eq!(request.destination, PitchClass::DS);
    ///
    /// let err = TranspositionRequest::parse("C", "", "sharp").unwrap_err();
    /// assert!(matches!(err, TransposeError::InvalidParameter { parameter: "destination key", .. }));
    /// # Ok::<(), TransposeError>(())
    /// ```
    pub fn parse(origin: &str, destination: &str, preference: &str) -> Result<Self, TransposeError> {
        let origin = Origin::from_str(origin).ok_or_else(|| TransposeError::InvalidParameter {
            parameter: "origin key",
            value: origin.to_string(),
        })?;
        let destination = parse_key(destination).ok_or_else(|| TransposeError::InvalidParameter {
            parameter: "destination key",
            value: destination.to_string(),
        })?;
        let preference =
            EnharmonicPreference::from_str(preference).ok_or_else(|| TransposeError::InvalidParameter {
                parameter: "enharmonic preference",
                value: preference.to_string(),
            })?;
        Ok(Self::new(origin, destination, preference))
    }

    pub fn with_bass(mut self, bass: BassPolicy) -> Self {
        self.bass = bass;
        self
    }

    /// Resolve the origin, using `infer` when it is not known.
    pub fn resolve(
        &self,
        infer: impl FnOnce() -> Option<PitchClass>,
    ) -> Result<Transposition, TransposeError> {
        let origin = match self.origin {
            Origin::Known(pitch) => pitch,
            Origin::Infer => infer().ok_or_else(|| {
                tracing::warn!("no recognized chord root to infer the origin key from");
                TransposeError::OriginKeyNotIdentifiable
            })?,
        };
        Ok(Transposition::between(origin, self.destination, self.preference).with_bass(self.bass))
    }
}

/// Transpose a whitespace-separated chord list.
///
/// Each whitespace-delimited token is transposed only if the whole token is a
/// chord symbol; everything else, whitespace included, is copied through.
/// Blank input is returned as is without resolving the origin.
///
/// # Example
/// ```rust
/// use chordshift::{transpose_chord_list, EnharmonicPreference, Origin, PitchClass, TranspositionRequest};
///
/// let request = TranspositionRequest::new(Origin::Known(PitchClass::C), PitchClass::FS, EnharmonicPreference::Flat);
/// assert_eq!(transpose_chord_list("C G Am F", &request)?, "Gb Db Ebm Bb");
/// # Ok::<(), chordshift::TransposeError>(())
/// ```
///
/// # Errors
/// [`TransposeError::OriginKeyNotIdentifiable`] when the origin is inferred
/// and no token is a chord with a recognized root.
pub fn transpose_chord_list(text: &str, request: &TranspositionRequest) -> Result<String, TransposeError> {
    if text.trim().is_empty() {
        return Ok(text.to_string());
    }
    let transposition = request.resolve(|| infer_from_chord_list(text))?;
    tracing::debug!(
        mode = "chord-list",
        offset = transposition.offset(),
        preference = %transposition.preference(),
        "transposing"
    );
    Ok(transposition.transpose_chord_list(text))
}

/// Transpose a full chart, replacing chords in place.
///
/// Spacing, line breaks and lyrics are preserved byte for byte. Blank input is
/// returned as is without resolving the origin.
///
/// # Errors
/// [`TransposeError::OriginKeyNotIdentifiable`] when the origin is inferred
/// and the chart contains no chord with a recognized root.
pub fn transpose_chart(text: &str, request: &TranspositionRequest) -> Result<String, TransposeError> {
    if text.trim().is_empty() {
        return Ok(text.to_string());
    }
    let transposition = request.resolve(|| infer_from_chart(text))?;
    tracing::debug!(
        mode = "chart",
        offset = transposition.offset(),
        preference = %transposition.preference(),
        "transposing"
    );
    Ok(transposition.transpose_chart(text))
}

/// Transpose with parameters given as strings.
///
/// Blank input is returned as is before any parameter is examined, the same
/// rule the typed entry points follow.
///
/// # Example
/// ```rust
/// use chordshift::{transpose_with_options, Mode};
///
/// // The origin is inferred from the first chord (D), not the resolution (C).
/// let out = transpose_with_options("Dm7 G7 Cmaj7", Mode::ChordList, "", "F", "flat")?;
/// assert_eq!(out, "Fm7 Bb7 Ebmaj7");
/// # Ok::<(), chordshift::TransposeError>(())
/// ```
///
/// # Errors
/// [`TransposeError::InvalidParameter`] if a key or preference string is not
/// understood, or [`TransposeError::OriginKeyNotIdentifiable`] as for the
/// typed entry points.
pub fn transpose_with_options(
    text: &str,
    mode: Mode,
    origin: &str,
    destination: &str,
    preference: &str,
) -> Result<String, TransposeError> {
    if text.trim().is_empty() {
        return Ok(text.to_string());
    }
    let request = TranspositionRequest::parse(origin, destination, preference)?;
    match mode {
        Mode::ChordList => transpose_chord_list(text, &request),
        Mode::Chart => transpose_chart(text, &request),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn request(origin: Origin, destination: PitchClass) -> TranspositionRequest {
        TranspositionRequest::new(origin, destination, EnharmonicPreference::Sharp)
    }

    #[test]
    fn test_parse_request() {
        let req = TranspositionRequest::parse("C", "D", "sharp").unwrap();
        assert_eq!(req.origin, Origin::Known(PitchClass::C));
        assert_eq!(req.destination, PitchClass::D);
        assert_eq!(req.preference, EnharmonicPreference::Sharp);
        assert_eq!(req.bass, BassPolicy::Preserve);
    }

    #[test]
    fn test_parse_request_rejects_bad_values() {
        let err = TranspositionRequest::parse("C", "", "sharp").unwrap_err();
        assert_eq!(err.to_string(), "Invalid destination key: ''");

        let err = TranspositionRequest::parse("X", "D", "sharp").unwrap_err();
        assert!(matches!(err, TransposeError::InvalidParameter { parameter: "origin key", .. }));

        let err = TranspositionRequest::parse("C", "D", "natural").unwrap_err();
        assert!(matches!(
            err,
            TransposeError::InvalidParameter { parameter: "enharmonic preference", .. }
        ));
    }

    #[test]
    fn test_inferred_origin_uses_first_chord() {
        let req = request(Origin::Infer, PitchClass::E);
        assert_eq!(transpose_chord_list("Dm7 G7 Cmaj7", &req).unwrap(), "Em7 A7 Dmaj7");
        assert_eq!(transpose_chart("Verse\n  D   A\nwords", &req).unwrap(), "Verse\n  E   B\nwords");
    }

    #[test]
    fn test_inference_failure_is_an_error() {
        let req = request(Origin::Infer, PitchClass::E);
        assert!(matches!(
            transpose_chord_list("la la la", &req),
            Err(TransposeError::OriginKeyNotIdentifiable)
        ));
        assert!(matches!(
            transpose_chart("Hello world", &req),
            Err(TransposeError::OriginKeyNotIdentifiable)
        ));
    }

    #[test]
    fn test_blank_input_needs_no_origin() {
        let req = request(Origin::Infer, PitchClass::E);
        assert_eq!(transpose_chord_list("", &req).unwrap(), "");
        assert_eq!(transpose_chart("", &req).unwrap(), "");
        assert_eq!(transpose_chart(" \n ", &req).unwrap(), " \n ");
    }

    #[test]
    fn test_bass_policy_is_forwarded() {
        let req = request(Origin::Known(PitchClass::G), PitchClass::A).with_bass(BassPolicy::Transpose);
        assert_eq!(transpose_chord_list("G/B", &req).unwrap(), "A/C#");
        assert_eq!(transpose_chart("G/B C", &req).unwrap(), "A/C# D");
    }

    #[test]
    fn test_with_options() {
        assert_eq!(
            transpose_with_options("C G Am F", Mode::ChordList, "C", "D", "sharp").unwrap(),
            "D A Bm G"
        );
        assert_eq!(transpose_with_options("", Mode::Chart, "", "", "").unwrap(), "");
        assert_eq!(transpose_with_options(" \n", Mode::ChordList, "C", "", "x").unwrap(), " \n");
        assert!(matches!(
            transpose_with_options("C G", Mode::Chart, "C", "", "sharp"),
            Err(TransposeError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(Mode::from_str("list"), Some(Mode::ChordList));
        assert_eq!(Mode::from_str("chart"), Some(Mode::Chart));
        assert_eq!(Mode::from_str("sheet"), None);
    }
}
