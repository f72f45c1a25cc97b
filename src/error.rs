//! # Error Types
//!
//! This module defines all error types for the chordshift library.
//!
//! Malformed chord text is never an error: a token whose root is not a
//! recognized note is passed through verbatim. Errors are reserved for
//! problems with the caller's parameters and for origin-key inference.
//!
//! ## Error Types
//! - `InvalidParameter` - A key or preference string could not be understood
//! - `OriginKeyNotIdentifiable` - Inference found no recognized chord root
//! - `Session` - A session file could not be decoded or encoded
//! - `Io` - A session file could not be read or written
//!
//! ## Usage
//! ```rust
//! use chordshift::{transpose_with_options, Mode, TransposeError};
//!
//! match transpose_with_options("C G Am F", Mode::ChordList, "C", "", "sharp") {
//!     Ok(text) => println!("{}", text),
//!     Err(TransposeError::InvalidParameter { parameter, value }) => {
//!         eprintln!("Bad {}: '{}'", parameter, value);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransposeError {
    /// A caller-supplied parameter is missing or not understood.
    ///
    /// Reported before any transposition is attempted, so no partial output
    /// exists when this is returned.
    ///
    /// # Example
    /// ```
    /// # use chordshift::TransposeError;
    /// let err = TransposeError::InvalidParameter {
    ///     parameter: "destination key",
    ///     value: "H".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "Invalid destination key: 'H'");
    /// ```
    #[error("Invalid {parameter}: '{value}'")]
    InvalidParameter {
        parameter: &'static str,
        value: String,
    },

    /// The origin key was left to inference and no chord in the input has a
    /// recognized root.
    ///
    /// # Example
    /// ```
    /// # use chordshift::TransposeError;
    /// let err = TransposeError::OriginKeyNotIdentifiable;
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Origin key not identifiable: no recognized chord root in input"
    /// );
    /// ```
    #[error("Origin key not identifiable: no recognized chord root in input")]
    OriginKeyNotIdentifiable,

    /// Session contents could not be decoded or encoded.
    #[error("Invalid session data: {0}")]
    Session(String),

    /// Session file could not be read or written.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
