use chordshift::{Mode, TransposeError};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Error shape handed to the page as JSON
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TransposeFailure {
    kind: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameter: Option<&'static str>,
}

fn error_to_failure(e: TransposeError) -> TransposeFailure {
    let message = e.to_string();
    match e {
        TransposeError::InvalidParameter { parameter, .. } => TransposeFailure {
            kind: "invalidParameter",
            message,
            parameter: Some(parameter),
        },
        TransposeError::OriginKeyNotIdentifiable => TransposeFailure {
            kind: "originKeyNotIdentifiable",
            message,
            parameter: None,
        },
        TransposeError::Session(_) | TransposeError::Io { .. } => TransposeFailure {
            kind: "session",
            message,
            parameter: None,
        },
    }
}

fn to_js_error(e: TransposeError) -> JsValue {
    let failure = error_to_failure(e);
    let json = serde_json::to_string(&failure).unwrap_or_else(|_| format!("{{\"message\":{:?}}}", failure.message));
    JsValue::from_str(&json)
}

/// Transpose whitespace-separated chords. `origin` may be empty to infer it.
#[wasm_bindgen(js_name = transposeChordList)]
pub fn transpose_chord_list(text: &str, origin: &str, destination: &str, preference: &str) -> Result<String, JsValue> {
    chordshift::transpose_with_options(text, Mode::ChordList, origin, destination, preference).map_err(to_js_error)
}

/// Transpose a full chart, keeping spacing, line breaks and lyrics.
#[wasm_bindgen(js_name = transposeChart)]
pub fn transpose_chart(text: &str, origin: &str, destination: &str, preference: &str) -> Result<String, JsValue> {
    chordshift::transpose_with_options(text, Mode::Chart, origin, destination, preference).map_err(to_js_error)
}

/// Origin key inferred from whitespace-separated tokens, as its sharp spelling,
/// or `undefined` when no token has a recognized root.
#[wasm_bindgen(js_name = findOriginKey)]
pub fn find_origin_key(tokens: &str) -> Option<String> {
    let tokens: Vec<&str> = tokens.split_whitespace().collect();
    chordshift::find_origin_key(&tokens).map(|key| key.to_string())
}

#[wasm_bindgen(js_name = isRecognizedNote)]
pub fn is_recognized_note(spelling: &str) -> bool {
    chordshift::is_recognized_note(spelling)
}

/// Transpose every section of a JSON session (as saved by the page) and
/// return the updated session JSON.
#[wasm_bindgen(js_name = transposeSections)]
pub fn transpose_sections(session_json: &str, origin: &str, destination: &str, preference: &str) -> Result<String, JsValue> {
    let mut session: chordshift::Session = serde_json::from_str(session_json)
        .map_err(|e| to_js_error(TransposeError::Session(e.to_string())))?;
    let request = chordshift::TranspositionRequest::parse(origin, destination, preference).map_err(to_js_error)?;
    session.transpose_sections(&request).map_err(to_js_error)?;
    serde_json::to_string(&session).map_err(|e| to_js_error(TransposeError::Session(e.to_string())))
}
