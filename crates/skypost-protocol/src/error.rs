//! Error types for the protocol layer.
//!
//! A `ProtocolError` always means the problem is in the JSON documents
//! themselves, never in networking. The variants keep "not JSON at all"
//! apart from "JSON, but not the shape we asked for" because callers
//! report those as different failure categories.

/// Errors that can occur while encoding or decoding wire documents.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust value into JSON bytes).
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// The input is not syntactically valid JSON.
    ///
    /// Common causes: truncated bodies, HTML error pages, empty input.
    #[error("malformed JSON: {0}")]
    Decode(#[source] serde_json::Error),

    /// The input is valid JSON but does not have the requested shape:
    /// a required field is absent or has the wrong type.
    ///
    /// Extraction is atomic, so when this is returned none of the
    /// requested fields were handed back.
    #[error("unexpected document shape: {0}")]
    Shape(String),

    /// A record must be a JSON object so fields can be merged into it.
    #[error("record must be a JSON object, got {0}")]
    RecordNotObject(&'static str),
}
