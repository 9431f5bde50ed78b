//! Codec trait and the JSON implementation used on the wire.
//!
//! A "codec" (coder/decoder) converts between Rust types and raw bytes.
//! The session layer never calls `serde_json` directly for request and
//! response bodies; it goes through a [`Codec`], which is what lets the
//! decoder give every caller the same two-way split between malformed
//! input and well-formed input of the wrong shape.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// - `encode<T: Serialize>` → T can be turned into bytes
/// - `decode<T: DeserializeOwned>` → T can be created from bytes
///
/// `decode` is a structured multi-field extraction: it either produces a
/// complete `T` or fails, never a partially filled value.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// - `ProtocolError::Decode` — the bytes are not valid at all
    /// - `ProtocolError::Shape` — valid document, but a required field
    ///   is missing or has the wrong type
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses compact JSON (via `serde_json`).
///
/// ## Example
///
/// ```rust
/// use skypost_protocol::{Codec, CreateSessionResponse, JsonCodec, ProtocolError};
///
/// let codec = JsonCodec;
///
/// let ok: CreateSessionResponse = codec
///     .decode(br#"{"accessJwt":"T1","refreshJwt":"R1","did":"did:plc:abc"}"#)
///     .unwrap();
/// assert_eq!(ok.did, "did:plc:abc");
///
/// let missing = codec.decode::<CreateSessionResponse>(br#"{"did":"did:plc:abc"}"#);
/// assert!(matches!(missing, Err(ProtocolError::Shape(_))));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        // Two passes: syntax first, then shape. A single `from_slice::<T>`
        // would report both problems through the same error type.
        let document: serde_json::Value =
            serde_json::from_slice(data).map_err(ProtocolError::Decode)?;
        serde_json::from_value(document)
            .map_err(|e| ProtocolError::Shape(e.to_string()))
    }
}
