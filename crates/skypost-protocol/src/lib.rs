//! Wire protocol for Skypost.
//!
//! This crate defines the JSON documents the client exchanges with the
//! remote XRPC API:
//!
//! - **Endpoints** ([`Endpoint`]) — which method lives at which URL.
//! - **Types** ([`CreateSessionRequest`], [`CreateSessionResponse`],
//!   [`CreateRecordRequest`]) — request and response bodies.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those bodies are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw bytes) and session
//! (credentials). It knows nothing about connections or tokens in memory;
//! it only knows how documents are shaped.
//!
//! ```text
//! Transport (bytes) → Protocol (documents) → Session (credentials, posts)
//! ```

mod codec;
mod error;
mod types;
mod xrpc;

pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use types::{
    CREATED_AT_FIELD, CreateRecordRequest, CreateSessionRequest,
    CreateSessionResponse, FEED_POST_COLLECTION, parse_record,
    rfc3339_seconds,
};
pub use xrpc::{DEFAULT_BASE_URL, Endpoint, JSON_MEDIA_TYPE, bearer};
