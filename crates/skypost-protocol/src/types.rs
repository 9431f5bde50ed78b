//! Request and response bodies that travel on the wire.
//!
//! Field names are fixed by the remote API, so serde renames are used to
//! map Rust's snake_case onto the camelCase JSON keys.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ProtocolError;

/// Collection every post is written into.
pub const FEED_POST_COLLECTION: &str = "app.bsky.feed.post";

/// Key of the timestamp injected into every record.
pub const CREATED_AT_FIELD: &str = "createdAt";

// ---------------------------------------------------------------------------
// createSession
// ---------------------------------------------------------------------------

/// Body of `com.atproto.server.createSession`.
///
/// Serializes to `{"identifier": ..., "password": ...}`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct CreateSessionRequest<'a> {
    /// Account handle (or email / DID).
    pub identifier: &'a str,
    /// App password.
    pub password: &'a str,
}

/// Hand-written so the password never lands in logs via `{:?}`.
impl fmt::Debug for CreateSessionRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateSessionRequest")
            .field("identifier", &self.identifier)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The three fields extracted from a successful `createSession` response.
///
/// All three are required strings; decoding through a [`Codec`](crate::Codec)
/// fails as a whole if any one is missing or not a string. Other fields the
/// server sends (handle, email, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionResponse {
    /// Short-lived bearer token.
    pub access_jwt: String,
    /// Token for refreshing the session.
    pub refresh_jwt: String,
    /// Repo identifier of the account.
    pub did: String,
}

// ---------------------------------------------------------------------------
// createRecord
// ---------------------------------------------------------------------------

/// Body of `com.atproto.repo.createRecord`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateRecordRequest {
    /// Repo identifier of the author.
    pub repo: String,
    /// Target collection NSID.
    pub collection: String,
    /// The record itself, caller fields plus `createdAt`.
    pub record: Map<String, Value>,
}

impl CreateRecordRequest {
    /// Builds a feed post for `repo` from a caller-supplied record.
    ///
    /// `createdAt` is set to `created_at`, replacing any value the caller
    /// put there.
    pub fn feed_post(
        repo: impl Into<String>,
        mut record: Map<String, Value>,
        created_at: DateTime<Utc>,
    ) -> Self {
        record.insert(
            CREATED_AT_FIELD.to_string(),
            Value::String(rfc3339_seconds(created_at)),
        );
        Self {
            repo: repo.into(),
            collection: FEED_POST_COLLECTION.to_string(),
            record,
        }
    }
}

/// Parses caller-supplied record JSON.
///
/// # Errors
/// - `ProtocolError::Decode` — not valid JSON
/// - `ProtocolError::RecordNotObject` — valid JSON, but not an object
pub fn parse_record(json: &str) -> Result<Map<String, Value>, ProtocolError> {
    let value: Value =
        serde_json::from_str(json).map_err(ProtocolError::Decode)?;
    match value {
        Value::Object(map) => Ok(map),
        Value::Array(_) => Err(ProtocolError::RecordNotObject("array")),
        Value::String(_) => Err(ProtocolError::RecordNotObject("string")),
        Value::Number(_) => Err(ProtocolError::RecordNotObject("number")),
        Value::Bool(_) => Err(ProtocolError::RecordNotObject("boolean")),
        Value::Null => Err(ProtocolError::RecordNotObject("null")),
    }
}

/// Formats a UTC instant as `YYYY-MM-DDTHH:MM:SSZ`.
pub fn rfc3339_seconds(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}
