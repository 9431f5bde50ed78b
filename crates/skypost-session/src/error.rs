//! Error types for the session layer.

use skypost_protocol::ProtocolError;
use skypost_transport::TransportError;

/// Errors returned by [`SessionClient`](crate::SessionClient) operations.
///
/// Every variant carries a human-readable message through `Display`.
/// Variants that happened after a response arrived also carry its status
/// and raw body, so callers can still report what the server said.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// `post` was called on a session that never authenticated.
    /// No request was sent.
    #[error("not authenticated: call authenticate first")]
    NotAuthenticated,

    /// The caller's record JSON was rejected before any request was sent.
    #[error("invalid record JSON: {0}")]
    InvalidInput(#[source] ProtocolError),

    /// Building the request body failed.
    #[error("failed to encode request: {0}")]
    Encode(#[source] ProtocolError),

    /// The request could not be sent or its response could not be read.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A response arrived with a non-2xx status.
    ///
    /// Only produced by [`ClientResponse::error_for_status`](crate::ClientResponse::error_for_status);
    /// the client itself does not classify statuses.
    #[error("server returned HTTP {status}")]
    HttpStatus { status: u16, body: String },

    /// The response body is not valid JSON.
    #[error("unparseable response (HTTP {status}): {source}")]
    Parse {
        status: u16,
        body: String,
        #[source]
        source: ProtocolError,
    },

    /// The response is JSON but lacks a required field.
    /// Credentials were left as they were.
    #[error("missing field in response (HTTP {status}): {detail}")]
    FieldMissing {
        status: u16,
        detail: String,
        body: String,
    },

    /// A value exceeds its length limit. Credentials were left as they were.
    #[error("{field} is {len} bytes, max {max}")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
}

/// Coarse classification of a [`ClientError`].
///
/// Transport failures, rejected statuses and unparseable bodies are kept
/// apart so callers can react to each differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// No complete HTTP response.
    Transport,
    /// A response with a non-success status.
    HttpStatus,
    /// Malformed JSON, in a response or in caller input.
    Parse,
    /// Well-formed JSON without the required fields.
    FieldMissing,
    /// Operation requires a prior successful authentication.
    NotAuthenticated,
    /// A local limit was exceeded.
    Validation,
}

impl ClientError {
    /// The category this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotAuthenticated => ErrorCategory::NotAuthenticated,
            Self::InvalidInput(_) | Self::Encode(_) | Self::Parse { .. } => {
                ErrorCategory::Parse
            }
            Self::Transport(_) => ErrorCategory::Transport,
            Self::HttpStatus { .. } => ErrorCategory::HttpStatus,
            Self::FieldMissing { .. } => ErrorCategory::FieldMissing,
            Self::FieldTooLong { .. } => ErrorCategory::Validation,
        }
    }

    /// HTTP status of the response this error came from, or 0 when no
    /// response was received.
    pub fn status(&self) -> u16 {
        match self {
            Self::HttpStatus { status, .. }
            | Self::Parse { status, .. }
            | Self::FieldMissing { status, .. } => *status,
            _ => 0,
        }
    }

    /// Raw response body, when a response was received.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::HttpStatus { body, .. }
            | Self::Parse { body, .. }
            | Self::FieldMissing { body, .. } => Some(body),
            _ => None,
        }
    }
}
