//! HTTP transport abstraction layer for Skypost.
//!
//! Provides the [`HttpTransport`] trait that abstracts over how a JSON
//! request actually reaches the remote API, plus the [`ResponseBuffer`]
//! that accumulates a streamed response body chunk by chunk.
//!
//! The session layer only ever talks to `HttpTransport`, so tests can swap
//! in a recording mock and production code uses [`ReqwestTransport`].
//!
//! # Feature Flags
//!
//! - `reqwest` (default) — HTTPS transport via `reqwest` with rustls

#![allow(async_fn_in_trait)]

mod buffer;
mod error;
#[cfg(feature = "reqwest")]
mod http;

pub use buffer::ResponseBuffer;
pub use error::TransportError;
#[cfg(feature = "reqwest")]
pub use http::{ReqwestTransport, TransportConfig};

/// An outgoing POST request.
///
/// Built with a small builder API:
///
/// ```rust
/// use skypost_transport::HttpRequest;
///
/// let req = HttpRequest::post("https://example.invalid/xrpc/ping")
///     .header("Content-Type", "application/json")
///     .body(b"{}".to_vec());
/// assert_eq!(req.header_value("content-type"), Some("application/json"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    url: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl HttpRequest {
    /// Starts a POST request to `url` with no headers and an empty body.
    pub fn post(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Adds a header. Headers are sent in insertion order.
    pub fn header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the request body.
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// The target URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// All headers in insertion order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// The raw request body.
    pub fn body_bytes(&self) -> &[u8] {
        &self.body
    }

    /// Splits the request into URL, headers, and body.
    pub fn into_parts(self) -> (String, Vec<(String, String)>, Vec<u8>) {
        (self.url, self.headers, self.body)
    }

    /// Looks up a header value by name (case-insensitive, first match).
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A completed HTTP exchange: status line plus the accumulated body.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code as received. Not interpreted by the transport.
    pub status: u16,
    /// The full response body.
    pub body: ResponseBuffer,
}

impl HttpResponse {
    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a request and collects the full response.
///
/// Implementations must stream the body into a fresh [`ResponseBuffer`]
/// (one per request, never reused) and return
/// [`TransportError`] only when no complete response could be obtained.
/// Non-2xx statuses are returned as `Ok`.
pub trait HttpTransport: Send + Sync + 'static {
    /// Performs a POST and returns the status and body.
    async fn post(
        &self,
        request: HttpRequest,
    ) -> Result<HttpResponse, TransportError>;
}
