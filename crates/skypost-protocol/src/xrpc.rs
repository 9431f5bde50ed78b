//! XRPC endpoint catalogue.
//!
//! Every call is `POST <base>/<nsid>`, where the NSID is a reverse-DNS
//! method name.

use std::fmt;

/// Default XRPC base for the public service.
pub const DEFAULT_BASE_URL: &str = "https://bsky.social/xrpc";

/// `Content-Type` / `Accept` value for every XRPC body.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// The XRPC methods this client knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Exchange handle + app password for session tokens.
    CreateSession,
    /// Resolve a handle to a DID. Declared for completeness; the client
    /// never calls it.
    ResolveHandle,
    /// Write a record into the authenticated repo.
    CreateRecord,
}

impl Endpoint {
    /// The method's NSID, e.g. `com.atproto.server.createSession`.
    pub fn nsid(&self) -> &'static str {
        match self {
            Self::CreateSession => "com.atproto.server.createSession",
            Self::ResolveHandle => "com.atproto.identity.resolveHandle",
            Self::CreateRecord => "com.atproto.repo.createRecord",
        }
    }

    /// Full URL for this method under `base`.
    ///
    /// A trailing slash on `base` is tolerated.
    pub fn url(&self, base: &str) -> String {
        format!("{}/{}", base.trim_end_matches('/'), self.nsid())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.nsid())
    }
}

/// Formats a bearer `Authorization` header value.
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
