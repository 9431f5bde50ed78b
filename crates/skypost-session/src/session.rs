//! Session types: client configuration and the caller-owned session.

use skypost_protocol::DEFAULT_BASE_URL;

use crate::{CredentialLimits, SessionCredentials};

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for a [`SessionClient`](crate::SessionClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// XRPC base URL, e.g. `https://bsky.social/xrpc`.
    ///
    /// Method NSIDs are appended as path segments.
    pub base_url: String,

    /// Length policy for handle, did, tokens and header.
    pub limits: CredentialLimits,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            limits: CredentialLimits::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// The authenticated context of one account.
///
/// Starts empty. A successful
/// [`authenticate`](crate::SessionClient::authenticate) fills in the handle
/// and credentials together; a failed one leaves the session exactly as it
/// was. The session is owned by the caller and lent to the client for each
/// call, so nothing here is shared between sessions.
///
/// ```text
///   Empty ──(authenticate ok)──→ Authenticated ──(authenticate ok)──→ Authenticated
///     │                               │
///     └──(authenticate err)──→ Empty  └──(authenticate err)──→ unchanged
/// ```
#[derive(Debug, Clone, Default)]
pub struct Session {
    handle: Option<String>,
    credentials: Option<SessionCredentials>,
}

impl Session {
    /// Creates an unauthenticated session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` once credentials are present.
    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }

    /// Handle of the last successful authentication.
    pub fn handle(&self) -> Option<&str> {
        self.handle.as_deref()
    }

    pub fn credentials(&self) -> Option<&SessionCredentials> {
        self.credentials.as_ref()
    }

    /// Repo identifier, if authenticated.
    pub fn did(&self) -> Option<&str> {
        self.credentials.as_ref().map(SessionCredentials::did)
    }

    /// Drops the handle and credentials.
    pub fn clear(&mut self) {
        self.handle = None;
        self.credentials = None;
    }

    /// Replaces handle and credentials in one assignment.
    pub(crate) fn establish(
        &mut self,
        handle: String,
        credentials: SessionCredentials,
    ) {
        self.handle = Some(handle);
        self.credentials = Some(credentials);
    }
}
