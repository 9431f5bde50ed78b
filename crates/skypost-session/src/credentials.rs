//! Bearer credentials obtained from `createSession`.
//!
//! A [`SessionCredentials`] value only exists fully formed: it is built
//! from a decoded response in one step, after every field passed its
//! length check. That's what makes writing credentials into a session
//! all-or-nothing.

use std::fmt;

use skypost_protocol::{CreateSessionResponse, bearer};

use crate::ClientError;

/// Maximum lengths, in bytes, for values kept in a session.
///
/// Oversized values are rejected with [`ClientError::FieldTooLong`],
/// never truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialLimits {
    /// Account handle.
    pub handle: usize,
    /// Repo identifier.
    pub did: usize,
    /// Access and refresh tokens, each.
    pub token: usize,
    /// The composed `Authorization` header value.
    pub authorization: usize,
}

impl Default for CredentialLimits {
    fn default() -> Self {
        Self {
            handle: 255,
            did: 255,
            token: 399,
            authorization: 4095,
        }
    }
}

impl CredentialLimits {
    /// Checks `value` against `max`.
    pub(crate) fn check(
        field: &'static str,
        value: &str,
        max: usize,
    ) -> Result<(), ClientError> {
        if value.len() > max {
            return Err(ClientError::FieldTooLong {
                field,
                len: value.len(),
                max,
            });
        }
        Ok(())
    }
}

/// The repo identifier, both tokens, and the composed `Authorization`
/// header.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionCredentials {
    did: String,
    access_token: String,
    refresh_token: String,
    authorization: String,
}

impl SessionCredentials {
    /// Validates a decoded response against `limits` and composes the
    /// `Authorization` header.
    ///
    /// # Errors
    /// [`ClientError::FieldTooLong`] for the first field over its limit.
    pub fn from_response(
        response: CreateSessionResponse,
        limits: &CredentialLimits,
    ) -> Result<Self, ClientError> {
        CredentialLimits::check("did", &response.did, limits.did)?;
        CredentialLimits::check(
            "accessJwt",
            &response.access_jwt,
            limits.token,
        )?;
        CredentialLimits::check(
            "refreshJwt",
            &response.refresh_jwt,
            limits.token,
        )?;
        let authorization = bearer(&response.access_jwt);
        CredentialLimits::check(
            "authorization",
            &authorization,
            limits.authorization,
        )?;

        Ok(Self {
            did: response.did,
            access_token: response.access_jwt,
            refresh_token: response.refresh_jwt,
            authorization,
        })
    }

    /// Repo identifier of the account.
    pub fn did(&self) -> &str {
        &self.did
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    /// `Bearer <access token>`.
    pub fn authorization(&self) -> &str {
        &self.authorization
    }
}

/// Tokens are redacted; the did is not secret.
impl fmt::Debug for SessionCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCredentials")
            .field("did", &self.did)
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}
