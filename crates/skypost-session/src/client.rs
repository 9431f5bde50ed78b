//! The session client: `createSession` and `createRecord` over a transport.
//!
//! ## Request flow
//!
//! ```text
//! authenticate(session, handle, password)
//!   → encode {identifier, password}
//!   → POST <base>/com.atproto.server.createSession
//!   → decode {accessJwt, refreshJwt, did}   (all or nothing)
//!   → session.establish(handle, credentials)
//!
//! post(session, record_json)
//!   → parse record_json locally             (no request if invalid)
//!   → compose {repo, collection, record + createdAt}
//!   → POST <base>/com.atproto.repo.createRecord  with Bearer token
//! ```
//!
//! Neither call interprets the HTTP status of a response it could read.
//! That's left to the caller through [`ClientResponse::error_for_status`].

use chrono::Utc;
use skypost_protocol::{
    Codec, CreateRecordRequest, CreateSessionRequest, CreateSessionResponse,
    Endpoint, JSON_MEDIA_TYPE, JsonCodec, ProtocolError, parse_record,
};
use skypost_transport::{HttpRequest, HttpTransport};

use crate::{
    ClientError, CredentialLimits, Session, SessionConfig, SessionCredentials,
};

/// Status and body of a completed call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientResponse {
    /// HTTP status as received.
    pub status: u16,
    /// Raw response body.
    pub body: String,
}

impl ClientResponse {
    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turns a non-2xx response into [`ClientError::HttpStatus`].
    pub fn error_for_status(self) -> Result<Self, ClientError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ClientError::HttpStatus {
                status: self.status,
                body: self.body,
            })
        }
    }
}

/// Talks to the XRPC API on behalf of a caller-owned [`Session`].
///
/// The client itself holds no credentials, so one client can serve any
/// number of sessions. Calls on the same session are expected to be made
/// one at a time; `authenticate` takes the session by `&mut` so the
/// borrow checker enforces that.
///
/// ```rust,no_run
/// # async fn run() -> Result<(), skypost_session::ClientError> {
/// use skypost_session::{Session, SessionClient, SessionConfig};
/// use skypost_transport::{ReqwestTransport, TransportConfig};
///
/// let transport = ReqwestTransport::new(TransportConfig::default())?;
/// let client = SessionClient::new(transport, SessionConfig::default());
///
/// let mut session = Session::new();
/// client.authenticate(&mut session, "alice.bsky.social", "app-password").await?;
/// let resp = client.post(&session, r#"{"text": "hi"}"#).await?;
/// println!("{}", resp.body);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SessionClient<T: HttpTransport> {
    transport: T,
    config: SessionConfig,
    codec: JsonCodec,
}

impl<T: HttpTransport> SessionClient<T> {
    /// Creates a client that sends through `transport`.
    pub fn new(transport: T, config: SessionConfig) -> Self {
        Self {
            transport,
            config,
            codec: JsonCodec,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Exchanges `handle` and `password` for bearer credentials.
    ///
    /// On success the session holds the handle, the repo identifier, both
    /// tokens and the composed `Authorization` header. On any error the
    /// session is left exactly as it was.
    ///
    /// The response is parsed whatever its status: a rejected login shows
    /// up as [`ClientError::FieldMissing`] carrying the server's status and
    /// body.
    ///
    /// # Errors
    /// - [`ClientError::FieldTooLong`] — handle, or a returned value, over
    ///   its limit
    /// - [`ClientError::Transport`] — no response
    /// - [`ClientError::Parse`] — response is not JSON
    /// - [`ClientError::FieldMissing`] — a required field is absent,
    ///   not a string, or empty
    pub async fn authenticate(
        &self,
        session: &mut Session,
        handle: &str,
        password: &str,
    ) -> Result<ClientResponse, ClientError> {
        CredentialLimits::check("handle", handle, self.config.limits.handle)?;

        let body = self
            .codec
            .encode(&CreateSessionRequest {
                identifier: handle,
                password,
            })
            .map_err(ClientError::Encode)?;
        let request =
            HttpRequest::post(Endpoint::CreateSession.url(&self.config.base_url))
                .header("Content-Type", JSON_MEDIA_TYPE)
                .body(body);

        let response = self.transport.post(request).await?;
        let status = response.status;
        let body = response.body.into_string();
        tracing::debug!(status, body = %body, "authentication response");

        let decoded: CreateSessionResponse =
            self.codec.decode(body.as_bytes()).map_err(|e| match e {
                ProtocolError::Shape(detail) => ClientError::FieldMissing {
                    status,
                    detail,
                    body: body.clone(),
                },
                other => ClientError::Parse {
                    status,
                    body: body.clone(),
                    source: other,
                },
            })?;
        if let Some(field) = first_empty_field(&decoded) {
            return Err(ClientError::FieldMissing {
                status,
                detail: format!("`{field}` is empty"),
                body,
            });
        }

        let credentials =
            SessionCredentials::from_response(decoded, &self.config.limits)?;
        tracing::info!(did = %credentials.did(), %handle, "authenticated");
        session.establish(handle.to_string(), credentials);

        Ok(ClientResponse { status, body })
    }

    /// Posts one feed record using the session's cached token.
    ///
    /// `record_json` must be a JSON object. It is sent as the `record`
    /// field with `createdAt` set to the current UTC time, replacing any
    /// value the caller supplied. The token is not checked for expiry; a
    /// stale token comes back as whatever status the server returns.
    ///
    /// # Errors
    /// - [`ClientError::NotAuthenticated`] — session has no credentials
    /// - [`ClientError::InvalidInput`] — `record_json` is not a JSON object
    /// - [`ClientError::Transport`] — no response
    ///
    /// The first two are raised before any request is sent.
    pub async fn post(
        &self,
        session: &Session,
        record_json: &str,
    ) -> Result<ClientResponse, ClientError> {
        let credentials =
            session.credentials().ok_or(ClientError::NotAuthenticated)?;
        let record =
            parse_record(record_json).map_err(ClientError::InvalidInput)?;

        let body = self
            .codec
            .encode(&CreateRecordRequest::feed_post(
                credentials.did(),
                record,
                Utc::now(),
            ))
            .map_err(ClientError::Encode)?;
        let request =
            HttpRequest::post(Endpoint::CreateRecord.url(&self.config.base_url))
                .header("Content-Type", JSON_MEDIA_TYPE)
                .header("Accept", JSON_MEDIA_TYPE)
                .header("Authorization", credentials.authorization())
                .body(body);

        let response = self.transport.post(request).await?;
        let status = response.status;
        tracing::info!(status, did = %credentials.did(), "record posted");

        Ok(ClientResponse {
            status,
            body: response.body.into_string(),
        })
    }
}

/// An empty string can't serve as a credential, so it counts as missing.
fn first_empty_field(response: &CreateSessionResponse) -> Option<&'static str> {
    if response.access_jwt.is_empty() {
        Some("accessJwt")
    } else if response.refresh_jwt.is_empty() {
        Some("refreshJwt")
    } else if response.did.is_empty() {
        Some("did")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_for_status_passes_2xx() {
        let resp = ClientResponse {
            status: 200,
            body: "{}".into(),
        };
        assert_eq!(resp.clone().error_for_status().unwrap(), resp);
    }

    #[test]
    fn test_error_for_status_rejects_non_2xx() {
        let resp = ClientResponse {
            status: 400,
            body: r#"{"error":"InvalidRequest"}"#.into(),
        };
        let err = resp.error_for_status().unwrap_err();
        assert_eq!(err.status(), 400);
        assert_eq!(err.body(), Some(r#"{"error":"InvalidRequest"}"#));
    }

    #[test]
    fn test_first_empty_field_reports_in_order() {
        let mut resp = CreateSessionResponse {
            access_jwt: "T1".into(),
            refresh_jwt: String::new(),
            did: String::new(),
        };
        assert_eq!(first_empty_field(&resp), Some("refreshJwt"));
        resp.refresh_jwt = "R1".into();
        assert_eq!(first_empty_field(&resp), Some("did"));
        resp.did = "did:plc:abc".into();
        assert_eq!(first_empty_field(&resp), None);
    }
}
