//! HTTPS transport implementation using `reqwest`.

use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::{
    HttpRequest, HttpResponse, HttpTransport, ResponseBuffer, TransportError,
};

/// Settings for [`ReqwestTransport`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Whole-request timeout (connect + send + body).
    pub timeout: Duration,
    /// Value of the `User-Agent` header.
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: concat!("skypost/", env!("CARGO_PKG_VERSION"))
                .to_string(),
        }
    }
}

/// An [`HttpTransport`] backed by a pooled `reqwest::Client` (rustls TLS).
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Builds the underlying HTTP client.
    pub fn new(config: TransportConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| TransportError::ClientInit(e.to_string()))?;
        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    async fn post(
        &self,
        request: HttpRequest,
    ) -> Result<HttpResponse, TransportError> {
        let (url, raw_headers, body) = request.into_parts();
        let headers = header_map(&raw_headers)?;

        tracing::debug!(%url, bytes = body.len(), "sending POST");
        let response = self
            .client
            .post(url.as_str())
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(|e| TransportError::SendFailed(Box::new(e)))?;

        let status = response.status().as_u16();

        // Stream the body so each chunk goes through the buffer's growth
        // check instead of one opaque allocation.
        let mut buffer = ResponseBuffer::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk =
                chunk.map_err(|e| TransportError::ReceiveFailed(Box::new(e)))?;
            tracing::trace!(len = chunk.len(), "received chunk");
            buffer.append(&chunk)?;
        }

        tracing::debug!(%url, status, bytes = buffer.len(), "response received");
        Ok(HttpResponse {
            status,
            body: buffer,
        })
    }
}

fn header_map(
    headers: &[(String, String)],
) -> Result<HeaderMap, TransportError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                TransportError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                }
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| {
            TransportError::InvalidHeader {
                name: name.clone(),
                reason: e.to_string(),
            }
        })?;
        map.append(header_name, header_value);
    }
    Ok(map)
}
