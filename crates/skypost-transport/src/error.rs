/// Errors that can occur in the transport layer.
///
/// Every variant means the request never produced a usable HTTP response.
/// A response with a non-success status is NOT a transport error; it is
/// returned as a normal [`HttpResponse`](crate::HttpResponse).
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The HTTP client could not be constructed.
    #[error("client init failed: {0}")]
    ClientInit(String),

    /// A request header name or value was rejected.
    #[error("invalid header {name}: {reason}")]
    InvalidHeader { name: String, reason: String },

    /// Sending the request failed (DNS, connect, TLS, write).
    #[error("send failed: {0}")]
    SendFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Reading the response body failed mid-stream.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The response buffer could not grow to hold the next chunk.
    #[error("out of memory growing response buffer to {requested} bytes")]
    OutOfMemory { requested: usize },
}
