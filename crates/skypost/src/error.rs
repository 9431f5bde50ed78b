//! Unified error type for Skypost.

use skypost_link::LinkError;
use skypost_session::ClientError;
use skypost_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `skypost` meta-crate, you deal with this single error
/// type instead of importing errors from each sub-crate. The `#[from]`
/// attribute on each variant generates a `From` impl, so `?` converts
/// sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum SkypostError {
    /// The link could not be brought up (or torn down).
    #[error(transparent)]
    Link(#[from] LinkError),

    /// Authentication or posting failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The HTTP transport could not be set up.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Process configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),
}
