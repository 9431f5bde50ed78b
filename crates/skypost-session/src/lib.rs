//! Authenticated session client for Skypost.
//!
//! This crate performs the two calls a device makes against the remote
//! XRPC API:
//!
//! 1. **Authentication** — exchange a handle and app password for bearer
//!    credentials ([`SessionClient::authenticate`])
//! 2. **Posting** — write one feed record using the cached token
//!    ([`SessionClient::post`])
//!
//! Credentials live in a [`Session`] owned by the caller and passed into
//! each call, so nothing here is process-wide.
//!
//! # How it fits in the stack
//!
//! ```text
//! Sequencer (above)  ← authenticates once, posts once
//!     ↕
//! Session Layer (this crate)  ← credentials + request composition
//!     ↕
//! Protocol / Transport (below)  ← wire documents, HTTP POST
//! ```

mod client;
mod credentials;
mod error;
mod session;

pub use client::{ClientResponse, SessionClient};
pub use credentials::{CredentialLimits, SessionCredentials};
pub use error::{ClientError, ErrorCategory};
pub use session::{Session, SessionConfig};
