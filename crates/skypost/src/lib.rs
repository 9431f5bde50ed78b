//! # Skypost
//!
//! Device-side client that brings a network link up, authenticates to a
//! Bluesky PDS, and posts a single record.
//!
//! The work is split into layers, each in its own crate:
//!
//! - [`skypost_transport`] — HTTP POST and response buffering
//! - [`skypost_protocol`] — XRPC endpoints and wire documents
//! - [`skypost_link`] — link bring-up state machine
//! - [`skypost_session`] — credentials, authenticate, post
//!
//! This crate ties them together in a [`Sequencer`] and adds a unified
//! error, process configuration, and logging setup for the binary.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use skypost::prelude::*;
//!
//! # async fn run() -> Result<(), SkypostError> {
//! let transport = ReqwestTransport::new(TransportConfig::default())?;
//! let sequencer = Sequencer::builder()
//!     .link(LinkManager::new(HostDriver::new(), LinkConfig::default()))
//!     .client(SessionClient::new(transport, SessionConfig::default()))
//!     .build()?;
//!
//! let mut session = Session::new();
//! let resp = sequencer
//!     .run(&mut session, "alice.bsky.social", "app-password", r#"{"text":"hi"}"#)
//!     .await?;
//! println!("{}", resp.body);
//! # Ok(())
//! # }
//! ```

pub mod config;
mod error;
pub mod logging;
mod sequencer;

pub use error::SkypostError;
pub use sequencer::{Sequencer, SequencerBuilder, SequencerConfig};

pub use skypost_link;
pub use skypost_protocol;
pub use skypost_session;
pub use skypost_transport;

/// Common imports for running a sequence.
pub mod prelude {
    pub use crate::{Sequencer, SequencerConfig, SkypostError};
    pub use skypost_link::{HostDriver, LinkConfig, LinkManager, StationConfig};
    pub use skypost_session::{
        ClientError, ClientResponse, Session, SessionClient, SessionConfig,
    };
    pub use skypost_transport::{ReqwestTransport, TransportConfig};
}
