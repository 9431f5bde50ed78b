//! Wireless link bring-up for Skypost.
//!
//! This crate takes a radio interface from idle to "has a routable
//! address" despite transient failures:
//!
//! 1. **Driver boundary** — the [`RadioDriver`] trait: lifecycle calls in,
//!    typed [`LinkEvent`]s out through a [`LinkEventSender`]
//! 2. **State machine** — [`LinkState`] transitions and the bounded
//!    [`RetryCounter`]
//! 3. **Manager** — [`LinkManager::bring_up`], a single blocking call
//!    guarded so only one bring-up runs at a time
//!
//! # How it fits in the stack
//!
//! ```text
//! Sequencer (above)  ← brings the link up before any HTTP traffic
//!     ↕
//! Link Layer (this crate)  ← driver lifecycle + event state machine
//!     ↕
//! Radio driver (black box)  ← raises Started / Disconnected / AddressAcquired
//! ```

mod config;
mod driver;
mod error;
mod event;
mod host;
mod machine;
mod manager;

pub use config::{
    DEFAULT_EVENT_CAPACITY, DEFAULT_MAX_RETRIES, LinkConfig,
    PASSPHRASE_MAX_LEN, SSID_MAX_LEN, SaePweMode, StationConfig,
};
pub use driver::RadioDriver;
pub use error::{DriverError, LinkError, LinkStep};
pub use event::{LinkEvent, LinkEventSender};
pub use host::{DEFAULT_PROBE, HostDriver};
pub use machine::{LinkState, RetryCounter};
pub use manager::LinkManager;
