//! Error types for the link layer.

use std::fmt;

/// One named step of link bring-up or teardown.
///
/// Every driver call the manager makes is tagged with its step, so a
/// failure says exactly where the sequence stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkStep {
    /// Persistent storage (NVS) init.
    StorageInit,
    /// Erasing stale persistent storage before a second init.
    StorageErase,
    /// Creating the driver event channel.
    EventChannel,
    /// Network interface init.
    NetifInit,
    /// Driver event loop creation.
    EventLoop,
    /// Radio init.
    RadioInit,
    /// Registering the event handlers with the driver.
    HandlerRegistration,
    /// Switching the radio into station mode.
    SetMode,
    /// Applying SSID / passphrase.
    SetConfig,
    /// Starting the radio.
    Start,
    /// Teardown: dropping the association.
    Disconnect,
    /// Teardown: stopping the radio.
    Stop,
    /// Teardown: releasing driver resources.
    Deinit,
}

impl fmt::Display for LinkStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::StorageInit => "storage init",
            Self::StorageErase => "storage erase",
            Self::EventChannel => "event channel creation",
            Self::NetifInit => "netif init",
            Self::EventLoop => "event loop creation",
            Self::RadioInit => "radio init",
            Self::HandlerRegistration => "handler registration",
            Self::SetMode => "set mode",
            Self::SetConfig => "set config",
            Self::Start => "start",
            Self::Disconnect => "disconnect",
            Self::Stop => "stop",
            Self::Deinit => "deinit",
        };
        f.write_str(name)
    }
}

/// Errors reported by a [`RadioDriver`](crate::RadioDriver).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DriverError {
    /// Persistent storage is full or was written by a newer layout.
    /// The manager erases it once and retries init.
    #[error("persistent storage is stale: {0}")]
    StorageStale(String),

    /// An argument was rejected before reaching the hardware.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Any other driver failure.
    #[error("{0}")]
    Failed(String),
}

/// Errors that can occur while bringing the link up or down.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// A bring-up step failed. Never retried.
    #[error("link init failed at {step}: {source}")]
    Init {
        step: LinkStep,
        #[source]
        source: DriverError,
    },

    /// The driver reported more disconnects than the retry budget allows.
    #[error("link retries exhausted after {attempts} reconnect attempts")]
    RetryExhausted { attempts: u32 },

    /// The driver dropped its event sender before a terminal event.
    #[error("driver event channel closed before the link settled")]
    EventsClosed,

    /// A teardown step failed.
    #[error("link teardown failed at {step}: {source}")]
    TearDown {
        step: LinkStep,
        #[source]
        source: DriverError,
    },

    /// Teardown was requested while a bring-up is still waiting.
    #[error("link bring-up in progress")]
    BringUpInProgress,
}

impl LinkError {
    /// The step that failed, for init and teardown errors.
    pub fn step(&self) -> Option<LinkStep> {
        match self {
            Self::Init { step, .. } | Self::TearDown { step, .. } => {
                Some(*step)
            }
            _ => None,
        }
    }
}
