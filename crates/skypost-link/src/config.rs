//! Link configuration.

use std::fmt;

use crate::DriverError;

/// Maximum SSID length in bytes (802.11).
pub const SSID_MAX_LEN: usize = 32;

/// Maximum WPA passphrase length in bytes.
pub const PASSPHRASE_MAX_LEN: usize = 64;

/// How many disconnects are retried before bring-up fails.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Capacity of the driver → manager event channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 16;

/// WPA3 SAE password element derivation method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaePweMode {
    /// Hunting-and-pecking only.
    HuntAndPeck,
    /// Hash-to-element only.
    HashToElement,
    /// Either; the access point decides.
    #[default]
    Both,
}

/// Station credentials handed to the driver at the `SetConfig` step.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct StationConfig {
    /// Network name.
    pub ssid: String,
    /// WPA passphrase. Empty for open networks.
    pub password: String,
    /// SAE PWE mode for WPA3 networks.
    pub sae_pwe: SaePweMode,
}

impl StationConfig {
    /// Creates a station config with the default SAE mode.
    pub fn new(ssid: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            ssid: ssid.into(),
            password: password.into(),
            sae_pwe: SaePweMode::default(),
        }
    }

    /// Checks the length limits the radio enforces.
    ///
    /// Oversized values are rejected rather than truncated.
    pub fn validate(&self) -> Result<(), DriverError> {
        if self.ssid.len() > SSID_MAX_LEN {
            return Err(DriverError::InvalidArgument(format!(
                "ssid is {} bytes, max {SSID_MAX_LEN}",
                self.ssid.len()
            )));
        }
        if self.password.len() > PASSPHRASE_MAX_LEN {
            return Err(DriverError::InvalidArgument(format!(
                "passphrase is {} bytes, max {PASSPHRASE_MAX_LEN}",
                self.password.len()
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for StationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StationConfig")
            .field("ssid", &self.ssid)
            .field("password", &"<redacted>")
            .field("sae_pwe", &self.sae_pwe)
            .finish()
    }
}

/// Configuration for a [`LinkManager`](crate::LinkManager).
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// Network to join.
    pub station: StationConfig,
    /// Disconnects tolerated before bring-up fails.
    pub max_retries: u32,
    /// Event channel capacity. Must be non-zero.
    pub event_capacity: usize,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            station: StationConfig::default(),
            max_retries: DEFAULT_MAX_RETRIES,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}
