//! The radio driver boundary.
//!
//! Skypost doesn't talk to any radio itself. The [`RadioDriver`] trait
//! lists the lifecycle calls the link manager needs, and the driver
//! reports what happens through the [`LinkEventSender`] it receives at
//! registration. Real firmware wraps its vendor stack in this trait;
//! tests use scripted drivers; [`HostDriver`](crate::HostDriver) adapts a
//! workstation's network stack.

use crate::{DriverError, LinkEventSender, StationConfig};

/// Lifecycle operations of a wireless radio.
///
/// Calls are synchronous and expected to return quickly: they *request*
/// something and the outcome arrives later as a
/// [`LinkEvent`](crate::LinkEvent).
///
/// The storage, netif, event loop and deinit hooks default to no-ops for
/// drivers whose platform has nothing to do there.
pub trait RadioDriver: Send + Sync + 'static {
    /// Initializes persistent storage used by the radio calibration data.
    ///
    /// Return [`DriverError::StorageStale`] to have the manager erase
    /// storage and call this once more.
    fn init_storage(&self) -> Result<(), DriverError> {
        Ok(())
    }

    /// Erases persistent storage.
    fn erase_storage(&self) -> Result<(), DriverError> {
        Ok(())
    }

    /// Initializes the network interface layer.
    fn init_netif(&self) -> Result<(), DriverError> {
        Ok(())
    }

    /// Creates the driver's own event loop.
    fn create_event_loop(&self) -> Result<(), DriverError> {
        Ok(())
    }

    /// Initializes the radio.
    fn init_radio(&self) -> Result<(), DriverError>;

    /// Hands the driver the sender for link and address events.
    ///
    /// The driver keeps it and pushes `Started`, `Disconnected` and
    /// `AddressAcquired` as they happen. Dropping every clone of it
    /// ends the bring-up with [`LinkError::EventsClosed`](crate::LinkError::EventsClosed).
    fn register_handlers(
        &self,
        events: LinkEventSender,
    ) -> Result<(), DriverError>;

    /// Puts the radio in station (client) mode.
    fn set_station_mode(&self) -> Result<(), DriverError>;

    /// Applies the network credentials.
    fn set_config(&self, config: &StationConfig) -> Result<(), DriverError>;

    /// Starts the radio. The driver raises `Started` when it is running.
    fn start(&self) -> Result<(), DriverError>;

    /// Requests an association attempt. The outcome arrives as
    /// `AddressAcquired` or `Disconnected`.
    fn connect(&self) -> Result<(), DriverError>;

    /// Drops the current association.
    fn disconnect(&self) -> Result<(), DriverError>;

    /// Stops the radio.
    fn stop(&self) -> Result<(), DriverError>;

    /// Releases driver resources after `stop`.
    fn deinit(&self) -> Result<(), DriverError> {
        Ok(())
    }
}
