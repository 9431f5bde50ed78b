//! A [`RadioDriver`] for machines whose network is managed by the OS.
//!
//! On a workstation there is no radio to configure: the link is "up"
//! when the OS can route to the outside world. `HostDriver` adapts that
//! to the driver boundary so the same bring-up sequence runs unchanged:
//!
//! - `start` raises `Started`
//! - `connect` probes for a routable local address and raises
//!   `AddressAcquired` or `Disconnected`
//!
//! The probe "connects" a UDP socket to a remote address, which only
//! asks the routing table for a source address. No packet is sent.

use std::io;
use std::net::{IpAddr, SocketAddr, UdpSocket};
use std::sync::Mutex;

use crate::{
    DriverError, LinkEvent, LinkEventSender, RadioDriver, StationConfig,
};

/// Default probe target: a public DNS resolver.
pub const DEFAULT_PROBE: &str = "1.1.1.1:53";

/// Host network adapter.
#[derive(Debug)]
pub struct HostDriver {
    probe: SocketAddr,
    events: Mutex<Option<LinkEventSender>>,
}

impl HostDriver {
    /// Probes [`DEFAULT_PROBE`].
    pub fn new() -> Self {
        Self::with_probe(SocketAddr::from(([1, 1, 1, 1], 53)))
    }

    /// Probes a custom target, e.g. a local gateway.
    pub fn with_probe(probe: SocketAddr) -> Self {
        Self {
            probe,
            events: Mutex::new(None),
        }
    }

    /// The probe target.
    pub fn probe(&self) -> SocketAddr {
        self.probe
    }

    fn emit(&self, event: LinkEvent) {
        match self.events.lock() {
            Ok(guard) => {
                if let Some(sender) = guard.as_ref() {
                    let _ = sender.push(event);
                }
            }
            Err(_) => tracing::warn!(?event, "event sender lock poisoned"),
        }
    }
}

impl Default for HostDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl RadioDriver for HostDriver {
    fn init_radio(&self) -> Result<(), DriverError> {
        Ok(())
    }

    fn register_handlers(
        &self,
        events: LinkEventSender,
    ) -> Result<(), DriverError> {
        let mut slot = self
            .events
            .lock()
            .map_err(|_| DriverError::Failed("event sender lock poisoned".into()))?;
        *slot = Some(events);
        Ok(())
    }

    fn set_station_mode(&self) -> Result<(), DriverError> {
        Ok(())
    }

    fn set_config(&self, config: &StationConfig) -> Result<(), DriverError> {
        if !config.ssid.is_empty() {
            tracing::debug!(
                ssid = %config.ssid,
                "host network is OS-managed, ignoring station config"
            );
        }
        Ok(())
    }

    fn start(&self) -> Result<(), DriverError> {
        self.emit(LinkEvent::Started);
        Ok(())
    }

    fn connect(&self) -> Result<(), DriverError> {
        match probe_local_address(self.probe) {
            Ok(address) if !address.is_unspecified() => {
                self.emit(LinkEvent::AddressAcquired { address });
            }
            Ok(_) => self.emit(LinkEvent::Disconnected { reason: None }),
            Err(e) => {
                tracing::debug!(probe = %self.probe, error = %e, "no route");
                self.emit(LinkEvent::Disconnected { reason: None });
            }
        }
        Ok(())
    }

    fn disconnect(&self) -> Result<(), DriverError> {
        Ok(())
    }

    fn stop(&self) -> Result<(), DriverError> {
        Ok(())
    }

    fn deinit(&self) -> Result<(), DriverError> {
        let mut slot = self
            .events
            .lock()
            .map_err(|_| DriverError::Failed("event sender lock poisoned".into()))?;
        *slot = None;
        Ok(())
    }
}

/// Asks the routing table which local address would reach `probe`.
fn probe_local_address(probe: SocketAddr) -> io::Result<IpAddr> {
    let bind: SocketAddr = if probe.is_ipv4() {
        SocketAddr::from(([0, 0, 0, 0], 0))
    } else {
        SocketAddr::from(([0u16; 8], 0))
    };
    let socket = UdpSocket::bind(bind)?;
    socket.connect(probe)?;
    Ok(socket.local_addr()?.ip())
}
