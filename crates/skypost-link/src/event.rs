//! Typed driver events and the sending half of the event channel.
//!
//! The radio driver is a black box that raises events on its own schedule.
//! Instead of registering raw callbacks, the manager hands the driver a
//! [`LinkEventSender`]; the driver's adapter translates whatever its
//! native notification looks like into a [`LinkEvent`] and pushes it.
//! The state machine on the receiving end never sees driver internals.

use std::net::IpAddr;

use tokio::sync::mpsc;

/// An event raised by the radio driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// The radio interface started (link layer).
    Started,
    /// The association was lost or could not be made (link layer).
    /// `reason` is the driver's native reason code, if it has one.
    Disconnected { reason: Option<u8> },
    /// The interface obtained a routable address (network layer).
    AddressAcquired { address: IpAddr },
}

/// Push side of the driver event channel.
///
/// Cheap to clone. Pushing never blocks: the driver may call it from a
/// context that must not wait.
#[derive(Debug, Clone)]
pub struct LinkEventSender {
    tx: mpsc::Sender<LinkEvent>,
}

impl LinkEventSender {
    pub(crate) fn new(tx: mpsc::Sender<LinkEvent>) -> Self {
        Self { tx }
    }

    /// Pushes an event to the link manager.
    ///
    /// Returns the event back if the channel is full or nobody is
    /// listening anymore (the bring-up it belonged to has finished).
    pub fn push(&self, event: LinkEvent) -> Result<(), LinkEvent> {
        self.tx.try_send(event).map_err(|e| {
            let event = e.into_inner();
            tracing::debug!(?event, "link event dropped");
            event
        })
    }

    /// Returns `true` once the receiving side is gone.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
