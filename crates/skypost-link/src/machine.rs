//! The bring-up state machine, free of any driver or channel.
//!
//! ```text
//!   Idle ──(bring_up)──→ Connecting ──(AddressAcquired)──→ Connected
//!                          │    ↑
//!            (Disconnected)│    │(retry < max: reconnect)
//!                          ▼    │
//!                          ├────┘
//!                          │ (retry == max)
//!                          ▼
//!                        Failed
//! ```
//!
//! Connected and Failed are terminal for one bring-up attempt. The machine
//! only decides what should happen next; the manager performs it.

use std::net::IpAddr;

use crate::LinkEvent;

/// Lifecycle state of the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkState {
    /// Nothing started yet, or torn down.
    #[default]
    Idle,
    /// Bring-up in progress.
    Connecting,
    /// The interface has a routable address.
    Connected,
    /// The last bring-up attempt failed.
    Failed,
}

impl LinkState {
    /// Returns `true` for the states that end a bring-up attempt.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Connected | Self::Failed)
    }
}

/// Bounded reconnect counter.
///
/// Reset on every address acquisition, bumped on every disconnect.
/// Running past `max` is the only way a bring-up reaches `Failed` through
/// events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryCounter {
    attempts: u32,
    max: u32,
}

impl RetryCounter {
    /// A counter at zero with the given ceiling.
    pub fn new(max: u32) -> Self {
        Self { attempts: 0, max }
    }

    /// Reconnect attempts made since the last reset.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// The ceiling.
    pub fn max(&self) -> u32 {
        self.max
    }

    /// Consumes one retry. Returns `false` once the budget is spent,
    /// leaving the count unchanged.
    pub fn try_increment(&mut self) -> bool {
        if self.attempts < self.max {
            self.attempts += 1;
            true
        } else {
            false
        }
    }

    /// Back to zero.
    pub fn reset(&mut self) {
        self.attempts = 0;
    }
}

/// What the manager should do in response to one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Action {
    /// The interface started; ask the driver to associate.
    Connect,
    /// Lost the association; ask again.
    Reconnect { attempt: u32, reason: Option<u8> },
    /// Terminal: connected with this address.
    Up(IpAddr),
    /// Terminal: retry budget spent.
    Exhausted { attempts: u32 },
}

/// Per-attempt event interpreter.
#[derive(Debug)]
pub(crate) struct LinkMachine {
    retries: RetryCounter,
}

impl LinkMachine {
    pub(crate) fn new(max_retries: u32) -> Self {
        Self {
            retries: RetryCounter::new(max_retries),
        }
    }

    pub(crate) fn retries(&self) -> &RetryCounter {
        &self.retries
    }

    pub(crate) fn on_event(&mut self, event: LinkEvent) -> Action {
        match event {
            LinkEvent::Started => Action::Connect,
            LinkEvent::Disconnected { reason } => {
                if self.retries.try_increment() {
                    Action::Reconnect {
                        attempt: self.retries.attempts(),
                        reason,
                    }
                } else {
                    Action::Exhausted {
                        attempts: self.retries.attempts(),
                    }
                }
            }
            LinkEvent::AddressAcquired { address } => {
                self.retries.reset();
                Action::Up(address)
            }
        }
    }
}
