//! The link manager: brings the radio from idle to "has an address".
//!
//! # Concurrency note
//!
//! `bring_up` is guarded by two flags, `initialized` and `initializing`.
//! At most one bring-up sequence runs at a time process-wide; a second
//! caller that arrives while one is pending, or after the link is up,
//! returns `Ok(())` immediately without touching the driver. This is the
//! only lock-like guard in the client.
//!
//! # Blocking
//!
//! `bring_up` suspends until the driver reports an address or the retry
//! budget runs out. There is no wall-clock timeout: a driver that keeps
//! answering but never succeeds and never disconnects blocks forever.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{mpsc, watch};

use crate::machine::{Action, LinkMachine};
use crate::{
    DriverError, LinkConfig, LinkError, LinkEvent, LinkEventSender,
    LinkState, LinkStep, RadioDriver,
};

/// Owns a radio driver and drives it through bring-up and teardown.
///
/// Share it behind an `Arc` if more than one task needs to call it.
///
/// ## Lifecycle
///
/// ```text
/// bring_up() ──→ [Connecting] ──→ [Connected] ──→ tear_down() ──→ [Idle]
///                     │
///                     ▼
///                 [Failed] ──→ bring_up() may be called again
/// ```
pub struct LinkManager<D: RadioDriver> {
    driver: D,
    config: LinkConfig,
    /// Set once the link reached Connected; cleared by teardown.
    initialized: AtomicBool,
    /// Set while a bring-up sequence is running.
    initializing: AtomicBool,
    state: watch::Sender<LinkState>,
}

impl<D: RadioDriver> LinkManager<D> {
    /// Creates a manager in the `Idle` state.
    pub fn new(driver: D, config: LinkConfig) -> Self {
        let (state, _) = watch::channel(LinkState::Idle);
        Self {
            driver,
            config,
            initialized: AtomicBool::new(false),
            initializing: AtomicBool::new(false),
            state,
        }
    }

    /// Current state.
    pub fn state(&self) -> LinkState {
        *self.state.borrow()
    }

    /// Watches state transitions.
    pub fn subscribe(&self) -> watch::Receiver<LinkState> {
        self.state.subscribe()
    }

    /// Returns `true` once bring-up succeeded and until teardown.
    pub fn is_up(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// The wrapped driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// The configuration this manager was built with.
    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Brings the link up and waits until it has an address.
    ///
    /// Idempotent: returns `Ok(())` at once if the link is already up or
    /// another bring-up is in flight.
    ///
    /// # Errors
    /// - [`LinkError::Init`] — a driver step failed (not retried)
    /// - [`LinkError::RetryExhausted`] — too many disconnects
    /// - [`LinkError::EventsClosed`] — the driver dropped its event sender
    ///
    /// On any error the in-progress guard is cleared, so a later call may
    /// try again.
    pub async fn bring_up(&self) -> Result<(), LinkError> {
        if self.is_up() {
            tracing::info!("link already up");
            return Ok(());
        }
        if self
            .initializing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::info!("link bring-up already in progress");
            return Ok(());
        }
        let _guard = InProgress(&self.initializing);

        // Another bring-up may have finished between the two checks.
        if self.is_up() {
            return Ok(());
        }

        match self.run_bring_up().await {
            Ok(()) => {
                self.initialized.store(true, Ordering::Release);
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "link bring-up failed");
                self.state.send_replace(LinkState::Failed);
                Err(e)
            }
        }
    }

    /// Disconnects, stops and deinitializes the radio.
    ///
    /// A no-op while `Idle`.
    ///
    /// # Errors
    /// - [`LinkError::BringUpInProgress`] — a bring-up is still waiting
    /// - [`LinkError::TearDown`] — a driver step failed; the remaining
    ///   steps are skipped
    pub fn tear_down(&self) -> Result<(), LinkError> {
        if self.initializing.load(Ordering::Acquire) {
            return Err(LinkError::BringUpInProgress);
        }
        if self.state() == LinkState::Idle {
            tracing::debug!("link idle, nothing to tear down");
            return Ok(());
        }

        teardown_step(LinkStep::Disconnect, self.driver.disconnect())?;
        teardown_step(LinkStep::Stop, self.driver.stop())?;
        teardown_step(LinkStep::Deinit, self.driver.deinit())?;

        self.initialized.store(false, Ordering::Release);
        self.state.send_replace(LinkState::Idle);
        tracing::info!("link torn down");
        Ok(())
    }

    async fn run_bring_up(&self) -> Result<(), LinkError> {
        self.state.send_replace(LinkState::Connecting);

        self.init_storage()?;

        if self.config.event_capacity == 0 {
            return Err(init_failed(
                LinkStep::EventChannel,
                DriverError::InvalidArgument(
                    "event channel capacity must be non-zero".into(),
                ),
            ));
        }
        let (tx, mut rx) = mpsc::channel(self.config.event_capacity);

        init_step(LinkStep::NetifInit, self.driver.init_netif())?;
        init_step(LinkStep::EventLoop, self.driver.create_event_loop())?;
        init_step(LinkStep::RadioInit, self.driver.init_radio())?;
        init_step(
            LinkStep::HandlerRegistration,
            self.driver.register_handlers(LinkEventSender::new(tx)),
        )?;
        init_step(LinkStep::SetMode, self.driver.set_station_mode())?;
        init_step(
            LinkStep::SetConfig,
            self.config
                .station
                .validate()
                .and_then(|()| self.driver.set_config(&self.config.station)),
        )?;
        init_step(LinkStep::Start, self.driver.start())?;

        tracing::info!(
            ssid = %self.config.station.ssid,
            max_retries = self.config.max_retries,
            "radio started, waiting for address"
        );
        self.await_terminal(&mut rx).await
    }

    /// Storage init, with one erase-and-retry for stale storage.
    fn init_storage(&self) -> Result<(), LinkError> {
        match self.driver.init_storage() {
            Err(DriverError::StorageStale(reason)) => {
                tracing::warn!(%reason, "persistent storage stale, erasing");
                init_step(LinkStep::StorageErase, self.driver.erase_storage())?;
                init_step(LinkStep::StorageInit, self.driver.init_storage())
            }
            other => init_step(LinkStep::StorageInit, other),
        }
    }

    async fn await_terminal(
        &self,
        events: &mut mpsc::Receiver<LinkEvent>,
    ) -> Result<(), LinkError> {
        let mut machine = LinkMachine::new(self.config.max_retries);

        while let Some(event) = events.recv().await {
            tracing::debug!(?event, "link event");
            match machine.on_event(event) {
                Action::Connect => self.request_connect(),
                Action::Reconnect { attempt, reason } => {
                    tracing::info!(
                        attempt,
                        max = machine.retries().max(),
                        ?reason,
                        "link dropped, reconnecting"
                    );
                    self.request_connect();
                }
                Action::Up(address) => {
                    self.state.send_replace(LinkState::Connected);
                    tracing::info!(
                        %address,
                        ssid = %self.config.station.ssid,
                        "link up"
                    );
                    return Ok(());
                }
                Action::Exhausted { attempts } => {
                    return Err(LinkError::RetryExhausted { attempts });
                }
            }
        }

        Err(LinkError::EventsClosed)
    }

    /// The outcome of a connect request arrives as an event, so a failed
    /// request is only logged.
    fn request_connect(&self) {
        if let Err(e) = self.driver.connect() {
            tracing::warn!(error = %e, "connect request rejected by driver");
        }
    }
}

/// Clears the in-progress flag when the bring-up future completes or is
/// dropped.
struct InProgress<'a>(&'a AtomicBool);

impl Drop for InProgress<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn init_failed(step: LinkStep, source: DriverError) -> LinkError {
    LinkError::Init { step, source }
}

fn init_step(
    step: LinkStep,
    result: Result<(), DriverError>,
) -> Result<(), LinkError> {
    result.map_err(|source| {
        tracing::error!(%step, error = %source, "link init step failed");
        init_failed(step, source)
    })
}

fn teardown_step(
    step: LinkStep,
    result: Result<(), DriverError>,
) -> Result<(), LinkError> {
    result.map_err(|source| {
        tracing::error!(%step, error = %source, "link teardown step failed");
        LinkError::TearDown { step, source }
    })
}
