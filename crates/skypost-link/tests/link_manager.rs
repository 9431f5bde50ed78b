//! Integration tests for `LinkManager` using a scripted radio driver.
//!
//! The driver records every lifecycle call and answers each `connect()`
//! with the next event from its script. Tests that need finer control
//! keep the driver quiet and push events through the sender it captured
//! at handler registration.

use std::collections::VecDeque;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use skypost_link::{
    DriverError, HostDriver, LinkConfig, LinkError, LinkEvent,
    LinkEventSender, LinkManager, LinkState, LinkStep, RadioDriver,
    StationConfig,
};

// =========================================================================
// Scripted driver
// =========================================================================

#[derive(Default)]
struct ScriptedDriver {
    /// Event raised on each `connect()`, front first.
    script: Mutex<VecDeque<LinkEvent>>,
    /// Don't raise `Started` from `start()`.
    silent_start: bool,
    /// Drop the event sender inside `start()`.
    drop_sender_on_start: bool,
    /// Step at which to fail, if any.
    fail_at: Mutex<Option<LinkStep>>,
    /// Number of `init_storage` calls that report stale storage.
    stale_storage: AtomicUsize,
    sender: Mutex<Option<LinkEventSender>>,
    calls: Mutex<Vec<&'static str>>,
    starts: AtomicUsize,
    connects: AtomicUsize,
}

impl ScriptedDriver {
    fn with_script(events: impl IntoIterator<Item = LinkEvent>) -> Self {
        Self {
            script: Mutex::new(events.into_iter().collect()),
            ..Self::default()
        }
    }

    fn silent() -> Self {
        Self {
            silent_start: true,
            ..Self::default()
        }
    }

    fn record(&self, call: &'static str, step: LinkStep) -> Result<(), DriverError> {
        self.calls.lock().unwrap().push(call);
        if *self.fail_at.lock().unwrap() == Some(step) {
            return Err(DriverError::Failed(format!("{call} refused")));
        }
        Ok(())
    }

    fn emit(&self, event: LinkEvent) {
        if let Some(sender) = self.sender.lock().unwrap().as_ref() {
            sender.push(event).expect("channel has room");
        }
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

impl RadioDriver for ScriptedDriver {
    fn init_storage(&self) -> Result<(), DriverError> {
        self.record("init_storage", LinkStep::StorageInit)?;
        let stale = self.stale_storage.load(Ordering::SeqCst);
        if stale > 0 {
            self.stale_storage.store(stale - 1, Ordering::SeqCst);
            return Err(DriverError::StorageStale("no free pages".into()));
        }
        Ok(())
    }

    fn erase_storage(&self) -> Result<(), DriverError> {
        self.record("erase_storage", LinkStep::StorageErase)
    }

    fn init_netif(&self) -> Result<(), DriverError> {
        self.record("init_netif", LinkStep::NetifInit)
    }

    fn create_event_loop(&self) -> Result<(), DriverError> {
        self.record("create_event_loop", LinkStep::EventLoop)
    }

    fn init_radio(&self) -> Result<(), DriverError> {
        self.record("init_radio", LinkStep::RadioInit)
    }

    fn register_handlers(&self, events: LinkEventSender) -> Result<(), DriverError> {
        self.record("register_handlers", LinkStep::HandlerRegistration)?;
        *self.sender.lock().unwrap() = Some(events);
        Ok(())
    }

    fn set_station_mode(&self) -> Result<(), DriverError> {
        self.record("set_station_mode", LinkStep::SetMode)
    }

    fn set_config(&self, _config: &StationConfig) -> Result<(), DriverError> {
        self.record("set_config", LinkStep::SetConfig)
    }

    fn start(&self) -> Result<(), DriverError> {
        self.record("start", LinkStep::Start)?;
        self.starts.fetch_add(1, Ordering::SeqCst);
        if self.drop_sender_on_start {
            self.sender.lock().unwrap().take();
            return Ok(());
        }
        if !self.silent_start {
            self.emit(LinkEvent::Started);
        }
        Ok(())
    }

    fn connect(&self) -> Result<(), DriverError> {
        self.calls.lock().unwrap().push("connect");
        self.connects.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        if let Some(event) = next {
            self.emit(event);
        }
        Ok(())
    }

    fn disconnect(&self) -> Result<(), DriverError> {
        self.record("disconnect", LinkStep::Disconnect)
    }

    fn stop(&self) -> Result<(), DriverError> {
        self.record("stop", LinkStep::Stop)
    }

    fn deinit(&self) -> Result<(), DriverError> {
        self.record("deinit", LinkStep::Deinit)?;
        self.sender.lock().unwrap().take();
        Ok(())
    }
}

// =========================================================================
// Helpers
// =========================================================================

fn addr() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(192, 168, 4, 20))
}

fn got_ip() -> LinkEvent {
    LinkEvent::AddressAcquired { address: addr() }
}

fn dropped() -> LinkEvent {
    LinkEvent::Disconnected { reason: Some(201) }
}

fn config(max_retries: u32) -> LinkConfig {
    LinkConfig {
        station: StationConfig::new("home-net", "correct horse"),
        max_retries,
        ..LinkConfig::default()
    }
}

fn manager(driver: ScriptedDriver, max_retries: u32) -> LinkManager<ScriptedDriver> {
    LinkManager::new(driver, config(max_retries))
}

// =========================================================================
// bring_up(): success paths
// =========================================================================

#[tokio::test]
async fn test_bring_up_runs_steps_in_order_and_connects() {
    let mgr = manager(ScriptedDriver::with_script([got_ip()]), 5);

    mgr.bring_up().await.expect("link should come up");

    assert_eq!(mgr.state(), LinkState::Connected);
    assert!(mgr.is_up());
    assert_eq!(
        mgr.driver().calls(),
        vec![
            "init_storage",
            "init_netif",
            "create_event_loop",
            "init_radio",
            "register_handlers",
            "set_station_mode",
            "set_config",
            "start",
            "connect",
        ]
    );
}

#[tokio::test]
async fn test_bring_up_retries_disconnects_within_budget() {
    let mgr = manager(
        ScriptedDriver::with_script([dropped(), dropped(), dropped(), got_ip()]),
        3,
    );

    mgr.bring_up().await.expect("third retry should succeed");

    // Initial connect + one reconnect per disconnect.
    assert_eq!(mgr.driver().connects(), 4);
    assert_eq!(mgr.state(), LinkState::Connected);
}

#[tokio::test]
async fn test_bring_up_is_noop_when_already_connected() {
    let mgr = manager(ScriptedDriver::with_script([got_ip()]), 5);
    mgr.bring_up().await.unwrap();

    mgr.bring_up().await.expect("second call is a no-op");

    assert_eq!(mgr.driver().starts(), 1);
    assert_eq!(mgr.driver().connects(), 1);
}

#[tokio::test]
async fn test_subscribe_observes_connected() {
    let mgr = manager(ScriptedDriver::with_script([got_ip()]), 5);
    let rx = mgr.subscribe();
    assert_eq!(*rx.borrow(), LinkState::Idle);

    mgr.bring_up().await.unwrap();

    assert_eq!(*rx.borrow(), LinkState::Connected);
}

// =========================================================================
// bring_up(): retry exhaustion
// =========================================================================

#[tokio::test]
async fn test_bring_up_max_plus_one_disconnects_fails() {
    let max = 4;
    let script: Vec<_> = (0..=max).map(|_| dropped()).chain([got_ip()]).collect();
    let mgr = manager(ScriptedDriver::with_script(script), max);

    let err = mgr.bring_up().await.unwrap_err();

    assert!(
        matches!(err, LinkError::RetryExhausted { attempts } if attempts == max),
        "got {err:?}"
    );
    assert_eq!(mgr.state(), LinkState::Failed);
    assert!(!mgr.is_up());
    // Initial connect + `max` reconnects; the final disconnect is not retried.
    assert_eq!(mgr.driver().connects(), max as usize + 1);
}

#[tokio::test]
async fn test_bring_up_after_failure_may_run_again() {
    // First attempt: zero retries, one disconnect → Failed.
    // Second attempt: the script now yields an address.
    let mgr = manager(ScriptedDriver::with_script([dropped(), got_ip()]), 0);

    assert!(matches!(
        mgr.bring_up().await,
        Err(LinkError::RetryExhausted { attempts: 0 })
    ));
    mgr.bring_up().await.expect("guard was cleared after failure");

    assert_eq!(mgr.driver().starts(), 2);
    assert_eq!(mgr.state(), LinkState::Connected);
}

#[tokio::test]
async fn test_bring_up_events_closed_is_error() {
    let driver = ScriptedDriver {
        drop_sender_on_start: true,
        ..ScriptedDriver::default()
    };
    let mgr = manager(driver, 5);

    let err = mgr.bring_up().await.unwrap_err();

    assert!(matches!(err, LinkError::EventsClosed));
    assert_eq!(mgr.state(), LinkState::Failed);
}

// =========================================================================
// bring_up(): concurrency guard
// =========================================================================

#[tokio::test]
async fn test_concurrent_bring_up_starts_one_sequence() {
    let mgr = Arc::new(manager(ScriptedDriver::silent(), 5));

    let first = {
        let mgr = Arc::clone(&mgr);
        tokio::spawn(async move { mgr.bring_up().await })
    };

    // Let the first call get as far as waiting for events.
    while mgr.driver().starts() == 0 {
        tokio::task::yield_now().await;
    }
    assert_eq!(mgr.state(), LinkState::Connecting);

    // The second call returns immediately without touching the driver.
    mgr.bring_up().await.expect("in-flight bring-up is a no-op");
    assert_eq!(mgr.driver().starts(), 1);
    assert_eq!(
        mgr.driver()
            .calls()
            .iter()
            .filter(|c| **c == "init_radio")
            .count(),
        1
    );

    // Release the first call.
    mgr.driver().emit(LinkEvent::Started);
    mgr.driver().emit(got_ip());
    first.await.unwrap().expect("first call completes");

    assert_eq!(mgr.state(), LinkState::Connected);
    assert_eq!(mgr.driver().starts(), 1);
}

#[tokio::test]
async fn test_tear_down_while_bringing_up_is_rejected() {
    let mgr = Arc::new(manager(ScriptedDriver::silent(), 5));
    let pending = {
        let mgr = Arc::clone(&mgr);
        tokio::spawn(async move { mgr.bring_up().await })
    };
    while mgr.driver().starts() == 0 {
        tokio::task::yield_now().await;
    }

    assert!(matches!(
        mgr.tear_down(),
        Err(LinkError::BringUpInProgress)
    ));

    mgr.driver().emit(got_ip());
    pending.await.unwrap().unwrap();
}

// =========================================================================
// bring_up(): init failures
// =========================================================================

#[tokio::test]
async fn test_each_init_step_failure_is_named_and_not_retried() {
    let steps = [
        LinkStep::StorageInit,
        LinkStep::NetifInit,
        LinkStep::EventLoop,
        LinkStep::RadioInit,
        LinkStep::HandlerRegistration,
        LinkStep::SetMode,
        LinkStep::SetConfig,
        LinkStep::Start,
    ];

    for step in steps {
        let driver = ScriptedDriver::with_script([got_ip()]);
        *driver.fail_at.lock().unwrap() = Some(step);
        let mgr = manager(driver, 5);

        let err = mgr.bring_up().await.unwrap_err();

        assert_eq!(err.step(), Some(step), "wrong step in {err:?}");
        assert!(matches!(err, LinkError::Init { .. }));
        assert_eq!(mgr.driver().connects(), 0, "{step} must not connect");
        assert_eq!(mgr.state(), LinkState::Failed);
        assert!(!mgr.is_up());
    }
}

#[tokio::test]
async fn test_init_failure_clears_guard_for_next_attempt() {
    let driver = ScriptedDriver::with_script([got_ip()]);
    *driver.fail_at.lock().unwrap() = Some(LinkStep::RadioInit);
    let mgr = manager(driver, 5);

    assert!(mgr.bring_up().await.is_err());

    *mgr.driver().fail_at.lock().unwrap() = None;
    mgr.bring_up().await.expect("second attempt runs");
    assert_eq!(mgr.state(), LinkState::Connected);
}

#[tokio::test]
async fn test_stale_storage_is_erased_and_reinitialized() {
    let driver = ScriptedDriver::with_script([got_ip()]);
    driver.stale_storage.store(1, Ordering::SeqCst);
    let mgr = manager(driver, 5);

    mgr.bring_up().await.unwrap();

    let calls = mgr.driver().calls();
    assert_eq!(&calls[..3], &["init_storage", "erase_storage", "init_storage"]);
}

#[tokio::test]
async fn test_storage_erase_failure_is_its_own_step() {
    let driver = ScriptedDriver::with_script([got_ip()]);
    driver.stale_storage.store(1, Ordering::SeqCst);
    *driver.fail_at.lock().unwrap() = Some(LinkStep::StorageErase);
    let mgr = manager(driver, 5);

    let err = mgr.bring_up().await.unwrap_err();

    assert_eq!(err.step(), Some(LinkStep::StorageErase));
}

#[tokio::test]
async fn test_still_stale_after_erase_fails_storage_init() {
    let driver = ScriptedDriver::with_script([got_ip()]);
    driver.stale_storage.store(2, Ordering::SeqCst);
    let mgr = manager(driver, 5);

    let err = mgr.bring_up().await.unwrap_err();

    assert!(matches!(
        err,
        LinkError::Init {
            step: LinkStep::StorageInit,
            source: DriverError::StorageStale(_)
        }
    ));
}

#[tokio::test]
async fn test_zero_event_capacity_fails_event_channel_step() {
    let mut cfg = config(5);
    cfg.event_capacity = 0;
    let mgr = LinkManager::new(ScriptedDriver::with_script([got_ip()]), cfg);

    let err = mgr.bring_up().await.unwrap_err();

    assert_eq!(err.step(), Some(LinkStep::EventChannel));
    assert!(!mgr.driver().calls().contains(&"init_radio"));
}

#[tokio::test]
async fn test_oversized_ssid_fails_set_config_before_driver_call() {
    let mut cfg = config(5);
    cfg.station.ssid = "x".repeat(40);
    let mgr = LinkManager::new(ScriptedDriver::with_script([got_ip()]), cfg);

    let err = mgr.bring_up().await.unwrap_err();

    assert!(matches!(
        err,
        LinkError::Init {
            step: LinkStep::SetConfig,
            source: DriverError::InvalidArgument(_)
        }
    ));
    assert!(!mgr.driver().calls().contains(&"set_config"));
}

// =========================================================================
// tear_down()
// =========================================================================

#[tokio::test]
async fn test_tear_down_runs_disconnect_stop_deinit() {
    let mgr = manager(ScriptedDriver::with_script([got_ip(), got_ip()]), 5);
    mgr.bring_up().await.unwrap();

    mgr.tear_down().expect("teardown succeeds");

    let calls = mgr.driver().calls();
    assert_eq!(&calls[calls.len() - 3..], &["disconnect", "stop", "deinit"]);
    assert_eq!(mgr.state(), LinkState::Idle);
    assert!(!mgr.is_up());

    // After teardown a new bring-up really runs again.
    mgr.bring_up().await.unwrap();
    assert_eq!(mgr.driver().starts(), 2);
}

#[tokio::test]
async fn test_tear_down_when_idle_is_noop() {
    let mgr = manager(ScriptedDriver::default(), 5);

    mgr.tear_down().unwrap();

    assert!(mgr.driver().calls().is_empty());
}

#[tokio::test]
async fn test_tear_down_step_failure_is_reported() {
    let mgr = manager(ScriptedDriver::with_script([got_ip()]), 5);
    mgr.bring_up().await.unwrap();
    *mgr.driver().fail_at.lock().unwrap() = Some(LinkStep::Stop);

    let err = mgr.tear_down().unwrap_err();

    assert!(matches!(
        err,
        LinkError::TearDown {
            step: LinkStep::Stop,
            ..
        }
    ));
    assert!(!mgr.driver().calls().contains(&"deinit"));
}

// =========================================================================
// HostDriver
// =========================================================================

#[tokio::test]
async fn test_host_driver_brings_up_loopback_route() {
    let driver = HostDriver::with_probe(SocketAddr::from(([127, 0, 0, 1], 9)));
    let mgr = LinkManager::new(driver, LinkConfig::default());

    mgr.bring_up().await.expect("loopback is always routable");

    assert_eq!(mgr.state(), LinkState::Connected);
    mgr.tear_down().unwrap();
    assert_eq!(mgr.state(), LinkState::Idle);
}
