//! State shared by the Wi-Fi and Bluetooth mock platforms.

use envprint_core::RadioKind;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::trace;

use crate::error::{RadioError, Result};
use crate::platform::{BLUETOOTH_SCAN_PERMISSIONS, EventSink, Permission, WIFI_SCAN_PERMISSIONS};

/// A discovery event played back after a delay.
///
/// The delay counts from the previous scripted event, or from scan start
/// for the first one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedEvent<E> {
    /// Milliseconds to wait before delivering the event.
    pub delay_ms: u64,

    /// Event delivered to the scanner.
    pub event: E,
}

impl<E> ScriptedEvent<E> {
    /// Create a scripted event.
    pub fn new(delay: Duration, event: E) -> Self {
        Self {
            delay_ms: delay.as_millis() as u64,
            event,
        }
    }

    /// Delay before delivery.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[derive(Debug)]
struct MockRadioState<E> {
    enabled: bool,
    enabled_query_fails: bool,
    granted: HashSet<Permission>,
    refuse_start: bool,
    stop_fails: bool,
    sink: Option<EventSink<E>>,
    script: Vec<ScriptedEvent<E>>,
    start_count: usize,
    stop_count: usize,
}

type SharedState<E> = Arc<Mutex<MockRadioState<E>>>;

fn lock<E>(state: &SharedState<E>) -> MutexGuard<'_, MockRadioState<E>> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Platform half of a mock radio.
#[derive(Debug)]
pub(crate) struct MockRadio<E> {
    radio: RadioKind,
    state: SharedState<E>,
}

impl<E> MockRadio<E>
where
    E: Clone + Send + std::fmt::Debug + 'static,
{
    /// Create a mock radio that is on, fully authorized and silent.
    pub(crate) fn new(radio: RadioKind) -> (Self, MockRadioHandle<E>) {
        let state = Arc::new(Mutex::new(MockRadioState {
            enabled: true,
            enabled_query_fails: false,
            granted: [
                Permission::FineLocation,
                Permission::WifiState,
                Permission::ChangeWifiState,
                Permission::NearbyWifiDevices,
                Permission::BluetoothScan,
                Permission::BluetoothConnect,
            ]
            .into_iter()
            .collect(),
            refuse_start: false,
            stop_fails: false,
            sink: None,
            script: Vec::new(),
            start_count: 0,
            stop_count: 0,
        }));

        let platform = Self {
            radio,
            state: Arc::clone(&state),
        };
        let handle = MockRadioHandle { radio, state };

        (platform, handle)
    }

    pub(crate) fn is_enabled(&self) -> Result<bool> {
        let state = lock(&self.state);
        if state.enabled_query_fails {
            return Err(RadioError::platform(format!(
                "{} service unavailable",
                self.radio
            )));
        }
        Ok(state.enabled)
    }

    pub(crate) fn has_permission(&self, permission: Permission) -> bool {
        lock(&self.state).granted.contains(&permission)
    }

    pub(crate) fn start(&self, sink: EventSink<E>) -> Result<()> {
        let script = {
            let mut state = lock(&self.state);
            if !state.enabled {
                return Err(RadioError::disabled(self.radio));
            }
            let required: &[Permission] = match self.radio {
                RadioKind::Wifi => &WIFI_SCAN_PERMISSIONS,
                RadioKind::Bluetooth => &BLUETOOTH_SCAN_PERMISSIONS,
            };
            if !required.iter().all(|p| state.granted.contains(p)) {
                return Err(RadioError::unauthorized(self.radio));
            }
            if state.refuse_start {
                return Err(RadioError::start_refused(self.radio, "refused by mock"));
            }
            state.start_count += 1;
            state.sink = Some(sink.clone());
            state.script.clone()
        };

        if !script.is_empty() {
            tokio::spawn(Self::play(sink, script));
        }
        Ok(())
    }

    pub(crate) fn stop(&self) -> Result<()> {
        let mut state = lock(&self.state);
        state.stop_count += 1;
        state.sink = None;
        if state.stop_fails {
            return Err(RadioError::platform(format!(
                "{} stop rejected by mock",
                self.radio
            )));
        }
        Ok(())
    }

    async fn play(sink: EventSink<E>, script: Vec<ScriptedEvent<E>>) {
        for scripted in script {
            tokio::time::sleep(scripted.delay()).await;
            if sink.is_closed() {
                trace!(radio = %sink.radio(), "Scan ended, abandoning script");
                return;
            }
            sink.deliver(scripted.event);
        }
    }
}

/// Handle for controlling a mock radio.
///
/// Clones share state with each other and with the platform half.
#[derive(Debug)]
pub struct MockRadioHandle<E> {
    radio: RadioKind,
    state: SharedState<E>,
}

impl<E> Clone for MockRadioHandle<E> {
    fn clone(&self) -> Self {
        Self {
            radio: self.radio,
            state: Arc::clone(&self.state),
        }
    }
}

impl<E> MockRadioHandle<E>
where
    E: Clone,
{
    /// Turn the radio on or off.
    pub fn set_enabled(&self, enabled: bool) {
        lock(&self.state).enabled = enabled;
    }

    /// Make the enable-state query fail.
    pub fn fail_enabled_query(&self, fails: bool) {
        lock(&self.state).enabled_query_fails = fails;
    }

    /// Grant a permission.
    pub fn grant(&self, permission: Permission) {
        lock(&self.state).granted.insert(permission);
    }

    /// Revoke a permission.
    pub fn revoke(&self, permission: Permission) {
        lock(&self.state).granted.remove(&permission);
    }

    /// Replace the granted permission set.
    pub fn set_granted(&self, permissions: impl IntoIterator<Item = Permission>) {
        lock(&self.state).granted = permissions.into_iter().collect();
    }

    /// Make the platform refuse to start scans.
    pub fn refuse_start(&self, refuse: bool) {
        lock(&self.state).refuse_start = refuse;
    }

    /// Make stopping a scan report a platform error.
    pub fn fail_stop(&self, fails: bool) {
        lock(&self.state).stop_fails = fails;
    }

    /// Events replayed on every subsequent scan start.
    pub fn script(&self, events: Vec<ScriptedEvent<E>>) {
        lock(&self.state).script = events;
    }

    /// Deliver an event to the running scan now.
    ///
    /// # Errors
    ///
    /// Returns an error if no scan is running or the event was dropped.
    pub fn emit(&self, event: E) -> Result<()> {
        let sink = lock(&self.state)
            .sink
            .clone()
            .ok_or_else(|| RadioError::not_scanning(self.radio))?;

        if sink.deliver(event) {
            Ok(())
        } else {
            Err(RadioError::channel_closed(self.radio))
        }
    }

    /// Whether the platform currently has a scan registered.
    pub fn is_scanning(&self) -> bool {
        lock(&self.state).sink.is_some()
    }

    /// Number of accepted scan starts.
    pub fn start_count(&self) -> usize {
        lock(&self.state).start_count
    }

    /// Number of scan stops requested.
    pub fn stop_count(&self) -> usize {
        lock(&self.state).stop_count
    }

    /// Radio this handle controls.
    pub fn radio(&self) -> RadioKind {
        self.radio
    }
}
