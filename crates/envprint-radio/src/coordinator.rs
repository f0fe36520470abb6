//! Concurrent dual-radio scan coordination.
//!
//! The [`ScanCoordinator`] launches one scan-and-drain task per radio on a
//! [`JoinSet`] and waits for both. A radio that is disabled, unauthorized or
//! refuses to start contributes an empty list; nothing a scanner does is
//! surfaced to the caller as an error.
//!
//! # Task Lifecycle
//!
//! ```text
//! run_until_cancelled(duration)
//!   ├─ spawn scan_task(Wi-Fi)       start → drain(duration) → stop
//!   ├─ spawn scan_task(Bluetooth)   start → drain(duration) → stop
//!   └─ join both
//!        ├─ caller cancels    → radios stopped, partial results kept
//!        └─ deadline expires  → radios stopped, partial results kept
//! ```
//!
//! The deadline is `duration` plus the start overhead budget and only fires
//! when a scanner misbehaves.

use envprint_core::constants::{DEFAULT_SCAN_DURATION_MS, DEFAULT_START_OVERHEAD_MS};
use envprint_core::{RadioKind, RadioObservation, ScanSnapshot};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::bluetooth::BluetoothScanner;
use crate::devices::AnyRadioScanner;
use crate::traits::RadioScanner;
use crate::wifi::WifiScanner;

/// Coordinator configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Scan window used by [`ScanCoordinator::run_default`].
    pub scan_duration: Duration,

    /// Extra time allowed for starting and stopping the radios before the
    /// coordinator forces both scans to end.
    pub start_overhead: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            scan_duration: Duration::from_millis(DEFAULT_SCAN_DURATION_MS),
            start_overhead: Duration::from_millis(DEFAULT_START_OVERHEAD_MS),
        }
    }
}

impl CoordinatorConfig {
    /// Set the default scan window.
    pub fn scan_duration(mut self, duration: Duration) -> Self {
        self.scan_duration = duration;
        self
    }

    /// Set the start overhead budget.
    pub fn start_overhead(mut self, overhead: Duration) -> Self {
        self.start_overhead = overhead;
        self
    }
}

/// Result of a coordinated scan that may have been cut short.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Whatever both radios accumulated.
    pub snapshot: ScanSnapshot,

    /// True if the caller cancelled before the window elapsed.
    pub cancelled: bool,
}

/// Runs the Wi-Fi and Bluetooth scanners side by side.
///
/// # Examples
///
/// ```
/// use envprint_radio::bluetooth::BluetoothScanner;
/// use envprint_radio::coordinator::{CoordinatorConfig, ScanCoordinator};
/// use envprint_radio::mock::{MockBluetoothPlatform, MockWifiPlatform};
/// use envprint_radio::wifi::WifiScanner;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() {
///     let (wifi, _wifi) = MockWifiPlatform::new();
///     let (bluetooth, _bluetooth) = MockBluetoothPlatform::new();
///
///     let coordinator = ScanCoordinator::new(
///         WifiScanner::new(Arc::new(wifi)),
///         BluetoothScanner::new(Arc::new(bluetooth)),
///         CoordinatorConfig::default(),
///     );
///
///     let snapshot = coordinator.run(Duration::from_millis(10)).await;
///     assert!(snapshot.is_empty());
/// }
/// ```
#[derive(Debug)]
pub struct ScanCoordinator {
    wifi: Arc<AnyRadioScanner>,
    bluetooth: Arc<AnyRadioScanner>,
    config: CoordinatorConfig,
}

impl ScanCoordinator {
    pub fn new(wifi: WifiScanner, bluetooth: BluetoothScanner, config: CoordinatorConfig) -> Self {
        Self {
            wifi: Arc::new(wifi.into()),
            bluetooth: Arc::new(bluetooth.into()),
            config,
        }
    }

    /// The Wi-Fi scanner.
    pub fn wifi(&self) -> &AnyRadioScanner {
        &self.wifi
    }

    /// The Bluetooth scanner.
    pub fn bluetooth(&self) -> &AnyRadioScanner {
        &self.bluetooth
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Scan both radios for the configured default window.
    pub async fn run_default(&self) -> ScanSnapshot {
        self.run(self.config.scan_duration).await
    }

    /// Scan both radios for `duration` and return what they found.
    pub async fn run(&self, duration: Duration) -> ScanSnapshot {
        self.run_until_cancelled(duration, &CancellationToken::new())
            .await
            .snapshot
    }

    /// Scan both radios for `duration`, ending early if `cancel` fires.
    ///
    /// Both scans are always stopped before this returns, and their partial
    /// results are kept.
    pub async fn run_until_cancelled(
        &self,
        duration: Duration,
        cancel: &CancellationToken,
    ) -> ScanOutcome {
        let scans = cancel.child_token();
        let mut tasks = JoinSet::new();
        tasks.spawn(Self::scan_task(Arc::clone(&self.wifi), duration, scans.clone()));
        tasks.spawn(Self::scan_task(
            Arc::clone(&self.bluetooth),
            duration,
            scans.clone(),
        ));

        // No deadline when the window is too long to represent.
        let deadline = tokio::time::Instant::now()
            .checked_add(duration.saturating_add(self.config.start_overhead));
        let overrun = async {
            match deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };
        tokio::pin!(overrun);
        let mut snapshot = ScanSnapshot::default();

        loop {
            tokio::select! {
                joined = tasks.join_next() => match joined {
                    Some(Ok((kind, found))) => match kind {
                        RadioKind::Wifi => snapshot.wifi = found,
                        RadioKind::Bluetooth => snapshot.bluetooth = found,
                    },
                    Some(Err(e)) => warn!("Scan task ended abnormally: {}", e),
                    None => break,
                },
                _ = &mut overrun, if !scans.is_cancelled() => {
                    warn!(
                        "Scan overran its window by {:?}, stopping radios",
                        self.config.start_overhead
                    );
                    scans.cancel();
                }
            }
        }

        let cancelled = cancel.is_cancelled();
        info!(
            wifi = snapshot.wifi.len(),
            bluetooth = snapshot.bluetooth.len(),
            cancelled,
            "Scan complete"
        );

        ScanOutcome {
            snapshot,
            cancelled,
        }
    }

    async fn scan_task(
        scanner: Arc<AnyRadioScanner>,
        duration: Duration,
        cancel: CancellationToken,
    ) -> (RadioKind, Vec<RadioObservation>) {
        let kind = scanner.kind();

        if !scanner.is_enabled() || !scanner.is_authorized() {
            debug!("{} unavailable, contributing no results", kind);
            return (kind, Vec::new());
        }

        // Stops the radio even if this task is aborted mid-scan.
        let _running = StopOnDrop(Arc::clone(&scanner));
        if !scanner.start().await {
            debug!("{} scan did not start, contributing no results", kind);
            return (kind, Vec::new());
        }

        let found = tokio::select! {
            found = scanner.drain(duration) => {
                scanner.stop();
                found
            }
            _ = cancel.cancelled() => {
                scanner.stop();
                scanner.drain(Duration::ZERO).await
            }
        };

        debug!("{} scan produced {} observations", kind, found.len());
        (kind, found)
    }
}

/// Stops a scanner when dropped.
struct StopOnDrop(Arc<AnyRadioScanner>);

impl Drop for StopOnDrop {
    fn drop(&mut self) {
        self.0.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{
        MockBluetoothHandle, MockBluetoothPlatform, MockWifiHandle, MockWifiPlatform,
        ScriptedEvent,
    };
    use crate::platform::{AccessPointRecord, BluetoothEvent, DeviceRecord, Permission, WifiEvent};

    fn coordinator() -> (ScanCoordinator, MockWifiHandle, MockBluetoothHandle) {
        let (wifi, wifi_handle) = MockWifiPlatform::new();
        let (bluetooth, bt_handle) = MockBluetoothPlatform::new();
        let coordinator = ScanCoordinator::new(
            WifiScanner::new(Arc::new(wifi)),
            BluetoothScanner::new(Arc::new(bluetooth)),
            CoordinatorConfig::default(),
        );
        (coordinator, wifi_handle, bt_handle)
    }

    fn script_both(wifi: &MockWifiHandle, bluetooth: &MockBluetoothHandle) {
        wifi.script(vec![ScriptedEvent::new(
            Duration::from_millis(100),
            WifiEvent::ResultsAvailable(vec![AccessPointRecord::new(
                Some("Home"),
                Some("AA:BB"),
                -40,
            )]),
        )]);
        bluetooth.script(vec![ScriptedEvent::new(
            Duration::from_millis(200),
            BluetoothEvent::Result(DeviceRecord::new(Some("11:22"), Some("Headset"), -60)),
        )]);
    }

    #[test]
    fn test_config_builder() {
        let config = CoordinatorConfig::default()
            .scan_duration(Duration::from_secs(2))
            .start_overhead(Duration::from_millis(50));

        assert_eq!(config.scan_duration, Duration::from_secs(2));
        assert_eq!(config.start_overhead, Duration::from_millis(50));
        assert_eq!(
            CoordinatorConfig::default().scan_duration,
            Duration::from_millis(5000)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_collects_both_radios() {
        let (coordinator, wifi, bluetooth) = coordinator();
        script_both(&wifi, &bluetooth);

        let snapshot = coordinator.run(Duration::from_secs(1)).await;

        assert_eq!(snapshot.wifi.len(), 1);
        assert_eq!(snapshot.wifi[0].identity, "AA:BB");
        assert_eq!(snapshot.bluetooth.len(), 1);
        assert_eq!(snapshot.bluetooth[0].identity, "11:22");

        assert!(!coordinator.wifi().is_scanning());
        assert!(!coordinator.bluetooth().is_scanning());
        assert_eq!(wifi.stop_count(), 1);
        assert_eq!(bluetooth.stop_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scans_run_concurrently() {
        let (coordinator, _wifi, _bluetooth) = coordinator();
        let duration = Duration::from_secs(5);

        let started = tokio::time::Instant::now();
        coordinator.run(duration).await;
        let elapsed = started.elapsed();

        assert!(elapsed >= duration);
        assert!(elapsed < duration * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_radio_contributes_nothing() {
        let (coordinator, wifi, bluetooth) = coordinator();
        script_both(&wifi, &bluetooth);
        bluetooth.set_enabled(false);

        let snapshot = coordinator.run(Duration::from_secs(1)).await;

        assert_eq!(snapshot.wifi.len(), 1);
        assert!(snapshot.bluetooth.is_empty());
        assert_eq!(bluetooth.start_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unauthorized_radio_contributes_nothing() {
        let (coordinator, wifi, bluetooth) = coordinator();
        script_both(&wifi, &bluetooth);
        wifi.revoke(Permission::FineLocation);

        let snapshot = coordinator.run(Duration::from_secs(1)).await;

        assert!(snapshot.wifi.is_empty());
        assert_eq!(snapshot.bluetooth.len(), 1);
        assert_eq!(wifi.start_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_failure_isolated_to_one_radio() {
        let (coordinator, wifi, bluetooth) = coordinator();
        script_both(&wifi, &bluetooth);
        wifi.refuse_start(true);

        let snapshot = coordinator.run(Duration::from_secs(1)).await;

        assert!(snapshot.wifi.is_empty());
        assert_eq!(snapshot.bluetooth.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_returns_partial_results_promptly() {
        let (coordinator, wifi, bluetooth) = coordinator();
        script_both(&wifi, &bluetooth);

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(150)).await;
            trigger.cancel();
        });

        let started = tokio::time::Instant::now();
        let outcome = coordinator
            .run_until_cancelled(Duration::from_secs(30), &cancel)
            .await;

        assert!(outcome.cancelled);
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(outcome.snapshot.wifi.len(), 1);
        assert!(outcome.snapshot.bluetooth.is_empty());
        assert!(!coordinator.wifi().is_scanning());
        assert!(!coordinator.bluetooth().is_scanning());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_run_stops_radios() {
        let (coordinator, wifi, bluetooth) = coordinator();
        script_both(&wifi, &bluetooth);

        let run = coordinator.run(Duration::from_secs(30));
        assert!(tokio::time::timeout(Duration::from_millis(250), run).await.is_err());
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert!(!wifi.is_scanning());
        assert!(!bluetooth.is_scanning());
        assert!(!coordinator.wifi().is_scanning());
        assert!(!coordinator.bluetooth().is_scanning());
        assert_eq!(wifi.stop_count(), 1);
        assert_eq!(bluetooth.stop_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unbounded_window_does_not_overflow() {
        let (coordinator, _wifi, _bluetooth) = coordinator();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let outcome = coordinator.run_until_cancelled(Duration::MAX, &cancel).await;

        assert!(outcome.cancelled);
        assert!(outcome.snapshot.is_empty());
        assert!(!coordinator.wifi().is_scanning());
    }

    #[tokio::test(start_paused = true)]
    async fn test_uncancelled_outcome() {
        let (coordinator, _wifi, _bluetooth) = coordinator();

        let outcome = coordinator
            .run_until_cancelled(Duration::from_millis(10), &CancellationToken::new())
            .await;

        assert!(!outcome.cancelled);
        assert!(outcome.snapshot.is_empty());
    }
}
