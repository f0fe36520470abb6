//! Wi-Fi access point scanner.
//!
//! Results arrive from the platform in batches whenever a scan completes.
//! Each batch is re-checked against the scan permissions before it is merged;
//! access points without a BSSID are skipped and blank SSIDs are shown as
//! [`HIDDEN_SSID`].

use envprint_core::constants::HIDDEN_SSID;
use envprint_core::{RadioKind, RadioObservation};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace, warn};

use crate::accumulator::{ScanAccumulator, ScanState};
use crate::active::{ScanControl, ScanDriver};
use crate::error::Result;
use crate::platform::{
    AccessPointRecord, EventSink, Permission, WIFI_SCAN_PERMISSIONS, WifiEvent, WifiPlatform,
};
use crate::traits::{RadioScanner, ScannerConfig};

/// [`RadioScanner`] over a [`WifiPlatform`].
///
/// # Examples
///
/// ```
/// use envprint_radio::mock::MockWifiPlatform;
/// use envprint_radio::traits::RadioScanner;
/// use envprint_radio::wifi::WifiScanner;
/// use std::sync::Arc;
///
/// let (platform, _handle) = MockWifiPlatform::new();
/// let scanner = WifiScanner::new(Arc::new(platform));
/// assert!(scanner.is_enabled());
/// assert!(!scanner.is_scanning());
/// ```
pub struct WifiScanner {
    platform: Arc<dyn WifiPlatform>,
    driver: ScanDriver,
}

impl WifiScanner {
    /// Create a scanner with the default configuration.
    pub fn new(platform: Arc<dyn WifiPlatform>) -> Self {
        Self::with_config(platform, ScannerConfig::default())
    }

    /// Create a scanner with a custom configuration.
    pub fn with_config(platform: Arc<dyn WifiPlatform>, config: ScannerConfig) -> Self {
        Self {
            platform,
            driver: ScanDriver::new(RadioKind::Wifi, config),
        }
    }

    /// Accumulation state of the current or last scan.
    pub fn state(&self) -> ScanState {
        self.driver.state()
    }

    fn authorized(platform: &dyn WifiPlatform) -> bool {
        WIFI_SCAN_PERMISSIONS
            .iter()
            .all(|permission| platform.has_permission(*permission))
    }

    fn observation(record: AccessPointRecord) -> Option<RadioObservation> {
        let bssid = record.bssid.filter(|bssid| !bssid.is_empty())?;
        let ssid = match record.ssid {
            Some(ssid) if !ssid.is_empty() => ssid,
            _ => HIDDEN_SSID.to_string(),
        };
        Some(RadioObservation::new(bssid, ssid, record.level))
    }
}

impl ScanControl for dyn WifiPlatform {
    type Event = WifiEvent;

    fn launch(&self, events: EventSink<WifiEvent>) -> Result<()> {
        self.start_scan(events)
    }

    fn halt(&self) -> Result<()> {
        self.stop_scan()
    }

    fn handle(&self, accumulator: &ScanAccumulator, event: WifiEvent) {
        match event {
            WifiEvent::ResultsAvailable(records) => {
                if !WifiScanner::authorized(self) {
                    debug!("Wi-Fi authorization revoked, discarding {} results", records.len());
                    return;
                }
                let observations = records.into_iter().filter_map(WifiScanner::observation);
                let merged = accumulator.merge_batch(observations);
                trace!(merged, total = accumulator.len(), "Merged Wi-Fi results");
            }
            WifiEvent::ScanFailed => {
                warn!("Wi-Fi scan failed, keeping {} results", accumulator.len());
                accumulator.fail("scan results not updated");
            }
        }
    }
}

impl fmt::Debug for WifiScanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WifiScanner")
            .field("state", &self.driver.state())
            .field("accumulated", &self.driver.accumulated())
            .field("config", self.driver.config())
            .finish()
    }
}

impl RadioScanner for WifiScanner {
    fn kind(&self) -> RadioKind {
        RadioKind::Wifi
    }

    fn is_enabled(&self) -> bool {
        if !self.platform.has_permission(Permission::WifiState) {
            return false;
        }
        match self.platform.is_wifi_enabled() {
            Ok(enabled) => enabled,
            Err(e) => {
                debug!("Wi-Fi state query failed, treating as disabled: {}", e);
                false
            }
        }
    }

    fn is_authorized(&self) -> bool {
        Self::authorized(self.platform.as_ref())
    }

    fn is_scanning(&self) -> bool {
        self.driver.state() == ScanState::Scanning
    }

    async fn start(&self) -> bool {
        if !self.is_authorized() || !self.is_enabled() {
            return false;
        }
        self.driver.start(&self.platform).await
    }

    fn stop(&self) {
        self.driver.stop(self.platform.as_ref());
    }

    async fn drain(&self, timeout: Duration) -> Vec<RadioObservation> {
        self.driver.drain(timeout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockWifiPlatform, ScriptedEvent};
    use rstest::rstest;

    fn ap(ssid: Option<&str>, bssid: Option<&str>, level: i32) -> AccessPointRecord {
        AccessPointRecord::new(ssid, bssid, level)
    }

    fn scanner() -> (WifiScanner, crate::mock::MockWifiHandle) {
        let (platform, handle) = MockWifiPlatform::new();
        let config = ScannerConfig::default().restart_grace(Duration::from_millis(10));
        (WifiScanner::with_config(Arc::new(platform), config), handle)
    }

    #[rstest]
    #[case(Some("home"), Some("AA:BB"), Some("home"))]
    #[case(Some(""), Some("AA:BB"), Some(HIDDEN_SSID))]
    #[case(None, Some("AA:BB"), Some(HIDDEN_SSID))]
    #[case(Some("x"), None, None)]
    #[case(Some("x"), Some(""), None)]
    fn test_observation_naming(
        #[case] ssid: Option<&str>,
        #[case] bssid: Option<&str>,
        #[case] expected_name: Option<&str>,
    ) {
        let observation = WifiScanner::observation(ap(ssid, bssid, -40));

        assert_eq!(
            observation.as_ref().map(|o| o.display_name.as_str()),
            expected_name
        );
        if let Some(observation) = observation {
            assert_eq!(observation.identity, "AA:BB");
            assert_eq!(observation.signal_strength, -40);
        }
    }

    #[tokio::test]
    async fn test_start_refused_when_disabled() {
        let (scanner, handle) = scanner();
        handle.set_enabled(false);

        assert!(!scanner.is_enabled());
        assert!(!scanner.start().await);
        assert_eq!(handle.start_count(), 0);
    }

    #[tokio::test]
    async fn test_enabled_requires_wifi_state_permission() {
        let (scanner, handle) = scanner();
        handle.revoke(Permission::WifiState);
        assert!(!scanner.is_enabled());
    }

    #[tokio::test]
    async fn test_query_failure_reads_as_disabled() {
        let (scanner, handle) = scanner();
        handle.fail_enabled_query(true);
        assert!(!scanner.is_enabled());
    }

    #[tokio::test]
    async fn test_start_refused_without_permission() {
        let (scanner, handle) = scanner();
        handle.revoke(Permission::NearbyWifiDevices);

        assert!(!scanner.is_authorized());
        assert!(!scanner.start().await);
        assert_eq!(handle.start_count(), 0);
    }

    #[tokio::test]
    async fn test_platform_refusal_leaves_scanner_idle() {
        let (scanner, handle) = scanner();
        handle.refuse_start(true);

        assert!(!scanner.start().await);
        assert!(!scanner.is_scanning());
        assert_eq!(scanner.drain(Duration::from_secs(60)).await, vec![]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_results_are_accumulated_until_timeout() {
        let (scanner, handle) = scanner();
        handle.script(vec![
            ScriptedEvent::new(
                Duration::from_millis(100),
                WifiEvent::ResultsAvailable(vec![
                    ap(Some("home"), Some("AA:BB"), -60),
                    ap(None, Some("CC:DD"), -70),
                    ap(Some("ghost"), None, -10),
                ]),
            ),
            ScriptedEvent::new(
                Duration::from_millis(100),
                WifiEvent::ResultsAvailable(vec![ap(Some("home"), Some("AA:BB"), -45)]),
            ),
        ]);

        assert!(scanner.start().await);
        assert!(scanner.is_scanning());

        let results = scanner.drain(Duration::from_secs(1)).await;
        scanner.stop();

        assert_eq!(
            results,
            vec![
                RadioObservation::new("AA:BB", "home", -45),
                RadioObservation::new("CC:DD", HIDDEN_SSID, -70),
            ]
        );
        assert!(!scanner.is_scanning());
        assert_eq!(handle.stop_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scan_failure_keeps_earlier_results() {
        let (scanner, handle) = scanner();
        handle.script(vec![
            ScriptedEvent::new(
                Duration::from_millis(10),
                WifiEvent::ResultsAvailable(vec![ap(Some("a"), Some("AA"), -50)]),
            ),
            ScriptedEvent::new(Duration::from_millis(10), WifiEvent::ScanFailed),
            ScriptedEvent::new(
                Duration::from_millis(10),
                WifiEvent::ResultsAvailable(vec![ap(Some("b"), Some("BB"), -50)]),
            ),
        ]);

        assert!(scanner.start().await);
        let results = scanner.drain(Duration::from_millis(500)).await;

        assert_eq!(results, vec![RadioObservation::new("AA", "a", -50)]);
        assert!(!scanner.is_scanning());
    }

    #[tokio::test(start_paused = true)]
    async fn test_results_dropped_after_permission_revoked() {
        let (scanner, handle) = scanner();
        assert!(scanner.start().await);

        handle.revoke(Permission::FineLocation);
        handle
            .emit(WifiEvent::ResultsAvailable(vec![ap(Some("a"), Some("AA"), -50)]))
            .unwrap();

        let results = scanner.drain(Duration::from_millis(100)).await;
        assert!(results.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_interrupts_drain() {
        let (scanner, _handle) = scanner();
        let scanner = Arc::new(scanner);
        assert!(scanner.start().await);

        let draining = {
            let scanner = Arc::clone(&scanner);
            tokio::spawn(async move { scanner.drain(Duration::from_secs(3600)).await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        let started = tokio::time::Instant::now();
        scanner.stop();

        let results = draining.await.unwrap();
        assert!(results.is_empty());
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_stops_previous_scan_first() {
        let (scanner, handle) = scanner();

        assert!(scanner.start().await);
        let restarted = tokio::time::Instant::now();
        assert!(scanner.start().await);

        assert!(restarted.elapsed() >= Duration::from_millis(10));
        assert_eq!(handle.start_count(), 2);
        assert_eq!(handle.stop_count(), 1);
        assert!(scanner.is_scanning());
    }

    #[test]
    fn test_stop_when_idle_is_noop() {
        let (scanner, handle) = scanner();
        scanner.stop();
        scanner.stop();
        assert_eq!(handle.stop_count(), 0);
    }

    #[tokio::test]
    async fn test_stop_failure_is_swallowed() {
        let (scanner, handle) = scanner();
        assert!(scanner.start().await);

        handle.fail_stop(true);
        scanner.stop();

        assert!(!scanner.is_scanning());
    }
}
