//! Bluetooth device scanner.
//!
//! Devices arrive one at a time or in batches. Discovery needs the scan
//! permissions; reading a device's name additionally needs
//! [`BLUETOOTH_NAMING_PERMISSION`]. A missing naming permission degrades the
//! name to [`NAME_UNAVAILABLE`] instead of failing the scan.

use envprint_core::constants::{NAME_UNAVAILABLE, UNKNOWN_DEVICE_NAME};
use envprint_core::{RadioKind, RadioObservation};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace, warn};

use crate::accumulator::{ScanAccumulator, ScanState};
use crate::active::{ScanControl, ScanDriver};
use crate::error::Result;
use crate::platform::{
    BLUETOOTH_NAMING_PERMISSION, BLUETOOTH_SCAN_PERMISSIONS, BluetoothEvent, BluetoothPlatform,
    DeviceRecord, EventSink,
};
use crate::traits::{RadioScanner, ScannerConfig};

/// [`RadioScanner`] over a [`BluetoothPlatform`].
pub struct BluetoothScanner {
    platform: Arc<dyn BluetoothPlatform>,
    driver: ScanDriver,
}

impl BluetoothScanner {
    /// Create a scanner with the default configuration.
    pub fn new(platform: Arc<dyn BluetoothPlatform>) -> Self {
        Self::with_config(platform, ScannerConfig::default())
    }

    /// Create a scanner with a custom configuration.
    pub fn with_config(platform: Arc<dyn BluetoothPlatform>, config: ScannerConfig) -> Self {
        Self {
            platform,
            driver: ScanDriver::new(RadioKind::Bluetooth, config),
        }
    }

    /// Accumulation state of the current or last scan.
    pub fn state(&self) -> ScanState {
        self.driver.state()
    }

    fn authorized(platform: &dyn BluetoothPlatform) -> bool {
        BLUETOOTH_SCAN_PERMISSIONS
            .iter()
            .all(|permission| platform.has_permission(*permission))
    }

    fn observation(
        platform: &dyn BluetoothPlatform,
        record: DeviceRecord,
    ) -> Option<RadioObservation> {
        let address = record.address.filter(|address| !address.is_empty())?;
        let name = if !platform.has_permission(BLUETOOTH_NAMING_PERMISSION) {
            NAME_UNAVAILABLE.to_string()
        } else {
            record
                .name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| UNKNOWN_DEVICE_NAME.to_string())
        };
        Some(RadioObservation::new(address, name, record.rssi))
    }
}

impl ScanControl for dyn BluetoothPlatform {
    type Event = BluetoothEvent;

    fn launch(&self, events: EventSink<BluetoothEvent>) -> Result<()> {
        self.start_discovery(events)
    }

    fn halt(&self) -> Result<()> {
        self.stop_discovery()
    }

    fn handle(&self, accumulator: &ScanAccumulator, event: BluetoothEvent) {
        match event {
            BluetoothEvent::Result(record) => {
                if !BluetoothScanner::authorized(self) {
                    debug!("Bluetooth authorization revoked, discarding result");
                    return;
                }
                if let Some(observation) = BluetoothScanner::observation(self, record) {
                    accumulator.merge(observation);
                }
            }
            BluetoothEvent::BatchResults(records) => {
                if !BluetoothScanner::authorized(self) {
                    debug!("Bluetooth authorization revoked, discarding {} results", records.len());
                    return;
                }
                let merged = accumulator.merge_batch(
                    records
                        .into_iter()
                        .filter_map(|record| BluetoothScanner::observation(self, record)),
                );
                trace!(merged, total = accumulator.len(), "Merged Bluetooth batch");
            }
            BluetoothEvent::ScanFailed(code) => {
                warn!(code, "Bluetooth scan failed, keeping {} results", accumulator.len());
                accumulator.fail(format!("error code {}", code));
            }
        }
    }
}

impl fmt::Debug for BluetoothScanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BluetoothScanner")
            .field("state", &self.driver.state())
            .field("accumulated", &self.driver.accumulated())
            .field("config", self.driver.config())
            .finish()
    }
}

impl RadioScanner for BluetoothScanner {
    fn kind(&self) -> RadioKind {
        RadioKind::Bluetooth
    }

    fn is_enabled(&self) -> bool {
        match self.platform.is_bluetooth_enabled() {
            Ok(enabled) => enabled,
            Err(e) => {
                debug!("Bluetooth adapter query failed, treating as disabled: {}", e);
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
