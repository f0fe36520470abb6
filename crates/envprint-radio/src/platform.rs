//! Contracts for the platform radio backends.
//!
//! The platform owns the actual radios and reports discoveries through
//! callbacks. Each backend is wrapped behind a small synchronous, object-safe
//! trait so a scanner can hold it as `Arc<dyn WifiPlatform>` and tests can
//! inject a scripted fake instead of a process-wide radio manager.
//!
//! Callbacks never block: they hand events to an [`EventSink`], which drops
//! the event (with a warning) when the per-scan queue is full.

use envprint_core::RadioKind;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{trace, warn};

use crate::error::Result;

/// Runtime permission gating radio discovery or result naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Precise location, required by both radios for discovery.
    FineLocation,

    /// Read Wi-Fi state.
    WifiState,

    /// Change Wi-Fi state (trigger scans).
    ChangeWifiState,

    /// Discover nearby Wi-Fi devices.
    NearbyWifiDevices,

    /// Discover Bluetooth devices.
    BluetoothScan,

    /// Connect to Bluetooth devices; gates reading their names.
    BluetoothConnect,
}

/// Permissions needed to scan for access points.
pub const WIFI_SCAN_PERMISSIONS: [Permission; 4] = [
    Permission::FineLocation,
    Permission::WifiState,
    Permission::ChangeWifiState,
    Permission::NearbyWifiDevices,
];

/// Permissions needed to discover Bluetooth devices.
pub const BLUETOOTH_SCAN_PERMISSIONS: [Permission; 2] =
    [Permission::FineLocation, Permission::BluetoothScan];

/// Permission needed to read Bluetooth device names.
pub const BLUETOOTH_NAMING_PERMISSION: Permission = Permission::BluetoothConnect;

/// Raw access point as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPointRecord {
    pub ssid: Option<String>,
    pub bssid: Option<String>,
    pub level: i32,
}

impl AccessPointRecord {
    pub fn new(ssid: Option<&str>, bssid: Option<&str>, level: i32) -> Self {
        Self {
            ssid: ssid.map(str::to_string),
            bssid: bssid.map(str::to_string),
            level,
        }
    }
}

/// Wi-Fi scan callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WifiEvent {
    /// Fresh scan results are available.
    ResultsAvailable(Vec<AccessPointRecord>),

    /// The platform could not complete the scan.
    ScanFailed,
}

/// Raw Bluetooth device as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub address: Option<String>,
    pub name: Option<String>,
    pub rssi: i32,
}

impl DeviceRecord {
    pub fn new(address: Option<&str>, name: Option<&str>, rssi: i32) -> Self {
        Self {
            address: address.map(str::to_string),
            name: name.map(str::to_string),
            rssi,
        }
    }
}

/// Bluetooth discovery callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BluetoothEvent {
    /// A single device was seen.
    Result(DeviceRecord),

    /// Several devices were seen since the last callback.
    BatchResults(Vec<DeviceRecord>),

    /// Discovery failed with a platform error code.
    ScanFailed(i32),
}

/// Non-blocking handle the platform uses to report events for one scan.
#[derive(Debug, Clone)]
pub struct EventSink<E> {
    radio: RadioKind,
    tx: mpsc::Sender<E>,
}

impl<E> EventSink<E> {
    /// Wrap the sending half of a scan's event queue.
    pub fn new(radio: RadioKind, tx: mpsc::Sender<E>) -> Self {
        Self { radio, tx }
    }

    /// Queue an event without blocking.
    ///
    /// Returns `false` when the event was dropped because the queue is full
    /// or the scan has already ended.
    pub fn deliver(&self, event: E) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!(radio = %self.radio, "Event queue full, dropping platform event");
                false
            }
            Err(TrySendError::Closed(_)) => {
                trace!(radio = %self.radio, "Scan ended, discarding late platform event");
                false
            }
        }
    }

    /// Whether the receiving scan has gone away.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Radio this sink reports for.
    pub fn radio(&self) -> RadioKind {
        self.radio
    }
}

/// Wi-Fi backend owned by the platform.
pub trait WifiPlatform: Send + Sync {
    /// Whether the Wi-Fi radio is on.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform cannot be queried.
    fn is_wifi_enabled(&self) -> Result<bool>;

    /// Whether `permission` is currently granted. Never cached.
    fn has_permission(&self, permission: Permission) -> bool;

    /// Register for results and trigger a scan.
    ///
    /// # Errors
    ///
    /// Returns an error if the receiver cannot be registered or the platform
    /// refuses to scan.
    fn start_scan(&self, events: EventSink<WifiEvent>) -> Result<()>;

    /// Unregister the result receiver.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform fails to unregister.
    fn stop_scan(&self) -> Result<()>;
}

/// Bluetooth backend owned by the platform.
pub trait BluetoothPlatform: Send + Sync {
    /// Whether the Bluetooth adapter is on.
    ///
    /// # Errors
    ///
    /// Returns an error if the adapter cannot be queried.
    fn is_bluetooth_enabled(&self) -> Result<bool>;

    /// Whether `permission` is currently granted. Never cached.
    fn has_permission(&self, permission: Permission) -> bool;

    /// Begin low-latency discovery.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses to start discovery.
    fn start_discovery(&self, events: EventSink<BluetoothEvent>) -> Result<()>;

    /// End discovery.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform fails to stop discovery.
    fn stop_discovery(&self) -> Result<()>;
}

/// Platform location service, a prerequisite for radio discovery.
pub trait LocationService: Send + Sync {
    /// Whether location services are on.
    fn is_location_enabled(&self) -> bool;
}
