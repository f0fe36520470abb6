//! Radio discovery for the envprint environmental fingerprint collector.
//!
//! This crate wraps the platform's Wi-Fi and Bluetooth radios behind a common
//! [`RadioScanner`] contract and runs both side by side with the
//! [`ScanCoordinator`].
//!
//! # Layers
//!
//! - [`platform`]: small synchronous traits the host implements
//!   ([`WifiPlatform`], [`BluetoothPlatform`], [`LocationService`]). Discovery
//!   callbacks are pushed through a non-blocking [`EventSink`].
//! - [`accumulator`]: the per-radio Idle/Scanning state machine and its
//!   de-duplicating, order-preserving observation map.
//! - [`wifi`] and [`bluetooth`]: scanners turning raw platform records into
//!   [`RadioObservation`](envprint_core::RadioObservation)s.
//! - [`coordinator`]: concurrent scan-and-drain of both radios with
//!   cancellation.
//!
//! # Example
//!
//! ```no_run
//! use envprint_radio::bluetooth::BluetoothScanner;
//! use envprint_radio::coordinator::{CoordinatorConfig, ScanCoordinator};
//! use envprint_radio::mock::{MockBluetoothPlatform, MockWifiPlatform};
//! use envprint_radio::wifi::WifiScanner;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn example() {
//! let (wifi, _wifi) = MockWifiPlatform::new();
//! let (bluetooth, _bluetooth) = MockBluetoothPlatform::new();
//!
//! let coordinator = ScanCoordinator::new(
//!     WifiScanner::new(Arc::new(wifi)),
//!     BluetoothScanner::new(Arc::new(bluetooth)),
//!     CoordinatorConfig::default(),
//! );
//!
//! let snapshot = coordinator.run(Duration::from_secs(5)).await;
//! println!("{} access points", snapshot.wifi.len());
//! # }
//! ```
//!
//! # Errors
//!
//! Scanner failures never reach the coordinator's caller; a radio that cannot
//! scan contributes an empty list. [`RadioError`] is used at the platform
//! seam and by the mock handles.
//!
//! [`RadioScanner`]: traits::RadioScanner
//! [`ScanCoordinator`]: coordinator::ScanCoordinator
//! [`WifiPlatform`]: platform::WifiPlatform
//! [`BluetoothPlatform`]: platform::BluetoothPlatform
//! [`LocationService`]: platform::LocationService
//! [`EventSink`]: platform::EventSink

mod active;

pub mod accumulator;
pub mod bluetooth;
pub mod coordinator;
pub mod devices;
pub mod error;
pub mod mock;
pub mod platform;
pub mod traits;
pub mod wifi;

// Re-export commonly used types for convenience
pub use accumulator::{ScanAccumulator, ScanState};
pub use bluetooth::BluetoothScanner;
pub use coordinator::{CoordinatorConfig, ScanCoordinator, ScanOutcome};
pub use devices::AnyRadioScanner;
pub use error::{RadioError, Result};
pub use platform::{
    AccessPointRecord, BluetoothEvent, BluetoothPlatform, DeviceRecord, EventSink,
    LocationService, Permission, WifiEvent, WifiPlatform,
};
pub use traits::{RadioScanner, ScannerConfig};
pub use wifi::WifiScanner;
