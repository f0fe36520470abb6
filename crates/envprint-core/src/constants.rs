//! Defaults and fixed strings shared across the workspace.
//!
//! # Usage
//!
//! ```
//! use envprint_core::constants::*;
//! use std::time::Duration;
//!
//! let duration = Duration::from_millis(DEFAULT_SCAN_DURATION_MS);
//! assert_eq!(duration.as_secs(), 5);
//! ```

// ============================================================================
// Scan timing
// ============================================================================

/// How long each radio is scanned during one session.
pub const DEFAULT_SCAN_DURATION_MS: u64 = 5000;

/// Pause between stopping a running scan and restarting it.
///
/// Platforms leave orphaned scan sessions behind when a scan is restarted
/// without giving the previous one time to wind down.
pub const SCAN_RESTART_GRACE_MS: u64 = 100;

/// Budget for starting both scans on top of the scan duration.
pub const DEFAULT_START_OVERHEAD_MS: u64 = 1000;

/// Capacity of the per-scan platform event queue.
pub const DEFAULT_EVENT_BUFFER: usize = 64;

// ============================================================================
// Display name policy
// ============================================================================

/// Shown for access points that do not broadcast an SSID.
pub const HIDDEN_SSID: &str = "Hidden SSID";

/// Shown for devices that report no name.
pub const UNKNOWN_DEVICE_NAME: &str = "Unknown Device";

/// Shown when the permission needed to read device names is missing.
pub const NAME_UNAVAILABLE: &str = "Name requires connect permission";

// ============================================================================
// Persisted document
// ============================================================================

/// File name of the persisted fingerprint record inside the state directory.
pub const DEFAULT_STATE_FILE_NAME: &str = "tracking_info.json";

/// Key holding the sorted Wi-Fi identity digests.
pub const KEY_WIFI_NETWORKS: &str = "wifi_networks";

/// Key holding the sorted Bluetooth identity digests.
pub const KEY_BLUETOOTH_DEVICES: &str = "bluetooth_devices";
