//! Mock Wi-Fi platform.

use envprint_core::RadioKind;

use super::radio::{MockRadio, MockRadioHandle};
use crate::error::Result;
use crate::platform::{EventSink, Permission, WifiEvent, WifiPlatform};

/// Handle controlling a [`MockWifiPlatform`].
pub type MockWifiHandle = MockRadioHandle<WifiEvent>;

/// Mock Wi-Fi platform for testing.
///
/// # Examples
///
/// ```
/// use envprint_radio::mock::MockWifiPlatform;
/// use envprint_radio::platform::{Permission, WifiPlatform};
///
/// let (platform, handle) = MockWifiPlatform::new();
/// assert!(platform.is_wifi_enabled().unwrap());
///
/// handle.revoke(Permission::WifiState);
/// assert!(!platform.has_permission(Permission::WifiState));
/// ```
#[derive(Debug)]
pub struct MockWifiPlatform {
    radio: MockRadio<WifiEvent>,
}

impl MockWifiPlatform {
    /// Create an enabled, fully authorized mock and its control handle.
    pub fn new() -> (Self, MockWifiHandle) {
        let (radio, handle) = MockRadio::new(RadioKind::Wifi);
        (Self { radio }, handle)
    }
}

impl WifiPlatform for MockWifiPlatform {
    fn is_wifi_enabled(&self) -> Result<bool> {
        self.radio.is_enabled()
    }

    fn has_permission(&self, permission: Permission) -> bool {
        self.radio.has_permission(permission)
    }

    fn start_scan(&self, events: EventSink<WifiEvent>) -> Result<()> {
        self.radio.start(events)
    }

    fn stop_scan(&self) -> Result<()> {
        self.radio.stop()
    }
}
