//! Mock Bluetooth platform.

use envprint_core::RadioKind;

use super::radio::{MockRadio, MockRadioHandle};
use crate::error::Result;
use crate::platform::{BluetoothEvent, BluetoothPlatform, EventSink, Permission};

/// Handle controlling a [`MockBluetoothPlatform`].
pub type MockBluetoothHandle = MockRadioHandle<BluetoothEvent>;

/// Mock Bluetooth platform for testing.
#[derive(Debug)]
pub struct MockBluetoothPlatform {
    radio: MockRadio<BluetoothEvent>,
}

impl MockBluetoothPlatform {
    /// Create an enabled, fully authorized mock and its control handle.
    pub fn new() -> (Self, MockBluetoothHandle) {
        let (radio, handle) = MockRadio::new(RadioKind::Bluetooth);
        (Self { radio }, handle)
    }
}

impl BluetoothPlatform for MockBluetoothPlatform {
    fn is_bluetooth_enabled(&self) -> Result<bool> {
        self.radio.is_enabled()
    }

    fn has_permission(&self, permission: Permission) -> bool {
        self.radio.has_permission(permission)
    }

    fn start_discovery(&self, events: EventSink<BluetoothEvent>) -> Result<()> {
        self.radio.start(events)
    }

    fn stop_discovery(&self) -> Result<()> {
        self.radio.stop()
    }
}
