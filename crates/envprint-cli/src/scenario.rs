//! Scripted radio environments for the mock platforms.
//!
//! A scenario file describes which services are on, which permissions are
//! granted and what each radio reports over time:
//!
//! ```json
//! {
//!     "location_enabled": true,
//!     "wifi": {
//!         "events": [
//!             { "delay_ms": 300, "event": { "results_available": [
//!                 { "ssid": "Office", "bssid": "AA:BB:CC:00:11:22", "level": -48 }
//!             ] } }
//!         ]
//!     },
//!     "bluetooth": {
//!         "granted": ["fine_location", "bluetooth_scan"],
//!         "events": [
//!             { "delay_ms": 150, "event": { "result": { "address": "11:22:33:44:55:66", "name": "Headset", "rssi": -61 } } }
//!         ]
//!     }
//! }
//! ```
//!
//! Every field is optional. Without a scenario both radios are on, fully
//! authorized and silent.

use anyhow::{Context, Result};
use envprint_radio::mock::{MockRadioHandle, ScriptedEvent};
use envprint_radio::{BluetoothEvent, Permission, WifiEvent};
use serde::Deserialize;
use std::path::Path;

/// Behaviour of one mock radio.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RadioScenario<E> {
    /// Whether the radio is switched on.
    pub enabled: bool,

    /// Granted permissions; every permission when absent.
    pub granted: Option<Vec<Permission>>,

    /// Events replayed on scan start.
    pub events: Vec<ScriptedEvent<E>>,
}

impl<E> Default for RadioScenario<E> {
    fn default() -> Self {
        Self {
            enabled: true,
            granted: None,
            events: Vec::new(),
        }
    }
}

impl<E: Clone> RadioScenario<E> {
    /// Configure a mock radio to behave as described.
    pub fn apply(&self, handle: &MockRadioHandle<E>) {
        handle.set_enabled(self.enabled);
        if let Some(granted) = &self.granted {
            handle.set_granted(granted.iter().copied());
        }
        handle.script(self.events.clone());
    }
}

/// Display size reported as a static attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DisplayScenario {
    pub width_px: u32,
    pub height_px: u32,
}

/// A complete scripted environment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub location_enabled: bool,
    pub wifi: RadioScenario<WifiEvent>,
    pub bluetooth: RadioScenario<BluetoothEvent>,
    pub display: DisplayScenario,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            location_enabled: true,
            wifi: RadioScenario::default(),
            bluetooth: RadioScenario::default(),
            display: DisplayScenario::default(),
        }
    }
}

impl Scenario {
    /// Read a scenario from a JSON file.
    pub async fn load(path: &Path) -> Result<Self> {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read scenario {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid scenario {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
