//! Mock platform backends for testing and development.
//!
//! Each mock is split into the platform half, handed to a scanner, and a
//! cloneable handle used to flip radio state, grant or revoke permissions,
//! and feed discovery events, either immediately with `emit` or as a timed
//! script replayed on every scan start.

pub mod bluetooth;
pub mod location;
pub mod radio;
pub mod wifi;

// Re-export commonly used types
pub use bluetooth::{MockBluetoothHandle, MockBluetoothPlatform};
pub use location::MockLocationService;
pub use radio::{MockRadioHandle, ScriptedEvent};
pub use wifi::{MockWifiHandle, MockWifiPlatform};
