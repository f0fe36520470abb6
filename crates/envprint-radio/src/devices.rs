//! Enum wrapper for radio scanner dispatch.
//!
//! [`RadioScanner`] uses native `async fn`, so it cannot be used as
//! `dyn RadioScanner`. [`AnyRadioScanner`] gives the coordinator a single
//! concrete type for both radios instead.
//!
//! # Examples
//!
//! ```
//! use envprint_core::RadioKind;
//! use envprint_radio::devices::AnyRadioScanner;
//! use envprint_radio::mock::MockWifiPlatform;
//! use envprint_radio::traits::RadioScanner;
//! use envprint_radio::wifi::WifiScanner;
//! use std::sync::Arc;
//!
//! let (platform, _handle) = MockWifiPlatform::new();
//! let scanner = AnyRadioScanner::from(WifiScanner::new(Arc::new(platform)));
//! assert_eq!(scanner.kind(), RadioKind::Wifi);
//! ```

use envprint_core::{RadioKind, RadioObservation};
use std::time::Duration;

use crate::bluetooth::BluetoothScanner;
use crate::traits::RadioScanner;
use crate::wifi::WifiScanner;

/// Either radio's scanner behind one type.
#[derive(Debug)]
pub enum AnyRadioScanner {
    /// Wi-Fi access point scanner.
    Wifi(WifiScanner),

    /// Bluetooth device scanner.
    Bluetooth(BluetoothScanner),
}

impl From<WifiScanner> for AnyRadioScanner {
    fn from(scanner: WifiScanner) -> Self {
        Self::Wifi(scanner)
    }
}

impl From<BluetoothScanner> for AnyRadioScanner {
    fn from(scanner: BluetoothScanner) -> Self {
        Self::Bluetooth(scanner)
    }
}

impl RadioScanner for AnyRadioScanner {
    fn kind(&self) -> RadioKind {
        match self {
            Self::Wifi(scanner) => scanner.kind(),
            Self::Bluetooth(scanner) => scanner.kind(),
        }
    }

    fn is_enabled(&self) -> bool {
        match self {
            Self::Wifi(scanner) => scanner.is_enabled(),
            Self::Bluetooth(scanner) => scanner.is_enabled(),
        }
    }

    fn is_authorized(&self) -> bool {
        match self {
            Self::Wifi(scanner) => scanner.is_authorized(),
            Self::Bluetooth(scanner) => scanner.is_authorized(),
        }
    }

    fn is_scanning(&self) -> bool {
        match self {
            Self::Wifi(scanner) => scanner.is_scanning(),
            Self::Bluetooth(scanner) => scanner.is_scanning(),
        }
    }

    async fn start(&self) -> bool {
        match self {
            Self::Wifi(scanner) => scanner.start().await,
            Self::Bluetooth(scanner) => scanner.start().await,
        }
    }

    fn stop(&self) {
        match self {
            Self::Wifi(scanner) => scanner.stop(),
            Self::Bluetooth(scanner) => scanner.stop(),
        }
    }

    async fn drain(&self, timeout: Duration) -> Vec<RadioObservation> {
        match self {
            Self::Wifi(scanner) => scanner.drain(timeout).await,
            Self::Bluetooth(scanner) => scanner.drain(timeout).await,
        }
    }
}
