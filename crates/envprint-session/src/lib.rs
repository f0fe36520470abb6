//! Collect-and-persist sessions for the envprint fingerprint collector.
//!
//! A [`FingerprintSession`] is the single entry point a host calls:
//!
//! 1. Check that Wi-Fi, location and Bluetooth are on; if not, report which
//!    services are off without scanning ([`ServiceUnavailable`]).
//! 2. Scan both radios concurrently for the requested window.
//! 3. Capture static device attributes.
//! 4. Merge everything into the fingerprint store as digests.
//! 5. Return a [`FingerprintReport`] listing what was seen this time.
//!
//! # Examples
//!
//! ```no_run
//! use envprint_radio::bluetooth::BluetoothScanner;
//! use envprint_radio::mock::{MockBluetoothPlatform, MockLocationService, MockWifiPlatform};
//! use envprint_radio::wifi::WifiScanner;
//! use envprint_radio::{CoordinatorConfig, ScanCoordinator};
//! use envprint_session::{AttributeSource, CollectOutcome, FingerprintSession};
//! use envprint_storage::{FingerprintStore, StoreConfig};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn example(attributes: Arc<dyn AttributeSource>) -> envprint_session::Result<()> {
//! let (wifi, _wifi) = MockWifiPlatform::new();
//! let (bluetooth, _bluetooth) = MockBluetoothPlatform::new();
//!
//! let session = FingerprintSession::new(
//!     ScanCoordinator::new(
//!         WifiScanner::new(Arc::new(wifi)),
//!         BluetoothScanner::new(Arc::new(bluetooth)),
//!         CoordinatorConfig::default(),
//!     ),
//!     FingerprintStore::new(StoreConfig::new("state")),
//!     Arc::new(MockLocationService::new(true)),
//!     attributes,
//! );
//!
//! match session.collect(Duration::from_secs(5)).await? {
//!     CollectOutcome::Report(report) => println!("{}", report),
//!     CollectOutcome::Unavailable(reason) => println!("{}", reason),
//!     CollectOutcome::Cancelled { .. } => {}
//! }
//! # Ok(())
//! # }
//! ```

pub mod attributes;
pub mod error;
pub mod report;
pub mod session;

pub use attributes::{AttributeSource, FixedAttributes};
pub use error::{Result, SessionError};
pub use report::{FingerprintReport, Prerequisite, ServiceUnavailable};
pub use session::{CollectOutcome, FingerprintSession, SessionConfig};
