//! Persistent, hash-based fingerprint store for envprint.
//!
//! Every session's observations are reduced to SHA-256 digests before they
//! touch disk and folded into a single JSON document:
//!
//! - one digest per static device attribute, replaced by the latest session
//! - a sorted set of Wi-Fi identity digests that only ever grows
//! - a sorted set of Bluetooth identity digests that only ever grows
//!
//! # Architecture
//!
//! - [`FingerprintRecord`] - the document model with lenient parsing
//! - [`FingerprintStore`] - load, merge, write-back and export of the state file
//!
//! # Examples
//!
//! ```no_run
//! use envprint_core::{DeviceStaticAttributes, RadioKind, RadioObservation, ScanSnapshot};
//! use envprint_storage::{FingerprintStore, StoreConfig};
//!
//! # async fn example(attrs: DeviceStaticAttributes) -> envprint_storage::StoreResult<()> {
//! let store = FingerprintStore::new(StoreConfig::new("state"));
//! let snapshot = ScanSnapshot::new(vec![RadioObservation::new("AA:BB", "Home", -40)], vec![]);
//!
//! let record = store.merge_and_persist(&attrs, &snapshot).await?;
//! assert_eq!(record.hashes(RadioKind::Wifi).len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! # Failure Handling
//!
//! A missing or corrupt state file is treated as an empty record and never
//! reported. A failed write returns [`StoreError::WriteFailed`] holding the
//! merged record, so nothing computed in memory is lost.

pub mod error;
pub mod record;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use record::{FingerprintRecord, MergeSummary};
pub use store::{FingerprintStore, StoreConfig};
