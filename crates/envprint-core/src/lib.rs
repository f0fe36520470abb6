//! Shared data model for the envprint environmental fingerprint collector.
//!
//! Everything the radio, storage and session crates exchange lives here:
//! observations, scan snapshots, static device attributes, the one-way
//! [`digest`] used before anything reaches disk, and the default constants.

pub mod constants;
pub mod digest;
pub mod error;
pub mod types;

pub use digest::digest;
pub use error::{Error, Result};
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
