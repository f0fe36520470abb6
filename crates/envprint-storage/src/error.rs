use std::path::PathBuf;
use thiserror::Error;

use crate::record::FingerprintRecord;

/// Errors raised by the fingerprint store.
///
/// Loading never fails: a missing or corrupt state file reads as an empty
/// record. Only writes and exports surface errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Writing the state file failed.
    ///
    /// Carries the merged record so the caller can retry the write.
    #[error("Failed to write {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        record: Box<FingerprintRecord>,
    },

    /// The record could not be encoded
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// There is no state file to export yet
    #[error("Nothing to export: {} does not exist", path.display())]
    NothingToExport { path: PathBuf },

    /// Export or directory I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn write_failed(
        path: impl Into<PathBuf>,
        source: std::io::Error,
        record: FingerprintRecord,
    ) -> Self {
        Self::WriteFailed {
            path: path.into(),
            source,
            record: Box::new(record),
        }
    }

    /// The merged record a failed write was carrying, if any.
    pub fn into_record(self) -> Option<FingerprintRecord> {
        match self {
            Self::WriteFailed { record, .. } => Some(*record),
            _ => None,
        }
    }
}

/// Specialized result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
