use envprint_storage::StoreError;
use thiserror::Error;

/// Errors surfaced by a collection session.
///
/// Radio problems never show up here; an unavailable radio contributes an
/// empty list. Only persistence can fail a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The merged record could not be written
    #[error("Persistence failed: {0}")]
    Persist(#[from] StoreError),
}

/// Specialized result type for session operations
pub type Result<T> = std::result::Result<T, SessionError>;
