//! Error types for radio operations.
//!
//! None of these cross the coordinator boundary: the coordinator degrades a
//! failing radio to an empty observation list and logs the cause.

use envprint_core::RadioKind;

/// Result type alias for radio operations.
pub type Result<T> = std::result::Result<T, RadioError>;

/// Errors that can occur while driving a radio backend.
#[derive(Debug, thiserror::Error)]
pub enum RadioError {
    /// The radio is administratively off.
    #[error("{radio} radio is disabled")]
    Disabled { radio: RadioKind },

    /// A permission required for discovery is missing.
    #[error("{radio} scan is not authorized")]
    Unauthorized { radio: RadioKind },

    /// The platform refused to start discovery.
    #[error("{radio} scan start refused: {message}")]
    StartRefused { radio: RadioKind, message: String },

    /// The platform reported a failure.
    #[error("Platform error: {message}")]
    Platform { message: String },

    /// The scan's event queue has been closed.
    #[error("{radio} event channel closed")]
    ChannelClosed { radio: RadioKind },

    /// An operation needed a running scan.
    #[error("{radio} is not scanning")]
    NotScanning { radio: RadioKind },
}

impl RadioError {
    /// Create a new disabled error.
    pub fn disabled(radio: RadioKind) -> Self {
        Self::Disabled { radio }
    }

    /// Create a new unauthorized error.
    pub fn unauthorized(radio: RadioKind) -> Self {
        Self::Unauthorized { radio }
    }

    /// Create a new start refused error.
    pub fn start_refused(radio: RadioKind, message: impl Into<String>) -> Self {
        Self::StartRefused {
            radio,
            message: message.into(),
        }
    }

    /// Create a new platform error.
    pub fn platform(message: impl Into<String>) -> Self {
        Self::Platform {
            message: message.into(),
        }
    }

    /// Create a new channel closed error.
    pub fn channel_closed(radio: RadioKind) -> Self {
        Self::ChannelClosed { radio }
    }

    /// Create a new not scanning error.
    pub fn not_scanning(radio: RadioKind) -> Self {
        Self::NotScanning { radio }
    }
}
