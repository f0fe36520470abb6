//! Mock location service.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::platform::LocationService;

/// Location service whose state can be flipped from tests.
///
/// Clones share the same switch.
#[derive(Debug, Clone)]
pub struct MockLocationService {
    enabled: Arc<AtomicBool>,
}

impl MockLocationService {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(enabled)),
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }
}

impl Default for MockLocationService {
    fn default() -> Self {
        Self::new(true)
    }
}

impl LocationService for MockLocationService {
    fn is_location_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let location = MockLocationService::default();
        let clone = location.clone();
        assert!(location.is_location_enabled());

        clone.set_enabled(false);
        assert!(!location.is_location_enabled());
    }
}
