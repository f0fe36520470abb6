//! Collect-and-persist orchestration.
//!
//! A session checks that every radio service is on, scans both radios for
//! the requested window, captures the static attributes, and folds the result
//! into the store. Sessions never overlap: starting one cancels whichever is
//! running and waits for it to tear down before scanning.

use envprint_core::ScanSnapshot;
use envprint_core::constants::DEFAULT_SCAN_DURATION_MS;
use envprint_radio::ScanCoordinator;
use envprint_radio::platform::LocationService;
use envprint_radio::traits::RadioScanner;
use envprint_storage::FingerprintStore;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::attributes::AttributeSource;
use crate::error::Result;
use crate::report::{FingerprintReport, Prerequisite, ServiceUnavailable};

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Scan window used by [`FingerprintSession::collect_default`].
    pub scan_duration: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            scan_duration: Duration::from_millis(DEFAULT_SCAN_DURATION_MS),
        }
    }
}

impl SessionConfig {
    /// Set the scan window.
    pub fn scan_duration(mut self, duration: Duration) -> Self {
        self.scan_duration = duration;
        self
    }
}

/// How a collection ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectOutcome {
    /// Scanned, merged and persisted.
    Report(FingerprintReport),

    /// A required service is off; nothing was scanned or stored.
    Unavailable(ServiceUnavailable),

    /// Cancelled before the window elapsed; nothing was stored.
    Cancelled {
        /// What the radios had gathered when the session was cancelled.
        partial: ScanSnapshot,
    },
}

#[derive(Debug)]
struct RunningSession {
    id: u64,
    token: CancellationToken,
}

/// Clears a session's entry from `running` when its collect ends or is
/// dropped, unless a newer session has already replaced it.
struct Registration<'a> {
    session: &'a FingerprintSession,
    id: u64,
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        let mut running = self.session.running();
        if running.as_ref().is_some_and(|session| session.id == self.id) {
            running.take();
        }
    }
}

/// Ties the coordinator, the store and the attribute source together.
pub struct FingerprintSession {
    coordinator: ScanCoordinator,
    store: FingerprintStore,
    location: Arc<dyn LocationService>,
    attributes: Arc<dyn AttributeSource>,
    config: SessionConfig,
    gate: tokio::sync::Mutex<()>,
    running: Mutex<Option<RunningSession>>,
    next_id: AtomicU64,
}

impl FingerprintSession {
    pub fn new(
        coordinator: ScanCoordinator,
        store: FingerprintStore,
        location: Arc<dyn LocationService>,
        attributes: Arc<dyn AttributeSource>,
    ) -> Self {
        Self {
            coordinator,
            store,
            location,
            attributes,
            config: SessionConfig::default(),
            gate: tokio::sync::Mutex::new(()),
            running: Mutex::new(None),
            next_id: AtomicU64::new(0),
        }
    }

    /// Replace the session configuration.
    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn coordinator(&self) -> &ScanCoordinator {
        &self.coordinator
    }

    pub fn store(&self) -> &FingerprintStore {
        &self.store
    }

    fn running(&self) -> MutexGuard<'_, Option<RunningSession>> {
        self.running.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Services that are currently off, in reporting order.
    pub fn missing_prerequisites(&self) -> Vec<Prerequisite> {
        Prerequisite::ALL
            .into_iter()
            .filter(|prerequisite| match prerequisite {
                Prerequisite::Wifi => !self.coordinator.wifi().is_enabled(),
                Prerequisite::Location => !self.location.is_location_enabled(),
                Prerequisite::Bluetooth => !self.coordinator.bluetooth().is_enabled(),
            })
            .collect()
    }

    /// Collect with the configured scan window.
    pub async fn collect_default(&self) -> Result<CollectOutcome> {
        self.collect(self.config.scan_duration).await
    }

    /// Run one collection session.
    ///
    /// Any session already running is cancelled and fully torn down first.
    ///
    /// # Errors
    ///
    /// Only a failed write of the merged record is an error. The error
    /// carries the merged record so the caller can retry.
    pub async fn collect(&self, duration: Duration) -> Result<CollectOutcome> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();

        let previous = self.running().replace(RunningSession {
            id,
            token: token.clone(),
        });
        if let Some(previous) = previous {
            debug!(session = previous.id, "Cancelling previous session");
            previous.token.cancel();
        }

        let _registered = Registration { session: self, id };
        let _gate = self.gate.lock().await;
        self.collect_exclusive(duration, &token).await
    }

    async fn collect_exclusive(
        &self,
        duration: Duration,
        token: &CancellationToken,
    ) -> Result<CollectOutcome> {
        if token.is_cancelled() {
            return Ok(CollectOutcome::Cancelled {
                partial: ScanSnapshot::default(),
            });
        }

        let missing = self.missing_prerequisites();
        if !missing.is_empty() {
            info!(?missing, "Required services disabled, not scanning");
            return Ok(CollectOutcome::Unavailable(ServiceUnavailable::new(
                missing,
            )));
        }

        let scan = self.coordinator.run_until_cancelled(duration, token).await;
        if scan.cancelled {
            let discarded = scan.snapshot.wifi.len() + scan.snapshot.bluetooth.len();
            info!("Session cancelled, not storing {} observations", discarded);
            return Ok(CollectOutcome::Cancelled {
                partial: scan.snapshot,
            });
        }

        let attributes = self.attributes.capture();
        let record = match self.store.merge_and_persist(&attributes, &scan.snapshot).await {
            Ok(record) => record,
            Err(e) => {
                warn!("Session results could not be stored: {}", e);
                return Err(e.into());
            }
        };

        Ok(CollectOutcome::Report(FingerprintReport::new(
            attributes,
            scan.snapshot,
            record,
        )))
    }

    /// Cancel the running session, if any.
    ///
    /// Its scans stop promptly and nothing it gathered is stored. Returns
    /// whether a session was running.
    pub fn cancel(&self) -> bool {
        match self.running().take() {
            Some(session) => {
                info!(session = session.id, "Cancelling session");
                session.token.cancel();
                true
            }
            None => false,
        }
    }
}
