//! Radio scanner trait definition.
//!
//! [`RadioScanner`] is the capability contract both radios implement: query
//! enable state and authorization, start and stop discovery, and drain what
//! was accumulated. Methods take `&self` because platform callbacks write
//! into the scanner while a coordinator task drains it.
//!
//! The trait uses native `async fn` methods (Rust 1.90 + Edition 2024 RPITIT)
//! and is therefore not object-safe; use [`AnyRadioScanner`](crate::devices::AnyRadioScanner)
//! for dynamic dispatch.

#![allow(async_fn_in_trait)]

use envprint_core::constants::{DEFAULT_EVENT_BUFFER, SCAN_RESTART_GRACE_MS};
use envprint_core::{RadioKind, RadioObservation};
use std::time::Duration;

/// Radio discovery backend.
///
/// # Examples
///
/// ```no_run
/// use envprint_radio::traits::RadioScanner;
/// use std::time::Duration;
///
/// async fn scan_once<S: RadioScanner>(scanner: &S) -> usize {
///     if !scanner.start().await {
///         return 0;
///     }
///     let found = scanner.drain(Duration::from_secs(5)).await;
///     scanner.stop();
///     found.len()
/// }
/// ```
pub trait RadioScanner: Send + Sync {
    /// Which radio this scanner drives.
    fn kind(&self) -> RadioKind;

    /// Whether the radio is administratively on.
    ///
    /// Platform query failures are reported as disabled.
    fn is_enabled(&self) -> bool;

    /// Whether every permission needed for discovery is granted.
    ///
    /// Re-checked on every call; permissions may be revoked at any time.
    fn is_authorized(&self) -> bool;

    /// Whether a scan is currently accumulating results.
    fn is_scanning(&self) -> bool;

    /// Begin asynchronous discovery.
    ///
    /// Returns `false` without side effects if the radio is disabled, the
    /// caller is not authorized, or the platform refuses. A scan already in
    /// progress is stopped first and given a short grace period.
    async fn start(&self) -> bool;

    /// End discovery. A no-op when idle; never fails.
    fn stop(&self);

    /// Wait for `timeout` or until the scan is stopped, then return everything
    /// accumulated so far.
    ///
    /// Timing out is the normal way a drain ends.
    async fn drain(&self, timeout: Duration) -> Vec<RadioObservation>;
}

/// Tuning shared by both scanner implementations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannerConfig {
    /// Pause between stopping a running scan and restarting it.
    pub restart_grace: Duration,

    /// Capacity of the platform event queue.
    pub event_buffer: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            restart_grace: Duration::from_millis(SCAN_RESTART_GRACE_MS),
            event_buffer: DEFAULT_EVENT_BUFFER,
        }
    }
}

impl ScannerConfig {
    /// Set the restart grace period.
    pub fn restart_grace(mut self, grace: Duration) -> Self {
        self.restart_grace = grace;
        self
    }

    /// Set the event queue capacity (at least 1).
    pub fn event_buffer(mut self, capacity: usize) -> Self {
        self.event_buffer = capacity.max(1);
        self
    }
}
