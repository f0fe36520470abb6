//! Per-scan result accumulation.
//!
//! A [`ScanAccumulator`] is written by the platform event pump and read by
//! `drain`, so all state sits behind one mutex. Observations are keyed by
//! identity: a repeat sighting overwrites the display name and signal
//! strength in place and keeps the entry's original position.
//!
//! # States
//!
//! - `Idle`: no scan running; merges are ignored.
//! - `Scanning`: platform callbacks are merged.
//!
//! # Valid Transitions
//!
//! - Idle → Scanning (`begin`, clears previous results)
//! - Scanning → Idle (`finish` or `fail`, keeps results)

use envprint_core::{Error, RadioObservation, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Accumulation state of one radio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanState {
    /// No scan in progress.
    Idle,

    /// Discovery running; results are being merged.
    Scanning,
}

impl ScanState {
    /// Check whether moving to `target` is allowed.
    pub fn can_transition_to(&self, target: &ScanState) -> bool {
        matches!(
            (self, target),
            (ScanState::Idle, ScanState::Scanning) | (ScanState::Scanning, ScanState::Idle)
        )
    }
}

impl fmt::Display for ScanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Scanning => write!(f, "scanning"),
        }
    }
}

#[derive(Debug)]
struct Inner {
    state: ScanState,
    entries: Vec<RadioObservation>,
    index: HashMap<String, usize>,
    last_failure: Option<String>,
}

/// Identity-keyed, concurrency-safe store of one scan's observations.
#[derive(Debug)]
pub struct ScanAccumulator {
    inner: Mutex<Inner>,
}

impl ScanAccumulator {
    /// Create an idle accumulator.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: ScanState::Idle,
                entries: Vec::new(),
                index: HashMap::new(),
                last_failure: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current state.
    pub fn state(&self) -> ScanState {
        self.lock().state
    }

    /// Enter `Scanning`, discarding the previous scan's results.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidStateTransition` if a scan is already running.
    pub fn begin(&self) -> Result<()> {
        let mut inner = self.lock();
        if !inner.state.can_transition_to(&ScanState::Scanning) {
            return Err(Error::invalid_transition(inner.state, ScanState::Scanning));
        }

        inner.state = ScanState::Scanning;
        inner.entries.clear();
        inner.index.clear();
        inner.last_failure = None;
        Ok(())
    }

    /// Return to `Idle`, keeping everything accumulated.
    pub fn finish(&self) {
        self.lock().state = ScanState::Idle;
    }

    /// Record a platform scan failure and stop accumulating.
    ///
    /// Results gathered before the failure are kept.
    pub fn fail(&self, reason: impl Into<String>) {
        let mut inner = self.lock();
        inner.state = ScanState::Idle;
        inner.last_failure = Some(reason.into());
    }

    /// Reason given by the last failure callback of the current scan.
    pub fn last_failure(&self) -> Option<String> {
        self.lock().last_failure.clone()
    }

    /// Merge one observation.
    ///
    /// Returns `false` if no scan is running and the observation was ignored.
    pub fn merge(&self, observation: RadioObservation) -> bool {
        let mut inner = self.lock();
        if inner.state != ScanState::Scanning {
            return false;
        }
        Self::upsert(&mut inner, observation);
        true
    }

    /// Merge a batch under a single lock.
    ///
    /// Returns the number of observations merged.
    pub fn merge_batch(&self, observations: impl IntoIterator<Item = RadioObservation>) -> usize {
        let mut inner = self.lock();
        if inner.state != ScanState::Scanning {
            return 0;
        }

        let mut merged = 0;
        for observation in observations {
            Self::upsert(&mut inner, observation);
            merged += 1;
        }
        merged
    }

    fn upsert(inner: &mut Inner, observation: RadioObservation) {
        match inner.index.get(&observation.identity) {
            Some(&position) => {
                let entry = &mut inner.entries[position];
                entry.display_name = observation.display_name;
                entry.signal_strength = observation.signal_strength;
            }
            None => {
                inner
                    .index
                    .insert(observation.identity.clone(), inner.entries.len());
                inner.entries.push(observation);
            }
        }
    }

    /// Copy of everything accumulated so far, in first-seen order.
    pub fn snapshot(&self) -> Vec<RadioObservation> {
        self.lock().entries.clone()
    }

    /// Number of distinct identities accumulated.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// True when nothing has been accumulated.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ScanAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
