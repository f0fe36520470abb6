//! Scan lifecycle shared by both scanners.
//!
//! A [`ScanDriver`] owns one radio's accumulator and the scan it currently
//! has running. The radio-specific parts (how to start and stop the platform
//! scan, how to turn an event into observations) come in through
//! [`ScanControl`].

use envprint_core::{RadioKind, RadioObservation};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::accumulator::{ScanAccumulator, ScanState};
use crate::error::Result;
use crate::platform::EventSink;
use crate::traits::ScannerConfig;

/// Platform side of one radio as seen by the [`ScanDriver`].
pub(crate) trait ScanControl: Send + Sync + 'static {
    type Event: Send + 'static;

    /// Register the event sink and trigger discovery.
    fn launch(&self, events: EventSink<Self::Event>) -> Result<()>;

    /// Unregister and stop discovery.
    fn halt(&self) -> Result<()>;

    /// Apply one platform event. Runs on the event pump.
    fn handle(&self, accumulator: &ScanAccumulator, event: Self::Event);
}

/// A running scan: its stop signal and the task pumping platform events.
#[derive(Debug)]
struct ActiveScan {
    token: CancellationToken,
    pump: JoinHandle<()>,
}

impl ActiveScan {
    /// Signal the pump and any pending drain to finish.
    fn cancel(self) {
        self.token.cancel();
        // The pump exits on the token; detach rather than wait.
        drop(self.pump);
    }
}

/// Start, stop and drain for one radio.
#[derive(Debug)]
pub(crate) struct ScanDriver {
    kind: RadioKind,
    accumulator: Arc<ScanAccumulator>,
    active: Mutex<Option<ActiveScan>>,
    config: ScannerConfig,
}

impl ScanDriver {
    pub(crate) fn new(kind: RadioKind, config: ScannerConfig) -> Self {
        Self {
            kind,
            accumulator: Arc::new(ScanAccumulator::new()),
            active: Mutex::new(None),
            config,
        }
    }

    fn active(&self) -> MutexGuard<'_, Option<ActiveScan>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn state(&self) -> ScanState {
        self.accumulator.state()
    }

    pub(crate) fn accumulated(&self) -> usize {
        self.accumulator.len()
    }

    pub(crate) fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Begin a scan, restarting one that is already running.
    ///
    /// The caller has already checked enable state and authorization.
    pub(crate) async fn start<C>(&self, control: &Arc<C>) -> bool
    where
        C: ScanControl + ?Sized,
    {
        if self.active().is_some() {
            debug!("{} scan already running, restarting", self.kind);
            self.stop(control.as_ref());
            tokio::time::sleep(self.config.restart_grace).await;
        }

        if let Err(e) = self.accumulator.begin() {
            warn!("{} accumulator not ready: {}", self.kind, e);
            return false;
        }

        let (tx, rx) = mpsc::channel(self.config.event_buffer);
        if let Err(e) = control.launch(EventSink::new(self.kind, tx)) {
            warn!("{} scan did not start: {}", self.kind, e);
            self.accumulator.finish();
            return false;
        }

        let token = CancellationToken::new();
        let pump = tokio::spawn(Self::pump(
            Arc::clone(control),
            Arc::clone(&self.accumulator),
            rx,
            token.clone(),
            self.kind,
        ));
        if let Some(previous) = self.active().replace(ActiveScan { token, pump }) {
            previous.cancel();
        }

        info!("{} scan started", self.kind);
        true
    }

    /// End the running scan. A no-op for the platform when idle.
    pub(crate) fn stop<C>(&self, control: &C)
    where
        C: ScanControl + ?Sized,
    {
        let Some(scan) = self.active().take() else {
            self.accumulator.finish();
            return;
        };

        scan.cancel();
        if let Err(e) = control.halt() {
            warn!("{} scan stop failed: {}", self.kind, e);
        }
        self.accumulator.finish();
        debug!("{} scan stopped with {} results", self.kind, self.accumulator.len());
    }

    /// Wait for `timeout` or a stop, then snapshot the results.
    pub(crate) async fn drain(&self, timeout: Duration) -> Vec<RadioObservation> {
        let token = self.active().as_ref().map(|scan| scan.token.clone());
        if let Some(token) = token {
            tokio::select! {
                _ = tokio::time::sleep(timeout) => {
                    trace!("{} drain reached its timeout", self.kind);
                }
                _ = token.cancelled() => {
                    debug!("{} drain interrupted by stop", self.kind);
                }
            }
        }
        self.accumulator.snapshot()
    }

    async fn pump<C>(
        control: Arc<C>,
        accumulator: Arc<ScanAccumulator>,
        mut events: mpsc::Receiver<C::Event>,
        token: CancellationToken,
        kind: RadioKind,
    ) where
        C: ScanControl + ?Sized,
    {
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                event = events.recv() => match event {
                    Some(event) => control.handle(&accumulator, event),
                    None => break,
                },
            }
        }
        trace!("{} event pump finished", kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RadioError;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counting {
        refuse: AtomicBool,
        launches: AtomicUsize,
        halts: AtomicUsize,
        sink: Mutex<Option<EventSink<&'static str>>>,
    }

    impl ScanControl for Counting {
        type Event = &'static str;

        fn launch(&self, events: EventSink<&'static str>) -> Result<()> {
            if self.refuse.load(Ordering::SeqCst) {
                return Err(RadioError::start_refused(RadioKind::Wifi, "busy"));
            }
            self.launches.fetch_add(1, Ordering::SeqCst);
            *self.sink.lock().unwrap() = Some(events);
            Ok(())
        }

        fn halt(&self) -> Result<()> {
            self.halts.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn handle(&self, accumulator: &ScanAccumulator, event: &'static str) {
            accumulator.merge(RadioObservation::new(event, event, -1));
        }
    }

    fn driver() -> ScanDriver {
        ScanDriver::new(
            RadioKind::Wifi,
            ScannerConfig::default().restart_grace(Duration::from_millis(20)),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_reach_accumulator() {
        let driver = driver();
        let control = Arc::new(Counting::default());

        assert!(driver.start(&control).await);
        let sink = control.sink.lock().unwrap().clone().unwrap();
        assert!(sink.deliver("AA"));
        assert!(sink.deliver("AA"));

        let results = driver.drain(Duration::from_millis(50)).await;
        driver.stop(control.as_ref());

        assert_eq!(results, vec![RadioObservation::new("AA", "AA", -1)]);
        assert_eq!(driver.state(), ScanState::Idle);
        assert_eq!(control.halts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refused_launch_leaves_driver_idle() {
        let driver = driver();
        let control = Arc::new(Counting::default());
        control.refuse.store(true, Ordering::SeqCst);

        assert!(!driver.start(&control).await);
        assert_eq!(driver.state(), ScanState::Idle);

        driver.stop(control.as_ref());
        assert_eq!(control.halts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_waits_for_grace() {
        let driver = driver();
        let control = Arc::new(Counting::default());
        assert!(driver.start(&control).await);

        let restarted = tokio::time::Instant::now();
        assert!(driver.start(&control).await);

        assert!(restarted.elapsed() >= Duration::from_millis(20));
        assert_eq!(control.launches.load(Ordering::SeqCst), 2);
        assert_eq!(control.halts.load(Ordering::SeqCst), 1);
        assert_eq!(driver.state(), ScanState::Scanning);
    }
}
