//! `envprint collect`

use anyhow::{Context, Result};
use clap::Args;
use envprint_core::RadioKind;
use envprint_core::constants::DEFAULT_SCAN_DURATION_MS;
use envprint_radio::mock::{MockBluetoothPlatform, MockLocationService, MockWifiPlatform};
use envprint_radio::{BluetoothScanner, CoordinatorConfig, ScanCoordinator, WifiScanner};
use envprint_session::{CollectOutcome, FingerprintSession};
use envprint_storage::{FingerprintStore, StoreConfig};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::host::HostAttributes;
use crate::scenario::Scenario;

/// Arguments for the collect command
#[derive(Args, Debug)]
pub struct CollectArgs {
    /// Directory holding the stored record
    #[arg(long, default_value = ".")]
    pub state_dir: PathBuf,

    /// How long to scan each radio, in milliseconds
    #[arg(long, default_value_t = DEFAULT_SCAN_DURATION_MS)]
    pub duration_ms: u64,

    /// JSON file scripting the radio environment
    #[arg(long)]
    pub scenario: Option<PathBuf>,
}

/// Build a session wired to mock radios driven by `scenario`.
pub fn build_session(scenario: &Scenario, state_dir: PathBuf) -> FingerprintSession {
    let (wifi, wifi_handle) = MockWifiPlatform::new();
    let (bluetooth, bluetooth_handle) = MockBluetoothPlatform::new();
    scenario.wifi.apply(&wifi_handle);
    scenario.bluetooth.apply(&bluetooth_handle);

    let coordinator = ScanCoordinator::new(
        WifiScanner::new(Arc::new(wifi)),
        BluetoothScanner::new(Arc::new(bluetooth)),
        CoordinatorConfig::default(),
    );

    FingerprintSession::new(
        coordinator,
        FingerprintStore::new(StoreConfig::new(state_dir)),
        Arc::new(MockLocationService::new(scenario.location_enabled)),
        Arc::new(HostAttributes::new(
            scenario.display.width_px,
            scenario.display.height_px,
        )),
    )
}

/// Execute the collect command
pub async fn execute(args: CollectArgs) -> Result<()> {
    let scenario = match &args.scenario {
        Some(path) => Scenario::load(path).await?,
        None => Scenario::default(),
    };

    let session = Arc::new(build_session(&scenario, args.state_dir));
    let interrupt = {
        let session = Arc::clone(&session);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                session.cancel();
            }
        })
    };

    let outcome = session
        .collect(Duration::from_millis(args.duration_ms))
        .await
        .with_context(|| format!("Failed to store {}", session.store().path().display()));
    interrupt.abort();

    match outcome? {
        CollectOutcome::Report(report) => {
            println!("{}", report);
            info!(
                known_wifi = report.record.hashes(RadioKind::Wifi).len(),
                known_bluetooth = report.record.hashes(RadioKind::Bluetooth).len(),
                "Stored record at {}",
                session.store().path().display()
            );
        }
        CollectOutcome::Unavailable(reason) => println!("{}", reason),
        CollectOutcome::Cancelled { .. } => println!("Collection cancelled; nothing stored."),
    }

    Ok(())
}
