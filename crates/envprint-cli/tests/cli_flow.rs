//! Integration tests for the collect and export commands
//!
//! Drives a scripted scenario through a full session and exports the
//! resulting state file.

use envprint_cli::collect::build_session;
use envprint_cli::export::{self, ExportArgs};
use envprint_cli::scenario::Scenario;
use envprint_core::{RadioKind, digest};
use envprint_session::CollectOutcome;
use std::time::Duration;
use tempfile::TempDir;

const OFFICE: &str = r#"{
    "wifi": {
        "events": [
            { "delay_ms": 200, "event": { "results_available": [
                { "ssid": "Office", "bssid": "AA:BB:CC:00:11:22", "level": -48 },
                { "ssid": "", "bssid": "AA:BB:CC:00:11:33", "level": -71 }
            ] } }
        ]
    },
    "bluetooth": {
        "events": [
            { "delay_ms": 100, "event": { "result": { "address": "11:22:33:44:55:66", "name": "Headset", "rssi": -61 } } }
        ]
    },
    "display": { "width_px": 2560, "height_px": 1440 }
}"#;

#[tokio::test(start_paused = true)]
async fn test_scenario_collect_then_export() {
    let dir = TempDir::new().unwrap();
    let scenario = Scenario::parse(OFFICE).unwrap();
    let session = build_session(&scenario, dir.path().join("state"));

    let outcome = session.collect(Duration::from_secs(1)).await.unwrap();
    let CollectOutcome::Report(report) = outcome else {
        panic!("expected a report, got {:?}", outcome);
    };

    assert_eq!(report.attributes.screen_width_px, 2560);
    assert_eq!(report.record.hashes(RadioKind::Wifi).len(), 2);
    assert!(
        report
            .record
            .hashes(RadioKind::Bluetooth)
            .contains(&digest("11:22:33:44:55:66"))
    );

    let text = report.to_string();
    assert!(text.contains("• Office - AA:BB:CC:00:11:22 (RSSI: -48)"));
    assert!(text.contains("• Hidden SSID - AA:BB:CC:00:11:33 (RSSI: -71)"));

    let out = dir.path().join("export.json");
    export::execute(ExportArgs {
        state_dir: dir.path().join("state"),
        out: out.clone(),
    })
    .await
    .unwrap();

    assert_eq!(
        std::fs::read(&out).unwrap(),
        std::fs::read(session.store().path()).unwrap()
    );
}

#[tokio::test(start_paused = true)]
async fn test_disabled_location_reports_unavailable() {
    let dir = TempDir::new().unwrap();
    let scenario = Scenario::parse(r#"{"location_enabled": false}"#).unwrap();
    let session = build_session(&scenario, dir.path().to_path_buf());

    let outcome = session.collect(Duration::from_secs(1)).await.unwrap();

    let CollectOutcome::Unavailable(reason) = outcome else {
        panic!("expected unavailable, got {:?}", outcome);
    };
    assert!(reason.to_string().starts_with("- Location is disabled."));
}

#[tokio::test]
async fn test_export_before_collect_fails() {
    let dir = TempDir::new().unwrap();
    let result = export::execute(ExportArgs {
        state_dir: dir.path().to_path_buf(),
        out: dir.path().join("export.json"),
    })
    .await;

    assert!(result.is_err());
}
