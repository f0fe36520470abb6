//! Human-readable session output.

use envprint_core::{DeviceStaticAttributes, RadioKind, RadioObservation, ScanSnapshot};
use envprint_storage::FingerprintRecord;
use std::fmt;

/// A service that must be on before a session can scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prerequisite {
    Wifi,
    Location,
    Bluetooth,
}

impl Prerequisite {
    /// Every prerequisite, in reporting order.
    pub const ALL: [Prerequisite; 3] = [
        Prerequisite::Wifi,
        Prerequisite::Location,
        Prerequisite::Bluetooth,
    ];
}

impl fmt::Display for Prerequisite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wifi => write!(f, "Wi-Fi"),
            Self::Location => write!(f, "Location"),
            Self::Bluetooth => write!(f, "Bluetooth"),
        }
    }
}

/// Why a session refused to scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceUnavailable {
    missing: Vec<Prerequisite>,
}

impl ServiceUnavailable {
    pub fn new(missing: Vec<Prerequisite>) -> Self {
        Self { missing }
    }

    /// Disabled services, in reporting order.
    pub fn missing(&self) -> &[Prerequisite] {
        &self.missing
    }
}

impl fmt::Display for ServiceUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for prerequisite in &self.missing {
            writeln!(f, "- {} is disabled.", prerequisite)?;
        }
        write!(f, "\nPlease enable the required services to proceed.")
    }
}

/// Everything a completed session observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FingerprintReport {
    /// Static attributes captured after the scans.
    pub attributes: DeviceStaticAttributes,

    /// Raw observations of this session.
    pub snapshot: ScanSnapshot,

    /// Stored record after merging this session.
    pub record: FingerprintRecord,
}

impl FingerprintReport {
    pub fn new(
        attributes: DeviceStaticAttributes,
        snapshot: ScanSnapshot,
        record: FingerprintRecord,
    ) -> Self {
        Self {
            attributes,
            snapshot,
            record,
        }
    }

    fn write_radio(
        f: &mut fmt::Formatter<'_>,
        observations: &[RadioObservation],
        empty: &str,
    ) -> fmt::Result {
        if observations.is_empty() {
            return writeln!(f, "{}", empty);
        }
        for observation in observations {
            writeln!(
                f,
                "• {} - {} (RSSI: {})",
                observation.display_name, observation.identity, observation.signal_strength
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for FingerprintReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let attrs = &self.attributes;
        writeln!(f, "Elapsed realtime: {} ms", attrs.uptime_millis)?;
        writeln!(
            f,
            "Display metrics: {} x {} px",
            attrs.screen_width_px, attrs.screen_height_px
        )?;
        writeln!(f, "Current timezone: {}", attrs.timezone_id)?;
        writeln!(f, "Device model: {}", attrs.device_model)?;
        writeln!(f, "Manufacturer: {}", attrs.manufacturer)?;
        writeln!(f, "OS version: {}", attrs.os_version)?;
        writeln!(f, "Build fingerprint: {}", attrs.build_fingerprint)?;
        writeln!(f, "Kernel version: {}", attrs.kernel_version)?;

        writeln!(f)?;
        writeln!(f, "Detected WiFi networks (SSID - BSSID (RSSI)):")?;
        Self::write_radio(
            f,
            &self.snapshot.by_signal_strength(RadioKind::Wifi),
            "No WiFi devices found or scan failed.",
        )?;

        writeln!(f)?;
        writeln!(f, "Detected Bluetooth devices (Name - Address (RSSI)):")?;
        Self::write_radio(
            f,
            &self.snapshot.by_signal_strength(RadioKind::Bluetooth),
            "No Bluetooth devices found or scan failed.",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs() -> DeviceStaticAttributes {
        DeviceStaticAttributes {
            uptime_millis: 987_654,
            screen_width_px: 1080,
            screen_height_px: 2400,
            timezone_id: "Europe/Lisbon".to_string(),
            device_model: "Pixel 8".to_string(),
            manufacturer: "Google".to_string(),
            os_version: "15".to_string(),
            build_fingerprint: "google/shiba/shiba:15".to_string(),
            kernel_version: "6.1.75".to_string(),
        }
    }

    #[test]
    fn test_report_sorted_by_signal() {
        let snapshot = ScanSnapshot::new(
            vec![
                RadioObservation::new("AA:BB", "Weak", -85),
                RadioObservation::new("CC:DD", "Strong", -30),
            ],
            vec![RadioObservation::new("11:22", "Headset", -60)],
        );
        let report = FingerprintReport::new(attrs(), snapshot, FingerprintRecord::new());
        let text = report.to_string();

        let strong = text.find("• Strong - CC:DD (RSSI: -30)").unwrap();
        let weak = text.find("• Weak - AA:BB (RSSI: -85)").unwrap();
        assert!(strong < weak);
        assert!(text.contains("• Headset - 11:22 (RSSI: -60)"));
        assert!(text.contains("Display metrics: 1080 x 2400 px"));
        assert!(text.contains("Elapsed realtime: 987654 ms"));
    }

    #[test]
    fn test_report_empty_radios() {
        let report =
            FingerprintReport::new(attrs(), ScanSnapshot::default(), FingerprintRecord::new());
        let text = report.to_string();

        assert!(text.contains("No WiFi devices found or scan failed."));
        assert!(text.contains("No Bluetooth devices found or scan failed."));
    }

    #[test]
    fn test_unavailable_message() {
        let unavailable =
            ServiceUnavailable::new(vec![Prerequisite::Wifi, Prerequisite::Bluetooth]);

        assert_eq!(
            unavailable.to_string(),
            "- Wi-Fi is disabled.\n- Bluetooth is disabled.\n\nPlease enable the required services to proceed."
        );
    }
}
