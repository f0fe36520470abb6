//! Static attributes of the machine running the CLI.

use envprint_core::DeviceStaticAttributes;
use envprint_session::AttributeSource;
use sysinfo::System;

const UNKNOWN: &str = "N/A";

/// Reads static attributes from the host operating system.
///
/// Hosts have no single display, so the screen size comes from the scenario.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostAttributes {
    screen_width_px: u32,
    screen_height_px: u32,
}

impl HostAttributes {
    pub fn new(screen_width_px: u32, screen_height_px: u32) -> Self {
        Self {
            screen_width_px,
            screen_height_px,
        }
    }
}

impl AttributeSource for HostAttributes {
    fn capture(&self) -> DeviceStaticAttributes {
        let os_version = System::os_version().unwrap_or_else(|| UNKNOWN.to_string());
        let kernel_version = System::kernel_version().unwrap_or_else(|| UNKNOWN.to_string());

        DeviceStaticAttributes {
            uptime_millis: System::uptime().saturating_mul(1000),
            screen_width_px: self.screen_width_px,
            screen_height_px: self.screen_height_px,
            timezone_id: chrono::Local::now().offset().to_string(),
            device_model: System::host_name().unwrap_or_else(|| UNKNOWN.to_string()),
            manufacturer: System::name().unwrap_or_else(|| UNKNOWN.to_string()),
            build_fingerprint: format!(
                "{}/{}/{}:{}",
                System::distribution_id(),
                std::env::consts::OS,
                std::env::consts::ARCH,
                os_version
            ),
            os_version,
            kernel_version,
        }
    }
}
