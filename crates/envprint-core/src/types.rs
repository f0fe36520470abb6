use serde::{Deserialize, Serialize};
use std::fmt;

/// Radio interface an observation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadioKind {
    /// Local-network access point discovery.
    Wifi,

    /// Short-range device discovery.
    Bluetooth,
}

impl RadioKind {
    /// Both radios, in report order.
    pub const ALL: [RadioKind; 2] = [RadioKind::Wifi, RadioKind::Bluetooth];
}

impl fmt::Display for RadioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wifi => write!(f, "Wi-Fi"),
            Self::Bluetooth => write!(f, "Bluetooth"),
        }
    }
}

/// One discovered network or device.
///
/// `identity` is the deduplication key within a scan (a hardware address for
/// both radios). Later sightings of the same identity replace the display
/// name and signal strength.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadioObservation {
    /// Hardware-address-equivalent key.
    pub identity: String,

    /// Human-readable name, or a policy sentinel when unavailable.
    pub display_name: String,

    /// Received signal strength in dBm.
    pub signal_strength: i32,
}

impl RadioObservation {
    /// Create a new observation.
    pub fn new(
        identity: impl Into<String>,
        display_name: impl Into<String>,
        signal_strength: i32,
    ) -> Self {
        Self {
            identity: identity.into(),
            display_name: display_name.into(),
            signal_strength,
        }
    }

    /// Whether the identity carries any non-whitespace content.
    pub fn has_identity(&self) -> bool {
        !self.identity.trim().is_empty()
    }
}

/// Observations gathered by both radios during one bounded session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSnapshot {
    /// Wi-Fi access points, in discovery order.
    pub wifi: Vec<RadioObservation>,

    /// Bluetooth devices, in discovery order.
    pub bluetooth: Vec<RadioObservation>,
}

impl ScanSnapshot {
    /// Create a snapshot from the two per-radio lists.
    pub fn new(wifi: Vec<RadioObservation>, bluetooth: Vec<RadioObservation>) -> Self {
        Self { wifi, bluetooth }
    }

    /// Observations for one radio.
    pub fn observations(&self, kind: RadioKind) -> &[RadioObservation] {
        match kind {
            RadioKind::Wifi => &self.wifi,
            RadioKind::Bluetooth => &self.bluetooth,
        }
    }

    /// Observations for one radio ordered strongest signal first.
    pub fn by_signal_strength(&self, kind: RadioKind) -> Vec<RadioObservation> {
        let mut sorted = self.observations(kind).to_vec();
        sorted.sort_by(|a, b| b.signal_strength.cmp(&a.signal_strength));
        sorted
    }

    /// True when neither radio observed anything.
    pub fn is_empty(&self) -> bool {
        self.wifi.is_empty() && self.bluetooth.is_empty()
    }
}

/// Named static attribute of the device, as persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StaticField {
    Uptime,
    ScreenWidth,
    ScreenHeight,
    Timezone,
    DeviceModel,
    Manufacturer,
    OsVersion,
    BuildFingerprint,
    KernelVersion,
}

impl StaticField {
    /// Every field, in document order.
    pub const ALL: [StaticField; 9] = [
        StaticField::Uptime,
        StaticField::ScreenWidth,
        StaticField::ScreenHeight,
        StaticField::Timezone,
        StaticField::DeviceModel,
        StaticField::Manufacturer,
        StaticField::OsVersion,
        StaticField::BuildFingerprint,
        StaticField::KernelVersion,
    ];

    /// Top-level key of this field in the persisted document.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Uptime => "boot_time",
            Self::ScreenWidth => "screen_width",
            Self::ScreenHeight => "screen_height",
            Self::Timezone => "timezone",
            Self::DeviceModel => "device_model",
            Self::Manufacturer => "manufacturer",
            Self::OsVersion => "android_version",
            Self::BuildFingerprint => "build_fingerprint",
            Self::KernelVersion => "kernel_version",
        }
    }

    /// Field stored under `key`, if any.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

impl fmt::Display for StaticField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Static attributes captured once per session.
///
/// Never persisted in raw form; the store keeps one digest per field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceStaticAttributes {
    /// Milliseconds since boot.
    pub uptime_millis: u64,

    /// Display width in pixels.
    pub screen_width_px: u32,

    /// Display height in pixels.
    pub screen_height_px: u32,

    /// IANA zone identifier or UTC offset.
    pub timezone_id: String,

    pub device_model: String,

    pub manufacturer: String,

    pub os_version: String,

    pub build_fingerprint: String,

    pub kernel_version: String,
}

impl DeviceStaticAttributes {
    /// Value of a single field in the form that gets hashed.
    pub fn value(&self, field: StaticField) -> String {
        match field {
            StaticField::Uptime => self.uptime_millis.to_string(),
            StaticField::ScreenWidth => self.screen_width_px.to_string(),
            StaticField::ScreenHeight => self.screen_height_px.to_string(),
            StaticField::Timezone => self.timezone_id.clone(),
            StaticField::DeviceModel => self.device_model.clone(),
            StaticField::Manufacturer => self.manufacturer.clone(),
            StaticField::OsVersion => self.os_version.clone(),
            StaticField::BuildFingerprint => self.build_fingerprint.clone(),
            StaticField::KernelVersion => self.kernel_version.clone(),
        }
    }

    /// All fields paired with their hashable values, in document order.
    pub fn fields(&self) -> impl Iterator<Item = (StaticField, String)> + '_ {
        StaticField::ALL
            .into_iter()
            .map(move |field| (field, self.value(field)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs() -> DeviceStaticAttributes {
        DeviceStaticAttributes {
            uptime_millis: 123_456,
            screen_width_px: 1080,
            screen_height_px: 2400,
            timezone_id: "Europe/Madrid".to_string(),
            device_model: "Pixel 7".to_string(),
            manufacturer: "Google".to_string(),
            os_version: "14".to_string(),
            build_fingerprint: "google/panther/panther:14".to_string(),
            kernel_version: "5.10.157".to_string(),
        }
    }

    #[test]
    fn test_snapshot_sorted_by_signal() {
        let snapshot = ScanSnapshot::new(
            vec![
                RadioObservation::new("AA", "weak", -90),
                RadioObservation::new("BB", "strong", -30),
                RadioObservation::new("CC", "mid", -60),
            ],
            vec![],
        );

        let sorted = snapshot.by_signal_strength(RadioKind::Wifi);
        let names: Vec<_> = sorted.iter().map(|o| o.display_name.as_str()).collect();
        assert_eq!(names, vec!["strong", "mid", "weak"]);
        assert!(snapshot.by_signal_strength(RadioKind::Bluetooth).is_empty());
    }

    #[test]
    fn test_snapshot_is_empty() {
        assert!(ScanSnapshot::default().is_empty());
        let snapshot = ScanSnapshot::new(vec![], vec![RadioObservation::new("11", "x", -1)]);
        assert!(!snapshot.is_empty());
    }

    #[test]
    fn test_observation_has_identity() {
        assert!(RadioObservation::new("AA:BB", "", 0).has_identity());
        assert!(!RadioObservation::new("", "name", 0).has_identity());
        assert!(!RadioObservation::new("   ", "name", 0).has_identity());
    }

    #[test]
    fn test_static_fields_cover_every_attribute() {
        let attrs = attrs();
        let fields: Vec<_> = attrs.fields().collect();

        assert_eq!(fields.len(), StaticField::ALL.len());
        assert_eq!(fields[0], (StaticField::Uptime, "123456".to_string()));
        assert_eq!(fields[1], (StaticField::ScreenWidth, "1080".to_string()));
        assert_eq!(
            fields[8],
            (StaticField::KernelVersion, "5.10.157".to_string())
        );
    }

    #[test]
    fn test_static_field_keys_unique() {
        let mut keys: Vec<_> = StaticField::ALL.iter().map(|f| f.key()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), StaticField::ALL.len());
    }

    #[test]
    fn test_static_field_from_key() {
        for field in StaticField::ALL {
            assert_eq!(StaticField::from_key(field.key()), Some(field));
        }
        assert_eq!(StaticField::from_key("wifi_networks"), None);
    }

    #[test]
    fn test_radio_kind_serialization() {
        let json = serde_json::to_string(&RadioKind::Bluetooth).unwrap();
        assert_eq!(json, "\"bluetooth\"");
        assert_eq!(RadioKind::Wifi.to_string(), "Wi-Fi");
    }
}
