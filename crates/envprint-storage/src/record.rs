//! The persisted fingerprint record and its JSON document form.
//!
//! The document is a flat JSON object: one digest string per static field
//! plus two sorted arrays of identity digests. Loading is lenient. Fields of
//! the wrong type are ignored, non-string array items are skipped and keys
//! this crate does not know about are carried through untouched.

use envprint_core::constants::{KEY_BLUETOOTH_DEVICES, KEY_WIFI_NETWORKS};
use envprint_core::{
    DeviceStaticAttributes, RadioKind, RadioObservation, ScanSnapshot, StaticField, digest,
};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Digests of everything ever observed on this device.
///
/// Static field digests hold the most recent value only. Identity digest sets
/// only ever grow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FingerprintRecord {
    static_fields: BTreeMap<StaticField, String>,
    wifi: BTreeSet<String>,
    bluetooth: BTreeSet<String>,
    extra: Map<String, Value>,
}

/// What a merge changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// Static field digests that differ from the previous value.
    pub static_changed: usize,

    /// Wi-Fi identity digests not seen before.
    pub new_wifi: usize,

    /// Bluetooth identity digests not seen before.
    pub new_bluetooth: usize,
}

impl FingerprintRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a stored document, returning `None` if it is not a JSON object.
    pub fn from_json_slice(bytes: &[u8]) -> Option<Self> {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(Value::Object(map)) => Some(Self::from_map(map)),
            _ => None,
        }
    }

    fn from_map(map: Map<String, Value>) -> Self {
        let mut record = Self::default();

        for (key, value) in map {
            if let Some(field) = StaticField::from_key(&key) {
                if let Value::String(hash) = value {
                    record.static_fields.insert(field, hash);
                }
            } else if key == KEY_WIFI_NETWORKS {
                record.wifi = string_items(value);
            } else if key == KEY_BLUETOOTH_DEVICES {
                record.bluetooth = string_items(value);
            } else {
                record.extra.insert(key, value);
            }
        }

        record
    }

    /// The record as a JSON document.
    pub fn to_value(&self) -> Value {
        let mut map = self.extra.clone();
        for (field, hash) in &self.static_fields {
            map.insert(field.key().to_string(), Value::String(hash.clone()));
        }
        map.insert(KEY_WIFI_NETWORKS.to_string(), string_array(&self.wifi));
        map.insert(KEY_BLUETOOTH_DEVICES.to_string(), string_array(&self.bluetooth));
        Value::Object(map)
    }

    /// The document pretty printed with four-space indentation.
    pub fn to_pretty_json(&self) -> serde_json::Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
        self.to_value().serialize(&mut serializer)?;
        Ok(out)
    }

    /// Digest stored for a static field.
    pub fn static_hash(&self, field: StaticField) -> Option<&str> {
        self.static_fields.get(&field).map(String::as_str)
    }

    /// Identity digests collected for a radio, sorted.
    pub fn hashes(&self, kind: RadioKind) -> &BTreeSet<String> {
        match kind {
            RadioKind::Wifi => &self.wifi,
            RadioKind::Bluetooth => &self.bluetooth,
        }
    }

    fn hashes_mut(&mut self, kind: RadioKind) -> &mut BTreeSet<String> {
        match kind {
            RadioKind::Wifi => &mut self.wifi,
            RadioKind::Bluetooth => &mut self.bluetooth,
        }
    }

    /// Top-level keys this record does not interpret.
    pub fn unknown_keys(&self) -> impl Iterator<Item = &str> {
        self.extra.keys().map(String::as_str)
    }

    /// Replace every static field digest with the digest of `attrs`.
    ///
    /// Returns how many digests changed.
    pub fn replace_static(&mut self, attrs: &DeviceStaticAttributes) -> usize {
        let mut changed = 0;
        for (field, value) in attrs.fields() {
            let hash = digest(&value);
            if self.static_fields.get(&field) != Some(&hash) {
                self.static_fields.insert(field, hash);
                changed += 1;
            }
        }
        changed
    }

    /// Add the identity digests of `observations` to a radio's set.
    ///
    /// Blank identities are skipped. Returns how many digests were new.
    pub fn absorb<'a>(
        &mut self,
        kind: RadioKind,
        observations: impl IntoIterator<Item = &'a RadioObservation>,
    ) -> usize {
        let set = self.hashes_mut(kind);
        observations
            .into_iter()
            .filter(|observation| observation.has_identity())
            .filter(|observation| set.insert(digest(&observation.identity)))
            .count()
    }

    /// Fold one session into the record.
    pub fn merge(
        &mut self,
        attrs: &DeviceStaticAttributes,
        snapshot: &ScanSnapshot,
    ) -> MergeSummary {
        MergeSummary {
            static_changed: self.replace_static(attrs),
            new_wifi: self.absorb(RadioKind::Wifi, &snapshot.wifi),
            new_bluetooth: self.absorb(RadioKind::Bluetooth, &snapshot.bluetooth),
        }
    }
}

fn string_items(value: Value) -> BTreeSet<String> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => BTreeSet::new(),
    }
}

fn string_array(set: &BTreeSet<String>) -> Value {
    Value::Array(set.iter().cloned().map(Value::String).collect())
}
