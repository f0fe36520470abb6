//! File-backed fingerprint store.

use envprint_core::constants::DEFAULT_STATE_FILE_NAME;
use envprint_core::{DeviceStaticAttributes, RadioKind, ScanSnapshot};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::record::FingerprintRecord;

/// Where the state file lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Private directory holding the state file
    pub state_dir: PathBuf,

    /// Name of the state file inside `state_dir`
    pub file_name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            state_dir: PathBuf::from("."),
            file_name: DEFAULT_STATE_FILE_NAME.to_string(),
        }
    }
}

impl StoreConfig {
    /// Create a configuration for the given state directory
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
            ..Default::default()
        }
    }

    /// Set the state file name
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }

    /// Full path of the state file
    pub fn path(&self) -> PathBuf {
        self.state_dir.join(&self.file_name)
    }
}

/// Append-only store of hashed device and radio identities.
///
/// The store is single-writer: callers serialize sessions so that no two
/// merges run against the same file at once.
///
/// # Example
///
/// ```no_run
/// use envprint_core::ScanSnapshot;
/// # use envprint_core::DeviceStaticAttributes;
/// use envprint_storage::{FingerprintStore, StoreConfig};
///
/// # async fn example(attrs: DeviceStaticAttributes) -> Result<(), Box<dyn std::error::Error>> {
/// let store = FingerprintStore::new(StoreConfig::new("/var/lib/envprint"));
/// let record = store.merge_and_persist(&attrs, &ScanSnapshot::default()).await?;
/// println!("{} networks known", record.hashes(envprint_core::RadioKind::Wifi).len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FingerprintStore {
    config: StoreConfig,
    path: PathBuf,
}

impl FingerprintStore {
    pub fn new(config: StoreConfig) -> Self {
        let path = config.path();
        Self { config, path }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Path of the state file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored record.
    ///
    /// A missing, unreadable or malformed file yields an empty record.
    pub async fn load(&self) -> FingerprintRecord {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => match FingerprintRecord::from_json_slice(&bytes) {
                Some(record) => record,
                None => {
                    warn!(
                        "State file {} is corrupt, starting from an empty record",
                        self.path.display()
                    );
                    FingerprintRecord::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No state file at {}, starting fresh", self.path.display());
                FingerprintRecord::new()
            }
            Err(e) => {
                warn!(
                    "Failed to read {}: {}, starting from an empty record",
                    self.path.display(),
                    e
                );
                FingerprintRecord::new()
            }
        }
    }

    /// Merge one session into the stored record and write it back.
    ///
    /// Static field digests are replaced; identity digests are added to the
    /// existing sets. Returns the merged record.
    ///
    /// # Errors
    ///
    /// [`StoreError::WriteFailed`] if the file could not be written. The
    /// error carries the merged record.
    pub async fn merge_and_persist(
        &self,
        attrs: &DeviceStaticAttributes,
        snapshot: &ScanSnapshot,
    ) -> StoreResult<FingerprintRecord> {
        let mut record = self.load().await;
        let summary = record.merge(attrs, snapshot);

        info!(
            static_changed = summary.static_changed,
            new_wifi = summary.new_wifi,
            new_bluetooth = summary.new_bluetooth,
            wifi_total = record.hashes(RadioKind::Wifi).len(),
            bluetooth_total = record.hashes(RadioKind::Bluetooth).len(),
            "Merged session into fingerprint record"
        );

        self.persist(&record).await?;
        Ok(record)
    }

    /// Write `record` as the new state file.
    ///
    /// The document is written to a sibling temporary file first and then
    /// renamed over the state file.
    pub async fn persist(&self, record: &FingerprintRecord) -> StoreResult<()> {
        let bytes = record.to_pretty_json()?;

        self.write_replacing(&bytes).await.map_err(|e| {
            warn!("Failed to write {}: {}", self.path.display(), e);
            StoreError::write_failed(self.path.clone(), e, record.clone())
        })?;

        debug!("Wrote {} bytes to {}", bytes.len(), self.path.display());
        Ok(())
    }

    async fn write_replacing(&self, bytes: &[u8]) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.config.state_dir).await?;

        let temp = self.temp_path();
        tokio::fs::write(&temp, bytes).await?;
        if let Err(e) = tokio::fs::rename(&temp, &self.path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(e);
        }
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        self.config
            .state_dir
            .join(format!(".{}.tmp", self.config.file_name))
    }

    /// Copy the state file, unchanged, to `dest`.
    ///
    /// Returns the number of bytes copied.
    ///
    /// # Errors
    ///
    /// [`StoreError::NothingToExport`] if no session has been stored yet.
    pub async fn export_to(&self, dest: impl AsRef<Path>) -> StoreResult<u64> {
        if !tokio::fs::try_exists(&self.path).await? {
            return Err(StoreError::NothingToExport {
                path: self.path.clone(),
            });
        }

        let copied = tokio::fs::copy(&self.path, dest.as_ref()).await?;
        info!("Exported {} bytes to {}", copied, dest.as_ref().display());
        Ok(copied)
    }
}
