//! `envprint export`

use anyhow::{Context, Result};
use clap::Args;
use envprint_storage::{FingerprintStore, StoreConfig};
use std::path::PathBuf;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Directory holding the stored record
    #[arg(long, default_value = ".")]
    pub state_dir: PathBuf,

    /// Destination file
    #[arg(short, long)]
    pub out: PathBuf,
}

/// Execute the export command
pub async fn execute(args: ExportArgs) -> Result<()> {
    let store = FingerprintStore::new(StoreConfig::new(args.state_dir));
    let copied = store
        .export_to(&args.out)
        .await
        .with_context(|| format!("Failed to export to {}", args.out.display()))?;

    println!("Exported {} bytes to {}", copied, args.out.display());
    Ok(())
}
