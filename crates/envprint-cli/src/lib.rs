//! envprint CLI
//!
//! Runs fingerprint collection sessions from the command line and exports
//! the stored record.
//!
//! # Usage
//!
//! ```bash
//! # Collect for two seconds using a scripted radio environment
//! envprint collect --state-dir ./state --duration-ms 2000 --scenario office.json
//!
//! # Copy the stored record elsewhere
//! envprint export --state-dir ./state --out fingerprint.json
//! ```

use clap::{Parser, Subcommand};

pub mod collect;
pub mod export;
pub mod host;
pub mod scenario;

/// Environmental fingerprint collector
#[derive(Parser, Debug)]
#[command(name = "envprint")]
#[command(author, version, about = "Collects a hashed fingerprint of nearby radios")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan both radios and merge the result into the stored record
    Collect(collect::CollectArgs),

    /// Copy the stored record to another file
    Export(export::ExportArgs),

    /// Display version information
    Version,
}
