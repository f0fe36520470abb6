//! envprint command-line entry point.

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use envprint_cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Collect(args) => envprint_cli::collect::execute(args).await?,
        Commands::Export(args) => envprint_cli::export::execute(args).await?,
        Commands::Version => {
            println!("envprint {}", env!("CARGO_PKG_VERSION"));
            println!("core version: {}", envprint_core::VERSION);
        }
    }

    Ok(())
}
