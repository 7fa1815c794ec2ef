//! `courtmap` — command-line client for the courtmap facility directory.
//!
//! Reads `courtmap.toml` (or the path given with `--config`), opens the
//! local backend under the configured data directory, and dispatches one
//! subcommand against the sync layer.
//!
//! # Usage
//!
//! ```
//! courtmap sign-in
//! courtmap locations add --name "Parc Laurier" --address "1115 Laurier E" --lat 45.53 --lng -73.58
//! courtmap locations mine
//! courtmap reports list
//! ```

mod backend;
mod commands;
mod provider;
mod settings;

use std::path::PathBuf;

use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "courtmap", about = "Sports-facility directory client", version)]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "courtmap.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: commands::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let settings = settings::Settings::load(&cli.config)?;
  let backend = backend::init(&settings).await?;

  commands::dispatch(backend, cli.command).await
}
