//! Spyglass server.
//!
//! ```text
//!   spyglass-cli / any HTTP client
//!            │  JSON
//!            ▼
//!   ┌──────────────┐   create/get/list   ┌───────────────┐
//!   │   http API   │ ──────────────────▶ │ session store │
//!   └──────┬───────┘                     └───────▲───────┘
//!          │ send / resend                       │ mark_completed
//!          ▼                                     │
//!   ┌──────────────┐  raw request bytes  ┌───────┴───────┐
//!   │  dispatcher  │ ──────────────────▶ │ tcp transport │ ──▶ target host
//!   └──────────────┘                     └───────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use spyglass::config::{load_config, SpyglassConfig};
use spyglass::lifecycle::{signals, startup, Shutdown};
use spyglass::observability::logging;

#[derive(Parser)]
#[command(name = "spyglass")]
#[command(about = "Record, build and send raw HTTP requests", long_about = None)]
struct Args {
    /// Path to a TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => SpyglassConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "spyglass starting");

    let shutdown = Shutdown::new();
    signals::spawn_ctrl_c_handler(shutdown.clone());

    startup::run(config, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
