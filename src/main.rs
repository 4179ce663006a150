//! linkpage-edge
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!     Client Request      │  axum app (timeout, request id, trace)       │
//!     ────────────────────┼─▶ RequestDispatcher → Router (first match)   │
//!                         │        │                      │              │
//!                         │        ▼                      ▼              │
//!                         │  LinkDataHandler         PageHandler         │
//!                         │        │              ┌──────┴──────┐        │
//!                         │        │        shell fetch    link resolve  │
//!                         │        │              └──────┬──────┘        │
//!                         │        │                     ▼              │
//!     Client Response     │        │            TransformPipeline        │
//!     ◀───────────────────┼── JSON ┴────────── streamed HTML            │
//!                         └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use linkpage_edge::config::{load_config, EdgeConfig};
use linkpage_edge::lifecycle::{self, signals, Shutdown};
use linkpage_edge::observability::init_logging;

#[derive(Parser, Debug)]
#[command(name = "linkpage-edge", version, about = "Edge handler for a links page")]
struct Cli {
    /// Path to a TOML config file; defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => EdgeConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "linkpage-edge starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        shell_url = %config.upstream.shell_url,
        links_url = %config.upstream.links_url,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    lifecycle::start(config, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
