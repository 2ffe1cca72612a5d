//! Darbi front-door gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌────────────────────────────────────────────────┐
//!                    │                    GATEWAY                     │
//!                    │                                                │
//!   Client Request   │  ┌─────────┐   ┌──────────┐   ┌─────────────┐  │
//!   ─────────────────┼─▶│  http   │──▶│ app_type │──▶│   routing   │  │
//!                    │  │ server  │   │middleware│   │  resolver   │  │
//!                    │  └─────────┘   └────┬─────┘   └─────────────┘  │
//!                    │                     │ ServerApp                │
//!                    │                     ▼                          │
//!   Client Response  │  ┌──────────────┐  ┌────────────────────────┐  │
//!   ◀────────────────┼──│ X-App-Type   │◀─│ bundle / api handlers  │  │
//!                    │  └──────────────┘  └────────────────────────┘  │
//!                    │                                                │
//!                    │  config (+ hot reload) · observability ·       │
//!                    │  lifecycle                                     │
//!                    └────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use darbi_gateway::config::{load_config, ConfigWatcher, GatewayConfig};
use darbi_gateway::http::HttpServer;
use darbi_gateway::lifecycle::{shutdown_signal, Shutdown};
use darbi_gateway::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "darbi-gateway", version, about = "Front-door gateway for the Darbi applications")]
struct Args {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long, env = "DARBI_GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Reload bundles and canonical root when the config file changes.
    #[arg(long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability)?;

    tracing::info!("darbi-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        canonical_root = %config.apps.canonical_root,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Keep the watcher alive for the lifetime of the server.
    let (_watcher, config_updates) = match (&args.config, args.watch) {
        (Some(path), true) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        _ => {
            let (_, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal_shutdown.trigger();
    });

    let server = HttpServer::new(config)?;
    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
