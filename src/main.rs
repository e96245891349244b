//! Presign Edge Node
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────────┐
//!                     │                     EDGE NODE                        │
//!   GET /videos/key   │  ┌─────────┐   ┌─────────┐   ┌─────────┐             │
//!   ──────────────────┼─▶│ request │──▶│ signing │──▶│ presign │─────────────┼──▶ Backend
//!                     │  │  parse  │   │  HMAC   │   │ client  │◀────────────┼─── (presigned URL)
//!                     │  └─────────┘   └─────────┘   └────┬────┘             │
//!                     │                                   ▼                  │
//!                     │  ┌─────────┐   ┌─────────┐   ┌─────────┐             │
//!   ◀─────────────────┼──│  cache  │◀──│ header  │◀──│ origin  │◀────────────┼─── Origin
//!   filtered response │  │ policy  │   │ filter  │   │ fetcher │             │    (object)
//!                     │  └─────────┘   └─────────┘   └─────────┘             │
//!                     │                                                      │
//!                     │  config · observability · resilience · lifecycle     │
//!                     └──────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;

use presign_edge::config::load_config;
use presign_edge::net::load_tls_config;
use presign_edge::observability::{logging, metrics};
use presign_edge::{EdgeServer, Shutdown};

#[derive(Parser)]
#[command(name = "presign-edge", version)]
#[command(about = "Edge node serving media through backend-issued presigned URLs", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "EDGE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("presign-edge: {}", e);
            std::process::exit(2);
        }
    };

    logging::init_logging(&config.observability);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "presign-edge starting");

    if config.backend.worker_secret.is_default() {
        tracing::warn!("WORKER_SECRET is the built-in placeholder; set it before serving real traffic");
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend = %config.backend.endpoint,
        path_prefix = %config.routing.path_prefix,
        cache_ttl_secs = config.cache.ttl_secs,
        tls = config.listener.tls.is_some(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let server = EdgeServer::new(config.clone())?;

    match &config.listener.tls {
        Some(tls) => {
            let addr: SocketAddr = config.listener.bind_address.parse()?;
            let rustls = load_tls_config(tls).await?;
            server.run_tls(addr, rustls, shutdown.subscribe()).await?;
        }
        None => {
            let listener = TcpListener::bind(&config.listener.bind_address).await?;
            tracing::info!(address = %listener.local_addr()?, "Listening for connections");
            server.run(listener, shutdown.subscribe()).await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
