//! Diploma credential desk.
//!
//! Issues diploma credentials as tokens of an ERC-721 style contract and
//! answers queries about them, over a small JSON API.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client ──▶ http (router, request id, trace) ──▶ workflow
//!                                                       │
//!                          ┌────────────────────────────┼───────────────┐
//!                          ▼                            ▼               ▼
//!                      issuance                       query          overview
//!                 (validate, sign, submit)   (balanceOf, tokenURI)  (block, chain,
//!                          │                            │           balance, gas)
//!                          └──────────────┬─────────────┘               │
//!                                         ▼                             │
//!                                  blockchain (alloy) ◀─────────────────┘
//!                                         │
//!                                         ▼
//!                                  JSON-RPC endpoint
//!
//!     Cross-cutting: config (TOML + env, hot reload), observability
//!     (tracing, Prometheus metrics)
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use diploma_desk::blockchain::{ChainAdapter, ChainClient};
use diploma_desk::config::loader::{default_config, load_config};
use diploma_desk::config::watcher::ConfigWatcher;
use diploma_desk::http::HttpServer;
use diploma_desk::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "diploma-desk")]
#[command(about = "Issue and query diploma credentials on an Ethereum chain", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Watched for changes.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => default_config()?,
    };

    logging::init(&config.observability.log_level);
    tracing::info!("diploma-desk v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        rpc_url = %config.chain.rpc_url,
        contract_configured = !config.contract.address.is_empty(),
        issuer_configured = config.issuer.has_key(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let client = ChainClient::connect(&config.chain)?;
    let probe = client.is_reachable().await;
    if probe.reachable {
        tracing::info!(
            block_number = ?probe.block_number,
            chain_id = ?probe.chain_id,
            "Connected to chain"
        );
        if let Err(e) = client.verify_chain_id().await {
            tracing::warn!(error = %e, "Chain id check failed");
        }
    } else {
        tracing::warn!(rpc_url = %config.chain.rpc_url, "Chain endpoint unreachable, serving anyway");
    }

    // Keep the watcher alive for the lifetime of the server.
    let (_watcher, updates) = match &args.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        None => {
            let (_tx, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config, Arc::new(client));
    server.run(listener, updates).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
