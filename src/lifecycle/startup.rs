//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the metrics exporter when enabled
//! - Connect to the chain and check its ID
//! - Attach to or deploy the ledger contract
//! - Bind the listener and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - The listener binds last, so traffic only arrives when ready

use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::blockchain::client::RpcChainClient;
use crate::blockchain::transaction::GasSettings;
use crate::blockchain::types::ChainError;
use crate::config::GatewayConfig;
use crate::contract::bootstrap::{bind_contract, BootstrapError};
use crate::http::HttpServer;
use crate::ledger::LedgerService;
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals;
use crate::observability::metrics;

/// Fatal error during startup or serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("chain client: {0}")]
    Chain(#[from] ChainError),

    #[error("contract binding: {0}")]
    Bootstrap(#[from] BootstrapError),

    #[error("invalid address '{address}': {reason}")]
    Address { address: String, reason: String },

    #[error("listener: {0}")]
    Io(#[from] std::io::Error),
}

/// Bring the gateway up and serve until Ctrl-C or SIGTERM.
pub async fn run(config: GatewayConfig) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let addr = parse_addr(&config.observability.metrics_address)?;
        metrics::init_metrics(addr);
    }

    let client = Arc::new(RpcChainClient::new(config.chain.clone())?);
    match client.verify_chain_id().await {
        Ok(chain_id) => tracing::info!(chain_id = chain_id.0, "Connected to chain"),
        Err(e) => tracing::warn!(error = %e, "Chain not reachable at startup"),
    }

    let gas = GasSettings::from(&config.transactions);
    let binding = bind_contract(client, &config.contract, gas).await?;
    let service = Arc::new(LedgerService::new(binding, &config.transactions));

    let addr = parse_addr(&config.listener.bind_address)?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        request_timeout_secs = config.timeouts.request_secs,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    let server = HttpServer::new(config, service);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn parse_addr(address: &str) -> Result<SocketAddr, StartupError> {
    address.parse().map_err(|e: std::net::AddrParseError| StartupError::Address {
        address: address.to_string(),
        reason: e.to_string(),
    })
}
