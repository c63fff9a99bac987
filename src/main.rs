//! Ledger Gateway
//!
//! HTTP front end for a deployed ledger contract.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────────┐
//!                 │                   LEDGER GATEWAY                      │
//!                 │                                                       │
//!   HTTP request  │  ┌─────────┐   ┌──────────────┐   ┌───────────────┐  │
//!   ──────────────┼─▶│  http   │──▶│    ledger    │──▶│   contract    │  │
//!                 │  │ handlers│   │ service+locks│   │   gateway     │  │
//!                 │  └─────────┘   └──────┬───────┘   └───────┬───────┘  │
//!                 │                       │                   │          │
//!                 │                       ▼                   ▼          │
//!                 │               ┌──────────────┐   ┌───────────────┐   │    JSON-RPC
//!                 │               │ AuthBuilder  │──▶│  ChainClient  │───┼──▶ node
//!                 │               │ (nonce, gas) │   │  (timeouts)   │   │
//!                 │               └──────────────┘   └───────────────┘   │
//!                 │                                                       │
//!                 │  config · observability · lifecycle (cross-cutting)   │
//!                 └──────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use ledger_gateway::config::{read_config, validate_config, ConfigError, GatewayConfig};
use ledger_gateway::lifecycle;
use ledger_gateway::observability::logging::init_logging;

#[derive(Parser, Debug)]
#[command(name = "ledger-gateway")]
#[command(about = "HTTP gateway for a deployed ledger contract", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long, env = "LEDGER_GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Listener bind address, overrides `listener.bind_address`.
    #[arg(long, env = "LEDGER_GATEWAY_BIND")]
    bind: Option<String>,

    /// JSON-RPC endpoint, overrides `chain.rpc_url`.
    #[arg(long, env = "LEDGER_RPC_URL")]
    rpc_url: Option<String>,

    /// Deployed contract address, overrides `contract.address`.
    #[arg(long, env = "LEDGER_CONTRACT_ADDRESS")]
    contract: Option<String>,
}

impl Cli {
    fn into_config(self) -> Result<GatewayConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => GatewayConfig::default(),
        };
        if let Some(bind) = self.bind {
            config.listener.bind_address = bind;
        }
        if let Some(rpc_url) = self.rpc_url {
            config.chain.rpc_url = rpc_url;
        }
        if let Some(contract) = self.contract {
            config.contract.address = Some(contract);
        }
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Cli::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ledger-gateway: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(
        &config.observability.log_level,
        config.observability.log_format,
    ) {
        eprintln!("ledger-gateway: failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        rpc_url = %config.chain.rpc_url,
        "ledger-gateway starting"
    );

    match lifecycle::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Gateway stopped with error");
            ExitCode::FAILURE
        }
    }
}
