//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::observability::logging::LogFormat;

/// Root configuration for the ledger gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, body limits).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Chain RPC settings.
    pub chain: ChainConfig,

    /// Gas and nonce handling for write calls.
    pub transactions: TransactionConfig,

    /// Contract attachment or deployment.
    pub contract: ContractConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Chain RPC configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Expected chain ID. Checked at startup when set.
    pub chain_id: Option<u64>,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://127.0.0.1:7545".to_string(),
            chain_id: None,
            rpc_timeout_secs: 10,
        }
    }
}

/// Transaction parameters attached to every write call.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransactionConfig {
    /// Gas limit in units.
    pub gas_limit: u64,

    /// Gas price in wei. No fee estimation is performed.
    pub gas_price_wei: u64,

    /// Serialize authorization + submission per identity so concurrent
    /// requests with one key never share a nonce.
    pub serialize_per_identity: bool,
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self {
            gas_limit: 3_000_000,
            gas_price_wei: 1_000_000,
            serialize_per_identity: true,
        }
    }
}

/// Contract binding configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Address of an already deployed contract.
    pub address: Option<String>,

    /// Path to the hex-encoded creation bytecode.
    pub bytecode_path: Option<String>,

    /// Deploy from `bytecode_path` when no address is configured.
    pub deploy_if_missing: bool,

    /// Maximum time to wait for the deployment receipt.
    pub deploy_timeout_secs: u64,

    /// Receipt polling interval in milliseconds.
    pub receipt_poll_ms: u64,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            address: None,
            bytecode_path: None,
            deploy_if_missing: false,
            deploy_timeout_secs: 60,
            receipt_poll_ms: 1000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "ledger_gateway=info,tower_http=info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
