//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, gas limit > 0)
//! - Check that addresses and URLs parse
//! - Require a way to obtain the contract binding
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use alloy::primitives::Address;
use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }
    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::new("listener.max_body_bytes", "must be greater than 0"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    if url::Url::parse(&config.chain.rpc_url).is_err() {
        errors.push(ValidationError::new(
            "chain.rpc_url",
            format!("'{}' is not a valid URL", config.chain.rpc_url),
        ));
    }
    if config.chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("chain.rpc_timeout_secs", "must be greater than 0"));
    }

    if config.transactions.gas_limit == 0 {
        errors.push(ValidationError::new("transactions.gas_limit", "must be greater than 0"));
    }

    match (&config.contract.address, &config.contract.bytecode_path) {
        (Some(address), _) => {
            if address.parse::<Address>().is_err() {
                errors.push(ValidationError::new(
                    "contract.address",
                    format!("'{}' is not a valid address", address),
                ));
            }
        }
        (None, Some(_)) if config.contract.deploy_if_missing => {}
        (None, Some(_)) => errors.push(ValidationError::new(
            "contract.deploy_if_missing",
            "bytecode_path is set but deployment is disabled",
        )),
        (None, None) => errors.push(ValidationError::new(
            "contract",
            "either address or bytecode_path must be set",
        )),
    }
    if config.contract.deploy_if_missing && config.contract.deploy_timeout_secs == 0 {
        errors.push(ValidationError::new("contract.deploy_timeout_secs", "must be greater than 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
