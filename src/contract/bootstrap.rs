//! Startup binding: attach to a deployed contract or deploy a fresh one.

use alloy::hex;
use alloy::primitives::{Address, Bytes, TxHash};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::blockchain::client::{ChainClient, RpcChainClient};
use crate::blockchain::transaction::{AuthBuilder, GasSettings};
use crate::blockchain::wallet::Credential;
use crate::config::schema::ContractConfig;
use crate::contract::gateway::ContractBinding;
use crate::error::GatewayError;

/// Failure while establishing the contract binding.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("invalid contract address '{0}'")]
    InvalidAddress(String),

    #[error("failed to read bytecode from {path}: {source}")]
    BytecodeIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("bytecode in {path} is not valid hex: {reason}")]
    BytecodeHex { path: String, reason: String },

    #[error("no contract address configured and deployment is disabled")]
    NotConfigured,

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("deployment transaction {0} reverted")]
    Reverted(TxHash),

    #[error("receipt for deployment {0} has no contract address")]
    MissingContractAddress(TxHash),

    #[error("deployment {hash} not mined within {secs}s")]
    Timeout { hash: TxHash, secs: u64 },
}

/// Bind to the contract described by `config`, deploying it if allowed.
pub async fn bind_contract(
    client: Arc<RpcChainClient>,
    config: &ContractConfig,
    gas: GasSettings,
) -> Result<ContractBinding, BootstrapError> {
    if let Some(address) = &config.address {
        return attach(address, client);
    }
    if config.deploy_if_missing {
        if let Some(path) = &config.bytecode_path {
            return deploy(client, Path::new(path), config, gas).await;
        }
    }
    Err(BootstrapError::NotConfigured)
}

/// Attach to an already deployed contract.
pub fn attach(
    address: &str,
    client: Arc<dyn ChainClient>,
) -> Result<ContractBinding, BootstrapError> {
    let address: Address = address
        .trim()
        .parse()
        .map_err(|_| BootstrapError::InvalidAddress(address.to_string()))?;
    tracing::info!(contract = %address, "Attached to deployed contract");
    Ok(ContractBinding::new(address, client))
}

/// Deploy the contract with the key from [`crate::blockchain::wallet::DEPLOYER_KEY_ENV_VAR`]
/// and wait for it to be mined.
pub async fn deploy(
    client: Arc<RpcChainClient>,
    bytecode_path: &Path,
    config: &ContractConfig,
    gas: GasSettings,
) -> Result<ContractBinding, BootstrapError> {
    let code = read_bytecode(bytecode_path)?;
    let credential = Credential::from_env()?;

    let builder = AuthBuilder::new(client.clone(), gas);
    let auth = builder.build(credential).await?;
    let deployer = auth.identity();
    let signed = auth.sign_deploy(code).await?;
    let hash = client.submit(signed).await.map_err(GatewayError::from)?;

    tracing::info!(tx_hash = %hash, deployer = %deployer, "Contract deployment submitted");

    let address = wait_for_deployment(&client, hash, config).await?;
    tracing::info!(contract = %address, tx_hash = %hash, "Contract deployed");
    Ok(ContractBinding::new(address, client))
}

/// Read hex-encoded creation bytecode, with or without `0x`.
pub fn read_bytecode(path: &Path) -> Result<Bytes, BootstrapError> {
    let display = path.display().to_string();
    let raw = std::fs::read_to_string(path).map_err(|source| BootstrapError::BytecodeIo {
        path: display.clone(),
        source,
    })?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(BootstrapError::BytecodeHex {
            path: display,
            reason: "file is empty".to_string(),
        });
    }
    hex::decode(trimmed)
        .map(Bytes::from)
        .map_err(|e| BootstrapError::BytecodeHex {
            path: display,
            reason: e.to_string(),
        })
}

async fn wait_for_deployment(
    client: &RpcChainClient,
    hash: TxHash,
    config: &ContractConfig,
) -> Result<Address, BootstrapError> {
    let deadline = Instant::now() + Duration::from_secs(config.deploy_timeout_secs);
    let poll = Duration::from_millis(config.receipt_poll_ms.max(1));

    loop {
        if let Some(receipt) = client.receipt(hash).await.map_err(GatewayError::from)? {
            if !receipt.status() {
                return Err(BootstrapError::Reverted(hash));
            }
            return receipt
                .contract_address
                .ok_or(BootstrapError::MissingContractAddress(hash));
        }
        if Instant::now() >= deadline {
            return Err(BootstrapError::Timeout {
                hash,
                secs: config.deploy_timeout_secs,
            });
        }
        tracing::debug!(tx_hash = %hash, "Waiting for deployment receipt");
        tokio::time::sleep(poll).await;
    }
}
