//! Chain client boundary and its JSON-RPC implementation.
//!
//! # Responsibilities
//! - Define the four chain queries the gateway core consumes
//! - Connect to a JSON-RPC endpoint through an alloy provider
//! - Bound every RPC with the configured timeout
//! - Report node error objects verbatim so the gateway can classify them

use alloy::eips::eip2718::Encodable2718;
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy::transports::{RpcError, TransportError};
use async_trait::async_trait;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::types::{ChainError, ChainId, ChainResult, SignedTransaction};
use crate::config::schema::ChainConfig;
use crate::observability::metrics;

/// The chain operations the gateway depends on.
///
/// Implementations must be safe to share across concurrently running
/// requests.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Pending-block transaction count for `address`.
    async fn pending_nonce(&self, address: Address) -> ChainResult<u64>;

    /// Chain identifier used for EIP-155 replay protection.
    async fn chain_id(&self) -> ChainResult<ChainId>;

    /// Broadcast a signed transaction. Returns once the node accepted it.
    async fn submit(&self, tx: SignedTransaction) -> ChainResult<TxHash>;

    /// Execute a read-only call against the latest state.
    async fn call(&self, request: TransactionRequest) -> ChainResult<Bytes>;
}

/// JSON-RPC chain client backed by an alloy HTTP provider.
#[derive(Clone)]
pub struct RpcChainClient {
    provider: Arc<dyn Provider + Send + Sync>,
    config: ChainConfig,
    timeout_duration: Duration,
}

impl RpcChainClient {
    /// Create a new client for the configured endpoint.
    ///
    /// Does not contact the node; call [`RpcChainClient::verify_chain_id`]
    /// for that.
    pub fn new(config: ChainConfig) -> ChainResult<Self> {
        let url: url::Url = config.rpc_url.parse().map_err(|e| {
            ChainError::Transport(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        let provider = Arc::new(ProviderBuilder::new().connect_http(url)) as Arc<dyn Provider + Send + Sync>;

        tracing::info!(
            rpc_url = %config.rpc_url,
            timeout_secs = config.rpc_timeout_secs,
            "Chain client initialized"
        );

        Ok(Self {
            provider,
            timeout_duration: Duration::from_secs(config.rpc_timeout_secs),
            config,
        })
    }

    /// Compare the node's chain ID against the configured one, if any.
    pub async fn verify_chain_id(&self) -> ChainResult<ChainId> {
        let actual = self.chain_id().await?;
        if let Some(expected) = self.config.chain_id {
            if expected != actual.0 {
                tracing::warn!(
                    expected = expected,
                    actual = actual.0,
                    "Connected chain does not match configured chain ID"
                );
            }
        }
        Ok(actual)
    }

    /// Get a transaction receipt by hash.
    pub async fn receipt(&self, tx_hash: TxHash) -> ChainResult<Option<TransactionReceipt>> {
        self.rpc("get_transaction_receipt", self.provider.get_transaction_receipt(tx_hash))
            .await
    }

    /// Get the configuration.
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Await one RPC under the configured timeout and record its outcome.
    async fn rpc<F, T>(&self, op: &'static str, fut: F) -> ChainResult<T>
    where
        F: IntoFuture<Output = Result<T, TransportError>>,
    {
        let result = match timeout(self.timeout_duration, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                tracing::warn!(op = op, error = %e, "RPC error");
                Err(map_transport_error(e))
            }
            Err(_) => {
                tracing::warn!(op = op, "RPC timeout");
                Err(ChainError::Timeout(self.config.rpc_timeout_secs))
            }
        };
        metrics::record_chain_call(op, result.is_ok());
        result
    }
}

#[async_trait]
impl ChainClient for RpcChainClient {
    async fn pending_nonce(&self, address: Address) -> ChainResult<u64> {
        self.rpc(
            "get_transaction_count",
            self.provider.get_transaction_count(address).pending(),
        )
        .await
    }

    async fn chain_id(&self) -> ChainResult<ChainId> {
        self.rpc("get_chain_id", self.provider.get_chain_id())
            .await
            .map(ChainId)
    }

    async fn submit(&self, tx: SignedTransaction) -> ChainResult<TxHash> {
        let raw = tx.envelope.encoded_2718();
        let pending = self
            .rpc("send_raw_transaction", self.provider.send_raw_transaction(&raw))
            .await?;
        Ok(*pending.tx_hash())
    }

    async fn call(&self, request: TransactionRequest) -> ChainResult<Bytes> {
        self.rpc("call", self.provider.call(request)).await
    }
}

impl std::fmt::Debug for RpcChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcChainClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}

/// Keep the node's error object intact; everything else is transport.
fn map_transport_error(err: TransportError) -> ChainError {
    match err {
        RpcError::ErrorResp(payload) => ChainError::Rejected {
            code: payload.code,
            message: payload.message.to_string(),
            data: payload
                .data
                .as_ref()
                .and_then(|raw| serde_json::from_str::<Bytes>(raw.get()).ok()),
        },
        other => ChainError::Transport(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ChainConfig {
        ChainConfig {
            // Nothing listens on port 9 (discard); connections are refused.
            rpc_url: "http://127.0.0.1:9".to_string(),
            chain_id: Some(1337),
            rpc_timeout_secs: 2,
        }
    }

    #[test]
    fn test_client_creation_does_not_connect() {
        assert!(RpcChainClient::new(test_config()).is_ok());
    }

    #[test]
    fn test_invalid_url_rejected() {
        let mut config = test_config();
        config.rpc_url = "not a url".to_string();
        let err = RpcChainClient::new(config).unwrap_err();
        assert!(err.to_string().contains("Invalid RPC URL"));
    }

    #[tokio::test]
    async fn test_unreachable_node_is_an_error() {
        let client = RpcChainClient::new(test_config()).unwrap();
        let result = client.chain_id().await;
        assert!(matches!(
            result,
            Err(ChainError::Transport(_)) | Err(ChainError::Timeout(_))
        ));
    }

    #[test]
    fn test_error_response_is_preserved() {
        let payload: alloy::rpc::json_rpc::ErrorPayload = serde_json::from_str(
            r#"{"code":3,"message":"execution reverted","data":"0x08c379a0"}"#,
        )
        .unwrap();
        let mapped = map_transport_error(RpcError::ErrorResp(payload));
        match mapped {
            ChainError::Rejected { code, message, data } => {
                assert_eq!(code, 3);
                assert_eq!(message, "execution reverted");
                assert_eq!(data.unwrap().as_ref(), &[0x08, 0xc3, 0x79, 0xa0]);
            }
            other => panic!("unexpected mapping: {:?}", other),
        }
    }
}
