//! Transaction authorization: nonce, gas and chain ID assembly, then signing.
//!
//! # Responsibilities
//! - Derive the signer identity from a per-request credential
//! - Snapshot the identity's pending nonce and the chain ID
//! - Attach the configured gas limit and gas price (no fee estimation)
//! - Sign the final call or deployment as a legacy EIP-155 transaction
//!
//! An [`Authorization`] is single-use: signing consumes it, and it is not
//! `Clone`. Two authorizations built against the same pending nonce are
//! still possible; submitting both is a caller error the chain will reject.

use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, Bytes, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use std::sync::Arc;

use crate::blockchain::client::ChainClient;
use crate::blockchain::types::SignedTransaction;
use crate::blockchain::wallet::Credential;
use crate::config::schema::TransactionConfig;
use crate::error::{GatewayError, GatewayResult};

/// Fixed gas parameters attached to every authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasSettings {
    pub gas_limit: u64,
    pub gas_price: u128,
}

impl From<&TransactionConfig> for GasSettings {
    fn from(config: &TransactionConfig) -> Self {
        Self {
            gas_limit: config.gas_limit,
            gas_price: u128::from(config.gas_price_wei),
        }
    }
}

impl Default for GasSettings {
    fn default() -> Self {
        Self::from(&TransactionConfig::default())
    }
}

/// One-time permission to submit a transaction as a given identity.
pub struct Authorization {
    signer: PrivateKeySigner,
    nonce: u64,
    value: U256,
    gas_limit: u64,
    gas_price: u128,
    chain_id: u64,
}

impl Authorization {
    pub fn identity(&self) -> Address {
        self.signer.address()
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Native amount in wei sent along with the transaction.
    pub fn value(&self) -> U256 {
        self.value
    }

    pub fn gas_limit(&self) -> u64 {
        self.gas_limit
    }

    pub fn gas_price(&self) -> u128 {
        self.gas_price
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Attach a native amount to the transaction.
    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    /// Build the unsigned request for a contract call.
    pub fn call_request(&self, to: Address, data: Bytes) -> TransactionRequest {
        self.base_request().with_to(to).with_input(data)
    }

    /// Sign a contract call, consuming the authorization.
    pub async fn sign_call(self, to: Address, data: Bytes) -> GatewayResult<SignedTransaction> {
        let request = self.call_request(to, data);
        self.sign(request).await
    }

    /// Sign a contract creation, consuming the authorization.
    pub async fn sign_deploy(self, code: Bytes) -> GatewayResult<SignedTransaction> {
        let request = self.base_request().with_deploy_code(code);
        self.sign(request).await
    }

    fn base_request(&self) -> TransactionRequest {
        TransactionRequest::default()
            .with_from(self.identity())
            .with_value(self.value)
            .with_nonce(self.nonce)
            .with_gas_price(self.gas_price)
            .with_chain_id(self.chain_id)
            .with_gas_limit(self.gas_limit)
    }

    async fn sign(self, request: TransactionRequest) -> GatewayResult<SignedTransaction> {
        let from = self.identity();
        let wallet = EthereumWallet::from(self.signer);
        let envelope = request
            .build(&wallet)
            .await
            .map_err(|e| GatewayError::InvalidCredential(format!("Signing failed: {}", e)))?;
        Ok(SignedTransaction { from, envelope })
    }
}

impl std::fmt::Debug for Authorization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authorization")
            .field("identity", &self.identity())
            .field("nonce", &self.nonce)
            .field("value", &self.value)
            .field("gas_limit", &self.gas_limit)
            .field("gas_price", &self.gas_price)
            .field("chain_id", &self.chain_id)
            .finish()
    }
}

/// Builds authorizations from credentials and live chain state.
#[derive(Clone)]
pub struct AuthBuilder {
    client: Arc<dyn ChainClient>,
    gas: GasSettings,
}

impl AuthBuilder {
    pub fn new(client: Arc<dyn ChainClient>, gas: GasSettings) -> Self {
        Self { client, gas }
    }

    /// Build an authorization for the identity behind `credential`.
    ///
    /// A malformed credential fails with `InvalidCredential` before any chain
    /// query is made. Chain failures surface as `ChainUnavailable`.
    pub async fn build(&self, credential: Credential) -> GatewayResult<Authorization> {
        let signer = credential.into_signer()?;
        self.build_for_signer(signer).await
    }

    /// Build an authorization for an already derived signer.
    pub async fn build_for_signer(&self, signer: PrivateKeySigner) -> GatewayResult<Authorization> {
        let identity = signer.address();
        let nonce = self.client.pending_nonce(identity).await?;
        let chain_id = self.client.chain_id().await?.0;

        tracing::debug!(
            identity = %identity,
            nonce = nonce,
            chain_id = chain_id,
            "Authorization built"
        );

        Ok(Authorization {
            signer,
            nonce,
            value: U256::ZERO,
            gas_limit: self.gas.gas_limit,
            gas_price: self.gas.gas_price,
            chain_id,
        })
    }

    pub fn gas(&self) -> GasSettings {
        self.gas
    }
}
