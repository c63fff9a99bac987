//! Contract gateway: read and write calls against the bound ledger contract.
//!
//! # Responsibilities
//! - Encode entry point calls with the contract ABI
//! - Execute reads with `eth_call`, no authorization involved
//! - Sign and submit writes with a caller-supplied [`Authorization`]
//! - Reclassify every chain failure into a [`GatewayError`]
//!
//! The gateway holds no mutable state. It returns as soon as the node has
//! accepted a write and does not follow the transaction afterwards.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::SolCall;
use std::sync::Arc;

use crate::blockchain::client::ChainClient;
use crate::blockchain::transaction::Authorization;
use crate::contract::bindings::LedgerContract;
use crate::contract::types::{Quantity, TransactionHandle};
use crate::error::{GatewayError, GatewayResult};

/// A deployed contract address plus the client used to reach it.
///
/// Created once at startup and shared read-only afterwards.
#[derive(Clone)]
pub struct ContractBinding {
    address: Address,
    client: Arc<dyn ChainClient>,
}

impl ContractBinding {
    pub fn new(address: Address, client: Arc<dyn ChainClient>) -> Self {
        Self { address, client }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn client(&self) -> &Arc<dyn ChainClient> {
        &self.client
    }
}

impl std::fmt::Debug for ContractBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractBinding")
            .field("address", &self.address)
            .finish()
    }
}

/// Which write entry point a submission targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOp {
    Deposit,
    Withdraw,
}

impl WriteOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteOp::Deposit => "deposit",
            WriteOp::Withdraw => "withdraw",
        }
    }
}

/// Gateway to the ledger contract.
#[derive(Debug, Clone)]
pub struct ContractGateway {
    binding: ContractBinding,
}

impl ContractGateway {
    pub fn new(binding: ContractBinding) -> Self {
        Self { binding }
    }

    pub fn address(&self) -> Address {
        self.binding.address
    }

    pub fn binding(&self) -> &ContractBinding {
        &self.binding
    }

    /// Current contract balance.
    pub async fn read_balance(&self) -> GatewayResult<Quantity> {
        self.read(LedgerContract::balanceCall {}).await.map(Quantity)
    }

    /// Contract administrator identity.
    pub async fn read_admin(&self) -> GatewayResult<Address> {
        self.read(LedgerContract::adminCall {}).await
    }

    /// Deposit `amount`, attaching it as the transaction value.
    pub async fn deposit(&self, auth: Authorization, amount: U256) -> GatewayResult<TransactionHandle> {
        self.write(WriteOp::Deposit, auth, amount).await
    }

    /// Withdraw `amount`. The contract enforces balance sufficiency.
    pub async fn withdraw(&self, auth: Authorization, amount: U256) -> GatewayResult<TransactionHandle> {
        self.write(WriteOp::Withdraw, auth, amount).await
    }

    /// Dispatch a write entry point.
    pub async fn write(
        &self,
        op: WriteOp,
        auth: Authorization,
        amount: U256,
    ) -> GatewayResult<TransactionHandle> {
        ensure_positive(amount)?;

        let (data, value) = match op {
            WriteOp::Deposit => (LedgerContract::depositeCall { amount }.abi_encode(), amount),
            WriteOp::Withdraw => (LedgerContract::withdrawlCall { amount }.abi_encode(), U256::ZERO),
        };
        let auth = auth.with_value(value);

        let from = auth.identity();
        let nonce = auth.nonce();
        let gas_limit = auth.gas_limit();
        let gas_price = auth.gas_price();
        let chain_id = auth.chain_id();

        let signed = auth.sign_call(self.binding.address, data.into()).await?;
        let hash = match self.binding.client.submit(signed).await {
            Ok(hash) => hash,
            Err(e) => {
                let err = GatewayError::from(e);
                tracing::warn!(
                    op = op.as_str(),
                    from = %from,
                    nonce = nonce,
                    kind = err.kind(),
                    error = %err,
                    "Transaction rejected"
                );
                return Err(err);
            }
        };

        tracing::info!(
            op = op.as_str(),
            tx_hash = %hash,
            from = %from,
            nonce = nonce,
            amount = %amount,
            "Transaction submitted"
        );

        Ok(TransactionHandle {
            hash,
            from,
            to: self.binding.address,
            nonce,
            value: Quantity(value),
            amount: Quantity(amount),
            gas_limit,
            gas_price: Quantity::from(gas_price),
            chain_id,
        })
    }

    async fn read<C: SolCall>(&self, call: C) -> GatewayResult<C::Return> {
        let request = TransactionRequest::default()
            .with_to(self.binding.address)
            .with_input(call.abi_encode());
        let output = self.binding.client.call(request).await?;
        C::abi_decode_returns(&output).map_err(|e| {
            GatewayError::ContractReverted(format!(
                "unexpected return data from {}: {}",
                C::SIGNATURE,
                e
            ))
        })
    }
}

/// Reject zero amounts before anything is signed.
pub fn ensure_positive(amount: U256) -> GatewayResult<()> {
    if amount.is_zero() {
        return Err(GatewayError::InvalidAmount(
            "amount must be greater than zero".to_string(),
        ));
    }
    Ok(())
}
