//! Ledger operations as served to the HTTP layer.
//!
//! A write request runs: amount check → signer derivation → identity lock
//! (when enabled) → authorization → gateway write → unlock.

use alloy::primitives::Address;
use std::sync::Arc;

use crate::blockchain::client::ChainClient;
use crate::blockchain::transaction::{AuthBuilder, GasSettings};
use crate::blockchain::types::ChainId;
use crate::blockchain::wallet::Credential;
use crate::config::schema::TransactionConfig;
use crate::contract::gateway::{ensure_positive, ContractBinding, ContractGateway, WriteOp};
use crate::contract::types::{Quantity, TransactionHandle};
use crate::error::GatewayResult;
use crate::ledger::locks::IdentityLocks;
use crate::observability::metrics;

/// Entry point for balance, admin, deposit and withdrawal requests.
#[derive(Clone)]
pub struct LedgerService {
    gateway: Arc<ContractGateway>,
    auth: AuthBuilder,
    client: Arc<dyn ChainClient>,
    locks: Option<IdentityLocks>,
}

impl LedgerService {
    pub fn new(binding: ContractBinding, config: &TransactionConfig) -> Self {
        let client = binding.client().clone();
        let auth = AuthBuilder::new(client.clone(), GasSettings::from(config));
        let locks = config.serialize_per_identity.then(IdentityLocks::new);

        tracing::info!(
            contract = %binding.address(),
            gas_limit = config.gas_limit,
            gas_price_wei = config.gas_price_wei,
            serialize_per_identity = config.serialize_per_identity,
            "Ledger service ready"
        );

        Self {
            gateway: Arc::new(ContractGateway::new(binding)),
            auth,
            client,
            locks,
        }
    }

    pub fn gateway(&self) -> &ContractGateway {
        &self.gateway
    }

    pub async fn balance(&self) -> GatewayResult<Quantity> {
        let result = self.gateway.read_balance().await;
        record("balance", &result);
        result
    }

    pub async fn admin(&self) -> GatewayResult<Address> {
        let result = self.gateway.read_admin().await;
        record("admin", &result);
        result
    }

    pub async fn deposit(
        &self,
        credential: Credential,
        amount: Quantity,
    ) -> GatewayResult<TransactionHandle> {
        let result = self.execute(WriteOp::Deposit, credential, amount).await;
        record(WriteOp::Deposit.as_str(), &result);
        result
    }

    pub async fn withdraw(
        &self,
        credential: Credential,
        amount: Quantity,
    ) -> GatewayResult<TransactionHandle> {
        let result = self.execute(WriteOp::Withdraw, credential, amount).await;
        record(WriteOp::Withdraw.as_str(), &result);
        result
    }

    /// Chain ID reported by the node, used for health checks.
    pub async fn chain_id(&self) -> GatewayResult<ChainId> {
        Ok(self.client.chain_id().await?)
    }

    /// Identities with a write in flight. Always zero when serialization is off.
    pub fn locked_identities(&self) -> usize {
        self.locks.as_ref().map_or(0, IdentityLocks::len)
    }

    async fn execute(
        &self,
        op: WriteOp,
        credential: Credential,
        amount: Quantity,
    ) -> GatewayResult<TransactionHandle> {
        ensure_positive(amount.0)?;
        let signer = credential.into_signer()?;

        let _guard = match &self.locks {
            Some(locks) => Some(locks.acquire(signer.address()).await),
            None => None,
        };

        let auth = self.auth.build_for_signer(signer).await?;
        self.gateway.write(op, auth, amount.0).await
    }
}

fn record<T>(op: &'static str, result: &GatewayResult<T>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    };
    metrics::record_operation(op, outcome);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::mock::MockChain;
    use crate::error::GatewayError;
    use alloy::primitives::U256;

    const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn service(chain: Arc<MockChain>, serialize: bool) -> LedgerService {
        let config = TransactionConfig {
            serialize_per_identity: serialize,
            ..TransactionConfig::default()
        };
        LedgerService::new(ContractBinding::new(Address::repeat_byte(0x42), chain), &config)
    }

    #[tokio::test]
    async fn test_invalid_amount_checked_before_credential() {
        let chain = Arc::new(MockChain::default());
        let svc = service(chain.clone(), true);

        let err = svc
            .deposit(Credential::new("garbage"), Quantity::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidAmount(_)));
        assert_eq!(chain.nonce_queries(), 0);
    }

    #[tokio::test]
    async fn test_invalid_credential_makes_no_chain_queries() {
        let chain = Arc::new(MockChain::default());
        let svc = service(chain.clone(), true);

        let err = svc
            .withdraw(Credential::new("0x00"), Quantity(U256::from(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidCredential(_)));
        assert_eq!(chain.nonce_queries(), 0);
        assert_eq!(chain.submissions(), 0);
    }

    #[tokio::test]
    async fn test_serialized_concurrent_deposits_all_succeed() {
        let chain = Arc::new(MockChain::default());
        let svc = service(chain.clone(), true);

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let svc = svc.clone();
            tasks.push(tokio::spawn(async move {
                svc.deposit(Credential::new(TEST_PRIVATE_KEY), Quantity(U256::from(5)))
                    .await
            }));
        }

        let mut nonces = Vec::new();
        for task in tasks {
            nonces.push(task.await.unwrap().unwrap().nonce);
        }
        nonces.sort_unstable();
        assert_eq!(nonces, (0..8).collect::<Vec<u64>>());
        assert_eq!(chain.submitted().await.len(), 8);
    }

    #[tokio::test]
    async fn test_lock_table_drains_after_many_identities() {
        let chain = Arc::new(MockChain::default());
        let svc = service(chain.clone(), true);

        let mut tasks = Vec::new();
        for i in 1..=16u64 {
            let svc = svc.clone();
            tasks.push(tokio::spawn(async move {
                svc.deposit(
                    Credential::new(format!("{:064x}", i)),
                    Quantity(U256::from(1)),
                )
                .await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(chain.submitted().await.len(), 16);
        assert_eq!(svc.locked_identities(), 0);
    }

    #[tokio::test]
    async fn test_sequential_deposits_advance_nonce_without_locks() {
        let chain = Arc::new(MockChain::default());
        let svc = service(chain.clone(), false);

        for expected in 0..3u64 {
            let handle = svc
                .deposit(Credential::new(TEST_PRIVATE_KEY), Quantity(U256::from(1)))
                .await
                .unwrap();
            assert_eq!(handle.nonce, expected);
        }
    }

    #[tokio::test]
    async fn test_reads_pass_through() {
        let chain = Arc::new(MockChain::default());
        chain.set_balance(U256::from(77));
        let svc = service(chain.clone(), true);

        assert_eq!(svc.balance().await.unwrap(), Quantity(U256::from(77)));
        assert_eq!(svc.admin().await.unwrap(), Address::ZERO);
        assert_eq!(svc.chain_id().await.unwrap(), ChainId(1337));
        assert_eq!(chain.submissions(), 0);
    }
}
