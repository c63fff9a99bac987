//! In-memory chain client for tests and local development.
//!
//! Tracks pending nonces per identity, rejects duplicate nonces the way a
//! node does, answers the ledger contract's read calls from fixed state and
//! can be scripted to fail, revert or stall.

use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::{Revert, SolCall, SolError, SolValue};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::blockchain::client::ChainClient;
use crate::blockchain::types::{ChainError, ChainId, ChainResult, SignedTransaction};
use crate::contract::bindings::LedgerContract;

/// Scripted failure, active until cleared with `set_failure(None)`.
#[derive(Debug, Clone)]
pub enum MockFailure {
    /// Every operation fails with a transport error.
    Unreachable,
    /// Submissions revert with the given reason.
    RevertOnSubmit(String),
    /// Read calls revert with the given reason.
    RevertOnCall(String),
}

/// Mock chain state.
pub struct MockChain {
    chain_id: AtomicU64,
    nonces: DashMap<Address, u64>,
    balance: RwLock<U256>,
    admin: RwLock<Address>,
    failure: RwLock<Option<MockFailure>>,
    latency: RwLock<Duration>,
    submitted: Mutex<Vec<SignedTransaction>>,
    nonce_queries: AtomicUsize,
    chain_id_queries: AtomicUsize,
    submissions: AtomicUsize,
    calls: AtomicUsize,
}

impl MockChain {
    /// Create a mock chain with the given chain ID and empty state.
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id: AtomicU64::new(chain_id),
            nonces: DashMap::new(),
            balance: RwLock::new(U256::ZERO),
            admin: RwLock::new(Address::ZERO),
            failure: RwLock::new(None),
            latency: RwLock::new(Duration::ZERO),
            submitted: Mutex::new(Vec::new()),
            nonce_queries: AtomicUsize::new(0),
            chain_id_queries: AtomicUsize::new(0),
            submissions: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    /// Set the pending nonce reported for `address`.
    pub fn set_nonce(&self, address: Address, nonce: u64) {
        self.nonces.insert(address, nonce);
    }

    /// Set the value returned by the contract's `balance()`.
    pub fn set_balance(&self, balance: U256) {
        if let Ok(mut guard) = self.balance.write() {
            *guard = balance;
        }
    }

    /// Set the value returned by the contract's `admin()`.
    pub fn set_admin(&self, admin: Address) {
        if let Ok(mut guard) = self.admin.write() {
            *guard = admin;
        }
    }

    /// Install (or clear) a scripted failure.
    pub fn set_failure(&self, failure: Option<MockFailure>) {
        if let Ok(mut guard) = self.failure.write() {
            *guard = failure;
        }
    }

    /// Delay every chain operation by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        if let Ok(mut guard) = self.latency.write() {
            *guard = latency;
        }
    }

    /// Transactions accepted so far, in submission order.
    pub async fn submitted(&self) -> Vec<SignedTransaction> {
        self.submitted.lock().await.clone()
    }

    pub fn nonce_queries(&self) -> usize {
        self.nonce_queries.load(Ordering::SeqCst)
    }

    pub fn chain_id_queries(&self) -> usize {
        self.chain_id_queries.load(Ordering::SeqCst)
    }

    /// Submission attempts, accepted or not.
    pub fn submissions(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn failure(&self) -> Option<MockFailure> {
        self.failure.read().ok().and_then(|guard| guard.clone())
    }

    async fn delay(&self) {
        let latency = self.latency.read().map(|guard| *guard).unwrap_or_default();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }

    fn check_reachable(&self) -> ChainResult<()> {
        match self.failure() {
            Some(MockFailure::Unreachable) => Err(ChainError::Transport(
                "error sending request: Connection refused".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn revert(reason: &str) -> ChainError {
        ChainError::Rejected {
            code: 3,
            message: "execution reverted".to_string(),
            data: Some(
                Revert {
                    reason: reason.to_string(),
                }
                .abi_encode()
                .into(),
            ),
        }
    }

    fn read_balance(&self) -> U256 {
        self.balance.read().map(|guard| *guard).unwrap_or_default()
    }

    fn read_admin(&self) -> Address {
        self.admin.read().map(|guard| *guard).unwrap_or_default()
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn pending_nonce(&self, address: Address) -> ChainResult<u64> {
        self.nonce_queries.fetch_add(1, Ordering::SeqCst);
        self.delay().await;
        self.check_reachable()?;
        Ok(self.nonces.get(&address).map(|n| *n).unwrap_or(0))
    }

    async fn chain_id(&self) -> ChainResult<ChainId> {
        self.chain_id_queries.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;
        Ok(ChainId(self.chain_id.load(Ordering::SeqCst)))
    }

    async fn submit(&self, tx: SignedTransaction) -> ChainResult<TxHash> {
        self.submissions.fetch_add(1, Ordering::SeqCst);
        self.delay().await;
        self.check_reachable()?;
        if let Some(MockFailure::RevertOnSubmit(reason)) = self.failure() {
            return Err(Self::revert(&reason));
        }

        // The entry guard makes check-and-increment atomic per identity.
        {
            let mut expected = self.nonces.entry(tx.from).or_insert(0);
            if tx.nonce() < *expected {
                return Err(ChainError::Rejected {
                    code: -32000,
                    message: "nonce too low".to_string(),
                    data: None,
                });
            }
            if tx.nonce() > *expected {
                return Err(ChainError::Rejected {
                    code: -32000,
                    message: format!("nonce too high: expected {}, got {}", *expected, tx.nonce()),
                    data: None,
                });
            }
            *expected += 1;
        }

        let hash = tx.hash();
        self.submitted.lock().await.push(tx);
        Ok(hash)
    }

    async fn call(&self, request: TransactionRequest) -> ChainResult<Bytes> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.delay().await;
        self.check_reachable()?;
        if let Some(MockFailure::RevertOnCall(reason)) = self.failure() {
            return Err(Self::revert(&reason));
        }

        let input = request.input.input().cloned().unwrap_or_default();
        let selector = input.get(..4).unwrap_or_default();
        if selector == &LedgerContract::balanceCall::SELECTOR[..] {
            Ok(self.read_balance().abi_encode().into())
        } else if selector == &LedgerContract::adminCall::SELECTOR[..] {
            Ok(self.read_admin().abi_encode().into())
        } else {
            Err(Self::revert("unknown selector"))
        }
    }
}

impl Default for MockChain {
    fn default() -> Self {
        Self::new(1337)
    }
}
