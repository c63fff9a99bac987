//! Chain-specific types and error definitions.

use alloy::consensus::{Transaction, TxEnvelope};
use alloy::primitives::{Address, Bytes, TxHash, U256};
use thiserror::Error;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Errors reported by a chain client, before any classification.
#[derive(Debug, Clone, Error)]
pub enum ChainError {
    /// Connection, DNS or response decoding failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The RPC did not answer within the configured deadline.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// The node answered with a JSON-RPC error object.
    #[error("RPC error {code}: {message}")]
    Rejected {
        code: i64,
        message: String,
        /// Revert payload, when the node attached one.
        data: Option<Bytes>,
    },
}

/// Result type for chain client operations.
pub type ChainResult<T> = Result<T, ChainError>;

/// A signed transaction ready for `eth_sendRawTransaction`, together with the
/// identity that signed it.
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    pub from: Address,
    pub envelope: TxEnvelope,
}

impl SignedTransaction {
    pub fn hash(&self) -> TxHash {
        *self.envelope.tx_hash()
    }

    pub fn nonce(&self) -> u64 {
        self.envelope.nonce()
    }

    pub fn value(&self) -> U256 {
        self.envelope.value()
    }

    pub fn input(&self) -> &Bytes {
        self.envelope.input()
    }

    pub fn to(&self) -> Option<Address> {
        self.envelope.to()
    }
}
