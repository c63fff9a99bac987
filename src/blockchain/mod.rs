//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Request body (raw private key)
//!     → wallet.rs (credential → signer + identity)
//!     → transaction.rs (pending nonce + chain ID + gas → Authorization → signed tx)
//!     → client.rs (ChainClient: JSON-RPC with timeouts)
//! ```
//!
//! # Security Constraints
//! - Private keys arrive per request and are dropped once signed
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod mock;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::{ChainClient, RpcChainClient};
pub use transaction::{AuthBuilder, Authorization, GasSettings};
pub use types::{ChainError, ChainId, SignedTransaction};
pub use wallet::Credential;
