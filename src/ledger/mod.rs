//! Ledger request orchestration.
//!
//! # Data Flow
//! ```text
//! HTTP handler (amount + credential)
//!     → service.rs (amount check, signer derivation)
//!     → locks.rs (per-identity mutex, optional)
//!     → AuthBuilder (nonce snapshot) → ContractGateway (sign + submit)
//! ```

pub mod locks;
pub mod service;

pub use locks::{IdentityGuard, IdentityLocks};
pub use service::LedgerService;
