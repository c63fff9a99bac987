//! Ledger contract subsystem.
//!
//! # Data Flow
//! ```text
//! Startup: bootstrap.rs (attach or deploy) → ContractBinding
//! Request: gateway.rs (ABI encode via bindings.rs) → ChainClient
//!          → TransactionHandle / Quantity (types.rs)
//! ```

pub mod bindings;
pub mod bootstrap;
pub mod gateway;
pub mod types;

pub use bootstrap::{bind_contract, BootstrapError};
pub use gateway::{ContractBinding, ContractGateway, WriteOp};
pub use types::{Quantity, TransactionHandle};
