//! Ledger gateway library.
//!
//! Exposes a deployed ledger contract (balance, admin, deposit, withdrawal)
//! over HTTP, signing transactions with caller-supplied keys.

pub mod blockchain;
pub mod config;
pub mod contract;
pub mod error;
pub mod http;
pub mod ledger;
pub mod lifecycle;
pub mod observability;

pub use config::schema::GatewayConfig;
pub use error::{GatewayError, GatewayResult};
pub use http::HttpServer;
pub use ledger::LedgerService;
pub use lifecycle::Shutdown;
