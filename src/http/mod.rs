//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, timeout, limits)
//!     → handlers.rs (extract amount + body, call LedgerService)
//!     → request.rs (DepositRequest schema)
//!     → response.rs (ApiError → 500 + JSON message)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{DepositRequest, X_REQUEST_ID};
pub use response::ApiError;
pub use server::{AppState, HttpServer};
