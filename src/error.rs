//! Error taxonomy for authorization building and contract interaction.
//!
//! Raw [`ChainError`]s are reclassified here. Nothing above the gateway ever
//! sees a transport error that has not passed through [`GatewayError::from`].

use alloy::sol_types::{Panic, Revert, SolError};
use thiserror::Error;

use crate::blockchain::types::ChainError;

/// Reason reported when a revert carries no decodable payload.
pub const GENERIC_REVERT_REASON: &str = "execution reverted";

/// Node messages that mean the submitted nonce was already taken.
const NONCE_CONFLICT_MARKERS: &[&str] = &[
    "nonce too low",
    "already known",
    "replacement transaction underpriced",
    "nonce has already been used",
];

/// Errors surfaced by the gateway core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The secret is not a valid secp256k1 private key.
    #[error("invalid credential: {0}")]
    InvalidCredential(String),

    /// Transport or provider failure, including nonce conflicts.
    #[error("chain unavailable: {0}")]
    ChainUnavailable(String),

    /// On-chain logic rejected the call.
    #[error("contract reverted: {0}")]
    ContractReverted(String),

    /// Amount is zero, negative or not a number.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// The sender cannot pay for value plus gas.
    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),
}

impl GatewayError {
    /// Whether the caller may retry the same request unchanged.
    pub fn is_retriable(&self) -> bool {
        matches!(self, GatewayError::ChainUnavailable(_))
    }

    /// Stable label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::InvalidCredential(_) => "invalid_credential",
            GatewayError::ChainUnavailable(_) => "chain_unavailable",
            GatewayError::ContractReverted(_) => "contract_reverted",
            GatewayError::InvalidAmount(_) => "invalid_amount",
            GatewayError::InsufficientFunds(_) => "insufficient_funds",
        }
    }
}

impl From<ChainError> for GatewayError {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::Transport(msg) => GatewayError::ChainUnavailable(msg),
            ChainError::Timeout(secs) => {
                GatewayError::ChainUnavailable(format!("RPC timeout after {} seconds", secs))
            }
            ChainError::Rejected {
                code,
                message,
                data,
            } => classify_rejection(code, &message, data.as_ref().map(|b| &b[..])),
        }
    }
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

fn classify_rejection(code: i64, message: &str, data: Option<&[u8]>) -> GatewayError {
    if let Some(reason) = data.and_then(decode_revert_reason) {
        return GatewayError::ContractReverted(reason);
    }

    let lower = message.to_lowercase();
    if NONCE_CONFLICT_MARKERS.iter().any(|m| lower.contains(m)) {
        GatewayError::ChainUnavailable(format!("nonce conflict: {}", message))
    } else if lower.contains("insufficient funds") {
        GatewayError::InsufficientFunds(message.to_string())
    } else if lower.contains("revert") {
        GatewayError::ContractReverted(reason_from_message(message))
    } else {
        GatewayError::ChainUnavailable(format!("RPC error {}: {}", code, message))
    }
}

/// Decode `Error(string)` and `Panic(uint256)` revert payloads.
pub fn decode_revert_reason(data: &[u8]) -> Option<String> {
    if data.len() < 4 {
        return None;
    }
    if let Ok(revert) = Revert::abi_decode(data) {
        return Some(revert.reason);
    }
    if let Ok(panic) = Panic::abi_decode(data) {
        return Some(format!("panic code {}", panic.code));
    }
    None
}

/// Pull the reason out of node messages such as
/// `execution reverted: insufficient balance` or
/// `VM Exception while processing transaction: revert insufficient balance`.
fn reason_from_message(message: &str) -> String {
    for marker in ["execution reverted: ", "reverted with reason string ", "revert "] {
        if let Some(idx) = message.find(marker) {
            let reason = message[idx + marker.len()..].trim().trim_matches('\'');
            if !reason.is_empty() {
                return reason.to_string();
            }
        }
    }
    GENERIC_REVERT_REASON.to_string()
}
