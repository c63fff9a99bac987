//! Per-request credentials and signer derivation.
//!
//! # Security
//! - Secrets arrive with each request and are never persisted
//! - Secrets are never logged or serialized; `Debug` is redacted
//! - A credential is consumed when its signer is derived

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use serde::Deserialize;

use crate::error::{GatewayError, GatewayResult};

/// Environment variable holding the key used to deploy the contract at startup.
pub const DEPLOYER_KEY_ENV_VAR: &str = "LEDGER_DEPLOYER_PRIVATE_KEY";

/// Length of a secp256k1 private key in hex characters.
const PRIVATE_KEY_HEX_LEN: usize = 64;

/// A raw private key supplied by a caller.
#[derive(Clone, Deserialize)]
#[serde(transparent)]
pub struct Credential {
    secret: String,
}

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Load the deployer credential from the environment.
    pub fn from_env() -> GatewayResult<Self> {
        let secret = std::env::var(DEPLOYER_KEY_ENV_VAR).map_err(|_| {
            GatewayError::InvalidCredential(format!(
                "Environment variable {} not set",
                DEPLOYER_KEY_ENV_VAR
            ))
        })?;
        Ok(Self::new(secret))
    }

    /// Derive the signer, consuming the credential.
    ///
    /// Accepts 64 hex characters with or without a `0x` prefix. Fails with
    /// `InvalidCredential` for anything else, including scalars outside the
    /// curve order.
    pub fn into_signer(self) -> GatewayResult<PrivateKeySigner> {
        let trimmed = self.secret.trim();
        let key_hex = trimmed.strip_prefix("0x").unwrap_or(trimmed);

        if key_hex.len() != PRIVATE_KEY_HEX_LEN {
            return Err(GatewayError::InvalidCredential(format!(
                "expected {} hex characters, got {}",
                PRIVATE_KEY_HEX_LEN,
                key_hex.len()
            )));
        }
        if !key_hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(GatewayError::InvalidCredential(
                "private key is not hex encoded".to_string(),
            ));
        }

        key_hex
            .parse::<PrivateKeySigner>()
            .map_err(|e| GatewayError::InvalidCredential(format!("Invalid private key: {}", e)))
    }

    /// Derive the identity without keeping the signer around.
    pub fn identity(self) -> GatewayResult<Address> {
        self.into_signer().map(|signer| signer.address())
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known test private key (Anvil's first account)
    const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TEST_ADDRESS: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

    #[test]
    fn test_identity_from_private_key() {
        let address = Credential::new(TEST_PRIVATE_KEY).identity().unwrap();
        assert_eq!(address.to_string().to_lowercase(), TEST_ADDRESS);
    }

    #[test]
    fn test_identity_with_0x_prefix() {
        let address = Credential::new(format!("0x{}", TEST_PRIVATE_KEY))
            .identity()
            .unwrap();
        assert_eq!(address.to_string().to_lowercase(), TEST_ADDRESS);
    }

    #[test]
    fn test_invalid_private_keys() {
        for secret in [
            "",
            "invalid_key",
            "0x1234",
            "zz0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
            // zero is not a valid scalar
            "0000000000000000000000000000000000000000000000000000000000000000",
            // above the secp256k1 group order
            "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
        ] {
            let result = Credential::new(secret).into_signer();
            assert!(
                matches!(result, Err(GatewayError::InvalidCredential(_))),
                "secret {:?} should be rejected",
                secret
            );
        }
    }

    #[test]
    fn test_debug_is_redacted() {
        let credential = Credential::new(TEST_PRIVATE_KEY);
        let rendered = format!("{:?}", credential);
        assert!(!rendered.contains("ac0974"));
        assert!(rendered.contains("redacted"));
    }

    #[test]
    fn test_deserialize_from_json_string() {
        let credential: Credential = serde_json::from_str(&format!("\"{}\"", TEST_PRIVATE_KEY)).unwrap();
        assert!(credential.into_signer().is_ok());
    }
}
