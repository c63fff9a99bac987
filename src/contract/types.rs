//! Result shapes returned by the contract gateway.

use alloy::primitives::{Address, TxHash, U256};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::GatewayError;

/// An on-chain integer amount, serialized as a decimal string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Quantity(pub U256);

impl Quantity {
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl From<U256> for Quantity {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl From<u128> for Quantity {
    fn from(value: u128) -> Self {
        Self(U256::from(value))
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Quantity {
    type Err = GatewayError;

    /// Parse a non-negative decimal integer. Signs, hex prefixes and
    /// fractional parts are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(GatewayError::InvalidAmount(format!(
                "'{}' is not a non-negative decimal integer",
                s
            )));
        }
        U256::from_str_radix(s, 10)
            .map(Self)
            .map_err(|_| GatewayError::InvalidAmount(format!("'{}' does not fit in 256 bits", s)))
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A write call accepted by the node. Confirmation is not tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionHandle {
    pub hash: TxHash,
    pub from: Address,
    pub to: Address,
    pub nonce: u64,
    /// Native amount attached to the transaction.
    pub value: Quantity,
    /// Amount passed to the contract entry point.
    pub amount: Quantity,
    pub gas_limit: u64,
    pub gas_price: Quantity,
    pub chain_id: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_parse() {
        assert_eq!("100".parse::<Quantity>().unwrap(), Quantity(U256::from(100)));
        assert_eq!("0".parse::<Quantity>().unwrap(), Quantity::default());
        for bad in ["", "-5", "+5", "1.5", "0x10", "abc", "1e3"] {
            assert!(
                matches!(bad.parse::<Quantity>(), Err(GatewayError::InvalidAmount(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_quantity_overflow() {
        let too_big = format!("{}0", U256::MAX);
        assert!(too_big.parse::<Quantity>().is_err());
    }

    #[test]
    fn test_quantity_serializes_as_decimal_string() {
        let q = Quantity(U256::from(100_000_000_000_000_000_000u128));
        assert_eq!(serde_json::to_string(&q).unwrap(), "\"100000000000000000000\"");
    }

    #[test]
    fn test_handle_json_shape() {
        let handle = TransactionHandle {
            hash: TxHash::repeat_byte(0xab),
            from: Address::repeat_byte(0x01),
            to: Address::repeat_byte(0x02),
            nonce: 5,
            value: Quantity(U256::from(100)),
            amount: Quantity(U256::from(100)),
            gas_limit: 3_000_000,
            gas_price: Quantity::from(1_000_000u128),
            chain_id: 1337,
        };
        let json = serde_json::to_value(&handle).unwrap();
        assert_eq!(json["nonce"], 5);
        assert_eq!(json["value"], "100");
        assert_eq!(json["gasLimit"], 3_000_000);
        assert_eq!(json["chainId"], 1337);
        assert!(json["hash"].as_str().unwrap().starts_with("0xabab"));
    }
}
