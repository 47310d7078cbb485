//! Fixed-width token amount codec.
//!
//! Amounts are 8-byte unsigned integers. The program takes them as
//! little-endian instruction arguments; the vouchers and legacy tooling
//! use an 8-byte big-endian, zero-padded form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Width of an encoded amount in bytes.
pub const AMOUNT_WIDTH: usize = 8;

/// Token amount in base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(pub u64);

/// Error returned when an amount string or buffer cannot be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("invalid amount '{0}': expected an unsigned decimal integer that fits in 8 bytes")]
    Parse(String),
    #[error("invalid amount width: expected 8 bytes, got {0}")]
    Width(usize),
}

impl Amount {
    /// Instruction-argument form.
    pub fn to_le_bytes(self) -> [u8; AMOUNT_WIDTH] {
        self.0.to_le_bytes()
    }

    /// Zero-padded big-endian form.
    pub fn to_be_bytes(self) -> [u8; AMOUNT_WIDTH] {
        self.0.to_be_bytes()
    }

    pub fn from_le_slice(bytes: &[u8]) -> Result<Self, AmountError> {
        let array: [u8; AMOUNT_WIDTH] = bytes
            .try_into()
            .map_err(|_| AmountError::Width(bytes.len()))?;
        Ok(Self(u64::from_le_bytes(array)))
    }

    pub fn from_be_slice(bytes: &[u8]) -> Result<Self, AmountError> {
        let array: [u8; AMOUNT_WIDTH] = bytes
            .try_into()
            .map_err(|_| AmountError::Width(bytes.len()))?;
        Ok(Self(u64::from_be_bytes(array)))
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // u64::from_str accepts a leading '+', which the service never sends.
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AmountError::Parse(s.to_string()));
        }
        trimmed
            .parse::<u64>()
            .map(Self)
            .map_err(|_| AmountError::Parse(s.to_string()))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Amount> for u64 {
    fn from(value: Amount) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_big_endian_is_zero_padded() {
        assert_eq!(Amount(1000).to_be_bytes(), [0, 0, 0, 0, 0, 0, 0x03, 0xe8]);
        assert_eq!(Amount(0).to_be_bytes(), [0; 8]);
    }

    #[test]
    fn test_little_endian_matches_instruction_layout() {
        assert_eq!(Amount(1000).to_le_bytes(), [0xe8, 0x03, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_round_trip_boundaries() {
        for value in [0, 1, 255, 256, u32::MAX as u64, u64::MAX - 1, u64::MAX] {
            let amount = Amount(value);
            assert_eq!(Amount::from_be_slice(&amount.to_be_bytes()).unwrap(), amount);
            assert_eq!(Amount::from_le_slice(&amount.to_le_bytes()).unwrap(), amount);
            assert_eq!(amount.to_string().parse::<Amount>().unwrap(), amount);
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<Amount>().is_err());
        assert!("-1".parse::<Amount>().is_err());
        assert!("+1".parse::<Amount>().is_err());
        assert!("1.5".parse::<Amount>().is_err());
        assert!("18446744073709551616".parse::<Amount>().is_err());
        assert_eq!(" 42 ".parse::<Amount>().unwrap(), Amount(42));
    }

    #[test]
    fn test_wrong_width() {
        assert_eq!(Amount::from_be_slice(&[1, 2, 3]), Err(AmountError::Width(3)));
    }
}
