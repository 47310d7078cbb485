//! Claim voucher types.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

use crate::blockchain::ed25519::SIGNATURE_SIZE;
use crate::blockchain::Amount;
use crate::claims::ClaimServiceError;

/// Response envelope used by every service endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// `amount` as sent by the service: normally a decimal string, occasionally
/// a bare JSON number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountField {
    Text(String),
    Number(u64),
}

/// Claim parameters exactly as the service returns them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimParams {
    pub amount: AmountField,
    /// Base58 signed message.
    pub message: String,
    /// Base58 detached Ed25519 signature over `message`.
    pub signature: String,
    /// Base58 authorizer public key.
    pub signer: String,
    /// Base58 token mint.
    pub mint: String,
}

/// A decoded, ready-to-submit claim authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimVoucher {
    pub claimant: Pubkey,
    pub mint: Pubkey,
    pub amount: Amount,
    pub authorizer: Pubkey,
    pub signature: [u8; SIGNATURE_SIZE],
    pub message: Vec<u8>,
}

fn decode_error(field: &'static str, reason: impl std::fmt::Display) -> ClaimServiceError {
    ClaimServiceError::Decode {
        field,
        reason: reason.to_string(),
    }
}

fn decode_pubkey(field: &'static str, value: &str) -> Result<Pubkey, ClaimServiceError> {
    Pubkey::from_str(value).map_err(|e| decode_error(field, e))
}

impl ClaimParams {
    /// Decode the wire fields into a voucher for `claimant`.
    pub fn into_voucher(self, claimant: Pubkey) -> Result<ClaimVoucher, ClaimServiceError> {
        let amount = match &self.amount {
            AmountField::Text(text) => text
                .parse::<Amount>()
                .map_err(|e| decode_error("amount", e))?,
            AmountField::Number(value) => Amount(*value),
        };

        let message = bs58::decode(&self.message)
            .into_vec()
            .map_err(|e| decode_error("message", e))?;

        let signature_bytes = bs58::decode(&self.signature)
            .into_vec()
            .map_err(|e| decode_error("signature", e))?;
        let signature: [u8; SIGNATURE_SIZE] = signature_bytes.as_slice().try_into().map_err(|_| {
            decode_error(
                "signature",
                format!("expected {} bytes, got {}", SIGNATURE_SIZE, signature_bytes.len()),
            )
        })?;

        Ok(ClaimVoucher {
            claimant,
            mint: decode_pubkey("mint", &self.mint)?,
            amount,
            authorizer: decode_pubkey("signer", &self.signer)?,
            signature,
            message,
        })
    }
}
