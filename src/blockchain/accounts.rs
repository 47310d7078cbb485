//! Typed decoders for on-chain account data.
//!
//! Program accounts start with the Anchor account discriminator
//! `sha256("account:<Name>")[..8]`; the fixed-layout fields follow in
//! declaration order. Trailing bytes (padding, fields added by later program
//! versions) are ignored.

use borsh::BorshDeserialize;
use mpl_token_metadata::accounts::Metadata;
use mpl_token_metadata::types::Key;
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Anchor account discriminator.
pub fn account_discriminator(name: &str) -> [u8; 8] {
    let preimage = format!("account:{}", name);
    let hash = solana_sdk::hash::hash(preimage.as_bytes());
    let mut disc = [0u8; 8];
    disc.copy_from_slice(&hash.to_bytes()[..8]);
    disc
}

fn layout_error(account: &str, reason: impl Into<String>) -> BlockchainError {
    BlockchainError::Layout {
        account: account.to_string(),
        reason: reason.into(),
    }
}

fn decode_anchor<T: BorshDeserialize>(name: &str, data: &[u8]) -> BlockchainResult<T> {
    let expected = account_discriminator(name);
    match data.get(..8) {
        Some(disc) if disc == expected => {}
        Some(_) => return Err(layout_error(name, "discriminator mismatch")),
        None => return Err(layout_error(name, format!("{} bytes is too short", data.len()))),
    }
    let mut body = &data[8..];
    T::deserialize(&mut body).map_err(|e| layout_error(name, e.to_string()))
}

#[derive(BorshDeserialize)]
struct GlobalAccountLayout {
    admin: [u8; 32],
    signer: [u8; 32],
}

/// Singleton configuration account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GlobalAccount {
    #[serde(serialize_with = "as_base58")]
    pub admin: Pubkey,
    /// Key whose vouchers the program accepts.
    #[serde(serialize_with = "as_base58")]
    pub authorizer: Pubkey,
}

impl GlobalAccount {
    pub const NAME: &'static str = "GlobalAccount";

    pub fn decode(data: &[u8]) -> BlockchainResult<Self> {
        let raw: GlobalAccountLayout = decode_anchor(Self::NAME, data)?;
        Ok(Self {
            admin: Pubkey::new_from_array(raw.admin),
            authorizer: Pubkey::new_from_array(raw.signer),
        })
    }
}

#[derive(BorshDeserialize)]
struct UserAccountLayout {
    owner: [u8; 32],
    claimed_amount: u64,
}

/// Per-user claim bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserAccount {
    #[serde(serialize_with = "as_base58")]
    pub owner: Pubkey,
    pub claimed_amount: u64,
}

impl UserAccount {
    pub const NAME: &'static str = "UserAccount";

    pub fn decode(data: &[u8]) -> BlockchainResult<Self> {
        let raw: UserAccountLayout = decode_anchor(Self::NAME, data)?;
        Ok(Self {
            owner: Pubkey::new_from_array(raw.owner),
            claimed_amount: raw.claimed_amount,
        })
    }
}

/// Identity fields of a Metaplex metadata account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenMetadata {
    #[serde(serialize_with = "as_base58")]
    pub update_authority: Pubkey,
    #[serde(serialize_with = "as_base58")]
    pub mint: Pubkey,
    pub name: String,
    pub symbol: String,
    pub uri: String,
}

impl TokenMetadata {
    pub fn decode(data: &[u8]) -> BlockchainResult<Self> {
        let metadata = Metadata::safe_deserialize(data)
            .map_err(|e| layout_error("Metadata", e.to_string()))?;
        if metadata.key != Key::MetadataV1 {
            return Err(layout_error(
                "Metadata",
                format!("unexpected key {:?}", metadata.key),
            ));
        }
        // Metaplex pads the fixed-capacity strings with NULs.
        let trim = |s: &str| s.trim_end_matches('\0').to_string();
        Ok(Self {
            update_authority: metadata.update_authority,
            mint: metadata.mint,
            name: trim(&metadata.name),
            symbol: trim(&metadata.symbol),
            uri: trim(&metadata.uri),
        })
    }
}

fn as_base58<S: serde::Serializer>(key: &Pubkey, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(key)
}
