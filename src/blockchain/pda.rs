//! Program-derived address derivation.
//!
//! Every account the claim program owns lives at a PDA computed from a fixed
//! seed tag and, optionally, an entity key. The derivations are pure; nothing
//! here touches the network.

use mpl_token_metadata::accounts::Metadata;
use solana_sdk::pubkey::{Pubkey, MAX_SEED_LEN};

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Seed of the singleton configuration account.
pub const GLOBAL_SEED: &[u8] = b"Global";
/// Seed prefix of per-mint vault accounts.
pub const VAULT_SEED: &[u8] = b"Vault";
/// Seed prefix of per-user claim accounts.
pub const USER_SEED: &[u8] = b"User";

/// Address deriver bound to one deployment of the claim program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramAddresses {
    program_id: Pubkey,
}

impl ProgramAddresses {
    pub fn new(program_id: Pubkey) -> Self {
        Self { program_id }
    }

    pub fn program_id(&self) -> Pubkey {
        self.program_id
    }

    /// Global configuration account: seeds = ["Global"]
    pub fn global(&self) -> Pubkey {
        Pubkey::find_program_address(&[GLOBAL_SEED], &self.program_id).0
    }

    /// Vault token account for a mint: seeds = ["Vault", mint]
    pub fn vault(&self, mint: &Pubkey) -> Pubkey {
        Pubkey::find_program_address(&[VAULT_SEED, mint.as_ref()], &self.program_id).0
    }

    /// Claim bookkeeping account for a user: seeds = ["User", user]
    pub fn user(&self, user: &Pubkey) -> Pubkey {
        Pubkey::find_program_address(&[USER_SEED, user.as_ref()], &self.program_id).0
    }

    /// Mint created by `create_token`: seeds = [name]
    ///
    /// Fails only when the name exceeds the 32-byte seed limit.
    pub fn token_mint(&self, name: &str) -> BlockchainResult<Pubkey> {
        if name.len() > MAX_SEED_LEN {
            return Err(BlockchainError::InvalidSeed(format!(
                "token name '{}' is {} bytes, the limit is {}",
                name,
                name.len(),
                MAX_SEED_LEN
            )));
        }
        Ok(Pubkey::find_program_address(&[name.as_bytes()], &self.program_id).0)
    }

    /// Metaplex metadata account of a mint.
    pub fn metadata(mint: &Pubkey) -> Pubkey {
        Metadata::find_pda(mint).0
    }

    /// Associated token account of `owner` for `mint`.
    pub fn associated_token_account(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
        spl_associated_token_account::get_associated_token_address(owner, mint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::str::FromStr;

    fn addresses() -> ProgramAddresses {
        ProgramAddresses::new(
            Pubkey::from_str(crate::config::schema::DEFAULT_PROGRAM_ID).unwrap(),
        )
    }

    #[test]
    fn test_pda_derivation_deterministic() {
        let a = addresses();
        let b = addresses();
        let mint = Pubkey::new_unique();
        let user = Pubkey::new_unique();

        assert_eq!(a.global(), b.global());
        assert_eq!(a.vault(&mint), b.vault(&mint));
        assert_eq!(a.user(&user), b.user(&user));
        assert_eq!(a.token_mint("AOGO").unwrap(), b.token_mint("AOGO").unwrap());
    }

    #[test]
    fn test_pda_derivation_stable_across_runs() {
        // Fixed inputs, so this pins the result against process restarts.
        let a = addresses();
        let global = a.global();
        let (expected, _) = Pubkey::find_program_address(
            &[b"Global"],
            &Pubkey::from_str("FpcnrJntp15VXsF1H2sw1k5d63PMtXHGBiKiUh3pqoqh").unwrap(),
        );
        assert_eq!(global, expected);
    }

    #[test]
    fn test_pda_derivation_unique_per_seed() {
        let a = addresses();
        let key = Pubkey::new_unique();
        let vault = a.vault(&key);
        let user = a.user(&key);
        assert_ne!(vault, user);
        assert_ne!(vault, a.global());
        assert_ne!(user, a.global());
        // Name seeds carry no prefix, so a token named "Global" aliases the
        // global account.
        assert_eq!(a.token_mint("Global").unwrap(), a.global());
    }

    #[test]
    fn test_distinct_entities_never_collide() {
        let a = addresses();
        let mut seen = HashSet::new();
        for _ in 0..200 {
            let key = Pubkey::new_unique();
            assert!(seen.insert(a.vault(&key)));
            assert!(seen.insert(a.user(&key)));
        }
        let salt: u32 = rand::random();
        for i in 0..200 {
            let name = format!("tok-{salt}-{i}");
            assert!(seen.insert(a.token_mint(&name).unwrap()));
        }
        assert_eq!(seen.len(), 600);
    }

    #[test]
    fn test_different_program_ids_differ() {
        let a = addresses();
        let b = ProgramAddresses::new(Pubkey::new_unique());
        assert_ne!(a.global(), b.global());
    }

    #[test]
    fn test_token_name_seed_limit() {
        let a = addresses();
        assert!(a.token_mint(&"x".repeat(32)).is_ok());
        let err = a.token_mint(&"x".repeat(33)).unwrap_err();
        assert!(matches!(err, BlockchainError::InvalidSeed(_)));
    }

    #[test]
    fn test_metadata_lives_under_token_metadata_program() {
        let mint = Pubkey::new_unique();
        let (expected, _) = Pubkey::find_program_address(
            &[b"metadata", mpl_token_metadata::ID.as_ref(), mint.as_ref()],
            &mpl_token_metadata::ID,
        );
        assert_eq!(ProgramAddresses::metadata(&mint), expected);
        assert_eq!(
            mpl_token_metadata::ID.to_string(),
            "metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s"
        );
    }

    #[test]
    fn test_metadata_and_ata_are_deterministic() {
        let mint = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        assert_eq!(ProgramAddresses::metadata(&mint), ProgramAddresses::metadata(&mint));
        assert_eq!(
            ProgramAddresses::associated_token_account(&owner, &mint),
            ProgramAddresses::associated_token_account(&owner, &mint),
        );
        assert_ne!(
            ProgramAddresses::associated_token_account(&owner, &mint),
            ProgramAddresses::associated_token_account(&mint, &owner),
        );
    }
}
