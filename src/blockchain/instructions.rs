//! Claim program instruction encoding.
//!
//! Instruction data is the 8-byte Anchor discriminator
//! `sha256("global:<name>")[..8]` followed by borsh-encoded arguments.
//! Account lists are in the order the program declares them.

use borsh::BorshSerialize;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::{system_program, sysvar};

use crate::blockchain::amount::Amount;
use crate::blockchain::ed25519::SIGNATURE_SIZE;
use crate::blockchain::pda::ProgramAddresses;
use crate::blockchain::types::BlockchainResult;

pub const INITIALIZE: &str = "initialize";
pub const INITIALIZE_VAULT: &str = "initialize_vault";
pub const CREATE_TOKEN: &str = "create_token";
pub const MINT_TOKEN: &str = "mint_token";
pub const CLAIM: &str = "claim";
pub const EMERGENCY_WITHDRAW: &str = "emergency_withdraw";

/// Anchor instruction discriminator.
pub fn anchor_discriminator(name: &str) -> [u8; 8] {
    let preimage = format!("global:{}", name);
    let hash = solana_sdk::hash::hash(preimage.as_bytes());
    let mut disc = [0u8; 8];
    disc.copy_from_slice(&hash.to_bytes()[..8]);
    disc
}

fn build_instruction(
    program_id: Pubkey,
    name: &str,
    accounts: Vec<AccountMeta>,
    args: impl BorshSerialize,
) -> BlockchainResult<Instruction> {
    let mut data = anchor_discriminator(name).to_vec();
    args.serialize(&mut data)?;
    Ok(Instruction {
        program_id,
        accounts,
        data,
    })
}

#[derive(BorshSerialize)]
struct InitializeArgs {
    signer: [u8; 32],
}

#[derive(BorshSerialize)]
struct CreateTokenArgs<'a> {
    name: &'a str,
    symbol: &'a str,
    uri: &'a str,
}

#[derive(BorshSerialize)]
struct MintTokenArgs<'a> {
    name: &'a str,
    amount: [u8; 8],
}

#[derive(BorshSerialize)]
struct ClaimArgs {
    amount: [u8; 8],
    signature: [u8; SIGNATURE_SIZE],
}

#[derive(BorshSerialize)]
struct AmountArgs {
    amount: [u8; 8],
}

/// Instruction builders for one deployment of the claim program.
#[derive(Debug, Clone, Copy)]
pub struct ClaimProgram {
    addresses: ProgramAddresses,
}

impl ClaimProgram {
    pub fn new(addresses: ProgramAddresses) -> Self {
        Self { addresses }
    }

    pub fn addresses(&self) -> &ProgramAddresses {
        &self.addresses
    }

    pub fn program_id(&self) -> Pubkey {
        self.addresses.program_id()
    }

    /// Create the global account and record the voucher authorizer.
    pub fn initialize(&self, admin: &Pubkey, authorizer: &Pubkey) -> BlockchainResult<Instruction> {
        let accounts = vec![
            AccountMeta::new(*admin, true),
            AccountMeta::new(self.addresses.global(), false),
            AccountMeta::new_readonly(sysvar::rent::id(), false),
            AccountMeta::new_readonly(system_program::id(), false),
        ];
        build_instruction(
            self.program_id(),
            INITIALIZE,
            accounts,
            InitializeArgs {
                signer: authorizer.to_bytes(),
            },
        )
    }

    /// Create the vault token account for `mint`.
    pub fn initialize_vault(&self, admin: &Pubkey, mint: &Pubkey) -> BlockchainResult<Instruction> {
        let accounts = vec![
            AccountMeta::new(*admin, true),
            AccountMeta::new(self.addresses.vault(mint), false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(sysvar::rent::id(), false),
            AccountMeta::new_readonly(system_program::id(), false),
        ];
        build_instruction(self.program_id(), INITIALIZE_VAULT, accounts, ())
    }

    /// Create the name-seeded mint together with its Metaplex metadata.
    pub fn create_token(
        &self,
        admin: &Pubkey,
        name: &str,
        symbol: &str,
        uri: &str,
    ) -> BlockchainResult<Instruction> {
        let token_mint = self.addresses.token_mint(name)?;
        let accounts = vec![
            AccountMeta::new(*admin, true),
            AccountMeta::new(self.addresses.global(), false),
            AccountMeta::new(ProgramAddresses::metadata(&token_mint), false),
            AccountMeta::new(token_mint, false),
            AccountMeta::new_readonly(mpl_token_metadata::ID, false),
            AccountMeta::new_readonly(spl_token::id(), false),
            AccountMeta::new_readonly(sysvar::rent::id(), false),
            AccountMeta::new_readonly(system_program::id(), false),
        ];
        build_instruction(
            self.program_id(),
            CREATE_TOKEN,
            accounts,
            CreateTokenArgs { name, symbol, uri },
        )
    }

    /// Mint `amount` of the named token into `recipient_token_account`.
    pub fn mint_token(
        &self,
        admin: &Pubkey,
        name: &str,
        recipient_token_account: &Pubkey,
        amount: Amount,
    ) -> BlockchainResult<Instruction> {
        let accounts = vec![
            AccountMeta::new(*admin, true),
            AccountMeta::new(self.addresses.global(), false),
            AccountMeta::new(self.addresses.token_mint(name)?, false),
            AccountMeta::new(*recipient_token_account, false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(spl_token::id(), false),
        ];
        build_instruction(
            self.program_id(),
            MINT_TOKEN,
            accounts,
            MintTokenArgs {
                name,
                amount: amount.to_le_bytes(),
            },
        )
    }

    /// Claim instruction. Must directly follow the matching Ed25519
    /// verification instruction in the same transaction.
    pub fn claim(
        &self,
        user: &Pubkey,
        mint: &Pubkey,
        amount: Amount,
        signature: &[u8; SIGNATURE_SIZE],
    ) -> BlockchainResult<Instruction> {
        let accounts = vec![
            AccountMeta::new(*user, true),
            AccountMeta::new(self.addresses.global(), false),
            AccountMeta::new(self.addresses.vault(mint), false),
            AccountMeta::new(ProgramAddresses::associated_token_account(user, mint), false),
            AccountMeta::new(self.addresses.user(user), false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(spl_token::id(), false),
            AccountMeta::new_readonly(sysvar::instructions::id(), false),
            AccountMeta::new_readonly(spl_associated_token_account::id(), false),
            AccountMeta::new_readonly(system_program::id(), false),
        ];
        build_instruction(
            self.program_id(),
            CLAIM,
            accounts,
            ClaimArgs {
                amount: amount.to_le_bytes(),
                signature: *signature,
            },
        )
    }

    /// Move `amount` out of the vault into `recipient_token_account`.
    pub fn emergency_withdraw(
        &self,
        admin: &Pubkey,
        mint: &Pubkey,
        recipient_token_account: &Pubkey,
        amount: Amount,
    ) -> BlockchainResult<Instruction> {
        let accounts = vec![
            AccountMeta::new(*admin, true),
            AccountMeta::new(self.addresses.global(), false),
            AccountMeta::new(self.addresses.vault(mint), false),
            AccountMeta::new(*recipient_token_account, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(spl_token::id(), false),
            AccountMeta::new_readonly(spl_associated_token_account::id(), false),
            AccountMeta::new_readonly(system_program::id(), false),
        ];
        build_instruction(
            self.program_id(),
            EMERGENCY_WITHDRAW,
            accounts,
            AmountArgs {
                amount: amount.to_le_bytes(),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn program() -> ClaimProgram {
        ClaimProgram::new(ProgramAddresses::new(Pubkey::new_unique()))
    }

    #[test]
    fn test_anchor_discriminator_unique_per_instruction() {
        let names = [
            INITIALIZE,
            INITIALIZE_VAULT,
            CREATE_TOKEN,
            MINT_TOKEN,
            CLAIM,
            EMERGENCY_WITHDRAW,
        ];
        for (i, a) in names.iter().enumerate() {
            for b in &names[i + 1..] {
                assert_ne!(anchor_discriminator(a), anchor_discriminator(b));
            }
        }
    }

    #[test]
    fn test_anchor_discriminator_known_value() {
        // sha256("global:initialize")[..8]
        assert_eq!(
            anchor_discriminator(INITIALIZE),
            [0xaf, 0xaf, 0x6d, 0x1f, 0x0d, 0x98, 0x9b, 0xed]
        );
    }

    #[test]
    fn test_initialize_layout() {
        let program = program();
        let admin = Pubkey::new_unique();
        let authorizer = Pubkey::new_unique();
        let ix = program.initialize(&admin, &authorizer).unwrap();

        assert_eq!(ix.program_id, program.program_id());
        assert_eq!(ix.data.len(), 8 + 32);
        assert_eq!(&ix.data[8..], authorizer.as_ref());
        assert_eq!(ix.accounts[0], AccountMeta::new(admin, true));
        assert_eq!(ix.accounts[1].pubkey, program.addresses().global());
        assert_eq!(ix.accounts[2].pubkey, sysvar::rent::id());
        assert_eq!(ix.accounts[3].pubkey, system_program::id());
    }

    #[test]
    fn test_initialize_vault_has_no_args() {
        let program = program();
        let mint = Pubkey::new_unique();
        let ix = program.initialize_vault(&Pubkey::new_unique(), &mint).unwrap();
        assert_eq!(ix.data, anchor_discriminator(INITIALIZE_VAULT).to_vec());
        assert_eq!(ix.accounts[1].pubkey, program.addresses().vault(&mint));
        assert_eq!(ix.accounts[2], AccountMeta::new_readonly(mint, false));
    }

    #[test]
    fn test_create_token_encodes_strings() {
        let program = program();
        let ix = program
            .create_token(&Pubkey::new_unique(), "Aogo", "AOGO", "https://x/y.json")
            .unwrap();

        let mut expected = anchor_discriminator(CREATE_TOKEN).to_vec();
        for s in ["Aogo", "AOGO", "https://x/y.json"] {
            expected.extend_from_slice(&(s.len() as u32).to_le_bytes());
            expected.extend_from_slice(s.as_bytes());
        }
        assert_eq!(ix.data, expected);

        let mint = program.addresses().token_mint("Aogo").unwrap();
        assert_eq!(ix.accounts[2].pubkey, ProgramAddresses::metadata(&mint));
        assert_eq!(ix.accounts[3].pubkey, mint);
        assert_eq!(ix.accounts[4].pubkey, mpl_token_metadata::ID);
        assert_eq!(ix.accounts.len(), 8);
    }

    #[test]
    fn test_mint_token_args() {
        let program = program();
        let ata = Pubkey::new_unique();
        let ix = program
            .mint_token(&Pubkey::new_unique(), "Aogo", &ata, Amount(5))
            .unwrap();
        let disc = anchor_discriminator(MINT_TOKEN);
        assert_eq!(&ix.data[..8], &disc);
        assert_eq!(&ix.data[8..12], &4u32.to_le_bytes());
        assert_eq!(&ix.data[12..16], b"Aogo");
        assert_eq!(&ix.data[16..], &5u64.to_le_bytes());
        assert_eq!(ix.accounts[3].pubkey, ata);
    }

    #[test]
    fn test_claim_accounts_and_args() {
        let program = program();
        let user = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let signature = [9u8; SIGNATURE_SIZE];
        let ix = program.claim(&user, &mint, Amount(1000), &signature).unwrap();

        assert_eq!(ix.data.len(), 8 + 8 + 64);
        assert_eq!(&ix.data[8..16], &1000u64.to_le_bytes());
        assert_eq!(&ix.data[16..], &signature[..]);

        let keys: Vec<_> = ix.accounts.iter().map(|a| a.pubkey).collect();
        assert_eq!(
            keys,
            vec![
                user,
                program.addresses().global(),
                program.addresses().vault(&mint),
                ProgramAddresses::associated_token_account(&user, &mint),
                program.addresses().user(&user),
                mint,
                spl_token::id(),
                sysvar::instructions::id(),
                spl_associated_token_account::id(),
                system_program::id(),
            ]
        );
        assert!(ix.accounts[0].is_signer);
        assert!(ix.accounts[1..].iter().all(|a| !a.is_signer));
    }

    #[test]
    fn test_emergency_withdraw_args() {
        let program = program();
        let ix = program
            .emergency_withdraw(
                &Pubkey::new_unique(),
                &Pubkey::new_unique(),
                &Pubkey::new_unique(),
                Amount(u64::MAX),
            )
            .unwrap();
        assert_eq!(&ix.data[8..], &[0xff; 8]);
        assert_eq!(ix.accounts.len(), 8);
    }

    #[test]
    fn test_long_token_name_rejected() {
        let program = program();
        assert!(program
            .create_token(&Pubkey::new_unique(), &"n".repeat(40), "S", "u")
            .is_err());
    }
}
