//! Transaction building, signing, and confirmation monitoring.
//!
//! # Responsibilities
//! - Assemble one transaction per program operation
//! - Create missing recipient token accounts in the same transaction
//! - Sign, broadcast, and wait for confirmation (no resubmission)
//! - Read and decode program accounts

use std::time::Duration;

use solana_sdk::instruction::Instruction;
use solana_sdk::message::Message;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature, Signer};
use solana_sdk::transaction::Transaction;
use spl_associated_token_account::instruction::create_associated_token_account_idempotent;
use tokio::time::{interval, timeout, MissedTickBehavior};

use crate::blockchain::accounts::{GlobalAccount, TokenMetadata, UserAccount};
use crate::blockchain::amount::Amount;
use crate::blockchain::client::ChainClient;
use crate::blockchain::ed25519::{
    ensure_verified_before, verify_signature_instruction, SIGNATURE_SIZE,
};
use crate::blockchain::instructions::ClaimProgram;
use crate::blockchain::pda::ProgramAddresses;
use crate::blockchain::types::{
    BlockchainError, BlockchainResult, ConfirmationStatus, TokenBalance,
};

/// Transaction builder for the claim program.
#[derive(Debug, Clone)]
pub struct TxBuilder {
    client: ChainClient,
    program: ClaimProgram,
}

impl TxBuilder {
    /// Create a new transaction builder.
    pub fn new(client: ChainClient, addresses: ProgramAddresses) -> Self {
        Self {
            client,
            program: ClaimProgram::new(addresses),
        }
    }

    pub fn client(&self) -> &ChainClient {
        &self.client
    }

    pub fn program(&self) -> &ClaimProgram {
        &self.program
    }

    pub fn addresses(&self) -> &ProgramAddresses {
        self.program.addresses()
    }

    /// Create the global account, recording `authorizer` as voucher signer.
    pub async fn initialize(
        &self,
        admin: &Keypair,
        authorizer: &Pubkey,
    ) -> BlockchainResult<Signature> {
        let ix = self.program.initialize(&admin.pubkey(), authorizer)?;
        self.submit("initialize", vec![ix], admin).await
    }

    /// Create the vault for `mint`.
    pub async fn initialize_vault(
        &self,
        admin: &Keypair,
        mint: &Pubkey,
    ) -> BlockchainResult<Signature> {
        let ix = self.program.initialize_vault(&admin.pubkey(), mint)?;
        self.submit("initialize_vault", vec![ix], admin).await
    }

    /// Create a name-seeded mint with Metaplex metadata.
    pub async fn create_token(
        &self,
        admin: &Keypair,
        name: &str,
        symbol: &str,
        uri: &str,
    ) -> BlockchainResult<Signature> {
        let ix = self.program.create_token(&admin.pubkey(), name, symbol, uri)?;
        self.submit("create_token", vec![ix], admin).await
    }

    /// Mint `amount` of the named token to `recipient`'s associated token
    /// account, creating it first when absent.
    pub async fn mint_token(
        &self,
        admin: &Keypair,
        token_name: &str,
        recipient: &Pubkey,
        amount: Amount,
    ) -> BlockchainResult<Signature> {
        let mint = self.addresses().token_mint(token_name)?;
        let (token_account, mut instructions) =
            self.ensure_token_account(&admin.pubkey(), recipient, &mint).await?;
        instructions.push(
            self.program
                .mint_token(&admin.pubkey(), token_name, &token_account, amount)?,
        );
        self.submit("mint_token", instructions, admin).await
    }

    /// Instructions of a claim, verification first.
    pub fn claim_instructions(
        &self,
        user: &Pubkey,
        mint: &Pubkey,
        amount: Amount,
        authorizer: &Pubkey,
        message: &[u8],
        signature: &[u8; SIGNATURE_SIZE],
    ) -> BlockchainResult<Vec<Instruction>> {
        Ok(vec![
            verify_signature_instruction(authorizer, message, signature)?,
            self.program.claim(user, mint, amount, signature)?,
        ])
    }

    /// Unsigned claim transaction paid by `user`.
    pub fn build_claim_transaction(
        &self,
        user: &Pubkey,
        mint: &Pubkey,
        amount: Amount,
        authorizer: &Pubkey,
        message: &[u8],
        signature: &[u8; SIGNATURE_SIZE],
    ) -> BlockchainResult<Transaction> {
        let instructions =
            self.claim_instructions(user, mint, amount, authorizer, message, signature)?;
        let message = Message::new(&instructions, Some(user));
        ensure_verified_before(&message, &self.program.program_id())?;
        Ok(Transaction::new_unsigned(message))
    }

    /// Redeem a voucher.
    pub async fn claim(
        &self,
        user: &Keypair,
        mint: &Pubkey,
        amount: Amount,
        authorizer: &Pubkey,
        message: &[u8],
        signature: &[u8; SIGNATURE_SIZE],
    ) -> BlockchainResult<Signature> {
        let transaction = self.build_claim_transaction(
            &user.pubkey(),
            mint,
            amount,
            authorizer,
            message,
            signature,
        )?;
        self.sign_and_send("claim", transaction, user).await
    }

    /// Move `amount` out of the vault to `recipient`'s associated token
    /// account, creating it first when absent.
    pub async fn emergency_withdraw(
        &self,
        admin: &Keypair,
        mint: &Pubkey,
        amount: Amount,
        recipient: &Pubkey,
    ) -> BlockchainResult<Signature> {
        let (token_account, mut instructions) =
            self.ensure_token_account(&admin.pubkey(), recipient, mint).await?;
        instructions.push(
            self.program
                .emergency_withdraw(&admin.pubkey(), mint, &token_account, amount)?,
        );
        self.submit("emergency_withdraw", instructions, admin).await
    }

    /// Associated token account of (`owner`, `mint`), plus the instruction
    /// creating it when it does not exist yet.
    pub async fn ensure_token_account(
        &self,
        payer: &Pubkey,
        owner: &Pubkey,
        mint: &Pubkey,
    ) -> BlockchainResult<(Pubkey, Vec<Instruction>)> {
        let token_account = ProgramAddresses::associated_token_account(owner, mint);
        if self.client.account_exists(&token_account).await? {
            return Ok((token_account, Vec::new()));
        }

        tracing::info!(
            owner = %owner,
            mint = %mint,
            token_account = %token_account,
            "Creating associated token account"
        );
        let create =
            create_associated_token_account_idempotent(payer, owner, mint, &spl_token::id());
        Ok((token_account, vec![create]))
    }

    async fn submit(
        &self,
        operation: &'static str,
        instructions: Vec<Instruction>,
        payer: &Keypair,
    ) -> BlockchainResult<Signature> {
        let message = Message::new(&instructions, Some(&payer.pubkey()));
        self.sign_and_send(operation, Transaction::new_unsigned(message), payer)
            .await
    }

    async fn sign_and_send(
        &self,
        operation: &'static str,
        mut transaction: Transaction,
        payer: &Keypair,
    ) -> BlockchainResult<Signature> {
        let blockhash = self.client.get_latest_blockhash().await?;
        transaction.try_sign(&[payer], blockhash)?;

        let signature = self.client.send_transaction(&transaction).await?;
        tracing::info!(
            operation,
            signature = %signature,
            instructions = transaction.message.instructions.len(),
            "Transaction submitted"
        );

        self.wait_for_confirmation(&signature, self.client.config().confirmation_timeout_secs)
            .await?;
        tracing::info!(operation, signature = %signature, "Transaction confirmed");
        Ok(signature)
    }

    /// Wait for a transaction to reach the configured commitment.
    ///
    /// Returns `Failed` when the transaction landed with an error and
    /// `ConfirmationTimeout` when it is still pending after `timeout_secs`.
    pub async fn wait_for_confirmation(
        &self,
        signature: &Signature,
        timeout_secs: u64,
    ) -> BlockchainResult<()> {
        let timeout_duration = Duration::from_secs(timeout_secs);
        let poll_interval = Duration::from_millis(self.client.config().confirmation_poll_ms);

        let result = timeout(timeout_duration, async {
            let mut ticker = interval(poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                match self.client.get_signature_status(signature).await? {
                    ConfirmationStatus::Pending => {
                        tracing::debug!(signature = %signature, "Transaction pending");
                    }
                    ConfirmationStatus::Confirmed => return Ok(()),
                    ConfirmationStatus::Failed(reason) => {
                        tracing::warn!(
                            signature = %signature,
                            reason = %reason,
                            "Transaction failed"
                        );
                        return Err(BlockchainError::Failed {
                            signature: *signature,
                            reason,
                        });
                    }
                }
            }
        })
        .await;

        match result {
            Ok(outcome) => outcome,
            Err(_) => Err(BlockchainError::ConfirmationTimeout {
                signature: *signature,
                secs: timeout_secs,
            }),
        }
    }

    /// Token balance of any token account; `None` when it does not exist.
    pub async fn get_token_balance(&self, token_account: &Pubkey) -> Option<TokenBalance> {
        self.client.get_token_balance(token_account).await
    }

    /// Balance held by the vault of `mint`.
    pub async fn vault_balance(&self, mint: &Pubkey) -> Option<TokenBalance> {
        self.client
            .get_token_balance(&self.addresses().vault(mint))
            .await
    }

    pub async fn query_global_account(&self) -> BlockchainResult<Option<GlobalAccount>> {
        self.client
            .get_account(&self.addresses().global())
            .await?
            .map(|account| GlobalAccount::decode(&account.data))
            .transpose()
    }

    pub async fn query_user_account(
        &self,
        user: &Pubkey,
    ) -> BlockchainResult<Option<UserAccount>> {
        self.client
            .get_account(&self.addresses().user(user))
            .await?
            .map(|account| UserAccount::decode(&account.data))
            .transpose()
    }

    /// Metaplex metadata of the token created under `name`.
    pub async fn query_token_metadata(
        &self,
        name: &str,
    ) -> BlockchainResult<Option<TokenMetadata>> {
        let mint = self.addresses().token_mint(name)?;
        self.client
            .get_account(&ProgramAddresses::metadata(&mint))
            .await?
            .map(|account| TokenMetadata::decode(&account.data))
            .transpose()
    }
}
