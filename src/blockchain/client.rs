//! Solana RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoint
//! - Query chain state (blockhash, accounts, token balances, signature status)
//! - Broadcast signed transactions without automatic retries
//! - Bound every call by the configured timeout

use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::RpcSendTransactionConfig;
use solana_sdk::account::Account;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use tokio::time::timeout;

use crate::blockchain::types::{
    BlockchainError, BlockchainResult, ClusterConfig, ConfirmationStatus, TokenBalance,
};

/// Solana RPC client wrapper.
#[derive(Clone)]
pub struct ChainClient {
    rpc: Arc<RpcClient>,
    config: ClusterConfig,
    commitment: CommitmentConfig,
    timeout_duration: Duration,
}

impl ChainClient {
    /// Create a new chain client. No network traffic happens until the
    /// first request.
    pub fn new(config: ClusterConfig) -> BlockchainResult<Self> {
        let commitment = CommitmentConfig::from_str(&config.commitment).map_err(|_| {
            BlockchainError::Config(format!("unknown commitment level '{}'", config.commitment))
        })?;
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);

        let rpc = RpcClient::new_with_timeout_and_commitment(
            config.rpc_url.clone(),
            timeout_duration,
            commitment,
        );

        tracing::debug!(
            rpc_url = %config.rpc_url,
            commitment = %config.commitment,
            timeout_secs = config.rpc_timeout_secs,
            "Chain client initialized"
        );

        Ok(Self {
            rpc: Arc::new(rpc),
            config,
            commitment,
            timeout_duration,
        })
    }

    async fn call<T, F>(&self, method: &'static str, fut: F) -> BlockchainResult<T>
    where
        F: Future<Output = Result<T, solana_client::client_error::ClientError>>,
    {
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => {
                tracing::warn!(method, error = %e, "RPC error");
                Err(BlockchainError::Rpc(e))
            }
            Err(_) => {
                tracing::warn!(method, "RPC timeout");
                Err(BlockchainError::Timeout(self.config.rpc_timeout_secs))
            }
        }
    }

    /// Get a recent blockhash to sign against.
    pub async fn get_latest_blockhash(&self) -> BlockchainResult<Hash> {
        self.call("getLatestBlockhash", self.rpc.get_latest_blockhash())
            .await
    }

    /// Fetch an account, `None` when it does not exist.
    pub async fn get_account(&self, address: &Pubkey) -> BlockchainResult<Option<Account>> {
        let response = self
            .call(
                "getAccountInfo",
                self.rpc.get_account_with_commitment(address, self.commitment),
            )
            .await?;
        Ok(response.value)
    }

    /// Whether an account exists at `address`.
    pub async fn account_exists(&self, address: &Pubkey) -> BlockchainResult<bool> {
        Ok(self.get_account(address).await?.is_some())
    }

    /// SPL token balance of a token account.
    ///
    /// Any failure (account missing, not a token account, node error) is
    /// reported as `None` rather than an error.
    pub async fn get_token_balance(&self, token_account: &Pubkey) -> Option<TokenBalance> {
        match self
            .call(
                "getTokenAccountBalance",
                self.rpc.get_token_account_balance(token_account),
            )
            .await
        {
            Ok(amount) => Some(TokenBalance {
                amount: amount.amount,
                decimals: amount.decimals,
                ui_amount: amount.ui_amount,
                ui_amount_string: amount.ui_amount_string,
            }),
            Err(e) => {
                tracing::debug!(
                    token_account = %token_account,
                    error = %e,
                    "Token balance unavailable"
                );
                None
            }
        }
    }

    /// Broadcast a signed transaction. The node is told not to rebroadcast.
    pub async fn send_transaction(&self, transaction: &Transaction) -> BlockchainResult<Signature> {
        let send_config = RpcSendTransactionConfig {
            skip_preflight: self.config.skip_preflight,
            preflight_commitment: Some(self.commitment.commitment),
            max_retries: Some(0),
            ..RpcSendTransactionConfig::default()
        };
        self.call(
            "sendTransaction",
            self.rpc.send_transaction_with_config(transaction, send_config),
        )
        .await
    }

    /// Status of a submitted transaction at the configured commitment.
    pub async fn get_signature_status(
        &self,
        signature: &Signature,
    ) -> BlockchainResult<ConfirmationStatus> {
        let status = self
            .call(
                "getSignatureStatuses",
                self.rpc
                    .get_signature_status_with_commitment(signature, self.commitment),
            )
            .await?;

        Ok(match status {
            None => ConfirmationStatus::Pending,
            Some(Ok(())) => ConfirmationStatus::Confirmed,
            Some(Err(e)) => ConfirmationStatus::Failed(e.to_string()),
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    pub fn commitment(&self) -> CommitmentConfig {
        self.commitment
    }
}

impl std::fmt::Debug for ChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("commitment", &self.config.commitment)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
