//! Chain-specific types and error definitions.

use serde::Serialize;
use solana_sdk::signature::Signature;
use thiserror::Error;

pub use crate::config::schema::ClusterConfig;

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(#[from] solana_client::client_error::ClientError),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Transaction was not confirmed within expected time.
    #[error("Transaction {signature} not confirmed after {secs} seconds")]
    ConfirmationTimeout { signature: Signature, secs: u64 },

    /// Transaction was rejected on-chain.
    #[error("Transaction {signature} failed: {reason}")]
    Failed { signature: Signature, reason: String },

    /// Invalid private key format or credential file.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Signing the transaction failed (missing or extra signer).
    #[error("Signing failed: {0}")]
    Signing(#[from] solana_sdk::signer::SignerError),

    /// Instruction data could not be encoded.
    #[error("Encoding error: {0}")]
    Encoding(#[from] std::io::Error),

    /// Account data did not match the expected layout.
    #[error("Account {account} has unexpected layout: {reason}")]
    Layout { account: String, reason: String },

    /// Voucher fields cannot be carried by a verification instruction.
    #[error("Invalid voucher: {0}")]
    Voucher(String),

    /// PDA seed exceeds the runtime's per-seed limit.
    #[error("Invalid seed: {0}")]
    InvalidSeed(String),

    /// Instruction order in an assembled message is not what the program expects.
    #[error("Invalid instruction order: {0}")]
    InstructionOrder(String),

    /// Configuration value could not be used.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Transaction confirmation status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationStatus {
    /// Transaction is not yet visible at the requested commitment.
    Pending,
    /// Transaction reached the requested commitment.
    Confirmed,
    /// Transaction landed but the program rejected it.
    Failed(String),
}

/// SPL token balance as reported by the RPC node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenBalance {
    /// Raw amount in base units.
    pub amount: String,
    pub decimals: u8,
    pub ui_amount: Option<f64>,
    pub ui_amount_string: String,
}
