//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Key file / AOGO_PRIVATE_KEY
//!     → wallet.rs (key loading)
//! pda.rs (deterministic program addresses)
//!     → instructions.rs (account lists + Anchor argument encoding)
//!     → ed25519.rs (voucher signature verification instruction)
//!     → transaction.rs (build, sign, broadcast, confirm)
//!     → client.rs (RPC with timeouts)
//! client.rs → accounts.rs (typed account decoding)
//! ```
//!
//! # Security Constraints
//! - Never log private keys
//! - All RPC calls have configurable timeouts
//! - No automatic resubmission of transactions

pub mod accounts;
pub mod amount;
pub mod client;
pub mod ed25519;
pub mod instructions;
pub mod pda;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use amount::Amount;
pub use client::ChainClient;
pub use pda::ProgramAddresses;
pub use transaction::TxBuilder;
pub use types::{BlockchainError, BlockchainResult, TokenBalance};
pub use wallet::Wallet;
