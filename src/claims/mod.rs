//! Claim authorization subsystem.
//!
//! # Data Flow
//! ```text
//! claim service (HTTP)
//!     → service.rs (claimParams / claimLogs)
//!     → types.rs (base58 + decimal decoding into ClaimVoucher)
//!     → flow.rs (hand the voucher to TxBuilder::claim)
//! ```
//!
//! No authenticity check happens here; the program trusts only the Ed25519
//! verification instruction placed before the claim.

pub mod flow;
pub mod service;
pub mod types;

pub use flow::{claim_from_service, fetch_voucher, prepare_claim, ClaimFlowError};
pub use service::{ClaimServiceClient, ClaimServiceError};
pub use types::{ClaimParams, ClaimVoucher};
