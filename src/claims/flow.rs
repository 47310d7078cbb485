//! Voucher redemption: fetch → decode → submit.

use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature, Signer};
use solana_sdk::transaction::Transaction;

use crate::blockchain::{BlockchainError, TxBuilder};
use crate::claims::service::{ClaimServiceClient, ClaimServiceError};
use crate::claims::types::ClaimVoucher;

#[derive(Debug, thiserror::Error)]
pub enum ClaimFlowError {
    #[error(transparent)]
    Service(#[from] ClaimServiceError),

    #[error(transparent)]
    Chain(#[from] BlockchainError),
}

/// Fetch and decode the voucher currently issued to `user`.
pub async fn fetch_voucher(
    service: &ClaimServiceClient,
    user: &Pubkey,
) -> Result<ClaimVoucher, ClaimServiceError> {
    service.fetch_claim_params(user).await?.into_voucher(*user)
}

/// Fetch the voucher and assemble the unsigned claim transaction.
pub async fn prepare_claim(
    service: &ClaimServiceClient,
    builder: &TxBuilder,
    user: &Pubkey,
) -> Result<(ClaimVoucher, Transaction), ClaimFlowError> {
    let voucher = fetch_voucher(service, user).await?;
    let transaction = builder.build_claim_transaction(
        &voucher.claimant,
        &voucher.mint,
        voucher.amount,
        &voucher.authorizer,
        &voucher.message,
        &voucher.signature,
    )?;
    Ok((voucher, transaction))
}

/// Fetch the voucher issued to `user` and redeem it on-chain.
///
/// Nothing is sent to the cluster unless the voucher was fetched and decoded.
pub async fn claim_from_service(
    service: &ClaimServiceClient,
    builder: &TxBuilder,
    user: &Keypair,
) -> Result<Signature, ClaimFlowError> {
    let voucher = fetch_voucher(service, &user.pubkey()).await?;

    tracing::info!(
        user = %voucher.claimant,
        mint = %voucher.mint,
        amount = %voucher.amount,
        authorizer = %voucher.authorizer,
        "Redeeming claim voucher"
    );

    let signature = builder
        .claim(
            user,
            &voucher.mint,
            voucher.amount,
            &voucher.authorizer,
            &voucher.message,
            &voucher.signature,
        )
        .await?;
    Ok(signature)
}
