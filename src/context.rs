//! Session context threaded through every operation.

use std::str::FromStr;

use solana_sdk::pubkey::Pubkey;

use crate::blockchain::{BlockchainError, ChainClient, ProgramAddresses, TxBuilder};
use crate::claims::{ClaimServiceClient, ClaimServiceError};
use crate::config::ClientConfig;

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error(transparent)]
    Chain(#[from] BlockchainError),
    #[error(transparent)]
    Service(#[from] ClaimServiceError),
}

/// Everything an operation needs: validated config, chain access bound to
/// the program deployment, and the authorization service client.
#[derive(Debug, Clone)]
pub struct AogoContext {
    config: ClientConfig,
    builder: TxBuilder,
    service: ClaimServiceClient,
}

impl AogoContext {
    pub fn new(config: ClientConfig) -> Result<Self, ContextError> {
        let program_id = Pubkey::from_str(&config.program.program_id).map_err(|e| {
            BlockchainError::Config(format!(
                "invalid program id '{}': {}",
                config.program.program_id, e
            ))
        })?;
        let client = ChainClient::new(config.cluster.clone())?;
        let builder = TxBuilder::new(client, ProgramAddresses::new(program_id));
        let service = ClaimServiceClient::new(&config.claim_service)?;

        tracing::info!(
            rpc_url = %config.cluster.rpc_url,
            program_id = %program_id,
            api_domain = %config.claim_service.api_domain,
            "Context initialized"
        );

        Ok(Self {
            config,
            builder,
            service,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn builder(&self) -> &TxBuilder {
        &self.builder
    }

    pub fn service(&self) -> &ClaimServiceClient {
        &self.service
    }

    pub fn addresses(&self) -> &ProgramAddresses {
        self.builder.addresses()
    }
}
