//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0)
//! - Check that URLs, the program id and the commitment level parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::str::FromStr;

use solana_sdk::commitment_config::CommitmentLevel;
use solana_sdk::pubkey::Pubkey;

use crate::config::schema::ClientConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Check every semantic constraint of `config`.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = url::Url::parse(&config.cluster.rpc_url) {
        errors.push(ValidationError {
            field: "cluster.rpc_url",
            message: format!("invalid URL '{}': {}", config.cluster.rpc_url, e),
        });
    }

    if config.cluster.rpc_timeout_secs == 0 {
        errors.push(ValidationError {
            field: "cluster.rpc_timeout_secs",
            message: "must be greater than zero".to_string(),
        });
    }

    if config.cluster.confirmation_timeout_secs == 0 {
        errors.push(ValidationError {
            field: "cluster.confirmation_timeout_secs",
            message: "must be greater than zero".to_string(),
        });
    }

    if config.cluster.confirmation_poll_ms == 0 {
        errors.push(ValidationError {
            field: "cluster.confirmation_poll_ms",
            message: "must be greater than zero".to_string(),
        });
    }

    if CommitmentLevel::from_str(&config.cluster.commitment).is_err() {
        errors.push(ValidationError {
            field: "cluster.commitment",
            message: format!("unknown commitment level '{}'", config.cluster.commitment),
        });
    }

    if Pubkey::from_str(&config.program.program_id).is_err() {
        errors.push(ValidationError {
            field: "program.program_id",
            message: format!("not a base58 pubkey: '{}'", config.program.program_id),
        });
    }

    match url::Url::parse(&config.claim_service.api_domain) {
        Ok(url) if url.cannot_be_a_base() => errors.push(ValidationError {
            field: "claim_service.api_domain",
            message: format!("'{}' cannot be used as a base URL", url),
        }),
        Ok(_) => {}
        Err(e) => errors.push(ValidationError {
            field: "claim_service.api_domain",
            message: format!("invalid URL '{}': {}", config.claim_service.api_domain, e),
        }),
    }

    if config.claim_service.request_timeout_secs == 0 {
        errors.push(ValidationError {
            field: "claim_service.request_timeout_secs",
            message: "must be greater than zero".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
