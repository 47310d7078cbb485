//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Program id of the deployed claim program.
pub const DEFAULT_PROGRAM_ID: &str = "FpcnrJntp15VXsF1H2sw1k5d63PMtXHGBiKiUh3pqoqh";

/// Root configuration for the claim client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Solana cluster connection settings.
    pub cluster: ClusterConfig,

    /// Deployed program settings.
    pub program: ProgramConfig,

    /// Off-chain claim authorization service.
    pub claim_service: ClaimServiceConfig,

    /// Credential loading.
    pub wallet: WalletConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Cluster (JSON-RPC) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Commitment level used for reads and confirmation
    /// ("processed", "confirmed" or "finalized").
    pub commitment: String,

    /// Maximum time to wait for a submitted transaction to confirm.
    pub confirmation_timeout_secs: u64,

    /// Poll interval while waiting for confirmation, in milliseconds.
    pub confirmation_poll_ms: u64,

    /// Skip the RPC node's simulation before broadcasting.
    pub skip_preflight: bool,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.devnet.solana.com".to_string(),
            rpc_timeout_secs: 30,
            commitment: "confirmed".to_string(),
            confirmation_timeout_secs: 90,
            confirmation_poll_ms: 1000,
            skip_preflight: true,
        }
    }
}

/// Deployed program configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProgramConfig {
    /// Base58 program id.
    pub program_id: String,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            program_id: DEFAULT_PROGRAM_ID.to_string(),
        }
    }
}

/// Claim authorization service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClaimServiceConfig {
    /// Base URL of the service. A path prefix is kept; endpoint paths are
    /// appended after it.
    pub api_domain: String,

    /// Total request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ClaimServiceConfig {
    fn default() -> Self {
        Self {
            api_domain: "https://abi.aogo.wtf".to_string(),
            request_timeout_secs: 15,
        }
    }
}

/// Credential configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Path to the key file. Either `{"privateKey": "<base58>"}` or a
    /// Solana CLI byte-array keypair.
    pub keypair_path: String,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            keypair_path: "key.json".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines instead of the human readable format.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
