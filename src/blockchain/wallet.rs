//! Credential loading.
//!
//! # Security
//! - Keys come from the environment or a local key file, never from config
//! - Keys are never logged or serialized

use std::path::Path;

use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signer};

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Environment variable holding a base58 secret key. Takes precedence over
/// the key file.
pub const PRIVATE_KEY_ENV_VAR: &str = "AOGO_PRIVATE_KEY";

#[derive(Deserialize)]
#[serde(untagged)]
enum KeyFile {
    Base58 {
        #[serde(rename = "privateKey")]
        private_key: String,
    },
    Bytes(Vec<u8>),
}

/// Signing identity used for every transaction of one session.
pub struct Wallet {
    keypair: Keypair,
}

impl Wallet {
    /// Create a wallet from a base58-encoded 64-byte secret key.
    pub fn from_base58(secret: &str) -> BlockchainResult<Self> {
        let bytes = bs58::decode(secret.trim())
            .into_vec()
            .map_err(|e| BlockchainError::Wallet(format!("Invalid base58 private key: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    /// Create a wallet from raw 64-byte secret key material.
    pub fn from_bytes(bytes: &[u8]) -> BlockchainResult<Self> {
        let keypair = Keypair::from_bytes(bytes)
            .map_err(|e| BlockchainError::Wallet(format!("Invalid private key: {}", e)))?;

        tracing::info!(address = %keypair.pubkey(), "Wallet initialized");

        Ok(Self { keypair })
    }

    /// Load a key file: either `{"privateKey": "<base58>"}` or a Solana CLI
    /// JSON byte array.
    pub fn from_file(path: &Path) -> BlockchainResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BlockchainError::Wallet(format!("Cannot read key file {}: {}", path.display(), e))
        })?;
        let parsed: KeyFile = serde_json::from_str(&content).map_err(|e| {
            BlockchainError::Wallet(format!("Unrecognized key file {}: {}", path.display(), e))
        })?;

        match parsed {
            KeyFile::Base58 { private_key } => Self::from_base58(&private_key),
            KeyFile::Bytes(bytes) => Self::from_bytes(&bytes),
        }
    }

    /// Load from `AOGO_PRIVATE_KEY` if set, otherwise from `path`.
    pub fn load(path: &Path) -> BlockchainResult<Self> {
        match std::env::var(PRIVATE_KEY_ENV_VAR) {
            Ok(secret) => Self::from_base58(&secret),
            Err(_) => Self::from_file(path),
        }
    }

    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.keypair.pubkey())
            .finish()
    }
}

impl From<Keypair> for Wallet {
    fn from(keypair: Keypair) -> Self {
        Self { keypair }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir()
            .join(format!("aogo-wallet-{}-{}", std::process::id(), name));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_wallet_from_base58() {
        let keypair = Keypair::new();
        let wallet = Wallet::from_base58(&keypair.to_base58_string()).unwrap();
        assert_eq!(wallet.pubkey(), keypair.pubkey());
    }

    #[test]
    fn test_invalid_private_key() {
        let result = Wallet::from_base58("invalid_key_0OIl");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid base58"));

        let result = Wallet::from_bytes(&[1, 2, 3]);
        assert!(result.unwrap_err().to_string().contains("Invalid private key"));
    }

    #[test]
    fn test_key_file_formats() {
        let keypair = Keypair::new();

        let json = format!(r#"{{"privateKey": "{}"}}"#, keypair.to_base58_string());
        let path = temp_file("b58.json", &json);
        assert_eq!(Wallet::from_file(&path).unwrap().pubkey(), keypair.pubkey());

        let bytes = serde_json::to_string(&keypair.to_bytes().to_vec()).unwrap();
        let path = temp_file("cli.json", &bytes);
        assert_eq!(Wallet::from_file(&path).unwrap().pubkey(), keypair.pubkey());
    }

    #[test]
    fn test_debug_hides_secret() {
        let keypair = Keypair::new();
        let secret = keypair.to_base58_string();
        let wallet = Wallet::from(keypair);
        let debug = format!("{:?}", wallet);
        assert!(debug.contains(&wallet.pubkey().to_string()));
        assert!(!debug.contains(&secret));
    }

    #[test]
    fn test_missing_key_file() {
        let err = Wallet::from_file(Path::new("/nonexistent/key.json")).unwrap_err();
        assert!(err.to_string().contains("Cannot read key file"));
    }
}
