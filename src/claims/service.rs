//! HTTP client for the claim authorization service.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use solana_sdk::pubkey::Pubkey;
use url::Url;

use crate::claims::types::{ClaimParams, Envelope};
use crate::config::ClaimServiceConfig;

/// Endpoint paths, relative to the configured base URL.
pub const CLAIM_PARAMS_PATH: &str = "api/user/claimParams";
pub const CLAIM_LOGS_PATH: &str = "api/user/claimLogs";

/// Errors returned by the authorization service client.
#[derive(Debug, thiserror::Error)]
pub enum ClaimServiceError {
    /// Service unreachable, timed out, or the body could not be read.
    #[error("claim service request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Service answered with a non-success status.
    #[error("claim service returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// Response body is not the expected JSON shape.
    #[error("claim service returned malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A response field could not be decoded.
    #[error("invalid claim field '{field}': {reason}")]
    Decode { field: &'static str, reason: String },

    #[error("invalid claim service URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Parse `api_domain` as a directory URL so that endpoint paths are appended
/// to any path prefix it carries.
fn parse_base_url(api_domain: &str) -> Result<Url, ClaimServiceError> {
    let mut url = Url::parse(api_domain)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Client for the claim authorization endpoints.
#[derive(Debug, Clone)]
pub struct ClaimServiceClient {
    client: Client,
    base_url: Url,
}

impl ClaimServiceClient {
    pub fn new(config: &ClaimServiceConfig) -> Result<Self, ClaimServiceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: parse_base_url(&config.api_domain)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str, address: &Pubkey) -> Result<Url, ClaimServiceError> {
        let mut url = self.base_url.join(path)?;
        url.query_pairs_mut()
            .append_pair("address", &address.to_string());
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClaimServiceError> {
        tracing::debug!(url = %url, "Requesting claim service");

        let resp = self.client.get(url.clone()).send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            tracing::warn!(url = %url, status = %status, "Claim service returned error status");
            return Err(ClaimServiceError::Status { status, body: text });
        }

        Ok(serde_json::from_str::<T>(&text)?)
    }

    /// Fetch the current claim voucher parameters for `address`.
    pub async fn fetch_claim_params(
        &self,
        address: &Pubkey,
    ) -> Result<ClaimParams, ClaimServiceError> {
        let url = self.endpoint(CLAIM_PARAMS_PATH, address)?;
        let envelope: Envelope<ClaimParams> = self.get_json(url).await?;
        tracing::info!(
            address = %address,
            amount = ?envelope.data.amount,
            mint = %envelope.data.mint,
            "Fetched claim parameters"
        );
        Ok(envelope.data)
    }

    /// Fetch the claim history of `address`. The payload is passed through
    /// untouched.
    pub async fn fetch_claim_history(
        &self,
        address: &Pubkey,
    ) -> Result<serde_json::Value, ClaimServiceError> {
        let url = self.endpoint(CLAIM_LOGS_PATH, address)?;
        self.get_json(url).await
    }
}
