//! API key management (L1) and server time
//!
//! # Endpoints
//! - GET /time - server Unix time, bare number
//! - POST /auth/api-key - create credentials for the signing wallet
//! - GET /auth/derive-api-key - re-derive credentials for a nonce

use anyhow::{Context, Result};
use reqwest::Method;
use tracing::{info, warn};

use super::client::{ClobClient, RequestAuth};
use crate::auth::ApiCredentials;
use crate::error::ClobError;
use crate::query::QueryParams;

impl ClobClient {
    /// GET /time
    pub async fn get_server_time(&self) -> Result<i64> {
        let text = self.get_public_text("/time").await?;
        parse_server_time(&text)
    }

    /// POST /auth/api-key
    pub async fn create_api_key(&self, nonce: u64) -> Result<ApiCredentials> {
        let auth = RequestAuth::L1 { nonce };
        let text = self
            .send_raw(Method::POST, "/auth/api-key", &QueryParams::new(), None, auth)
            .await?;
        let credentials: ApiCredentials =
            serde_json::from_str(&text).context("Failed to parse API credentials")?;
        info!(credentials = ?credentials, "API key created");
        Ok(credentials)
    }

    /// GET /auth/derive-api-key
    pub async fn derive_api_key(&self, nonce: u64) -> Result<ApiCredentials> {
        let credentials: ApiCredentials = self
            .get("/auth/derive-api-key", &QueryParams::new(), RequestAuth::L1 { nonce })
            .await?;
        info!(credentials = ?credentials, "API key derived");
        Ok(credentials)
    }

    /// Create credentials, falling back to derivation when they already exist
    ///
    /// Only a 4xx answer from the exchange triggers the fallback; transport
    /// failures, 5xx and parse errors are returned as they are.
    pub async fn create_or_derive_api_key(&self, nonce: u64) -> Result<ApiCredentials> {
        self.ensure_auth(RequestAuth::L1 { nonce })?;
        match self.create_api_key(nonce).await {
            Ok(credentials) => Ok(credentials),
            Err(e) if e.downcast_ref::<ClobError>().is_some_and(ClobError::is_client_error) => {
                warn!("create_api_key rejected, deriving instead: {:#}", e);
                self.derive_api_key(nonce).await
            }
            Err(e) => Err(e),
        }
    }
}

/// `/time` answers `1700000000`, occasionally quoted
fn parse_server_time(text: &str) -> Result<i64> {
    let trimmed = text.trim().trim_matches('"');
    trimmed
        .parse()
        .with_context(|| format!("Invalid server time: {}", trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_server_time() {
        assert_eq!(parse_server_time("1700000000").unwrap(), 1_700_000_000);
        assert_eq!(parse_server_time(" \"1700000000\"\n").unwrap(), 1_700_000_000);
        assert!(parse_server_time("soon").is_err());
    }
}
