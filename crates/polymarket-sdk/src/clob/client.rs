//! Signed REST transport for the Polymarket CLOB API
//!
//! Base URL: https://clob.polymarket.com
//!
//! Every request names the auth tier it needs. The tier is checked against
//! the shared [`AuthManager`] before any network I/O, so a missing tier
//! fails fast with [`AuthError::AuthRequired`].
//!
//! # Source
//! - Endpoints: https://docs.polymarket.com/quickstart/reference/endpoints
//! - Authentication: https://docs.polymarket.com/developers/CLOB/authentication

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::auth::{AuthManager, AuthTier};
use crate::config::{normalize_base_url, ClientConfig};
use crate::error::{AuthError, ClobError};
use crate::query::QueryParams;

/// Authentication attached to a single request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestAuth {
    /// Public endpoint
    None,
    /// EIP-712 `ClobAuth` headers (API key management)
    L1 { nonce: u64 },
    /// HMAC-signed headers (trading and account data)
    L2,
}

impl RequestAuth {
    pub fn tier(&self) -> AuthTier {
        match self {
            RequestAuth::None => AuthTier::None,
            RequestAuth::L1 { .. } => AuthTier::L1,
            RequestAuth::L2 => AuthTier::L2,
        }
    }
}

/// REST client for the CLOB API
#[derive(Clone)]
pub struct ClobClient {
    client: Client,
    base_url: String,
    auth: Arc<AuthManager>,
    /// Timestamp L1 headers with `GET /time` instead of the local clock
    use_server_time: bool,
}

impl ClobClient {
    /// Create a client with default configuration
    pub fn new(auth: Arc<AuthManager>) -> Result<Self> {
        Self::with_config(&ClientConfig::default(), auth)
    }

    pub fn with_config(config: &ClientConfig, auth: Arc<AuthManager>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: normalize_base_url(&config.clob_base_url),
            auth,
            use_server_time: true,
        })
    }

    /// Create a client with custom base URL
    pub fn with_base_url(base_url: &str, auth: Arc<AuthManager>) -> Result<Self> {
        Self::with_config(&ClientConfig::default().with_clob_base_url(base_url), auth)
    }

    pub fn with_server_time(mut self, enabled: bool) -> Self {
        self.use_server_time = enabled;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth(&self) -> &Arc<AuthManager> {
        &self.auth
    }

    /// Fail with `AuthRequired` when the manager cannot sign for `auth`
    pub(crate) fn ensure_auth(&self, auth: RequestAuth) -> Result<(), AuthError> {
        let ready = match auth {
            RequestAuth::None => true,
            RequestAuth::L1 { .. } => self.auth.has_l1_auth(),
            RequestAuth::L2 => self.auth.has_l2_auth(),
        };
        if ready {
            Ok(())
        } else {
            Err(AuthError::AuthRequired { required: auth.tier() })
        }
    }

    async fn l1_timestamp(&self) -> Result<String> {
        if self.use_server_time {
            let server_time = self
                .get_server_time()
                .await
                .context("Failed to fetch server time for L1 headers")?;
            return Ok(server_time.to_string());
        }
        Ok(chrono::Utc::now().timestamp().to_string())
    }

    /// Unsigned GET returning the raw body
    ///
    /// Kept apart from `send_raw` since L1 signing itself calls `GET /time`.
    pub(crate) async fn get_public_text(&self, path: &str) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await.context("HTTP request failed")?;

        let status = response.status();
        let text = response.text().await.context("Failed to read response body")?;
        if !status.is_success() {
            let error = ClobError::from_response(status.as_u16(), &text);
            return Err(anyhow::Error::new(error).context(format!("GET {}", path)));
        }

        Ok(text)
    }

    async fn auth_headers(
        &self,
        method: &Method,
        path: &str,
        body: &str,
        auth: RequestAuth,
    ) -> Result<HeaderMap> {
        let headers = match auth {
            RequestAuth::None => return Ok(HeaderMap::new()),
            RequestAuth::L1 { nonce } => {
                let timestamp = self.l1_timestamp().await?;
                self.auth.generate_l1_headers(&timestamp, nonce)?
            }
            RequestAuth::L2 => self.auth.generate_l2_headers(method.as_str(), path, body)?,
        };
        headers.to_header_map()
    }

    /// Send a request and return the raw 2xx body
    ///
    /// `path` must not carry a query string: L2 signatures cover the bare
    /// path and the exact `body` bytes sent.
    pub async fn send_raw(
        &self,
        method: Method,
        path: &str,
        query: &QueryParams,
        body: Option<String>,
        auth: RequestAuth,
    ) -> Result<String> {
        self.ensure_auth(auth)?;

        let body_str = body.as_deref().unwrap_or_default();
        let mut headers = self.auth_headers(&method, path, body_str, auth).await?;

        let url = format!("{}{}", self.base_url, path);
        debug!("{} {} (auth: {})", method, url, auth.tier());

        let mut request = self.client.request(method.clone(), &url);
        if !query.is_empty() {
            request = request.query(query.as_slice());
        }
        if let Some(body) = body {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            request = request.body(body);
        }

        let response = request
            .headers(headers)
            .send()
            .await
            .with_context(|| format!("HTTP request failed: {} {}", method, path))?;

        let status = response.status();
        let text = response.text().await.context("Failed to read response body")?;

        if !status.is_success() {
            let error = ClobError::from_response(status.as_u16(), &text);
            if error.is_retryable() {
                warn!("{} {} failed: {}", method, path, error);
            }
            return Err(anyhow::Error::new(error).context(format!("{} {}", method, path)));
        }

        Ok(text)
    }

    /// GET with query parameters, decoding the JSON response
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &QueryParams,
        auth: RequestAuth,
    ) -> Result<T> {
        let text = self.send_raw(Method::GET, path, query, None, auth).await?;
        decode(path, &text)
    }

    /// Request with a JSON body, serialized once and signed as sent
    pub async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        auth: RequestAuth,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = body
            .map(serde_json::to_string)
            .transpose()
            .context("Failed to serialize request body")?;
        let text = self
            .send_raw(method, path, &QueryParams::new(), body, auth)
            .await?;
        decode(path, &text)
    }

    /// Simple connectivity test
    pub async fn test_connectivity(&self) -> Result<()> {
        info!("Testing connectivity to {}", self.base_url);
        let server_time = self.get_server_time().await?;
        info!("Connectivity: OK (server time {})", server_time);
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(path: &str, text: &str) -> Result<T> {
    serde_json::from_str(text).with_context(|| {
        let preview: String = text.chars().take(200).collect();
        format!("Failed to parse response from {}: {}", path, preview)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ClobClient {
        ClobClient::with_base_url("https://example.com/", Arc::new(AuthManager::default())).unwrap()
    }

    #[test]
    fn test_custom_base_url() {
        assert_eq!(client().base_url(), "https://example.com");
    }

    #[test]
    fn test_request_auth_tier() {
        assert_eq!(RequestAuth::None.tier(), AuthTier::None);
        assert_eq!(RequestAuth::L1 { nonce: 3 }.tier(), AuthTier::L1);
        assert_eq!(RequestAuth::L2.tier(), AuthTier::L2);
    }

    #[test]
    fn test_ensure_auth_without_credentials() {
        let client = client();
        assert!(client.ensure_auth(RequestAuth::None).is_ok());
        assert!(matches!(
            client.ensure_auth(RequestAuth::L2),
            Err(AuthError::AuthRequired { required: AuthTier::L2 })
        ));
        assert!(matches!(
            client.ensure_auth(RequestAuth::L1 { nonce: 0 }),
            Err(AuthError::AuthRequired { required: AuthTier::L1 })
        ));
    }

    #[test]
    fn test_ensure_auth_with_l2_only() {
        let client = client();
        client.auth().setup_l2_auth("key", "c2VjcmV0", "pass").unwrap();
        assert!(client.ensure_auth(RequestAuth::L2).is_ok());
        assert!(client.ensure_auth(RequestAuth::L1 { nonce: 0 }).is_err());
    }

    #[tokio::test]
    async fn test_send_fails_before_network_without_auth() {
        // Unroutable base URL: reaching the network would be a different error
        let auth = Arc::new(AuthManager::default());
        let client = ClobClient::with_base_url("http://127.0.0.1:9", auth).unwrap();
        let err = client
            .get::<serde_json::Value>("/data/orders", &QueryParams::new(), RequestAuth::L2)
            .await
            .unwrap_err();
        let auth_err = err.downcast_ref::<AuthError>().unwrap();
        assert!(auth_err.is_auth_required());
    }

    #[test]
    fn test_decode_error_has_preview() {
        let err = decode::<u64>("/time", "not json").unwrap_err();
        assert!(format!("{:#}", err).contains("not json"));
    }
}
