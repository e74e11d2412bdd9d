//! Endpoint and transport configuration shared by the REST and WebSocket clients

use std::time::Duration;

use tracing::warn;

use crate::{CLOB_REST_BASE, CLOB_WSS_BASE, GAMMA_API_BASE, POLYGON_CHAIN_ID};

/// Default HTTP request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub clob_base_url: String,
    pub gamma_base_url: String,
    /// WebSocket base, without the `/ws/{channel}` suffix
    pub ws_base_url: String,
    pub chain_id: u64,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            clob_base_url: CLOB_REST_BASE.to_string(),
            gamma_base_url: GAMMA_API_BASE.to_string(),
            ws_base_url: CLOB_WSS_BASE.to_string(),
            chain_id: POLYGON_CHAIN_ID,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by environment variables
    ///
    /// Optional env vars:
    /// - POLY_CLOB_URL
    /// - POLY_GAMMA_URL
    /// - POLY_WS_URL
    /// - POLY_CHAIN_ID
    /// - POLY_HTTP_TIMEOUT_SECS
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("POLY_CLOB_URL") {
            config = config.with_clob_base_url(&url);
        }
        if let Ok(url) = std::env::var("POLY_GAMMA_URL") {
            config = config.with_gamma_base_url(&url);
        }
        if let Ok(url) = std::env::var("POLY_WS_URL") {
            config = config.with_ws_base_url(&url);
        }
        if let Ok(raw) = std::env::var("POLY_CHAIN_ID") {
            match raw.parse() {
                Ok(chain_id) => config.chain_id = chain_id,
                Err(_) => warn!("Ignoring invalid POLY_CHAIN_ID={}", raw),
            }
        }
        if let Ok(raw) = std::env::var("POLY_HTTP_TIMEOUT_SECS") {
            match raw.parse() {
                Ok(secs) => config.timeout = Duration::from_secs(secs),
                Err(_) => warn!("Ignoring invalid POLY_HTTP_TIMEOUT_SECS={}", raw),
            }
        }

        config
    }

    pub fn with_clob_base_url(mut self, url: &str) -> Self {
        self.clob_base_url = normalize_base_url(url);
        self
    }

    pub fn with_gamma_base_url(mut self, url: &str) -> Self {
        self.gamma_base_url = normalize_base_url(url);
        self
    }

    pub fn with_ws_base_url(mut self, url: &str) -> Self {
        self.ws_base_url = normalize_base_url(url);
        self
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

pub(crate) fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
