//! Polymarket SDK
//!
//! Typed clients for the Polymarket CLOB and Gamma APIs with two-tier
//! request signing:
//! - `crypto`: secp256k1 signatures, EIP-712 digests, HMAC request signatures
//! - `auth`: `AuthManager` holding L1 (wallet key) and L2 (API credentials) state
//! - `clob`: CLOB REST client (orders, books, pricing, trades, API keys)
//! - `gamma`: Gamma API client for market / event / tag metadata
//! - `ws`: market and user channel WebSocket streaming
//!
//! # Official Documentation
//! - Endpoints: https://docs.polymarket.com/quickstart/reference/endpoints
//! - Authentication: https://docs.polymarket.com/developers/CLOB/authentication
//! - WSS Overview: https://docs.polymarket.com/developers/CLOB/websocket/wss-overview
//! - Gamma Structure: https://docs.polymarket.com/developers/gamma-markets-api/gamma-structure

pub mod auth;
pub mod config;
pub mod crypto;
pub mod error;
pub mod query;
pub mod types;

#[cfg(feature = "clob")]
pub mod clob;

#[cfg(feature = "gamma")]
pub mod gamma;

#[cfg(feature = "ws")]
pub mod ws;

pub use auth::{ApiCredentials, AuthManager, AuthTier, SignatureType, SignedHeaderSet};
pub use config::ClientConfig;
pub use error::{AuthError, ClobError, CryptoError, EncodingError, ErrorCode};
pub use query::{QueryParams, ToQueryParams};
pub use types::*;

#[cfg(feature = "clob")]
pub use clob::{ClobClient, RequestAuth};

#[cfg(feature = "gamma")]
pub use gamma::GammaClient;

#[cfg(feature = "ws")]
pub use ws::{WsClient, WsConnection, WsEventHandler};

/// Official CLOB REST API base URL
/// Source: https://docs.polymarket.com/quickstart/reference/endpoints
pub const CLOB_REST_BASE: &str = "https://clob.polymarket.com";

/// Official Gamma API base URL (market discovery)
/// Source: https://docs.polymarket.com/quickstart/reference/endpoints
pub const GAMMA_API_BASE: &str = "https://gamma-api.polymarket.com";

/// Official CLOB WebSocket base; channels live under /ws/market and /ws/user
/// Source: https://docs.polymarket.com/developers/CLOB/websocket/wss-overview
pub const CLOB_WSS_BASE: &str = "wss://ws-subscriptions-clob.polymarket.com";

/// Polygon mainnet chain id, used in the EIP-712 `ClobAuth` domain
pub const POLYGON_CHAIN_ID: u64 = 137;
