//! Key material held by the auth manager
//!
//! - L1: a secp256k1 private key (signs the EIP-712 `ClobAuth` attestation)
//! - L2: API credentials (apiKey, secret, passphrase) issued by the CLOB
//!
//! # Source
//! - Authentication: https://docs.polymarket.com/developers/CLOB/authentication

use alloy_primitives::Address;
use alloy_signer_local::PrivateKeySigner;
use serde::{Deserialize, Serialize};

/// L2 API credentials for CLOB operations
///
/// Issued by `POST /auth/api-key` or `GET /auth/derive-api-key`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiCredentials {
    /// CLOB API key
    #[serde(rename = "apiKey", alias = "api_key")]
    pub api_key: String,
    /// CLOB API secret (HMAC key)
    pub secret: String,
    /// CLOB API passphrase
    pub passphrase: String,
}

impl ApiCredentials {
    pub fn new(
        api_key: impl Into<String>,
        secret: impl Into<String>,
        passphrase: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            secret: secret.into(),
            passphrase: passphrase.into(),
        }
    }

    /// Create credentials from environment variables
    ///
    /// Expected env vars:
    /// - POLY_API_KEY
    /// - POLY_API_SECRET
    /// - POLY_API_PASSPHRASE
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("POLY_API_KEY").ok()?;
        let secret = std::env::var("POLY_API_SECRET").ok()?;
        let passphrase = std::env::var("POLY_API_PASSPHRASE").ok()?;

        Some(Self { api_key, secret, passphrase })
    }

    /// All three parts are non-empty
    pub fn is_valid(&self) -> bool {
        !self.api_key.is_empty() && !self.secret.is_empty() && !self.passphrase.is_empty()
    }
}

impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("api_key", &redact_key(&self.api_key))
            .field("secret", &"[REDACTED]")
            .field("passphrase", &"[REDACTED]")
            .finish()
    }
}

impl From<&ApiCredentials> for crate::types::WsAuth {
    fn from(creds: &ApiCredentials) -> Self {
        crate::types::WsAuth {
            api_key: creds.api_key.clone(),
            secret: creds.secret.clone(),
            passphrase: creds.passphrase.clone(),
        }
    }
}

fn redact_key(key: &str) -> String {
    format!("{}...", key.chars().take(8).collect::<String>())
}

/// Wallet arrangement behind the signing key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SignatureType {
    /// Externally owned account; the key holds the funds
    #[default]
    Eoa,
    /// Polymarket proxy wallet funded by the key owner
    PolyProxy,
    /// Gnosis Safe wallet
    GnosisSafe,
}

impl SignatureType {
    /// Numeric value the exchange expects in order payloads
    pub fn as_u8(self) -> u8 {
        match self {
            SignatureType::Eoa => 0,
            SignatureType::PolyProxy => 1,
            SignatureType::GnosisSafe => 2,
        }
    }
}

impl TryFrom<u8> for SignatureType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SignatureType::Eoa),
            1 => Ok(SignatureType::PolyProxy),
            2 => Ok(SignatureType::GnosisSafe),
            other => Err(format!("unknown signature type {}", other)),
        }
    }
}

impl std::fmt::Display for SignatureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SignatureType::Eoa => "EOA",
            SignatureType::PolyProxy => "POLY_PROXY",
            SignatureType::GnosisSafe => "GNOSIS_SAFE",
        };
        f.write_str(s)
    }
}

/// L1 key material: the signer plus the wallet arrangement it acts for
#[derive(Clone)]
pub struct SigningIdentity {
    pub(crate) signer: PrivateKeySigner,
    pub(crate) signature_type: SignatureType,
    pub(crate) funder: Option<Address>,
}

impl SigningIdentity {
    /// Address derived from the private key
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn signature_type(&self) -> SignatureType {
        self.signature_type
    }

    /// Funds-holding address: the override when set, otherwise the signer
    pub fn funder(&self) -> Address {
        self.funder.unwrap_or_else(|| self.signer.address())
    }
}

impl std::fmt::Debug for SigningIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningIdentity")
            .field("address", &self.address())
            .field("private_key", &"[REDACTED]")
            .field("signature_type", &self.signature_type)
            .field("funder", &self.funder)
            .finish()
    }
}
