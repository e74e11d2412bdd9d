//! Authentication state for Polymarket CLOB requests
//!
//! # L1 vs L2 Authentication
//! - L1: private key signs the EIP-712 `ClobAuth` attestation (credential
//!   creation / derivation)
//! - L2: API credentials sign each request with HMAC-SHA256 (trading and
//!   account endpoints)
//!
//! The two tiers are configured independently; L2 does not require L1.
//! One `AuthManager` is shared as `Arc<AuthManager>` by every client that
//! signs requests.
//!
//! # Source
//! - Authentication: https://docs.polymarket.com/developers/CLOB/authentication

mod credentials;
mod headers;

pub use credentials::{ApiCredentials, SignatureType, SigningIdentity};
pub use headers::{
    SignedHeaderSet, POLY_ADDRESS, POLY_API_KEY, POLY_NONCE, POLY_PASSPHRASE, POLY_SIGNATURE,
    POLY_TIMESTAMP,
};

use std::str::FromStr;

use alloy_primitives::{Address, B256};
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::crypto::{self, ClobAuth, RecoveryIdFormat, TypedData};
use crate::error::AuthError;
use crate::POLYGON_CHAIN_ID;

/// Highest configured authentication level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AuthTier {
    None,
    L1,
    L2,
}

impl std::fmt::Display for AuthTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AuthTier::None => "no",
            AuthTier::L1 => "L1",
            AuthTier::L2 => "L2",
        };
        f.write_str(s)
    }
}

#[derive(Default)]
struct AuthState {
    identity: Option<SigningIdentity>,
    credentials: Option<ApiCredentials>,
}

/// Holds L1 / L2 key material and produces signed header sets
///
/// Readers take a consistent snapshot under a read lock, so a header set
/// never mixes credentials from before and after a concurrent update.
pub struct AuthManager {
    chain_id: u64,
    state: RwLock<AuthState>,
}

impl Default for AuthManager {
    fn default() -> Self {
        Self::new(POLYGON_CHAIN_ID)
    }
}

impl std::fmt::Debug for AuthManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("AuthManager")
            .field("chain_id", &self.chain_id)
            .field("identity", &state.identity)
            .field("credentials", &state.credentials)
            .finish()
    }
}

impl AuthManager {
    /// Empty manager (no auth) signing for `chain_id`
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            state: RwLock::new(AuthState::default()),
        }
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    // ========================================================================
    // Setup
    // ========================================================================

    /// Configure L1 from a hex private key
    ///
    /// `funder` overrides the funds-holding address for proxy / Safe wallets.
    /// Returns the address derived from the key.
    pub fn setup_l1_auth(
        &self,
        private_key: &str,
        signature_type: SignatureType,
        funder: Option<&str>,
    ) -> Result<Address, AuthError> {
        if private_key.trim().is_empty() {
            return Err(AuthError::InvalidCredentials(
                "private key cannot be empty".to_string(),
            ));
        }

        let signer = crypto::parse_private_key(private_key)
            .map_err(|e| AuthError::InvalidCredentials(e.to_string()))?;

        let funder = match funder.map(str::trim).filter(|f| !f.is_empty()) {
            Some(raw) => Some(Address::from_str(raw).map_err(|e| {
                AuthError::InvalidCredentials(format!("invalid funder address '{}': {}", raw, e))
            })?),
            None => None,
        };

        let address = signer.address();
        self.state.write().identity = Some(SigningIdentity {
            signer,
            signature_type,
            funder,
        });

        info!(%address, %signature_type, "L1 auth configured");
        Ok(address)
    }

    /// Configure L2 from issued API credentials
    pub fn setup_l2_auth(
        &self,
        api_key: &str,
        secret: &str,
        passphrase: &str,
    ) -> Result<(), AuthError> {
        self.set_api_credentials(ApiCredentials::new(api_key, secret, passphrase))
    }

    /// Configure L2 from a credentials value
    pub fn set_api_credentials(&self, credentials: ApiCredentials) -> Result<(), AuthError> {
        if credentials.api_key.is_empty() {
            return Err(AuthError::InvalidCredentials("API key cannot be empty".to_string()));
        }
        if credentials.secret.is_empty() {
            return Err(AuthError::InvalidCredentials("API secret cannot be empty".to_string()));
        }
        if credentials.passphrase.is_empty() {
            return Err(AuthError::InvalidCredentials(
                "API passphrase cannot be empty".to_string(),
            ));
        }

        info!(credentials = ?credentials, "L2 auth configured");
        self.state.write().credentials = Some(credentials);
        Ok(())
    }

    /// Drop all key material
    pub fn clear(&self) {
        *self.state.write() = AuthState::default();
        debug!("auth state cleared");
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn has_l1_auth(&self) -> bool {
        self.state.read().identity.is_some()
    }

    pub fn has_l2_auth(&self) -> bool {
        self.state.read().credentials.is_some()
    }

    /// Highest tier configured; L2 counts as L2 even without L1
    pub fn tier(&self) -> AuthTier {
        let state = self.state.read();
        if state.credentials.is_some() {
            AuthTier::L2
        } else if state.identity.is_some() {
            AuthTier::L1
        } else {
            AuthTier::None
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.tier() != AuthTier::None
    }

    /// Signer address, if L1 is configured
    pub fn address(&self) -> Option<Address> {
        self.state.read().identity.as_ref().map(SigningIdentity::address)
    }

    /// Checksummed signer address, or an empty string without L1
    pub fn get_address(&self) -> String {
        self.address()
            .map(|a| a.to_checksum(None))
            .unwrap_or_default()
    }

    pub fn signature_type(&self) -> Option<SignatureType> {
        self.state.read().identity.as_ref().map(|i| i.signature_type)
    }

    /// Funds-holding address (override or signer), if L1 is configured
    pub fn funder(&self) -> Option<Address> {
        self.state.read().identity.as_ref().map(SigningIdentity::funder)
    }

    /// Copy of the L2 credentials, if configured
    pub fn get_api_credentials(&self) -> Option<ApiCredentials> {
        self.state.read().credentials.clone()
    }

    // ========================================================================
    // Signing
    // ========================================================================

    /// `0x`-hex EIP-712 signature over `ClobAuth(address, timestamp, nonce)`
    pub fn sign_l1_message(&self, timestamp: &str, nonce: u64) -> Result<String, AuthError> {
        let state = self.state.read();
        let identity = state.identity.as_ref().ok_or(AuthError::AuthRequired {
            required: AuthTier::L1,
        })?;
        self.sign_clob_auth(identity, timestamp, nonce)
    }

    /// L1 headers: address, signature, timestamp, nonce
    pub fn generate_l1_headers(
        &self,
        timestamp: &str,
        nonce: u64,
    ) -> Result<SignedHeaderSet, AuthError> {
        let state = self.state.read();
        let identity = state.identity.as_ref().ok_or(AuthError::AuthRequired {
            required: AuthTier::L1,
        })?;

        let signature = self.sign_clob_auth(identity, timestamp, nonce)?;

        let mut headers = SignedHeaderSet::default();
        headers.push(POLY_ADDRESS, identity.address().to_checksum(None));
        headers.push(POLY_SIGNATURE, signature);
        headers.push(POLY_TIMESTAMP, timestamp);
        headers.push(POLY_NONCE, nonce.to_string());
        Ok(headers)
    }

    /// L2 headers for a request, timestamped now
    pub fn generate_l2_headers(
        &self,
        method: &str,
        path: &str,
        body: &str,
    ) -> Result<SignedHeaderSet, AuthError> {
        // Captured once: the same value is signed and sent
        let timestamp = chrono::Utc::now().timestamp();
        self.generate_l2_headers_at(method, path, body, timestamp)
    }

    /// L2 headers for a request at a fixed Unix timestamp (seconds)
    pub fn generate_l2_headers_at(
        &self,
        method: &str,
        path: &str,
        body: &str,
        timestamp: i64,
    ) -> Result<SignedHeaderSet, AuthError> {
        let state = self.state.read();
        let credentials = state.credentials.as_ref().ok_or(AuthError::AuthRequired {
            required: AuthTier::L2,
        })?;

        let signature =
            crypto::sign_request(&credentials.secret, method, path, body, timestamp)?;

        let address = state
            .identity
            .as_ref()
            .map(|i| i.address().to_checksum(None))
            .unwrap_or_default();

        let mut headers = SignedHeaderSet::default();
        headers.push(POLY_ADDRESS, address);
        headers.push(POLY_SIGNATURE, signature);
        headers.push(POLY_TIMESTAMP, timestamp.to_string());
        headers.push(POLY_API_KEY, credentials.api_key.as_str());
        headers.push(POLY_PASSPHRASE, credentials.passphrase.as_str());
        Ok(headers)
    }

    /// Sign a wallet-JSON `ClobAuth` payload built elsewhere
    ///
    /// The payload's domain is used as given; its message must name the
    /// configured wallet.
    pub fn sign_typed_data(&self, data: &TypedData) -> Result<String, AuthError> {
        let state = self.state.read();
        let identity = state.identity.as_ref().ok_or(AuthError::AuthRequired {
            required: AuthTier::L1,
        })?;

        let digest = data.signing_hash()?;
        let auth = ClobAuth::from_typed_data(data)?;
        if auth.address != identity.address() {
            return Err(AuthError::InvalidCredentials(format!(
                "typed data names {}, configured wallet is {}",
                auth.address,
                identity.address()
            )));
        }
        sign_with(identity, &digest)
    }

    fn sign_clob_auth(
        &self,
        identity: &SigningIdentity,
        timestamp: &str,
        nonce: u64,
    ) -> Result<String, AuthError> {
        let auth = ClobAuth::new(identity.address(), timestamp, nonce);
        let digest = auth.signing_hash(self.chain_id);
        sign_with(identity, &digest)
    }
}

fn sign_with(identity: &SigningIdentity, digest: &B256) -> Result<String, AuthError> {
    let signature = crypto::sign_digest(digest, &identity.signer, RecoveryIdFormat::Ethereum)?;
    Ok(crypto::signature_to_hex(&signature))
}
