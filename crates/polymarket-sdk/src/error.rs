//! Error types for the signing core and the exchange transport
//!
//! # Layers
//! - `CryptoError`: raw hashing / signing failures
//! - `EncodingError`: EIP-712 type or message definition problems
//! - `AuthError`: auth-manager preconditions (setup, tier checks)
//! - `ClobError`: non-2xx responses from the CLOB REST API
//!
//! Client layers return `anyhow::Result`; these typed errors stay in the
//! chain and can be recovered with `downcast_ref`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::AuthTier;

/// Failures of the raw cryptographic primitives
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Private key material is malformed (bad hex, wrong length, out of range)
    #[error("invalid private key: {0}")]
    InvalidKey(String),

    /// A required input (secret, message, key) was empty
    #[error("{0} cannot be empty")]
    EmptyInput(&'static str),

    /// The signer rejected the digest
    #[error("signing failed: {0}")]
    SigningFailure(String),

    /// Signature bytes could not be parsed or recovered
    #[error("invalid signature: {0}")]
    InvalidSignature(String),
}

/// EIP-712 encoding failures
///
/// These indicate a protocol-definition bug, never a transient condition.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// Field type is neither a supported primitive nor a declared struct
    #[error("unsupported EIP-712 type '{0}'")]
    UnknownType(String),

    /// Message object lacks a field declared in the type schema
    #[error("message for '{type_name}' is missing field '{field}'")]
    MissingField { type_name: String, field: String },

    /// Value present but not encodable as the declared type
    #[error("invalid value for '{field}' ({ty}): {reason}")]
    InvalidValue { field: String, ty: String, reason: String },

    /// The primary type is not declared in `types`
    #[error("primary type '{0}' is not declared")]
    UnknownPrimaryType(String),

    /// Declared schema is well-formed but describes a different struct
    #[error("schema mismatch: expected '{expected}', found '{found}'")]
    SchemaMismatch { expected: String, found: String },
}

/// Auth manager failures
#[derive(Debug, Error)]
pub enum AuthError {
    /// Empty or malformed key material at setup time (caller error, not retryable)
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Operation invoked before the needed tier was configured
    #[error("{required} authentication required")]
    AuthRequired { required: AuthTier },

    /// Cryptographic operation failed while building headers
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Typed-data digest could not be computed
    #[error("EIP-712 encoding failed: {0}")]
    Encoding(#[from] EncodingError),
}

impl AuthError {
    /// True when the failure is a missing-tier precondition
    pub fn is_auth_required(&self) -> bool {
        matches!(self, AuthError::AuthRequired { .. })
    }
}

// ============================================================================
// CLOB API errors
// ============================================================================

/// Error codes returned (or implied) by the CLOB REST API
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Invalid order
    InvalidOrderMinTickSize,
    InvalidOrderMinSize,
    InvalidOrderDuplicated,
    #[serde(rename = "INVALID_ORDER_NOT_ENOUGH_BALANCE")]
    InvalidOrderBalance,
    InvalidOrderExpiration,
    InvalidOrderError,

    // Execution
    ExecutionError,
    OrderDelayed,
    DelayingOrderError,
    #[serde(rename = "FOK_ORDER_NOT_FILLED_ERROR")]
    FokOrderNotFilled,
    MarketNotReady,

    // Authentication
    InvalidSignature,
    NonceAlreadyUsed,
    InvalidFunderAddress,

    // General
    InternalError,
    RateLimited,
    Unauthorized,
    Forbidden,
    NotFound,
    BadRequest,
}

impl ErrorCode {
    /// Codes the server can embed in a response body, in match priority order
    const BODY_CODES: [ErrorCode; 14] = [
        ErrorCode::InvalidOrderMinTickSize,
        ErrorCode::InvalidOrderMinSize,
        ErrorCode::InvalidOrderDuplicated,
        ErrorCode::InvalidOrderBalance,
        ErrorCode::InvalidOrderExpiration,
        ErrorCode::InvalidOrderError,
        ErrorCode::ExecutionError,
        ErrorCode::OrderDelayed,
        ErrorCode::DelayingOrderError,
        ErrorCode::FokOrderNotFilled,
        ErrorCode::MarketNotReady,
        ErrorCode::InvalidSignature,
        ErrorCode::NonceAlreadyUsed,
        ErrorCode::InvalidFunderAddress,
    ];

    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidOrderMinTickSize => "INVALID_ORDER_MIN_TICK_SIZE",
            ErrorCode::InvalidOrderMinSize => "INVALID_ORDER_MIN_SIZE",
            ErrorCode::InvalidOrderDuplicated => "INVALID_ORDER_DUPLICATED",
            ErrorCode::InvalidOrderBalance => "INVALID_ORDER_NOT_ENOUGH_BALANCE",
            ErrorCode::InvalidOrderExpiration => "INVALID_ORDER_EXPIRATION",
            ErrorCode::InvalidOrderError => "INVALID_ORDER_ERROR",
            ErrorCode::ExecutionError => "EXECUTION_ERROR",
            ErrorCode::OrderDelayed => "ORDER_DELAYED",
            ErrorCode::DelayingOrderError => "DELAYING_ORDER_ERROR",
            ErrorCode::FokOrderNotFilled => "FOK_ORDER_NOT_FILLED_ERROR",
            ErrorCode::MarketNotReady => "MARKET_NOT_READY",
            ErrorCode::InvalidSignature => "INVALID_SIGNATURE",
            ErrorCode::NonceAlreadyUsed => "NONCE_ALREADY_USED",
            ErrorCode::InvalidFunderAddress => "INVALID_FUNDER_ADDRESS",
            ErrorCode::InternalError => "INTERNAL_ERROR",
            ErrorCode::RateLimited => "RATE_LIMITED",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::BadRequest => "BAD_REQUEST",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-2xx response from the CLOB REST API
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("CLOB API error [{code}] (HTTP {status}): {message}")]
pub struct ClobError {
    pub code: ErrorCode,
    pub message: String,
    pub status: u16,
    /// Raw response body
    pub details: String,
}

impl ClobError {
    /// Classify an error response by known code in the body, else by status
    pub fn from_response(status: u16, body: &str) -> Self {
        if let Some(code) = ErrorCode::BODY_CODES.iter().find(|c| body.contains(c.as_str())) {
            return Self {
                code: *code,
                message: describe_body(body).to_string(),
                status,
                details: body.to_string(),
            };
        }

        let (code, message) = match status {
            401 => (ErrorCode::Unauthorized, format!("Client error: {}", status)),
            403 => (ErrorCode::Forbidden, format!("Client error: {}", status)),
            404 => (ErrorCode::NotFound, format!("Client error: {}", status)),
            429 => (ErrorCode::RateLimited, format!("Client error: {}", status)),
            400..=499 => (ErrorCode::BadRequest, format!("Client error: {}", status)),
            500..=599 => (ErrorCode::InternalError, format!("Server error: {}", status)),
            _ => (ErrorCode::InternalError, format!("HTTP error: {}", status)),
        };

        Self { code, message, status, details: body.to_string() }
    }

    /// HTTP 4xx: the exchange rejected the request itself
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::InternalError
                | ErrorCode::RateLimited
                | ErrorCode::OrderDelayed
                | ErrorCode::ExecutionError
        )
    }

    pub fn is_authentication_error(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::InvalidSignature
                | ErrorCode::NonceAlreadyUsed
                | ErrorCode::InvalidFunderAddress
                | ErrorCode::Unauthorized
                | ErrorCode::Forbidden
        )
    }

    pub fn is_order_validation_error(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::InvalidOrderMinTickSize
                | ErrorCode::InvalidOrderMinSize
                | ErrorCode::InvalidOrderDuplicated
                | ErrorCode::InvalidOrderBalance
                | ErrorCode::InvalidOrderExpiration
                | ErrorCode::InvalidOrderError
        )
    }
}

/// Human-readable summary of a known error body
fn describe_body(body: &str) -> &'static str {
    const PATTERNS: [(&str, &str); 8] = [
        ("not enough balance", "Insufficient balance or allowance for order"),
        ("breaks minimum tick size", "Order price breaks minimum tick size rules"),
        ("lower than the minimum", "Order size below minimum threshold"),
        ("Duplicated", "Duplicate order already exists"),
        ("before now", "Order expiration time is in the past"),
        ("INVALID_SIGNATURE", "Invalid wallet signature"),
        ("NONCE_ALREADY_USED", "Nonce has already been used"),
        ("Invalid Funder Address", "Invalid funder address"),
    ];

    PATTERNS
        .iter()
        .find(|(needle, _)| body.contains(needle))
        .map(|(_, message)| *message)
        .unwrap_or("API error occurred")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_code_in_body_wins_over_status() {
        let err = ClobError::from_response(
            400,
            r#"{"error":"INVALID_ORDER_NOT_ENOUGH_BALANCE: not enough balance / allowance"}"#,
        );
        assert_eq!(err.code, ErrorCode::InvalidOrderBalance);
        assert_eq!(err.message, "Insufficient balance or allowance for order");
        assert!(err.is_order_validation_error());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_status_fallback() {
        assert_eq!(ClobError::from_response(401, "nope").code, ErrorCode::Unauthorized);
        assert_eq!(ClobError::from_response(403, "").code, ErrorCode::Forbidden);
        assert_eq!(ClobError::from_response(404, "").code, ErrorCode::NotFound);
        assert_eq!(ClobError::from_response(418, "").code, ErrorCode::BadRequest);

        assert!(ClobError::from_response(409, "").is_client_error());

        let server = ClobError::from_response(502, "bad gateway");
        assert_eq!(server.code, ErrorCode::InternalError);
        assert!(server.is_retryable());
        assert!(!server.is_client_error());
        assert_eq!(server.details, "bad gateway");
    }

    #[test]
    fn test_auth_error_classification() {
        let err = ClobError::from_response(400, "NONCE_ALREADY_USED");
        assert!(err.is_authentication_error());
        assert_eq!(err.message, "Nonce has already been used");
    }

    #[test]
    fn test_error_code_wire_names() {
        let json = serde_json::to_string(&ErrorCode::FokOrderNotFilled).unwrap();
        assert_eq!(json, "\"FOK_ORDER_NOT_FILLED_ERROR\"");
        let json = serde_json::to_string(&ErrorCode::InvalidOrderMinTickSize).unwrap();
        assert_eq!(json, "\"INVALID_ORDER_MIN_TICK_SIZE\"");
    }
}
