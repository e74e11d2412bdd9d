//! L2 request signing
//!
//! Canonical message is `method || path || body || timestamp`, where the
//! timestamp is decimal Unix seconds and `body` is empty for body-less
//! requests.

use super::primitives::hmac_sha256_hex;
use crate::error::CryptoError;

/// Concatenate the fields signed for an L2 request
pub fn canonical_message(method: &str, path: &str, body: &str, timestamp: i64) -> String {
    format!("{}{}{}{}", method, path, body, timestamp)
}

/// HMAC-SHA256 signature of a request, lowercase hex
pub fn sign_request(
    secret: &str,
    method: &str,
    path: &str,
    body: &str,
    timestamp: i64,
) -> Result<String, CryptoError> {
    hmac_sha256_hex(secret, &canonical_message(method, path, body, timestamp))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_message_layout() {
        assert_eq!(
            canonical_message("POST", "/order", r#"{"a":1}"#, 1700000000),
            r#"POST/order{"a":1}1700000000"#
        );
        assert_eq!(canonical_message("GET", "/data/orders", "", 42), "GET/data/orders42");
    }

    #[test]
    fn test_sign_request_matches_hmac_over_canonical() {
        let sig = sign_request("secret", "GET", "/data/trades", "", 1700000000).unwrap();
        let expected = hmac_sha256_hex("secret", "GET/data/trades1700000000").unwrap();
        assert_eq!(sig, expected);
    }

    #[test]
    fn test_sign_request_known_vectors() {
        assert_eq!(
            sign_request("secret123", "GET", "/orders", "", 1700000000).unwrap(),
            "5076e7410229d3611b5c2342c98a883720be6f758f41bdd73553797e07ca66a1"
        );
        assert_eq!(
            sign_request("secret123", "POST", "/order", r#"{"a":1}"#, 1700000000).unwrap(),
            "9f57457b0aaef9c594d97467938a5525bfd7ee18b306b50e4fac773afd55c0b1"
        );
        // hex secret: the key is the decoded bytes de ad be ef
        assert_eq!(
            sign_request("deadbeef", "GET", "/orders", "", 1700000000).unwrap(),
            "ce11496f6d7682542bb77d615f541078d476292f2f69833fe1cc69c18b652600"
        );
    }

    #[test]
    fn test_any_field_changes_signature() {
        let base = sign_request("secret", "GET", "/a", "", 1).unwrap();
        assert_ne!(base, sign_request("secret", "POST", "/a", "", 1).unwrap());
        assert_ne!(base, sign_request("secret", "GET", "/b", "", 1).unwrap());
        assert_ne!(base, sign_request("secret", "GET", "/a", "{}", 1).unwrap());
        assert_ne!(base, sign_request("secret", "GET", "/a", "", 2).unwrap());
        assert_ne!(base, sign_request("other", "GET", "/a", "", 1).unwrap());
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert_eq!(
            sign_request("", "GET", "/a", "", 1).unwrap_err(),
            CryptoError::EmptyInput("secret")
        );
    }
}
