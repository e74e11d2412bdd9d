//! secp256k1 / Keccak-256 / HMAC-SHA256 building blocks

use alloy_primitives::{keccak256, Address, Signature, B256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::CryptoError;

type HmacSha256 = Hmac<Sha256>;

/// Length of an `r || s || v` signature
pub const SIGNATURE_LEN: usize = 65;

/// How the trailing recovery byte of a signature is written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecoveryIdFormat {
    /// `v ∈ {0, 1}`
    Raw,
    /// `v ∈ {27, 28}`, what Ethereum wallets and the CLOB expect
    #[default]
    Ethereum,
}

impl RecoveryIdFormat {
    fn encode(self, y_parity: bool) -> u8 {
        let recid = y_parity as u8;
        match self {
            RecoveryIdFormat::Raw => recid,
            RecoveryIdFormat::Ethereum => recid + 27,
        }
    }
}

/// Keccak-256 of arbitrary bytes
pub fn keccak(data: impl AsRef<[u8]>) -> B256 {
    keccak256(data)
}

/// Parse a hex private key (optional `0x` prefix, surrounding whitespace ignored)
pub fn parse_private_key(hex_key: &str) -> Result<PrivateKeySigner, CryptoError> {
    let stripped = strip_hex_prefix(hex_key.trim());
    if stripped.is_empty() {
        return Err(CryptoError::EmptyInput("private key"));
    }

    let bytes = hex::decode(stripped)
        .map_err(|e| CryptoError::InvalidKey(format!("not valid hex: {}", e)))?;
    if bytes.len() != 32 {
        return Err(CryptoError::InvalidKey(format!(
            "expected 32 bytes, got {}",
            bytes.len()
        )));
    }

    PrivateKeySigner::from_slice(&bytes)
        .map_err(|_| CryptoError::InvalidKey("scalar is zero or exceeds curve order".to_string()))
}

/// Ethereum address controlled by a hex private key
pub fn address_from_private_key(hex_key: &str) -> Result<Address, CryptoError> {
    Ok(parse_private_key(hex_key)?.address())
}

/// Sign a 32-byte digest, returning `r || s || v`
///
/// `s` is always in the lower half of the curve order.
pub fn sign_digest(
    digest: &B256,
    signer: &PrivateKeySigner,
    format: RecoveryIdFormat,
) -> Result<[u8; SIGNATURE_LEN], CryptoError> {
    let signature = signer
        .sign_hash_sync(digest)
        .map_err(|e| CryptoError::SigningFailure(e.to_string()))?;

    let mut out = [0u8; SIGNATURE_LEN];
    out[..32].copy_from_slice(&signature.r().to_be_bytes::<32>());
    out[32..64].copy_from_slice(&signature.s().to_be_bytes::<32>());
    out[64] = format.encode(signature.v());
    Ok(out)
}

/// `0x`-prefixed lowercase hex of a signature
pub fn signature_to_hex(signature: &[u8]) -> String {
    format!("0x{}", hex::encode(signature))
}

/// Recover the signer address of a digest
///
/// Accepts `v` in either `{0, 1}` or `{27, 28}`.
pub fn recover_address(digest: &B256, signature: &[u8]) -> Result<Address, CryptoError> {
    if signature.len() != SIGNATURE_LEN {
        return Err(CryptoError::InvalidSignature(format!(
            "expected {} bytes, got {}",
            SIGNATURE_LEN,
            signature.len()
        )));
    }

    if !matches!(signature[64], 0 | 1 | 27 | 28) {
        return Err(CryptoError::InvalidSignature(format!(
            "unsupported recovery byte {}",
            signature[64]
        )));
    }

    let sig = Signature::from_raw(signature)
        .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
    sig.recover_address_from_prehash(digest)
        .map_err(|e| CryptoError::InvalidSignature(e.to_string()))
}

/// Recover from a `0x`-hex encoded signature
pub fn recover_address_hex(digest: &B256, signature: &str) -> Result<Address, CryptoError> {
    let bytes = hex::decode(strip_hex_prefix(signature))
        .map_err(|e| CryptoError::InvalidSignature(format!("not valid hex: {}", e)))?;
    recover_address(digest, &bytes)
}

/// HMAC-SHA256 of `message`, lowercase hex
///
/// The secret is hex-decoded when it is valid hex, otherwise its UTF-8
/// bytes are the key.
pub fn hmac_sha256_hex(secret: &str, message: &str) -> Result<String, CryptoError> {
    if secret.is_empty() {
        return Err(CryptoError::EmptyInput("secret"));
    }
    if message.is_empty() {
        return Err(CryptoError::EmptyInput("message"));
    }

    let key = decode_secret(secret);
    let mut mac = HmacSha256::new_from_slice(&key)
        .map_err(|e| CryptoError::SigningFailure(e.to_string()))?;
    mac.update(message.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

fn decode_secret(secret: &str) -> Vec<u8> {
    hex::decode(secret).unwrap_or_else(|_| secret.as_bytes().to_vec())
}

/// Random nonce for L1 requests
pub fn generate_nonce() -> u64 {
    rand::random::<u64>()
}

fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}
