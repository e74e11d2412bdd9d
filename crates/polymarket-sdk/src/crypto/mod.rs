//! Signing core: secp256k1 signatures, EIP-712 digests, HMAC request signatures

pub mod eip712;
pub mod primitives;
pub mod request_signer;

pub use eip712::{
    ClobAuth, TypedData, TypedField, Types, CLOB_AUTH_DOMAIN_NAME, CLOB_AUTH_DOMAIN_VERSION,
    CLOB_AUTH_MESSAGE,
};
pub use primitives::{
    address_from_private_key, generate_nonce, hmac_sha256_hex, keccak, parse_private_key,
    recover_address, recover_address_hex, sign_digest, signature_to_hex, RecoveryIdFormat,
    SIGNATURE_LEN,
};
pub use request_signer::{canonical_message, sign_request};
