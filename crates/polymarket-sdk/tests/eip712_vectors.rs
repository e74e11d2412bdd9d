//! `ClobAuth` digests pinned to independently computed known answers

use alloy_primitives::{b256, B256};
use polymarket_sdk::crypto::{
    address_from_private_key, parse_private_key, recover_address, sign_digest, ClobAuth,
    RecoveryIdFormat,
};
use polymarket_sdk::{AuthManager, SignatureType};

const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

const VECTORS: [(&str, u64, u64, B256); 4] = [
    (
        "1700000000",
        0,
        137,
        b256!("c85352894b3c41f3ea6152479d64b9233fbaf2de87eabc7e4bba3a161fd28493"),
    ),
    (
        "1700000123",
        42,
        137,
        b256!("084be19f7db0ac6daa206be8788ceb76af4636944a0cc208a7cfc440011cad82"),
    ),
    (
        "1700000000",
        7,
        137,
        b256!("aff2941f38a2bec9866bbfed9dc91e7b41a839150a7510aaf5cb63c720ae1746"),
    ),
    (
        "0",
        u64::MAX,
        80002,
        b256!("cd19ce7e2649f2ed76e90c425ceca4e6f7d75c42b51c2815fe3ffab0a0dec7b9"),
    ),
];

#[test]
fn test_clob_auth_digest_vectors() {
    let address = address_from_private_key(TEST_KEY).unwrap();

    for (timestamp, nonce, chain_id, expected) in VECTORS {
        let digest = ClobAuth::new(address, timestamp, nonce).signing_hash(chain_id);
        assert_eq!(digest, expected, "{timestamp}/{nonce}/{chain_id}");
    }
}

#[test]
fn test_l1_header_signature_recovers_over_known_digest() {
    let manager = AuthManager::default();
    let address = manager.setup_l1_auth(TEST_KEY, SignatureType::Eoa, None).unwrap();

    let headers = manager.generate_l1_headers("1700000000", 7).unwrap();
    let signature =
        hex::decode(headers.get("POLY_SIGNATURE").unwrap().trim_start_matches("0x")).unwrap();
    assert!(signature[64] == 27 || signature[64] == 28);

    let (_, _, _, digest) = VECTORS[2];
    assert_eq!(recover_address(&digest, &signature).unwrap(), address);
}

#[test]
fn test_raw_recovery_id_format() {
    let signer = parse_private_key(TEST_KEY).unwrap();
    let digest = ClobAuth::new(signer.address(), "1", 1).signing_hash(137);

    let raw = sign_digest(&digest, &signer, RecoveryIdFormat::Raw).unwrap();
    assert!(raw[64] <= 1);
    assert_eq!(recover_address(&digest, &raw).unwrap(), signer.address());
}
