//! EIP-712 `ClobAuth` attestation
//!
//! The struct is declared with alloy's `sol!` macro, so type hashing and the
//! `0x19 0x01` signing digest come from `alloy-sol-types`. This module adds
//! the CLOB domain, a builder, and a checked conversion from the wallet JSON
//! shape (`types` / `primaryType` / `domain` / `message`).
//!
//! # Source
//! <https://eips.ethereum.org/EIPS/eip-712>

use std::collections::BTreeMap;

use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::{eip712_domain, sol, Eip712Domain, SolStruct};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::EncodingError;

/// Domain name of the CLOB auth message
pub const CLOB_AUTH_DOMAIN_NAME: &str = "ClobAuthDomain";
/// Domain version of the CLOB auth message
pub const CLOB_AUTH_DOMAIN_VERSION: &str = "1";
/// Fixed attestation text carried in every CLOB auth message
pub const CLOB_AUTH_MESSAGE: &str = "This message attests that I control the given wallet";

const DOMAIN_TYPE: &str = "EIP712Domain";

sol! {
    /// The L1 attestation message signed with the wallet key
    #[derive(Debug, PartialEq, Eq)]
    struct ClobAuth {
        address address;
        string timestamp;
        uint256 nonce;
        string message;
    }
}

impl ClobAuth {
    pub fn new(address: Address, timestamp: impl Into<String>, nonce: u64) -> Self {
        Self {
            address,
            timestamp: timestamp.into(),
            nonce: U256::from(nonce),
            message: CLOB_AUTH_MESSAGE.to_string(),
        }
    }

    /// `{name: "ClobAuthDomain", version: "1", chainId}`
    pub fn domain(chain_id: u64) -> Eip712Domain {
        eip712_domain! {
            name: CLOB_AUTH_DOMAIN_NAME,
            version: CLOB_AUTH_DOMAIN_VERSION,
            chain_id: chain_id,
        }
    }

    /// Digest to sign: `keccak256(0x19 || 0x01 || domainSeparator || hashStruct(self))`
    pub fn signing_hash(&self, chain_id: u64) -> B256 {
        self.eip712_signing_hash(&Self::domain(chain_id))
    }

    /// The message in the JSON shape wallets accept for `eth_signTypedData_v4`
    pub fn typed_data(&self, chain_id: u64) -> TypedData {
        let mut types = Types::new();
        types.insert(
            DOMAIN_TYPE.to_string(),
            vec![
                TypedField::new("name", "string"),
                TypedField::new("version", "string"),
                TypedField::new("chainId", "uint256"),
            ],
        );
        types.insert(
            "ClobAuth".to_string(),
            vec![
                TypedField::new("address", "address"),
                TypedField::new("timestamp", "string"),
                TypedField::new("nonce", "uint256"),
                TypedField::new("message", "string"),
            ],
        );

        TypedData {
            types,
            primary_type: "ClobAuth".to_string(),
            domain: Self::domain(chain_id),
            message: json!({
                "address": self.address.to_checksum(None),
                "timestamp": self.timestamp,
                "nonce": self.nonce.to_string(),
                "message": self.message,
            }),
        }
    }

    /// Rebuild the message from wallet JSON
    ///
    /// The declared schema must spell exactly
    /// `ClobAuth(address address,string timestamp,uint256 nonce,string message)`;
    /// anything else fails loudly instead of hashing a different struct.
    pub fn from_typed_data(data: &TypedData) -> Result<Self, EncodingError> {
        let root = Self::eip712_root_type();
        if data.primary_type != root {
            return Err(EncodingError::UnknownPrimaryType(data.primary_type.clone()));
        }
        let fields = data
            .types
            .get(root.as_ref())
            .ok_or_else(|| EncodingError::UnknownPrimaryType(data.primary_type.clone()))?;

        check_schema(&data.types, &root, fields, &Self::eip712_encode_type())?;

        let object = data
            .message
            .as_object()
            .ok_or_else(|| EncodingError::InvalidValue {
                field: root.to_string(),
                ty: root.to_string(),
                reason: "expected a JSON object".to_string(),
            })?;
        let reader = MessageReader {
            type_name: root.as_ref(),
            object,
        };

        Ok(Self {
            address: reader.address("address")?,
            timestamp: reader.string("timestamp")?,
            nonce: reader.uint256("nonce")?,
            message: reader.string("message")?,
        })
    }
}

/// One `(name, type)` entry of a struct definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedField {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

impl TypedField {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// Struct definitions keyed by type name
pub type Types = BTreeMap<String, Vec<TypedField>>;

/// Typed-data payload in wallet JSON shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedData {
    pub types: Types,
    pub primary_type: String,
    pub domain: Eip712Domain,
    pub message: Value,
}

impl TypedData {
    /// Digest to sign, after checking the payload describes a `ClobAuth`
    pub fn signing_hash(&self) -> Result<B256, EncodingError> {
        if let Some(fields) = self.types.get(DOMAIN_TYPE) {
            check_schema(&self.types, DOMAIN_TYPE, fields, &self.domain.encode_type())?;
        }
        let auth = ClobAuth::from_typed_data(self)?;
        Ok(auth.eip712_signing_hash(&self.domain))
    }
}

fn check_schema(
    types: &Types,
    name: &str,
    fields: &[TypedField],
    expected: &str,
) -> Result<(), EncodingError> {
    for field in fields {
        if !types.contains_key(&field.ty) && !is_primitive(&field.ty) {
            return Err(EncodingError::UnknownType(field.ty.clone()));
        }
    }

    let members: Vec<String> = fields
        .iter()
        .map(|f| format!("{} {}", f.ty, f.name))
        .collect();
    let found = format!("{}({})", name, members.join(","));
    if found != expected {
        return Err(EncodingError::SchemaMismatch {
            expected: expected.to_string(),
            found,
        });
    }
    Ok(())
}

/// Canonical EIP-712 primitive names; arrays are not supported
fn is_primitive(ty: &str) -> bool {
    match ty {
        "address" | "bool" | "string" | "bytes" => true,
        _ => {
            if let Some(bits) = sized_suffix(ty, "uint") {
                return (8..=256).contains(&bits) && bits % 8 == 0;
            }
            if let Some(len) = sized_suffix(ty, "bytes") {
                return (1..=32).contains(&len);
            }
            false
        }
    }
}

/// `uint256` -> `Some(256)`, `bytes4` -> `Some(4)`
///
/// Only plain decimal digits without a leading zero are a size, so
/// `uint08`, `bytes01`, `uint+8` and bare `uint` are not.
fn sized_suffix(ty: &str, prefix: &str) -> Option<usize> {
    let rest = ty.strip_prefix(prefix)?;
    if rest.is_empty() || rest.starts_with('0') || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    rest.parse().ok()
}

struct MessageReader<'a> {
    type_name: &'a str,
    object: &'a Map<String, Value>,
}

impl MessageReader<'_> {
    fn get(&self, field: &str) -> Result<&Value, EncodingError> {
        self.object
            .get(field)
            .ok_or_else(|| EncodingError::MissingField {
                type_name: self.type_name.to_string(),
                field: field.to_string(),
            })
    }

    fn invalid(field: &str, ty: &str, reason: impl Into<String>) -> EncodingError {
        EncodingError::InvalidValue {
            field: field.to_string(),
            ty: ty.to_string(),
            reason: reason.into(),
        }
    }

    fn string(&self, field: &str) -> Result<String, EncodingError> {
        self.get(field)?
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| Self::invalid(field, "string", "expected a string"))
    }

    fn address(&self, field: &str) -> Result<Address, EncodingError> {
        let s = self
            .get(field)?
            .as_str()
            .ok_or_else(|| Self::invalid(field, "address", "expected a hex string"))?;
        // lowercase first so any casing is accepted without a checksum check
        s.to_ascii_lowercase()
            .parse()
            .map_err(|e| Self::invalid(field, "address", format!("'{}': {}", s, e)))
    }

    fn uint256(&self, field: &str) -> Result<U256, EncodingError> {
        match self.get(field)? {
            Value::Number(n) => n.as_u64().map(U256::from).ok_or_else(|| {
                Self::invalid(field, "uint256", format!("{} is not a non-negative integer", n))
            }),
            Value::String(s) => s.trim().parse::<U256>().map_err(|e| {
                let reason = format!("'{}' is not an unsigned integer: {}", s, e);
                Self::invalid(field, "uint256", reason)
            }),
            other => Err(Self::invalid(
                field,
                "uint256",
                format!("expected a number or numeric string, got {}", other),
            )),
        }
    }
}
