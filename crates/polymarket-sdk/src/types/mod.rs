//! Protocol types for the Polymarket CLOB REST, WebSocket and Gamma APIs
//!
//! # Design Principles
//! 1. Prices and sizes stay `String` to preserve precision (no f64 round-trips)
//! 2. Unknown WebSocket message types fall back to `Unknown { raw }`, never panic
//! 3. Known types keep unrecognized fields in `#[serde(flatten)] extra`
//! 4. Field names match the wire format exactly
//!
//! # Sources
//! - Endpoints: https://docs.polymarket.com/quickstart/reference/endpoints
//! - Market Channel: https://docs.polymarket.com/developers/CLOB/websocket/market-channel
//! - User Channel: https://docs.polymarket.com/developers/CLOB/websocket/user-channel
//! - Gamma Structure: https://docs.polymarket.com/developers/gamma-markets-api/gamma-structure

mod clob;
mod gamma;
mod ws;

pub use clob::*;
pub use gamma::*;
pub use ws::*;

/// Lenient deserializers for fields the APIs encode inconsistently
pub(crate) mod de {
    use serde::de::{Error, Visitor};
    use serde::Deserializer;

    /// Accept `"123"` or `123` as a string
    pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct StringOrNumber;

        impl<'de> Visitor<'de> for StringOrNumber {
            type Value = String;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a string or a number")
            }

            fn visit_str<E: Error>(self, s: &str) -> Result<Self::Value, E> {
                Ok(s.to_string())
            }

            fn visit_string<E: Error>(self, s: String) -> Result<Self::Value, E> {
                Ok(s)
            }

            fn visit_i64<E: Error>(self, n: i64) -> Result<Self::Value, E> {
                Ok(n.to_string())
            }

            fn visit_u64<E: Error>(self, n: u64) -> Result<Self::Value, E> {
                Ok(n.to_string())
            }

            fn visit_f64<E: Error>(self, n: f64) -> Result<Self::Value, E> {
                Ok(n.to_string())
            }

            fn visit_none<E: Error>(self) -> Result<Self::Value, E> {
                Ok(String::new())
            }

            fn visit_unit<E: Error>(self) -> Result<Self::Value, E> {
                Ok(String::new())
            }
        }

        deserializer.deserialize_any(StringOrNumber)
    }

    /// Deserialize a stringified JSON array (e.g. `"[\"a\", \"b\"]"`) into `Vec<String>`
    ///
    /// Also accepts a real JSON array, null, or a missing field.
    pub fn stringified_array_or_default<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct StringifiedArrayVisitor;

        impl<'de> Visitor<'de> for StringifiedArrayVisitor {
            type Value = Vec<String>;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a stringified JSON array, an array, or null")
            }

            fn visit_str<E: Error>(self, s: &str) -> Result<Self::Value, E> {
                if s.is_empty() {
                    return Ok(Vec::new());
                }
                serde_json::from_str(s)
                    .map_err(|e| E::custom(format!("Invalid JSON array '{}': {}", s, e)))
            }

            fn visit_string<E: Error>(self, s: String) -> Result<Self::Value, E> {
                self.visit_str(&s)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut out = Vec::new();
                while let Some(item) = seq.next_element::<String>()? {
                    out.push(item);
                }
                Ok(out)
            }

            fn visit_none<E: Error>(self) -> Result<Self::Value, E> {
                Ok(Vec::new())
            }

            fn visit_unit<E: Error>(self) -> Result<Self::Value, E> {
                Ok(Vec::new())
            }
        }

        deserializer.deserialize_any(StringifiedArrayVisitor)
    }

    /// Accept `1.5`, `"1.5"`, `""` or null as an optional float
    pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::Deserialize;

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Num(f64),
            Str(String),
        }

        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Raw::Num(n)) => Ok(Some(n)),
            Some(Raw::Str(s)) if s.trim().is_empty() => Ok(None),
            Some(Raw::Str(s)) => s.trim().parse().map(Some).map_err(D::Error::custom),
        }
    }
}
