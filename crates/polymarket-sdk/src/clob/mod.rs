//! CLOB REST client
//!
//! # Components
//! - `ClobClient`: signed transport plus typed endpoint wrappers
//! - `RequestAuth`: per-request auth tier (public, L1, L2)
//!
//! Endpoint groups live in sibling modules as `impl ClobClient` blocks.
//!
//! # Source
//! - Endpoints: https://docs.polymarket.com/quickstart/reference/endpoints

mod auth_api;
mod book;
mod client;
mod orders;
mod trades;

pub use client::{ClobClient, RequestAuth};
