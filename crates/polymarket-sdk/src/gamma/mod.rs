//! Gamma API client (market, event and tag metadata)
//!
//! # Components
//! - `GammaClient`: REST client for market discovery and search
//! - Filters: typed query builders implementing [`ToQueryParams`](crate::query::ToQueryParams)
//!
//! # Source
//! - Gamma Structure: https://docs.polymarket.com/developers/gamma-markets-api/gamma-structure
//! - Gamma Endpoints: https://docs.polymarket.com/developers/gamma-markets-api/markets

mod client;
mod filters;

pub use client::GammaClient;
pub use filters::{EventFilters, MarketFilters, RelatedTagFilters, SearchFilters, TagFilters};
