//! Gamma API REST client
//!
//! Base URL: https://gamma-api.polymarket.com
//!
//! # Endpoints
//! - GET /markets, /markets/{id}, /markets/slug/{slug}, /markets/{id}/tags
//! - GET /events, /events/{id}, /events/slug/{slug}, /events/{id}/tags
//! - GET /tags, /tags/{id}, /tags/slug/{slug}
//! - GET /tags/{id}/related-tags[/tags], /tags/slug/{slug}/related-tags[/tags]
//! - GET /public-search
//!
//! All endpoints are public. Single-resource lookups return `None` on 404.
//!
//! # Source
//! - https://docs.polymarket.com/developers/gamma-markets-api/markets

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

use super::filters::{EventFilters, MarketFilters, RelatedTagFilters, SearchFilters, TagFilters};
use crate::config::{normalize_base_url, ClientConfig};
use crate::query::{QueryParams, ToQueryParams};
use crate::types::{GammaEvent, GammaMarket, RelatedTag, SearchResult, Tag};

/// Some lookups answer with a one-element array instead of an object
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    fn into_first(self) -> Option<T> {
        match self {
            OneOrMany::One(item) => Some(item),
            OneOrMany::Many(items) => items.into_iter().next(),
        }
    }
}

fn flag(key: &str, value: Option<bool>) -> QueryParams {
    let mut q = QueryParams::new();
    q.push_opt(key, value.as_ref());
    q
}

/// Gamma API REST client
#[derive(Clone)]
pub struct GammaClient {
    client: Client,
    base_url: String,
}

impl GammaClient {
    /// Create a new Gamma client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(&ClientConfig::default())
    }

    pub fn with_config(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, base_url: normalize_base_url(&config.gamma_base_url) })
    }

    /// Create a new Gamma client with custom base URL
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        Self::with_config(&ClientConfig::default().with_gamma_base_url(base_url))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch(&self, path: &str, query: &QueryParams) -> Result<Option<reqwest::Response>> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} ({} params)", url, query.len());

        let response = self
            .client
            .get(&url)
            .query(query.as_slice())
            .send()
            .await
            .context("HTTP request failed")?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("Not found: {}", url);
            return Ok(None);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("HTTP {} for {}: {}", status, url, body);
        }

        Ok(Some(response))
    }

    /// GET returning a list; 404 is an empty list
    async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &QueryParams,
    ) -> Result<Vec<T>> {
        match self.fetch(path, query).await? {
            Some(response) => response
                .json()
                .await
                .with_context(|| format!("Failed to parse response list from {}", path)),
            None => Ok(Vec::new()),
        }
    }

    /// GET returning one resource; 404 or an empty array is `None`
    async fn get_one<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &QueryParams,
    ) -> Result<Option<T>> {
        match self.fetch(path, query).await? {
            Some(response) => {
                let body: OneOrMany<T> = response
                    .json()
                    .await
                    .with_context(|| format!("Failed to parse response from {}", path))?;
                Ok(body.into_first())
            }
            None => Ok(None),
        }
    }

    // ------------------------------------------------------------------
    // Markets
    // ------------------------------------------------------------------

    /// GET /markets
    pub async fn get_markets(&self, filters: &MarketFilters) -> Result<Vec<GammaMarket>> {
        self.get_list("/markets", &filters.to_query_params()).await
    }

    /// GET /markets/{id}
    pub async fn get_market_by_id(
        &self,
        id: u64,
        include_tag: Option<bool>,
    ) -> Result<Option<GammaMarket>> {
        self.get_one(&format!("/markets/{}", id), &flag("include_tag", include_tag))
            .await
    }

    /// GET /markets/slug/{slug} - most reliable exact lookup
    pub async fn get_market_by_slug(
        &self,
        slug: &str,
        include_tag: Option<bool>,
    ) -> Result<Option<GammaMarket>> {
        self.get_one(&format!("/markets/slug/{}", slug), &flag("include_tag", include_tag))
            .await
    }

    /// GET /markets/{id}/tags
    pub async fn get_market_tags(&self, id: u64) -> Result<Vec<Tag>> {
        self.get_list(&format!("/markets/{}/tags", id), &QueryParams::new())
            .await
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// GET /events
    pub async fn get_events(&self, filters: &EventFilters) -> Result<Vec<GammaEvent>> {
        self.get_list("/events", &filters.to_query_params()).await
    }

    /// GET /events/{id}
    pub async fn get_event_by_id(
        &self,
        id: u64,
        include_chat: Option<bool>,
        include_template: Option<bool>,
    ) -> Result<Option<GammaEvent>> {
        let mut query = flag("include_chat", include_chat);
        query.extend(flag("include_template", include_template));
        self.get_one(&format!("/events/{}", id), &query).await
    }

    /// GET /events/slug/{slug}
    pub async fn get_event_by_slug(
        &self,
        slug: &str,
        include_chat: Option<bool>,
        include_template: Option<bool>,
    ) -> Result<Option<GammaEvent>> {
        let mut query = flag("include_chat", include_chat);
        query.extend(flag("include_template", include_template));
        self.get_one(&format!("/events/slug/{}", slug), &query).await
    }

    /// GET /events/{id}/tags
    pub async fn get_event_tags(&self, id: u64) -> Result<Vec<Tag>> {
        self.get_list(&format!("/events/{}/tags", id), &QueryParams::new())
            .await
    }

    // ------------------------------------------------------------------
    // Tags
    // ------------------------------------------------------------------

    /// GET /tags
    pub async fn get_tags(&self, filters: &TagFilters) -> Result<Vec<Tag>> {
        self.get_list("/tags", &filters.to_query_params()).await
    }

    /// GET /tags/{id}
    pub async fn get_tag_by_id(
        &self,
        id: u64,
        include_template: Option<bool>,
    ) -> Result<Option<Tag>> {
        self.get_one(&format!("/tags/{}", id), &flag("include_template", include_template))
            .await
    }

    /// GET /tags/slug/{slug}
    pub async fn get_tag_by_slug(
        &self,
        slug: &str,
        include_template: Option<bool>,
    ) -> Result<Option<Tag>> {
        let query = flag("include_template", include_template);
        self.get_one(&format!("/tags/slug/{}", slug), &query).await
    }

    /// GET /tags/{id}/related-tags - relationship records
    pub async fn get_related_tags_by_id(
        &self,
        id: u64,
        filters: &RelatedTagFilters,
    ) -> Result<Vec<RelatedTag>> {
        self.get_list(&format!("/tags/{}/related-tags", id), &filters.to_query_params())
            .await
    }

    /// GET /tags/slug/{slug}/related-tags
    pub async fn get_related_tags_by_slug(
        &self,
        slug: &str,
        filters: &RelatedTagFilters,
    ) -> Result<Vec<RelatedTag>> {
        self.get_list(&format!("/tags/slug/{}/related-tags", slug), &filters.to_query_params())
            .await
    }

    /// GET /tags/{id}/related-tags/tags - the related tags themselves
    pub async fn get_related_tag_objects_by_id(
        &self,
        id: u64,
        filters: &RelatedTagFilters,
    ) -> Result<Vec<Tag>> {
        self.get_list(&format!("/tags/{}/related-tags/tags", id), &filters.to_query_params())
            .await
    }

    /// GET /tags/slug/{slug}/related-tags/tags
    pub async fn get_related_tag_objects_by_slug(
        &self,
        slug: &str,
        filters: &RelatedTagFilters,
    ) -> Result<Vec<Tag>> {
        let path = format!("/tags/slug/{}/related-tags/tags", slug);
        self.get_list(&path, &filters.to_query_params()).await
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    /// GET /public-search
    pub async fn search(&self, filters: &SearchFilters) -> Result<SearchResult> {
        if filters.q.trim().is_empty() {
            anyhow::bail!("search query cannot be empty");
        }
        let result = self
            .get_one("/public-search", &filters.to_query_params())
            .await?;
        Ok(result.unwrap_or_default())
    }

    // ------------------------------------------------------------------
    // Convenience
    // ------------------------------------------------------------------

    /// Open markets, most recent first
    pub async fn get_active_markets(&self, limit: u32, offset: u32) -> Result<Vec<GammaMarket>> {
        let filters = MarketFilters {
            ascending: Some(false),
            ..MarketFilters::new().with_closed(false).with_limit(limit).with_offset(offset)
        };
        self.get_markets(&filters).await
    }

    /// Open events, most recent first
    pub async fn get_active_events(&self, limit: u32, offset: u32) -> Result<Vec<GammaEvent>> {
        let filters = EventFilters {
            ascending: Some(false),
            ..EventFilters::new().with_closed(false).with_limit(limit).with_offset(offset)
        };
        self.get_events(&filters).await
    }

    /// Open markets carrying a tag
    pub async fn get_markets_by_tag(
        &self,
        tag_id: u64,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<GammaMarket>> {
        let filters = MarketFilters::new()
            .with_tag_id(tag_id)
            .with_closed(false)
            .with_limit(limit)
            .with_offset(offset);
        self.get_markets(&filters).await
    }

    /// Open events carrying a tag
    pub async fn get_events_by_tag(
        &self,
        tag_id: u64,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<GammaEvent>> {
        let filters = EventFilters::new()
            .with_tag_id(tag_id)
            .with_closed(false)
            .with_limit(limit)
            .with_offset(offset);
        self.get_events(&filters).await
    }

    /// Test connectivity to Gamma API
    pub async fn test_connectivity(&self) -> Result<()> {
        info!("Testing connectivity to {}", self.base_url);

        let url = format!("{}/markets?limit=1", self.base_url);
        let response = self.client.get(&url).send().await.context("Connection test failed")?;

        let status = response.status();
        info!("Gamma connectivity test: HTTP {}", status);

        if !status.is_success() {
            anyhow::bail!("Gamma API returned HTTP {}", status);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = GammaClient::new();
        assert!(client.is_ok());
    }

    #[test]
    fn test_custom_base_url() {
        let client = GammaClient::with_base_url("https://example.com/").unwrap();
        assert_eq!(client.base_url(), "https://example.com");
    }

    #[test]
    fn test_flag_omits_unset() {
        assert!(flag("include_tag", None).is_empty());
        assert_eq!(flag("include_tag", Some(true)).get("include_tag"), Some("true"));
    }

    #[test]
    fn test_one_or_many() {
        let one: OneOrMany<u32> = serde_json::from_str("5").unwrap();
        assert_eq!(one.into_first(), Some(5));
        let many: OneOrMany<u32> = serde_json::from_str("[]").unwrap();
        assert_eq!(many.into_first(), None);
    }
}
