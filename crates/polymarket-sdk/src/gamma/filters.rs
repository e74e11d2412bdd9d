//! Query filters for the Gamma list endpoints
//!
//! All fields are optional. Unset fields are omitted; list fields repeat
//! the key once per value (`id=1&id=2`).

use crate::query::{QueryParams, ToQueryParams};

/// Filters for `GET /markets`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketFilters {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub order: Option<String>,
    pub ascending: Option<bool>,
    pub id: Vec<u64>,
    pub slug: Vec<String>,
    pub clob_token_ids: Vec<String>,
    pub condition_ids: Vec<String>,
    pub market_maker_address: Vec<String>,
    pub liquidity_num_min: Option<f64>,
    pub liquidity_num_max: Option<f64>,
    pub volume_num_min: Option<f64>,
    pub volume_num_max: Option<f64>,
    /// ISO 8601 date-time
    pub start_date_min: Option<String>,
    pub start_date_max: Option<String>,
    pub end_date_min: Option<String>,
    pub end_date_max: Option<String>,
    pub tag_id: Option<u64>,
    pub related_tags: Option<bool>,
    pub cyom: Option<bool>,
    pub uma_resolution_status: Option<String>,
    pub game_id: Option<String>,
    pub sports_market_types: Vec<String>,
    pub rewards_min_size: Option<f64>,
    pub question_ids: Vec<String>,
    pub include_tag: Option<bool>,
    pub closed: Option<bool>,
}

impl MarketFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_closed(mut self, closed: bool) -> Self {
        self.closed = Some(closed);
        self
    }

    pub fn with_tag_id(mut self, tag_id: u64) -> Self {
        self.tag_id = Some(tag_id);
        self
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug.push(slug.into());
        self
    }

    pub fn with_clob_token_id(mut self, token_id: impl Into<String>) -> Self {
        self.clob_token_ids.push(token_id.into());
        self
    }
}

impl ToQueryParams for MarketFilters {
    fn to_query_params(&self) -> QueryParams {
        let mut q = QueryParams::new();
        q.push_opt("limit", self.limit.as_ref());
        q.push_opt("offset", self.offset.as_ref());
        q.push_opt("order", self.order.as_ref());
        q.push_opt("ascending", self.ascending.as_ref());
        q.push_all("id", &self.id);
        q.push_all("slug", &self.slug);
        q.push_all("clob_token_ids", &self.clob_token_ids);
        q.push_all("condition_ids", &self.condition_ids);
        q.push_all("market_maker_address", &self.market_maker_address);
        q.push_opt("liquidity_num_min", self.liquidity_num_min.as_ref());
        q.push_opt("liquidity_num_max", self.liquidity_num_max.as_ref());
        q.push_opt("volume_num_min", self.volume_num_min.as_ref());
        q.push_opt("volume_num_max", self.volume_num_max.as_ref());
        q.push_opt("start_date_min", self.start_date_min.as_ref());
        q.push_opt("start_date_max", self.start_date_max.as_ref());
        q.push_opt("end_date_min", self.end_date_min.as_ref());
        q.push_opt("end_date_max", self.end_date_max.as_ref());
        q.push_opt("tag_id", self.tag_id.as_ref());
        q.push_opt("related_tags", self.related_tags.as_ref());
        q.push_opt("cyom", self.cyom.as_ref());
        q.push_opt("uma_resolution_status", self.uma_resolution_status.as_ref());
        q.push_opt("game_id", self.game_id.as_ref());
        q.push_all("sports_market_types", &self.sports_market_types);
        q.push_opt("rewards_min_size", self.rewards_min_size.as_ref());
        q.push_all("question_ids", &self.question_ids);
        q.push_opt("include_tag", self.include_tag.as_ref());
        q.push_opt("closed", self.closed.as_ref());
        q
    }
}

/// Filters for `GET /events`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilters {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub order: Option<String>,
    pub ascending: Option<bool>,
    pub id: Vec<u64>,
    pub slug: Vec<String>,
    pub tag_id: Option<u64>,
    pub exclude_tag_id: Vec<u64>,
    pub related_tags: Option<bool>,
    pub tag_slug: Option<String>,
    pub active: Option<bool>,
    pub archived: Option<bool>,
    pub featured: Option<bool>,
    pub cyom: Option<bool>,
    pub include_chat: Option<bool>,
    pub include_template: Option<bool>,
    pub recurrence: Option<String>,
    pub closed: Option<bool>,
    pub liquidity_min: Option<f64>,
    pub liquidity_max: Option<f64>,
    pub volume_min: Option<f64>,
    pub volume_max: Option<f64>,
    pub start_date_min: Option<String>,
    pub start_date_max: Option<String>,
    pub end_date_min: Option<String>,
    pub end_date_max: Option<String>,
}

impl EventFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_closed(mut self, closed: bool) -> Self {
        self.closed = Some(closed);
        self
    }

    pub fn with_tag_id(mut self, tag_id: u64) -> Self {
        self.tag_id = Some(tag_id);
        self
    }
}

impl ToQueryParams for EventFilters {
    fn to_query_params(&self) -> QueryParams {
        let mut q = QueryParams::new();
        q.push_opt("limit", self.limit.as_ref());
        q.push_opt("offset", self.offset.as_ref());
        q.push_opt("order", self.order.as_ref());
        q.push_opt("ascending", self.ascending.as_ref());
        q.push_all("id", &self.id);
        q.push_all("slug", &self.slug);
        q.push_opt("tag_id", self.tag_id.as_ref());
        q.push_all("exclude_tag_id", &self.exclude_tag_id);
        q.push_opt("related_tags", self.related_tags.as_ref());
        q.push_opt("tag_slug", self.tag_slug.as_ref());
        q.push_opt("active", self.active.as_ref());
        q.push_opt("archived", self.archived.as_ref());
        q.push_opt("featured", self.featured.as_ref());
        q.push_opt("cyom", self.cyom.as_ref());
        q.push_opt("include_chat", self.include_chat.as_ref());
        q.push_opt("include_template", self.include_template.as_ref());
        q.push_opt("recurrence", self.recurrence.as_ref());
        q.push_opt("closed", self.closed.as_ref());
        q.push_opt("liquidity_min", self.liquidity_min.as_ref());
        q.push_opt("liquidity_max", self.liquidity_max.as_ref());
        q.push_opt("volume_min", self.volume_min.as_ref());
        q.push_opt("volume_max", self.volume_max.as_ref());
        q.push_opt("start_date_min", self.start_date_min.as_ref());
        q.push_opt("start_date_max", self.start_date_max.as_ref());
        q.push_opt("end_date_min", self.end_date_min.as_ref());
        q.push_opt("end_date_max", self.end_date_max.as_ref());
        q
    }
}

/// Filters for `GET /tags`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilters {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub order: Option<String>,
    pub ascending: Option<bool>,
    pub include_template: Option<bool>,
    pub is_carousel: Option<bool>,
}

impl ToQueryParams for TagFilters {
    fn to_query_params(&self) -> QueryParams {
        let mut q = QueryParams::new();
        q.push_opt("limit", self.limit.as_ref());
        q.push_opt("offset", self.offset.as_ref());
        q.push_opt("order", self.order.as_ref());
        q.push_opt("ascending", self.ascending.as_ref());
        q.push_opt("include_template", self.include_template.as_ref());
        q.push_opt("is_carousel", self.is_carousel.as_ref());
        q
    }
}

/// Filters for `GET /public-search`; `q` is required
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub q: String,
    pub cache: Option<bool>,
    pub events_status: Option<String>,
    pub limit_per_type: Option<u32>,
    pub page: Option<u32>,
    pub events_tag: Vec<String>,
    pub keep_closed_markets: Option<u32>,
    pub sort: Option<String>,
    pub ascending: Option<bool>,
    pub search_tags: Option<bool>,
    pub search_profiles: Option<bool>,
    pub recurrence: Option<String>,
    pub exclude_tag_id: Vec<u64>,
    pub optimized: Option<bool>,
}

impl SearchFilters {
    pub fn new(q: impl Into<String>) -> Self {
        Self { q: q.into(), ..Self::default() }
    }

    pub fn with_limit_per_type(mut self, limit: u32) -> Self {
        self.limit_per_type = Some(limit);
        self
    }
}

impl ToQueryParams for SearchFilters {
    fn to_query_params(&self) -> QueryParams {
        let mut q = QueryParams::new();
        q.push("q", &self.q);
        q.push_opt("cache", self.cache.as_ref());
        q.push_opt("events_status", self.events_status.as_ref());
        q.push_opt("limit_per_type", self.limit_per_type.as_ref());
        q.push_opt("page", self.page.as_ref());
        q.push_all("events_tag", &self.events_tag);
        q.push_opt("keep_closed_markets", self.keep_closed_markets.as_ref());
        q.push_opt("sort", self.sort.as_ref());
        q.push_opt("ascending", self.ascending.as_ref());
        q.push_opt("search_tags", self.search_tags.as_ref());
        q.push_opt("search_profiles", self.search_profiles.as_ref());
        q.push_opt("recurrence", self.recurrence.as_ref());
        q.push_all("exclude_tag_id", &self.exclude_tag_id);
        q.push_opt("optimized", self.optimized.as_ref());
        q
    }
}

/// Filters for the `/related-tags` endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelatedTagFilters {
    pub omit_empty: Option<bool>,
    /// `active`, `closed` or `all`
    pub status: Option<String>,
}

impl ToQueryParams for RelatedTagFilters {
    fn to_query_params(&self) -> QueryParams {
        let mut q = QueryParams::new();
        q.push_opt("omit_empty", self.omit_empty.as_ref());
        q.push_opt("status", self.status.as_ref());
        q
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filters_produce_no_params() {
        assert!(MarketFilters::default().to_query_params().is_empty());
        assert!(EventFilters::default().to_query_params().is_empty());
        assert!(TagFilters::default().to_query_params().is_empty());
        assert!(RelatedTagFilters::default().to_query_params().is_empty());
    }

    #[test]
    fn test_market_filters_repeat_list_keys() {
        let filters = MarketFilters {
            id: vec![1, 2],
            clob_token_ids: vec!["a".into(), "b".into(), "c".into()],
            ..MarketFilters::new().with_limit(5).with_closed(false)
        };
        let q = filters.to_query_params();

        assert_eq!(q.get_all("id"), vec!["1", "2"]);
        assert_eq!(q.get_all("clob_token_ids"), vec!["a", "b", "c"]);
        assert_eq!(q.get("limit"), Some("5"));
        assert_eq!(q.get("closed"), Some("false"));
        assert_eq!(q.get("offset"), None);
    }

    #[test]
    fn test_event_filters_numeric_formatting() {
        let filters = EventFilters {
            liquidity_min: Some(1000.5),
            volume_max: Some(2.0),
            exclude_tag_id: vec![7, 8],
            ..EventFilters::default()
        };
        let q = filters.to_query_params();
        assert_eq!(q.get("liquidity_min"), Some("1000.5"));
        assert_eq!(q.get("volume_max"), Some("2"));
        assert_eq!(q.get_all("exclude_tag_id"), vec!["7", "8"]);
    }

    #[test]
    fn test_search_query_is_always_first() {
        let q = SearchFilters::new("election").with_limit_per_type(3).to_query_params();
        assert_eq!(q.as_slice()[0], ("q".to_string(), "election".to_string()));
        assert_eq!(q.get("limit_per_type"), Some("3"));
    }
}
