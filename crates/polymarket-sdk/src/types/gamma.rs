// ============================================================================
// Gamma API Types
// Source: https://docs.polymarket.com/developers/gamma-markets-api/gamma-structure
//
// The Gamma schema is wide and drifts often. Commonly used fields are typed;
// everything else is kept in `extra`.
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::de;

/// Parse an ISO 8601 / RFC 3339 timestamp into Unix seconds
fn rfc3339_to_unix(s: &str) -> Option<i64> {
    chrono::DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.timestamp())
}

/// Gamma market from `GET /markets`, `/markets/{id}` or `/markets/slug/{slug}`
///
/// The API returns some list fields as stringified JSON arrays
/// (`"[\"Yes\", \"No\"]"`); they are decoded into `Vec<String>`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GammaMarket {
    #[serde(deserialize_with = "de::string_or_number")]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,

    /// Blockchain condition identifier (used by the CLOB)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    /// CLOB token IDs, one per outcome
    #[serde(default, deserialize_with = "de::stringified_array_or_default")]
    pub clob_token_ids: Vec<String>,

    /// Outcome labels (e.g. ["Yes", "No"])
    #[serde(default, deserialize_with = "de::stringified_array_or_default")]
    pub outcomes: Vec<String>,

    /// Outcome prices as decimal strings
    #[serde(default, deserialize_with = "de::stringified_array_or_default")]
    pub outcome_prices: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,

    #[serde(default)]
    pub active: bool,

    #[serde(default)]
    pub closed: bool,

    #[serde(default)]
    pub archived: bool,

    #[serde(default)]
    pub accepting_orders: bool,

    #[serde(default)]
    pub enable_order_book: bool,

    #[serde(default)]
    pub neg_risk: bool,

    #[serde(default, deserialize_with = "de::opt_f64", skip_serializing_if = "Option::is_none")]
    pub volume_num: Option<f64>,

    #[serde(default, deserialize_with = "de::opt_f64", skip_serializing_if = "Option::is_none")]
    pub liquidity_num: Option<f64>,

    #[serde(default, deserialize_with = "de::opt_f64", skip_serializing_if = "Option::is_none")]
    pub order_price_min_tick_size: Option<f64>,

    #[serde(default, deserialize_with = "de::opt_f64", skip_serializing_if = "Option::is_none")]
    pub order_min_size: Option<f64>,

    #[serde(default, deserialize_with = "de::opt_f64", skip_serializing_if = "Option::is_none")]
    pub best_bid: Option<f64>,

    #[serde(default, deserialize_with = "de::opt_f64", skip_serializing_if = "Option::is_none")]
    pub best_ask: Option<f64>,

    #[serde(default, deserialize_with = "de::opt_f64", skip_serializing_if = "Option::is_none")]
    pub last_trade_price: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution_source: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub tags: Vec<Tag>,

    /// Extra fields for forward compatibility
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GammaMarket {
    /// Binary market with exactly two tradable tokens
    pub fn is_binary(&self) -> bool {
        self.clob_token_ids.len() == 2
    }

    /// Token id for an outcome label (case-insensitive)
    pub fn token_for_outcome(&self, outcome: &str) -> Option<&str> {
        self.outcomes
            .iter()
            .position(|o| o.eq_ignore_ascii_case(outcome))
            .and_then(|i| self.clob_token_ids.get(i))
            .map(String::as_str)
    }

    pub fn start_timestamp(&self) -> Option<i64> {
        self.start_date.as_deref().and_then(rfc3339_to_unix)
    }

    pub fn end_timestamp(&self) -> Option<i64> {
        self.end_date.as_deref().and_then(rfc3339_to_unix)
    }
}

/// Gamma event (a group of related markets)
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GammaEvent {
    #[serde(deserialize_with = "de::string_or_number")]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,

    #[serde(default)]
    pub active: bool,

    #[serde(default)]
    pub closed: bool,

    #[serde(default)]
    pub archived: bool,

    #[serde(default)]
    pub featured: bool,

    #[serde(default)]
    pub neg_risk: bool,

    #[serde(default, deserialize_with = "de::opt_f64", skip_serializing_if = "Option::is_none")]
    pub liquidity: Option<f64>,

    #[serde(default, deserialize_with = "de::opt_f64", skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,

    #[serde(default, deserialize_with = "de::opt_f64", skip_serializing_if = "Option::is_none")]
    pub volume24hr: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default)]
    pub markets: Vec<GammaMarket>,

    #[serde(default)]
    pub series: Vec<Series>,

    #[serde(default)]
    pub categories: Vec<Category>,

    #[serde(default)]
    pub tags: Vec<Tag>,

    #[serde(default)]
    pub chats: Vec<Chat>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GammaEvent {
    pub fn end_timestamp(&self) -> Option<i64> {
        self.end_date.as_deref().and_then(rfc3339_to_unix)
    }
}

/// Metadata tag
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    #[serde(deserialize_with = "de::string_or_number")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_show: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_hide: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_carousel: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Tag with event count, as returned by search
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TagWithCount {
    #[serde(deserialize_with = "de::string_or_number")]
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_count: Option<u64>,
}

/// Edge between two tags
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedTag {
    #[serde(deserialize_with = "de::string_or_number")]
    pub id: String,
    #[serde(default, rename = "tagID", skip_serializing_if = "Option::is_none")]
    pub tag_id: Option<u64>,
    #[serde(default, rename = "relatedTagID", skip_serializing_if = "Option::is_none")]
    pub related_tag_id: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_f64", skip_serializing_if = "Option::is_none")]
    pub rank: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(deserialize_with = "de::string_or_number")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Recurring series of events
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    #[serde(deserialize_with = "de::string_or_number")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub closed: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    #[serde(deserialize_with = "de::string_or_number")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Public user profile from search
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(deserialize_with = "de::string_or_number")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pseudonym: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_wallet: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub total_results: u64,
}

/// Combined `GET /public-search` response
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub events: Vec<GammaEvent>,
    #[serde(default)]
    pub tags: Vec<TagWithCount>,
    #[serde(default)]
    pub profiles: Vec<UserProfile>,
    #[serde(default)]
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_stringified_arrays() {
        let market: GammaMarket = serde_json::from_str(
            r#"{
                "id": "12345",
                "question": "Will it rain?",
                "conditionId": "0xcond",
                "slug": "will-it-rain",
                "clobTokenIds": "[\"111\", \"222\"]",
                "outcomes": "[\"Yes\", \"No\"]",
                "outcomePrices": "[\"0.6\", \"0.4\"]",
                "active": true,
                "closed": false,
                "endDate": "2025-01-01T00:00:00Z",
                "volumeNum": 1234.5,
                "someNewField": 1
            }"#,
        )
        .unwrap();

        assert!(market.is_binary());
        assert_eq!(market.token_for_outcome("no"), Some("222"));
        assert_eq!(market.outcome_prices, vec!["0.6", "0.4"]);
        assert_eq!(market.end_timestamp(), Some(1735689600));
        assert_eq!(market.volume_num, Some(1234.5));
        assert!(market.extra.contains_key("someNewField"));
    }

    #[test]
    fn test_market_missing_optional_fields() {
        let market: GammaMarket =
            serde_json::from_str(r#"{"id": 7, "clobTokenIds": null}"#).unwrap();
        assert_eq!(market.id, "7");
        assert!(market.clob_token_ids.is_empty());
        assert!(market.question.is_none());
        assert!(!market.active);
    }

    #[test]
    fn test_event_with_nested_markets() {
        let event: GammaEvent = serde_json::from_str(
            r#"{
                "id": "900",
                "slug": "election",
                "title": "Election",
                "markets": [{"id": "1", "outcomes": "[\"A\",\"B\"]"}],
                "tags": [{"id": "2", "label": "Politics", "slug": "politics"}]
            }"#,
        )
        .unwrap();
        assert_eq!(event.markets.len(), 1);
        assert_eq!(event.markets[0].outcomes, vec!["A", "B"]);
        assert_eq!(event.tags[0].label.as_deref(), Some("Politics"));
    }

    #[test]
    fn test_search_result_defaults() {
        let result: SearchResult = serde_json::from_str(
            r#"{"tags": [{"id": "1", "label": "Sports", "slug": "sports", "event_count": 3}],
                "pagination": {"hasMore": true, "totalResults": 12}}"#,
        )
        .unwrap();
        assert!(result.events.is_empty());
        assert_eq!(result.tags[0].event_count, Some(3));
        assert!(result.pagination.has_more);
        assert_eq!(result.pagination.total_results, 12);
    }

    #[test]
    fn test_related_tag_ids() {
        let rel: RelatedTag =
            serde_json::from_str(r#"{"id": "5", "tagID": 10, "relatedTagID": 11, "rank": 1}"#)
                .unwrap();
        assert_eq!(rel.tag_id, Some(10));
        assert_eq!(rel.related_tag_id, Some(11));
    }
}
