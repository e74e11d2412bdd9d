//! Gamma client against a wiremock server

use polymarket_sdk::gamma::{MarketFilters, RelatedTagFilters, SearchFilters};
use polymarket_sdk::GammaClient;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_get_markets_repeats_list_keys() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/markets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "1",
                "question": "Will it rain?",
                "conditionId": "0xcond",
                "clobTokenIds": "[\"111\", \"222\"]",
                "outcomes": "[\"Yes\", \"No\"]",
                "outcomePrices": "[\"0.55\", \"0.45\"]",
                "active": true,
                "closed": false,
                "liquidityNum": "1500.25"
            }
        ])))
        .mount(&server)
        .await;

    let client = GammaClient::with_base_url(&server.uri()).unwrap();
    let filters = MarketFilters {
        id: vec![1, 2],
        ..MarketFilters::new().with_limit(10).with_closed(false)
    };
    let markets = client.get_markets(&filters).await.unwrap();

    assert_eq!(markets.len(), 1);
    assert_eq!(markets[0].clob_token_ids, vec!["111", "222"]);
    assert_eq!(markets[0].token_for_outcome("Yes"), Some("111"));
    assert_eq!(markets[0].liquidity_num, Some(1500.25));

    let requests = server.received_requests().await.unwrap();
    let pairs: Vec<(String, String)> = requests[0]
        .url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    let ids: Vec<&str> = pairs.iter().filter(|(k, _)| k == "id").map(|(_, v)| v.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
    assert!(pairs.contains(&("limit".to_string(), "10".to_string())));
    assert!(pairs.contains(&("closed".to_string(), "false".to_string())));
}

#[tokio::test]
async fn test_lookup_not_found_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/markets/slug/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/events/99"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = GammaClient::with_base_url(&server.uri()).unwrap();
    assert!(client.get_market_by_slug("missing", None).await.unwrap().is_none());
    assert!(client.get_event_by_id(99, None, None).await.unwrap().is_none());
}

#[tokio::test]
async fn test_market_by_slug_accepts_array_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/markets/slug/btc-up"))
        .and(query_param("include_tag", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 7, "slug": "btc-up", "tags": [{"id": "3", "label": "Crypto", "slug": "crypto"}]}
        ])))
        .mount(&server)
        .await;

    let client = GammaClient::with_base_url(&server.uri()).unwrap();
    let market = client.get_market_by_slug("btc-up", Some(true)).await.unwrap().unwrap();
    assert_eq!(market.id, "7");
    assert_eq!(market.tags[0].slug.as_deref(), Some("crypto"));
}

#[tokio::test]
async fn test_server_error_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = GammaClient::with_base_url(&server.uri()).unwrap();
    let err = client.get_active_events(10, 0).await.unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("500"));
    assert!(message.contains("boom"));
}

#[tokio::test]
async fn test_related_tags_and_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tags/slug/politics/related-tags/tags"))
        .and(query_param("status", "active"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "10", "label": "Elections", "slug": "elections"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/public-search"))
        .and(query_param("q", "bitcoin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "events": [{"id": "5", "title": "Bitcoin above 100k?"}],
            "pagination": {"hasMore": false, "totalResults": 1}
        })))
        .mount(&server)
        .await;

    let client = GammaClient::with_base_url(&server.uri()).unwrap();

    let filters = RelatedTagFilters { status: Some("active".to_string()), ..Default::default() };
    let tags = client.get_related_tag_objects_by_slug("politics", &filters).await.unwrap();
    assert_eq!(tags[0].label.as_deref(), Some("Elections"));

    let result = client.search(&SearchFilters::new("bitcoin")).await.unwrap();
    assert_eq!(result.events[0].title.as_deref(), Some("Bitcoin above 100k?"));
    assert_eq!(result.pagination.total_results, 1);

    assert!(client.search(&SearchFilters::new("  ")).await.is_err());
}
