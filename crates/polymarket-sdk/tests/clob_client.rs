//! CLOB client against a wiremock server

use std::sync::Arc;

use polymarket_sdk::crypto::{recover_address_hex, sign_request, ClobAuth};
use polymarket_sdk::{
    ActiveOrderParams, AuthError, AuthManager, ClobClient, ClobError, ErrorCode, Order, OrderSide,
    OrderType, PostOrder, SignatureType,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const TEST_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
const SECRET: &str = "c2VjcmV0LWJ5dGVz";
const TOKEN_ID: &str =
    "71321045679252212594626385532706912750332728571942532289631379312455583992563";

fn l2_client(server: &MockServer) -> ClobClient {
    let auth = Arc::new(AuthManager::default());
    auth.setup_l2_auth("test-key", SECRET, "test-pass").unwrap();
    ClobClient::with_base_url(&server.uri(), auth).unwrap()
}

fn public_client(server: &MockServer) -> ClobClient {
    ClobClient::with_base_url(&server.uri(), Arc::new(AuthManager::default())).unwrap()
}

fn sample_order() -> PostOrder {
    PostOrder {
        order: Order {
            salt: "12345".to_string(),
            maker: TEST_ADDRESS.to_string(),
            signer: TEST_ADDRESS.to_string(),
            taker: "0x0000000000000000000000000000000000000000".to_string(),
            token_id: TOKEN_ID.to_string(),
            maker_amount: "5000000".to_string(),
            taker_amount: "10000000".to_string(),
            expiration: "0".to_string(),
            nonce: "0".to_string(),
            fee_rate_bps: "0".to_string(),
            side: OrderSide::Buy,
            signature_type: 0,
            signature: "0xsig".to_string(),
        },
        order_type: OrderType::Gtc,
        owner: "test-key".to_string(),
    }
}

#[tokio::test]
async fn test_server_time() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/time"))
        .respond_with(ResponseTemplate::new(200).set_body_string("1700000000"))
        .mount(&server)
        .await;

    let client = public_client(&server);
    assert_eq!(client.get_server_time().await.unwrap(), 1_700_000_000);
}

#[tokio::test]
async fn test_public_order_book() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/book"))
        .and(query_param("token_id", "123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "market": "0xcond",
            "asset_id": "123",
            "timestamp": "1700000000000",
            "hash": "0xhash",
            "bids": [{"price": "0.48", "size": "100"}],
            "asks": [{"price": "0.52", "size": "50"}],
            "min_order_size": "5",
            "tick_size": "0.01",
            "neg_risk": false
        })))
        .mount(&server)
        .await;

    let client = public_client(&server);
    let book = client.get_order_book("123").await.unwrap();
    assert_eq!(book.asset_id, "123");
    assert_eq!(book.bids[0].price, "0.48");
    assert_eq!(book.tick_size, "0.01");

    // Public calls carry no auth headers
    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("poly_signature").is_none());
}

#[tokio::test]
async fn test_post_order_signs_exact_body() {
    let server = MockServer::start().await;
    let order = sample_order();

    Mock::given(method("POST"))
        .and(path("/order"))
        .and(header("poly_api_key", "test-key"))
        .and(header("poly_passphrase", "test-pass"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::to_value(&order).unwrap()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "errorMsg": "",
            "orderID": "0xorder",
            "orderHashes": [],
            "status": "live"
        })))
        .mount(&server)
        .await;

    let client = l2_client(&server);
    let response = client.post_order(&order).await.unwrap();
    assert!(response.success);
    assert_eq!(response.order_id, "0xorder");

    let requests = server.received_requests().await.unwrap();
    let request = &requests[0];
    let header_str = |name: &str| request.headers.get(name).unwrap().to_str().unwrap().to_string();

    // Without L1 the address header is present but empty
    assert_eq!(header_str("poly_address"), "");

    let timestamp: i64 = header_str("poly_timestamp").parse().unwrap();
    let body = String::from_utf8(request.body.clone()).unwrap();
    let expected = sign_request(SECRET, "POST", "/order", &body, timestamp).unwrap();
    assert_eq!(header_str("poly_signature"), expected);
}

#[tokio::test]
async fn test_l2_signature_excludes_query_string() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/orders"))
        .and(query_param("market", "0xcond"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = l2_client(&server);
    let params = ActiveOrderParams { market: Some("0xcond".to_string()), ..Default::default() };
    let orders = client.get_active_orders(&params).await.unwrap();
    assert!(orders.is_empty());

    let requests = server.received_requests().await.unwrap();
    let request = &requests[0];
    let timestamp: i64 = request.headers["poly_timestamp"].to_str().unwrap().parse().unwrap();
    let expected = sign_request(SECRET, "GET", "/data/orders", "", timestamp).unwrap();
    assert_eq!(request.headers.get("poly_signature").unwrap().to_str().unwrap(), expected);
}

#[tokio::test]
async fn test_cancel_order_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/order"))
        .and(body_json(json!({"orderID": "0xabc"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "canceled": ["0xabc"],
            "not_canceled": {}
        })))
        .mount(&server)
        .await;

    let client = l2_client(&server);
    let response = client.cancel_order("0xabc").await.unwrap();
    assert_eq!(response.canceled, vec!["0xabc"]);
    assert!(response.not_canceled.is_empty());
}

#[tokio::test]
async fn test_l2_endpoint_without_credentials_makes_no_request() {
    let server = MockServer::start().await;
    let client = public_client(&server);

    let err = client.cancel_all().await.unwrap_err();
    let auth_err = err.downcast_ref::<AuthError>().unwrap();
    assert!(matches!(auth_err, AuthError::AuthRequired { .. }));

    let err = client.derive_api_key(0).await.unwrap_err();
    assert!(err.downcast_ref::<AuthError>().unwrap().is_auth_required());

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_error_response_maps_to_clob_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/order"))
        .respond_with(
            ResponseTemplate::new(400).set_body_string(
                r#"{"error":"INVALID_ORDER_MIN_TICK_SIZE: order breaks minimum tick size rules"}"#,
            ),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/midpoint"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let client = l2_client(&server);

    let err = client.post_order(&sample_order()).await.unwrap_err();
    let clob_err = err.downcast_ref::<ClobError>().unwrap();
    assert_eq!(clob_err.code, ErrorCode::InvalidOrderMinTickSize);
    assert_eq!(clob_err.status, 400);
    assert!(clob_err.is_order_validation_error());

    let err = client.get_midpoint("123").await.unwrap_err();
    let clob_err = err.downcast_ref::<ClobError>().unwrap();
    assert_eq!(clob_err.code, ErrorCode::InternalError);
    assert!(clob_err.is_retryable());
}

#[tokio::test]
async fn test_derive_api_key_with_l1_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/time"))
        .respond_with(ResponseTemplate::new(200).set_body_string("1700000000"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/derive-api-key"))
        .and(header("poly_address", TEST_ADDRESS))
        .and(header("poly_timestamp", "1700000000"))
        .and(header("poly_nonce", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "apiKey": "derived-key",
            "secret": "derived-secret",
            "passphrase": "derived-pass"
        })))
        .mount(&server)
        .await;

    let auth = Arc::new(AuthManager::default());
    auth.setup_l1_auth(TEST_KEY, SignatureType::Eoa, None).unwrap();
    let client = ClobClient::with_base_url(&server.uri(), auth.clone()).unwrap();

    let credentials = client.derive_api_key(42).await.unwrap();
    assert_eq!(credentials.api_key, "derived-key");
    assert_eq!(credentials.passphrase, "derived-pass");

    // The signature recovers to the configured wallet
    let requests = server.received_requests().await.unwrap();
    let derive = requests
        .iter()
        .find(|r| r.url.path() == "/auth/derive-api-key")
        .unwrap();
    let signature = derive.headers.get("poly_signature").unwrap().to_str().unwrap();
    let digest = ClobAuth::new(TEST_ADDRESS.parse().unwrap(), "1700000000", 42).signing_hash(137);
    let recovered = recover_address_hex(&digest, signature).unwrap();
    assert_eq!(recovered.to_checksum(None), TEST_ADDRESS);

    // Credentials from the exchange enable L2
    auth.set_api_credentials(credentials).unwrap();
    assert!(auth.has_l2_auth());
}

#[tokio::test]
async fn test_l1_with_local_clock() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/api-key"))
        .and(header("poly_nonce", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "apiKey": "k", "secret": "s", "passphrase": "p"
        })))
        .mount(&server)
        .await;

    let auth = Arc::new(AuthManager::default());
    auth.setup_l1_auth(TEST_KEY, SignatureType::Eoa, None).unwrap();
    let client = ClobClient::with_base_url(&server.uri(), auth)
        .unwrap()
        .with_server_time(false);

    let credentials = client.create_api_key(0).await.unwrap();
    assert_eq!(credentials.api_key, "k");

    // No /time round trip
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

fn l1_client(server: &MockServer) -> ClobClient {
    let auth = Arc::new(AuthManager::default());
    auth.setup_l1_auth(TEST_KEY, SignatureType::Eoa, None).unwrap();
    ClobClient::with_base_url(&server.uri(), auth)
        .unwrap()
        .with_server_time(false)
}

fn derived_credentials() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "apiKey": "derived-key",
        "secret": "derived-secret",
        "passphrase": "derived-pass"
    }))
}

#[tokio::test]
async fn test_create_or_derive_falls_back_on_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/api-key"))
        .respond_with(ResponseTemplate::new(400).set_body_string(r#"{"error":"key exists"}"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/derive-api-key"))
        .respond_with(derived_credentials())
        .expect(1)
        .mount(&server)
        .await;

    let credentials = l1_client(&server).create_or_derive_api_key(0).await.unwrap();
    assert_eq!(credentials.api_key, "derived-key");
}

#[tokio::test]
async fn test_create_or_derive_keeps_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/api-key"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/derive-api-key"))
        .respond_with(derived_credentials())
        .expect(0)
        .mount(&server)
        .await;

    let err = l1_client(&server).create_or_derive_api_key(0).await.unwrap_err();
    let clob_err = err.downcast_ref::<ClobError>().unwrap();
    assert_eq!(clob_err.status, 500);

    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.url.path() != "/auth/derive-api-key"));
}
