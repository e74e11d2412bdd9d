//! WebSocket session against a local tungstenite server

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use polymarket_sdk::types::{BookMessage, PriceChangeMessage, UnknownMessage};
use polymarket_sdk::{AuthManager, WsClient, WsEventHandler};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::Message;

#[derive(Default)]
struct Recorder {
    books: Vec<String>,
    price_changes: usize,
    unknown: usize,
}

impl WsEventHandler for Recorder {
    fn on_book(&mut self, msg: &BookMessage) {
        self.books.push(msg.asset_id.clone());
    }

    fn on_price_change(&mut self, _msg: &PriceChangeMessage) {
        self.price_changes += 1;
    }

    fn on_unknown(&mut self, _msg: &UnknownMessage) {
        self.unknown += 1;
    }
}

/// Serve one connection: capture the subscribe message, replay `frames`, close
async fn serve_once(frames: Vec<String>) -> (String, oneshot::Receiver<Value>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();

        if let Some(Ok(Message::Text(text))) = ws.next().await {
            let _ = tx.send(serde_json::from_str::<Value>(&text).unwrap());
        }

        for frame in frames {
            ws.send(Message::Text(frame.into())).await.unwrap();
        }
        ws.close(None).await.ok();
    });

    (format!("ws://{}", addr), rx)
}

#[tokio::test]
async fn test_market_session_parses_frames() {
    let snapshot = json!([
        {
            "event_type": "book", "asset_id": "111", "market": "0xcond",
            "timestamp": "1", "bids": [], "asks": []
        },
        {
            "event_type": "book", "asset_id": "222", "market": "0xcond",
            "timestamp": 2, "buys": [{"price": "0.5", "size": "10"}], "sells": []
        }
    ]);
    let price_change = json!({
        "event_type": "price_change",
        "market": "0xcond",
        "timestamp": "3",
        "price_changes": [{"asset_id": "111", "price": "0.51", "size": "5", "side": "BUY"}]
    });
    let frames = vec![
        snapshot.to_string(),
        "PONG".to_string(),
        price_change.to_string(),
        json!({"event_type": "brand_new_thing"}).to_string(),
        "not json".to_string(),
    ];

    let (url, subscribe_rx) = serve_once(frames).await;
    let client = WsClient::with_base_url(&url, Arc::new(AuthManager::default()))
        .with_ping_interval(Duration::from_secs(60));

    let mut connection = client
        .connect_market(vec!["111".to_string(), "222".to_string()])
        .await
        .unwrap();

    let mut recorder = Recorder::default();
    let stats = tokio::time::timeout(Duration::from_secs(10), connection.run(&mut recorder))
        .await
        .unwrap()
        .unwrap();

    let subscribe = subscribe_rx.await.unwrap();
    assert_eq!(subscribe["type"], "market");
    assert_eq!(subscribe["assets_ids"], json!(["111", "222"]));
    assert!(subscribe.get("auth").is_none());

    assert_eq!(recorder.books, vec!["111", "222"]);
    assert_eq!(recorder.price_changes, 1);
    assert_eq!(recorder.unknown, 2);

    assert_eq!(stats.total_messages, 5);
    assert_eq!(stats.parsed_ok, 3);
    assert_eq!(stats.unknown_type_count, 1);
    assert_eq!(stats.parse_error_count, 1);
    assert_eq!(stats.snapshot_array_count, 1);
    assert_eq!(stats.pongs_received, 1);
    assert_eq!(stats.type_counts.get("book"), Some(&2));
}

#[tokio::test]
async fn test_user_session_sends_credentials() {
    let (url, subscribe_rx) = serve_once(Vec::new()).await;

    let auth = Arc::new(AuthManager::default());
    auth.setup_l2_auth("ws-key", "ws-secret", "ws-pass").unwrap();
    let client = WsClient::with_base_url(&url, auth);

    let mut connection = client.connect_user(vec!["0xcond".to_string()]).await.unwrap();
    let mut recorder = Recorder::default();
    let stats = tokio::time::timeout(Duration::from_secs(10), connection.run(&mut recorder))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stats.total_messages, 0);

    let subscribe = subscribe_rx.await.unwrap();
    assert_eq!(subscribe["type"], "user");
    assert_eq!(subscribe["markets"], json!(["0xcond"]));
    assert_eq!(subscribe["auth"]["apiKey"], "ws-key");
    assert_eq!(subscribe["auth"]["passphrase"], "ws-pass");
}

#[tokio::test]
async fn test_limit_applies_within_batched_frame() {
    let snapshot = json!([
        {"event_type": "book", "asset_id": "111", "market": "0xcond", "bids": [], "asks": []},
        {"event_type": "book", "asset_id": "222", "market": "0xcond", "bids": [], "asks": []}
    ]);
    let (url, _subscribe_rx) = serve_once(vec![snapshot.to_string()]).await;
    let client = WsClient::with_base_url(&url, Arc::new(AuthManager::default()))
        .with_ping_interval(Duration::from_secs(60));

    let mut connection = client.connect_market(vec!["111".to_string()]).await.unwrap();
    let mut recorder = Recorder::default();
    let shutdown = Arc::new(AtomicBool::new(false));
    tokio::time::timeout(
        Duration::from_secs(10),
        connection.run_until(&mut recorder, 1, shutdown),
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(recorder.books, vec!["111"]);
}
