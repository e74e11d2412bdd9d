// ============================================================================
// WebSocket types
// Sources:
// - Overview: https://docs.polymarket.com/developers/CLOB/websocket/wss-overview
// - Market Channel: https://docs.polymarket.com/developers/CLOB/websocket/market-channel
// - User Channel: https://docs.polymarket.com/developers/CLOB/websocket/user-channel
// ============================================================================

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::de;
use super::OrderSummary;

// ============================================================================
// Subscription Messages (Outbound)
// ============================================================================

/// Channel type for WebSocket subscription
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChannelType {
    Market,
    User,
}

impl ChannelType {
    /// URL path suffix of the channel
    pub fn path(&self) -> &'static str {
        match self {
            ChannelType::Market => "/ws/market",
            ChannelType::User => "/ws/user",
        }
    }
}

/// Authentication object for the user channel
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WsAuth {
    pub api_key: String,
    pub secret: String,
    pub passphrase: String,
}

impl std::fmt::Debug for WsAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("WsAuth([REDACTED])")
    }
}

/// Initial subscription request
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubscribeRequest {
    /// Authentication (user channel only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<WsAuth>,

    /// Condition IDs (user channel)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markets: Option<Vec<String>>,

    /// Token IDs (market channel)
    #[serde(rename = "assets_ids", skip_serializing_if = "Option::is_none")]
    pub asset_ids: Option<Vec<String>>,

    #[serde(rename = "type")]
    pub channel_type: ChannelType,

    /// Enable feature-flagged messages (best_bid_ask, new_market, market_resolved)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_feature_enabled: Option<bool>,
}

impl SubscribeRequest {
    pub fn market(asset_ids: Vec<String>, enable_features: bool) -> Self {
        Self {
            auth: None,
            markets: None,
            asset_ids: Some(asset_ids),
            channel_type: ChannelType::Market,
            custom_feature_enabled: enable_features.then_some(true),
        }
    }

    pub fn user(auth: WsAuth, markets: Vec<String>) -> Self {
        Self {
            auth: Some(auth),
            markets: Some(markets),
            asset_ids: None,
            channel_type: ChannelType::User,
            custom_feature_enabled: None,
        }
    }
}

/// Subscribe / unsubscribe operation on a live connection
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionOperation {
    Subscribe,
    Unsubscribe,
}

/// Dynamic subscription change (after the initial subscribe)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubscriptionChange {
    #[serde(rename = "assets_ids")]
    pub asset_ids: Vec<String>,

    pub operation: SubscriptionOperation,
}

// ============================================================================
// Inbound Messages
// ============================================================================

/// Inbound WebSocket event, parsed with fallback to Unknown
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum WsEvent {
    /// Market channel event
    Market(MarketMessage),
    /// User channel event
    User(UserMessage),
    /// Unknown or unparseable message, raw JSON preserved
    Unknown(UnknownMessage),
}

/// Unknown message container
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UnknownMessage {
    pub raw: Value,
}

/// Market channel message types
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum MarketMessage {
    Book(BookMessage),
    PriceChange(PriceChangeMessage),
    TickSizeChange(TickSizeChangeMessage),
    LastTradePrice(LastTradePriceMessage),
    /// Feature-flagged
    BestBidAsk(BestBidAskMessage),
    /// Feature-flagged
    NewMarket(NewMarketMessage),
    /// Feature-flagged
    MarketResolved(MarketResolvedMessage),
}

/// Full order book snapshot
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BookMessage {
    pub asset_id: String,
    /// Condition ID
    pub market: String,
    /// Unix milliseconds (string or number on the wire)
    #[serde(default, deserialize_with = "de::string_or_number")]
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default, alias = "buys")]
    pub bids: Vec<OrderSummary>,
    #[serde(default, alias = "sells")]
    pub asks: Vec<OrderSummary>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PriceChangeEntry {
    pub asset_id: String,
    pub price: String,
    #[serde(default)]
    pub size: String,
    pub side: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_bid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_ask: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PriceChangeMessage {
    pub market: String,
    #[serde(default, deserialize_with = "de::string_or_number")]
    pub timestamp: String,
    #[serde(default)]
    pub price_changes: Vec<PriceChangeEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TickSizeChangeMessage {
    pub asset_id: String,
    pub market: String,
    #[serde(default, deserialize_with = "de::string_or_number")]
    pub timestamp: String,
    pub old_tick_size: String,
    pub new_tick_size: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LastTradePriceMessage {
    pub asset_id: String,
    pub market: String,
    #[serde(default, deserialize_with = "de::string_or_number")]
    pub timestamp: String,
    pub price: String,
    #[serde(default)]
    pub size: String,
    pub side: String,
    /// Fee rate in basis points
    #[serde(default, deserialize_with = "de::string_or_number")]
    pub fee_rate_bps: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BestBidAskMessage {
    pub asset_id: String,
    pub market: String,
    #[serde(default, deserialize_with = "de::string_or_number")]
    pub timestamp: String,
    pub best_bid: String,
    pub best_ask: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spread: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Schema not fully documented; all fields kept raw
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewMarketMessage {
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

/// Schema not fully documented; all fields kept raw
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MarketResolvedMessage {
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

/// User channel message types
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum UserMessage {
    Trade(TradeMessage),
    Order(OrderMessage),
}

/// Trade lifecycle event (MATCHED, MINED, CONFIRMED, RETRYING, FAILED)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TradeMessage {
    pub id: String,
    pub asset_id: String,
    pub market: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matchtime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    pub price: String,
    pub side: String,
    pub size: String,
    pub status: String,
    #[serde(default)]
    pub maker_orders: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taker_order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, deserialize_with = "de::string_or_number")]
    pub timestamp: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Order lifecycle event (PLACEMENT, UPDATE, CANCELLATION)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrderMessage {
    pub id: String,
    pub asset_id: String,
    pub market: String,
    #[serde(default)]
    pub original_size: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    pub price: String,
    pub side: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_matched: Option<String>,
    #[serde(default, rename = "type")]
    pub order_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default)]
    pub associate_trades: Vec<String>,
    #[serde(default, deserialize_with = "de::string_or_number")]
    pub timestamp: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ============================================================================
// Parsing
// ============================================================================

impl WsEvent {
    /// Parse one JSON object; never panics, falls back to Unknown
    pub fn parse(json_str: &str) -> Self {
        match serde_json::from_str::<Value>(json_str) {
            Ok(raw) => Self::from_value(raw),
            Err(_) => WsEvent::Unknown(UnknownMessage {
                raw: Value::String(json_str.to_string()),
            }),
        }
    }

    /// Parse one decoded JSON value
    pub fn from_value(raw: Value) -> Self {
        if let Some(event_type) = raw.get("event_type").and_then(|v| v.as_str()) {
            match event_type {
                "book" | "price_change" | "tick_size_change" | "last_trade_price"
                | "best_bid_ask" | "new_market" | "market_resolved" => {
                    if let Ok(msg) = serde_json::from_value::<MarketMessage>(raw.clone()) {
                        return WsEvent::Market(msg);
                    }
                }
                "trade" | "order" => {
                    if let Ok(msg) = serde_json::from_value::<UserMessage>(raw.clone()) {
                        return WsEvent::User(msg);
                    }
                }
                _ => {}
            }
        }

        WsEvent::Unknown(UnknownMessage { raw })
    }

    /// Event type string, if available
    pub fn event_type(&self) -> Option<&str> {
        match self {
            WsEvent::Market(m) => Some(match m {
                MarketMessage::Book(_) => "book",
                MarketMessage::PriceChange(_) => "price_change",
                MarketMessage::TickSizeChange(_) => "tick_size_change",
                MarketMessage::LastTradePrice(_) => "last_trade_price",
                MarketMessage::BestBidAsk(_) => "best_bid_ask",
                MarketMessage::NewMarket(_) => "new_market",
                MarketMessage::MarketResolved(_) => "market_resolved",
            }),
            WsEvent::User(u) => Some(match u {
                UserMessage::Trade(_) => "trade",
                UserMessage::Order(_) => "order",
            }),
            WsEvent::Unknown(u) => u.raw.get("event_type").and_then(|v| v.as_str()),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, WsEvent::Unknown(_))
    }
}

/// A decoded text frame: one event, or an array of events (initial snapshots)
#[derive(Clone, Debug)]
pub enum WsFrame {
    Single(WsEvent),
    Batch(Vec<WsEvent>),
}

impl WsFrame {
    pub fn parse(text: &str) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(Value::Array(items)) => {
                WsFrame::Batch(items.into_iter().map(WsEvent::from_value).collect())
            }
            Ok(raw) => WsFrame::Single(WsEvent::from_value(raw)),
            Err(_) => WsFrame::Single(WsEvent::Unknown(UnknownMessage {
                raw: Value::String(text.to_string()),
            })),
        }
    }

    pub fn into_events(self) -> Vec<WsEvent> {
        match self {
            WsFrame::Single(event) => vec![event],
            WsFrame::Batch(events) => events,
        }
    }
}

// ============================================================================
// Statistics Tracking
// ============================================================================

/// Counters for a WebSocket session
#[derive(Clone, Debug, Default)]
pub struct MessageStats {
    pub total_messages: u64,
    pub parsed_ok: u64,
    pub unknown_type_count: u64,
    pub parse_error_count: u64,
    /// Frames that carried a JSON array of events
    pub snapshot_array_count: u64,
    pub pings_sent: u64,
    pub pongs_received: u64,
    pub type_counts: HashMap<String, u64>,
    pub last_message_type: Option<String>,
}

impl MessageStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, msg: &WsEvent) {
        self.total_messages += 1;

        match msg {
            WsEvent::Unknown(u) if u.raw.is_string() => {
                self.parse_error_count += 1;
            }
            WsEvent::Unknown(_) => {
                self.unknown_type_count += 1;
            }
            _ => {
                self.parsed_ok += 1;
            }
        }

        let event_type = msg.event_type().unwrap_or("_no_type").to_string();
        *self.type_counts.entry(event_type.clone()).or_insert(0) += 1;
        self.last_message_type = Some(event_type);
    }

    pub fn record_frame(&mut self, frame: &WsFrame) {
        match frame {
            WsFrame::Single(event) => self.record(event),
            WsFrame::Batch(events) => {
                self.snapshot_array_count += 1;
                for event in events {
                    self.record(event);
                }
            }
        }
    }
}
