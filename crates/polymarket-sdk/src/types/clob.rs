// ============================================================================
// CLOB REST types: orders, trades, order books, pricing
// Source: https://docs.polymarket.com/quickstart/reference/endpoints
// ============================================================================

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::de;
use crate::query::{QueryParams, ToQueryParams};

/// Order side
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "BUY",
            OrderSide::Sell => "SELL",
        }
    }
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BUY" => Ok(OrderSide::Buy),
            "SELL" => Ok(OrderSide::Sell),
            other => Err(format!("unknown order side '{}'", other)),
        }
    }
}

/// Time-in-force of a posted order
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    /// Fill-or-kill
    Fok,
    /// Fill-and-kill
    Fak,
    /// Good-til-cancelled
    #[default]
    Gtc,
    /// Good-til-date
    Gtd,
}

/// Lifecycle status of an order
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Live,
    Matched,
    Delayed,
    Unmatched,
    #[serde(other)]
    Other,
}

/// Settlement status of a trade
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeStatus {
    Matched,
    Mined,
    Confirmed,
    Retrying,
    Failed,
    #[serde(other)]
    Other,
}

// ============================================================================
// Orders
// ============================================================================

/// A signed CLOB order as accepted by `POST /order`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub salt: String,
    pub maker: String,
    pub signer: String,
    pub taker: String,
    pub token_id: String,
    pub maker_amount: String,
    pub taker_amount: String,
    pub expiration: String,
    pub nonce: String,
    pub fee_rate_bps: String,
    pub side: OrderSide,
    pub signature_type: u8,
    pub signature: String,
}

/// Order plus posting metadata
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostOrder {
    pub order: Order,
    pub order_type: OrderType,
    /// API key of the order owner
    pub owner: String,
}

/// Result of placing an order
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error_msg: String,
    #[serde(default, rename = "orderID", alias = "orderId")]
    pub order_id: String,
    #[serde(default)]
    pub order_hashes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An order resting on the book
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OpenOrder {
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub market: String,
    #[serde(default)]
    pub asset_id: String,
    #[serde(default)]
    pub original_size: String,
    #[serde(default)]
    pub size_matched: String,
    #[serde(default)]
    pub price: String,
    pub side: OrderSide,
    #[serde(default)]
    pub outcome: String,
    #[serde(default)]
    pub maker_address: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default, deserialize_with = "de::string_or_number")]
    pub expiration: String,
    #[serde(default, rename = "type")]
    pub order_type: String,
    #[serde(default, deserialize_with = "de::string_or_number")]
    pub created_at: String,
    #[serde(default)]
    pub associate_trades: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Filters for `GET /data/orders`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActiveOrderParams {
    pub id: Option<String>,
    pub market: Option<String>,
    pub asset_id: Option<String>,
}

impl ToQueryParams for ActiveOrderParams {
    fn to_query_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.push_opt("id", self.id.as_ref());
        params.push_opt("market", self.market.as_ref());
        params.push_opt("asset_id", self.asset_id.as_ref());
        params
    }
}

#[derive(Clone, Debug, Serialize)]
pub(crate) struct CancelOrderRequest<'a> {
    #[serde(rename = "orderID")]
    pub order_id: &'a str,
}

#[derive(Clone, Debug, Serialize)]
pub(crate) struct CancelOrdersRequest<'a> {
    #[serde(rename = "orderIDs")]
    pub order_ids: &'a [String],
}

/// Body of `DELETE /cancel-market-orders`; empty fields are omitted
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct CancelMarketOrdersRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub(crate) struct OrdersScoringRequest<'a> {
    #[serde(rename = "orderIds")]
    pub order_ids: &'a [String],
}

/// Outcome of a cancel request
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CancelResponse {
    #[serde(default)]
    pub canceled: Vec<String>,
    /// Order id -> reason
    #[serde(default)]
    pub not_canceled: HashMap<String, String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderScoring {
    pub scoring: bool,
}

/// Order id -> scoring flag
pub type OrdersScoring = HashMap<String, bool>;

// ============================================================================
// Trades
// ============================================================================

/// A maker order filled within a trade
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MakerOrder {
    pub order_id: String,
    #[serde(default)]
    pub maker_address: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub matched_amount: String,
    #[serde(default)]
    pub fee_rate_bps: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub asset_id: String,
    #[serde(default)]
    pub outcome: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<OrderSide>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A CLOB trade from `GET /data/trades`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Trade {
    pub id: String,
    #[serde(default)]
    pub taker_order_id: String,
    #[serde(default)]
    pub market: String,
    #[serde(default)]
    pub asset_id: String,
    pub side: OrderSide,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub fee_rate_bps: String,
    #[serde(default)]
    pub price: String,
    pub status: TradeStatus,
    #[serde(default, deserialize_with = "de::string_or_number")]
    pub match_time: String,
    #[serde(default, deserialize_with = "de::string_or_number")]
    pub last_update: String,
    #[serde(default)]
    pub outcome: String,
    #[serde(default)]
    pub maker_address: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub transaction_hash: String,
    #[serde(default)]
    pub bucket_index: i64,
    #[serde(default)]
    pub maker_orders: Vec<MakerOrder>,
    /// TAKER or MAKER
    #[serde(default, rename = "type")]
    pub trade_type: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Filters for `GET /data/trades`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TradeParams {
    pub id: Option<String>,
    pub taker: Option<String>,
    pub maker: Option<String>,
    pub market: Option<String>,
    /// Unix seconds
    pub before: Option<i64>,
    /// Unix seconds
    pub after: Option<i64>,
}

impl ToQueryParams for TradeParams {
    fn to_query_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.push_opt("id", self.id.as_ref());
        params.push_opt("taker", self.taker.as_ref());
        params.push_opt("maker", self.maker.as_ref());
        params.push_opt("market", self.market.as_ref());
        params.push_opt("before", self.before.as_ref());
        params.push_opt("after", self.after.as_ref());
        params
    }
}

// ============================================================================
// Order books and pricing
// ============================================================================

/// Price level (price, size)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderSummary {
    pub price: String,
    pub size: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Order book snapshot from `GET /book`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrderBookSummary {
    #[serde(default)]
    pub market: String,
    #[serde(default)]
    pub asset_id: String,
    #[serde(default, deserialize_with = "de::string_or_number")]
    pub timestamp: String,
    #[serde(default)]
    pub hash: String,
    #[serde(default)]
    pub bids: Vec<OrderSummary>,
    #[serde(default)]
    pub asks: Vec<OrderSummary>,
    #[serde(default, deserialize_with = "de::string_or_number")]
    pub min_order_size: String,
    #[serde(default, deserialize_with = "de::string_or_number")]
    pub tick_size: String,
    #[serde(default)]
    pub neg_risk: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of a batch book / price / spread request
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookParams {
    pub token_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<OrderSide>,
}

impl BookParams {
    pub fn new(token_id: impl Into<String>) -> Self {
        Self { token_id: token_id.into(), side: None }
    }

    pub fn with_side(mut self, side: OrderSide) -> Self {
        self.side = Some(side);
        self
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Price {
    #[serde(deserialize_with = "de::string_or_number")]
    pub price: String,
}

/// Token id -> side -> price
pub type PricesResponse = HashMap<String, HashMap<String, String>>;

/// Token id -> spread
pub type SpreadsResponse = HashMap<String, String>;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Midpoint {
    #[serde(deserialize_with = "de::string_or_number")]
    pub mid: String,
}

/// One `(t, p)` sample of a price series
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PriceHistoryPoint {
    /// Unix seconds
    pub t: i64,
    pub p: f64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PriceHistory {
    #[serde(default)]
    pub history: Vec<PriceHistoryPoint>,
}

/// Query for `GET /prices-history`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PriceHistoryParams {
    /// Token id
    pub market: String,
    pub start_ts: Option<i64>,
    pub end_ts: Option<i64>,
    /// e.g. `1m`, `1h`, `6h`, `1d`, `1w`, `max`
    pub interval: Option<String>,
    /// Resolution in minutes
    pub fidelity: Option<u32>,
}

impl ToQueryParams for PriceHistoryParams {
    fn to_query_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.push("market", &self.market);
        params.push_opt("startTs", self.start_ts.as_ref());
        params.push_opt("endTs", self.end_ts.as_ref());
        params.push_opt("interval", self.interval.as_ref());
        params.push_opt("fidelity", self.fidelity.as_ref());
        params
    }
}
