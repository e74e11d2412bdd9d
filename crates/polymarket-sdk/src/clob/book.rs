//! Public order book and pricing endpoints
//!
//! # Endpoints
//! - GET /book, POST /books
//! - GET /price, GET /prices, POST /prices
//! - GET /midpoint, GET /prices-history
//! - POST /spreads, GET /tick-size

use anyhow::Result;
use reqwest::Method;
use serde_json::Value;

use super::client::{ClobClient, RequestAuth};
use crate::query::{QueryParams, ToQueryParams};
use crate::types::{
    BookParams, Midpoint, OrderBookSummary, OrderSide, Price, PriceHistory, PriceHistoryParams,
    PricesResponse, SpreadsResponse,
};

fn token_query(token_id: &str) -> QueryParams {
    let mut query = QueryParams::new();
    query.push("token_id", token_id);
    query
}

impl ClobClient {
    /// GET /book?token_id=...
    pub async fn get_order_book(&self, token_id: &str) -> Result<OrderBookSummary> {
        self.get("/book", &token_query(token_id), RequestAuth::None)
            .await
    }

    /// POST /books
    pub async fn get_order_books(&self, params: &[BookParams]) -> Result<Vec<OrderBookSummary>> {
        self.send_json(Method::POST, "/books", Some(params), RequestAuth::None)
            .await
    }

    /// GET /price?token_id=...&side=...
    pub async fn get_price(&self, token_id: &str, side: OrderSide) -> Result<Price> {
        let mut query = token_query(token_id);
        query.push("side", side);
        self.get("/price", &query, RequestAuth::None).await
    }

    /// GET /prices - every token
    pub async fn get_prices(&self) -> Result<PricesResponse> {
        self.get("/prices", &QueryParams::new(), RequestAuth::None)
            .await
    }

    /// POST /prices
    pub async fn get_prices_by_request(&self, params: &[BookParams]) -> Result<PricesResponse> {
        self.send_json(Method::POST, "/prices", Some(params), RequestAuth::None)
            .await
    }

    /// GET /midpoint?token_id=...
    pub async fn get_midpoint(&self, token_id: &str) -> Result<Midpoint> {
        self.get("/midpoint", &token_query(token_id), RequestAuth::None)
            .await
    }

    /// GET /prices-history
    pub async fn get_price_history(&self, params: &PriceHistoryParams) -> Result<PriceHistory> {
        self.get("/prices-history", &params.to_query_params(), RequestAuth::None)
            .await
    }

    /// POST /spreads
    pub async fn get_spreads(&self, params: &[BookParams]) -> Result<SpreadsResponse> {
        self.send_json(Method::POST, "/spreads", Some(params), RequestAuth::None)
            .await
    }

    /// GET /tick-size?token_id=...
    pub async fn get_tick_size(&self, token_id: &str) -> Result<Value> {
        self.get("/tick-size", &token_query(token_id), RequestAuth::None)
            .await
    }
}
