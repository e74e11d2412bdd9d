//! Order placement, lookup and cancellation (L2)
//!
//! Orders arrive pre-signed; this module only posts them.

use anyhow::Result;
use reqwest::Method;

use super::client::{ClobClient, RequestAuth};
use crate::query::{QueryParams, ToQueryParams};
use crate::types::{
    ActiveOrderParams, CancelMarketOrdersRequest, CancelOrderRequest, CancelOrdersRequest,
    CancelResponse, OpenOrder, OrderResponse, OrderScoring, OrdersScoring, OrdersScoringRequest,
    PostOrder,
};

impl ClobClient {
    /// POST /order
    pub async fn post_order(&self, order: &PostOrder) -> Result<OrderResponse> {
        self.send_json(Method::POST, "/order", Some(order), RequestAuth::L2)
            .await
    }

    /// POST /orders (batch)
    pub async fn post_orders(&self, orders: &[PostOrder]) -> Result<Vec<OrderResponse>> {
        self.send_json(Method::POST, "/orders", Some(orders), RequestAuth::L2)
            .await
    }

    /// GET /data/order/{id}
    pub async fn get_order(&self, order_id: &str) -> Result<OpenOrder> {
        self.get(&format!("/data/order/{}", order_id), &QueryParams::new(), RequestAuth::L2)
            .await
    }

    /// GET /data/orders
    pub async fn get_active_orders(&self, params: &ActiveOrderParams) -> Result<Vec<OpenOrder>> {
        self.get("/data/orders", &params.to_query_params(), RequestAuth::L2)
            .await
    }

    /// DELETE /order
    pub async fn cancel_order(&self, order_id: &str) -> Result<CancelResponse> {
        let body = CancelOrderRequest { order_id };
        self.send_json(Method::DELETE, "/order", Some(&body), RequestAuth::L2)
            .await
    }

    /// DELETE /orders
    pub async fn cancel_orders(&self, order_ids: &[String]) -> Result<CancelResponse> {
        let body = CancelOrdersRequest { order_ids };
        self.send_json(Method::DELETE, "/orders", Some(&body), RequestAuth::L2)
            .await
    }

    /// DELETE /cancel-all
    pub async fn cancel_all(&self) -> Result<CancelResponse> {
        self.send_json::<(), _>(Method::DELETE, "/cancel-all", None, RequestAuth::L2)
            .await
    }

    /// DELETE /cancel-market-orders
    pub async fn cancel_market_orders(
        &self,
        request: &CancelMarketOrdersRequest,
    ) -> Result<CancelResponse> {
        self.send_json(Method::DELETE, "/cancel-market-orders", Some(request), RequestAuth::L2)
            .await
    }

    /// GET /order-scoring?order_id=...
    pub async fn is_order_scoring(&self, order_id: &str) -> Result<OrderScoring> {
        let mut query = QueryParams::new();
        query.push("order_id", order_id);
        self.get("/order-scoring", &query, RequestAuth::L2).await
    }

    /// POST /orders-scoring
    pub async fn are_orders_scoring(&self, order_ids: &[String]) -> Result<OrdersScoring> {
        let body = OrdersScoringRequest { order_ids };
        self.send_json(Method::POST, "/orders-scoring", Some(&body), RequestAuth::L2)
            .await
    }
}
