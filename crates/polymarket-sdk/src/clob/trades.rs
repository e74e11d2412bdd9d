//! Trade history (L2)

use anyhow::Result;

use super::client::{ClobClient, RequestAuth};
use crate::query::ToQueryParams;
use crate::types::{Trade, TradeParams};

impl ClobClient {
    /// GET /data/trades
    pub async fn get_trades(&self, params: &TradeParams) -> Result<Vec<Trade>> {
        self.get("/data/trades", &params.to_query_params(), RequestAuth::L2)
            .await
    }
}
