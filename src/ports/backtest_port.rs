//! Backend access port.

use crate::domain::error::CompareError;
use crate::domain::payload::ResultPayload;
use crate::domain::request::{BacktestRequest, DateRange};
use async_trait::async_trait;
use serde::Deserialize;

/// Acknowledgement from the price-data priming call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TickerDataSummary {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub count: u64,
}

#[async_trait]
pub trait BacktestPort: Send + Sync {
    async fn fetch_ticker_data(&self, symbol: &str) -> Result<TickerDataSummary, CompareError>;

    async fn run_backtest(&self, request: &BacktestRequest) -> Result<ResultPayload, CompareError>;

    /// Buy-and-hold result for `symbol` over `range`.
    async fn run_benchmark(
        &self,
        symbol: &str,
        range: &DateRange,
    ) -> Result<ResultPayload, CompareError>;

    async fn list_indicators(&self) -> Result<Vec<String>, CompareError>;
}
