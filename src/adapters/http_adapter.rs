//! HTTP backend adapter implementing `BacktestPort`.

use crate::domain::error::CompareError;
use crate::domain::payload::ResultPayload;
use crate::domain::request::{BacktestRequest, DateRange};
use crate::ports::backtest_port::{BacktestPort, TickerDataSummary};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;

pub const FETCH_DATA_PATH: &str = "/api/fetch-data/";
pub const BACKTEST_PATH: &str = "/api/backtest/";
pub const BENCHMARK_PATH: &str = "/api/benchmark/";
pub const INDICATORS_PATH: &str = "/api/indicators/";

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Deserialize)]
struct IndicatorList {
    #[serde(default)]
    indicators: Vec<String>,
}

pub struct HttpBacktestAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBacktestAdapter {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CompareError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CompareError::Transport {
                endpoint: base_url.to_string(),
                reason: format!("cannot build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, CompareError> {
        tracing::debug!(endpoint = path, "POST");
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| transport(path, e))?;
        decode(path, response).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, CompareError> {
        tracing::debug!(endpoint = path, "GET");
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| transport(path, e))?;
        decode(path, response).await
    }
}

fn transport(endpoint: &str, err: reqwest::Error) -> CompareError {
    CompareError::Transport {
        endpoint: endpoint.to_string(),
        reason: err.to_string(),
    }
}

/// Prefer the backend's `{error}` message; fall back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .unwrap_or_else(|| body.trim().to_string())
}

async fn decode<T: DeserializeOwned>(
    endpoint: &str,
    response: reqwest::Response,
) -> Result<T, CompareError> {
    let status = response.status();
    let body = response.text().await.map_err(|e| transport(endpoint, e))?;

    if !status.is_success() {
        let message = error_message(&body);
        tracing::warn!(endpoint, status = status.as_u16(), %message, "backend error");
        return Err(CompareError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&body).map_err(|e| CompareError::malformed("body", e.to_string()))
}

/// Strategy params flattened alongside the ticker and date range.
pub fn backtest_body(request: &BacktestRequest) -> Value {
    let mut body = request.strategy_params.clone();
    body.insert("symbol".into(), json!(request.symbol));
    body.insert("start_date".into(), json!(request.range.start_str()));
    body.insert("end_date".into(), json!(request.range.end_str()));
    Value::Object(body)
}

#[async_trait]
impl BacktestPort for HttpBacktestAdapter {
    async fn fetch_ticker_data(&self, symbol: &str) -> Result<TickerDataSummary, CompareError> {
        self.post(FETCH_DATA_PATH, &json!({ "symbol": symbol })).await
    }

    async fn run_backtest(&self, request: &BacktestRequest) -> Result<ResultPayload, CompareError> {
        self.post(BACKTEST_PATH, &backtest_body(request)).await
    }

    async fn run_benchmark(
        &self,
        symbol: &str,
        range: &DateRange,
    ) -> Result<ResultPayload, CompareError> {
        let body = json!({
            "symbol": symbol,
            "start_date": range.start_str(),
            "end_date": range.end_str(),
        });
        self.post(BENCHMARK_PATH, &body).await
    }

    async fn list_indicators(&self) -> Result<Vec<String>, CompareError> {
        let list: IndicatorList = self.get(INDICATORS_PATH).await?;
        Ok(list.indicators)
    }
}
