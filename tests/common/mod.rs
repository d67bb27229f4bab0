#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Months, NaiveDate};
use samcompare::domain::error::CompareError;
use samcompare::domain::payload::ResultPayload;
use samcompare::domain::preset::find_preset;
use samcompare::domain::request::{BacktestRequest, DateRange};
use samcompare::ports::backtest_port::{BacktestPort, TickerDataSummary};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Scripted backend answer. Errors are rebuilt on each use.
#[derive(Clone, Debug)]
pub enum Reply {
    Ok(ResultPayload),
    Status(u16, String),
    Transport(String),
}

impl Reply {
    fn into_result(self, endpoint: &str) -> Result<ResultPayload, CompareError> {
        match self {
            Reply::Ok(payload) => Ok(payload),
            Reply::Status(status, message) => Err(CompareError::Status {
                endpoint: endpoint.to_string(),
                status,
                message,
            }),
            Reply::Transport(reason) => Err(CompareError::Transport {
                endpoint: endpoint.to_string(),
                reason,
            }),
        }
    }
}

/// Replies are consumed in order; the last one repeats.
struct Script(Mutex<VecDeque<Reply>>);

impl Script {
    fn new(replies: Vec<Reply>) -> Self {
        Self(Mutex::new(replies.into()))
    }

    fn next(&self) -> Reply {
        let mut queue = self.0.lock().unwrap();
        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().cloned().unwrap()
        }
    }
}

pub struct MockBacktestPort {
    ticker_error: Option<String>,
    backtest: Script,
    benchmark: Script,
    indicators: Vec<String>,
    ticker_calls: AtomicUsize,
    backtest_calls: AtomicUsize,
    benchmark_calls: AtomicUsize,
    benchmark_symbols: Mutex<Vec<String>>,
}

impl MockBacktestPort {
    pub fn new() -> Self {
        Self {
            ticker_error: None,
            backtest: Script::new(vec![Reply::Ok(strategy_payload(24))]),
            benchmark: Script::new(vec![Reply::Ok(benchmark_payload(24))]),
            indicators: vec!["SMA".into(), "RSI".into(), "MACD".into(), "BBANDS".into()],
            ticker_calls: AtomicUsize::new(0),
            backtest_calls: AtomicUsize::new(0),
            benchmark_calls: AtomicUsize::new(0),
            benchmark_symbols: Mutex::new(Vec::new()),
        }
    }

    pub fn with_ticker_error(mut self, reason: &str) -> Self {
        self.ticker_error = Some(reason.to_string());
        self
    }

    pub fn with_backtest(mut self, reply: Reply) -> Self {
        self.backtest = Script::new(vec![reply]);
        self
    }

    pub fn with_benchmark_replies(mut self, replies: Vec<Reply>) -> Self {
        self.benchmark = Script::new(replies);
        self
    }

    pub fn ticker_calls(&self) -> usize {
        self.ticker_calls.load(Ordering::SeqCst)
    }

    pub fn backtest_calls(&self) -> usize {
        self.backtest_calls.load(Ordering::SeqCst)
    }

    pub fn benchmark_calls(&self) -> usize {
        self.benchmark_calls.load(Ordering::SeqCst)
    }

    pub fn benchmark_symbols(&self) -> Vec<String> {
        self.benchmark_symbols.lock().unwrap().clone()
    }
}

#[async_trait]
impl BacktestPort for MockBacktestPort {
    async fn fetch_ticker_data(&self, symbol: &str) -> Result<TickerDataSummary, CompareError> {
        self.ticker_calls.fetch_add(1, Ordering::SeqCst);
        match &self.ticker_error {
            Some(reason) => Err(CompareError::Status {
                endpoint: "/api/fetch-data/".into(),
                status: 400,
                message: reason.clone(),
            }),
            None => Ok(TickerDataSummary {
                message: format!("Successfully fetched data for {symbol}"),
                count: 500,
            }),
        }
    }

    async fn run_backtest(&self, _request: &BacktestRequest) -> Result<ResultPayload, CompareError> {
        self.backtest_calls.fetch_add(1, Ordering::SeqCst);
        self.backtest.next().into_result("/api/backtest/")
    }

    async fn run_benchmark(
        &self,
        symbol: &str,
        _range: &DateRange,
    ) -> Result<ResultPayload, CompareError> {
        self.benchmark_calls.fetch_add(1, Ordering::SeqCst);
        self.benchmark_symbols.lock().unwrap().push(symbol.to_string());
        self.benchmark.next().into_result("/api/benchmark/")
    }

    async fn list_indicators(&self) -> Result<Vec<String>, CompareError> {
        Ok(self.indicators.clone())
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn monthly_dates(n: usize) -> Vec<String> {
    let start = date("2023-01-31");
    (0..n)
        .map(|i| {
            start
                .checked_add_months(Months::new(i as u32))
                .unwrap()
                .format("%Y-%m-%d")
                .to_string()
        })
        .collect()
}

pub fn equity_values(n: usize, start: f64, step: f64) -> Vec<f64> {
    (0..n).map(|i| start + step * i as f64).collect()
}

fn payload_from(value: Value) -> ResultPayload {
    serde_json::from_value(value).unwrap()
}

/// String-encoded arrays, as the backtest endpoint returns them.
pub fn strategy_payload(n: usize) -> ResultPayload {
    let trades = json!([
        {
            "entry_date": "2023-02-28",
            "exit_date": "2023-06-30",
            "entry_price": 150.0,
            "exit_price": 162.5,
            "position": 1,
            "percent_pnl": 8.33,
            "dollar_pnl": 125.0
        },
        {
            "entry_date": "2023-08-31",
            "exit_date": "2023-10-31",
            "entry_price": 170.0,
            "exit_price": 161.5,
            "position": -1,
            "percent_pnl": 5.0,
            "dollar_pnl": -42.5
        }
    ]);
    payload_from(json!({
        "total_return": 0.1523,
        "max_drawdown": -0.084,
        "sharpe_ratio": 1.27,
        "equity_curve": serde_json::to_string(&equity_values(n, 10_000.0, 50.0)).unwrap(),
        "trades": trades.to_string(),
        "portfolio_dates": serde_json::to_string(&monthly_dates(n)).unwrap(),
    }))
}

/// Inline arrays and no trades, as the benchmark endpoint returns them.
pub fn benchmark_payload(n: usize) -> ResultPayload {
    payload_from(json!({
        "total_return": 0.0812,
        "max_drawdown": -0.051,
        "sharpe_ratio": 0.94,
        "equity_curve": equity_values(n, 10_000.0, 30.0),
        "portfolio_dates": monthly_dates(n),
    }))
}

pub fn payload_without(field: &str) -> ResultPayload {
    let mut value = serde_json::to_value(strategy_payload(6)).unwrap();
    value.as_object_mut().unwrap().remove(field);
    payload_from(value)
}

pub fn garbage_equity_payload() -> ResultPayload {
    let mut payload = strategy_payload(6);
    payload.equity_curve = Some(json!("[1.0, 2.0,"));
    payload
}

pub fn sample_request() -> BacktestRequest {
    BacktestRequest::new(
        "aapl",
        date("2023-01-01"),
        date("2024-12-31"),
        &find_preset("GOLDEN_CROSS").unwrap(),
    )
    .unwrap()
}
