//! Benchmark acquisition with a one-retry policy.

use crate::domain::error::CompareError;
use crate::domain::payload::parse_payload;
use crate::domain::request::{DateRange, normalize_symbol};
use crate::domain::retry::{AttemptBudget, retry_with_budget};
use crate::domain::series::BacktestResult;
use crate::ports::backtest_port::BacktestPort;

pub const DEFAULT_BENCHMARK_SYMBOL: &str = "SPY";

/// First attempt plus one retry.
pub const BENCHMARK_ATTEMPTS: u32 = 2;

pub fn benchmark_label(symbol: &str) -> String {
    format!("{symbol} (Buy & Hold)")
}

pub struct BenchmarkFetcher<'a> {
    port: &'a dyn BacktestPort,
    symbol: String,
}

impl<'a> BenchmarkFetcher<'a> {
    pub fn new(port: &'a dyn BacktestPort, symbol: &str) -> Result<Self, CompareError> {
        Ok(Self {
            port,
            symbol: normalize_symbol(symbol)?,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Fetch and parse the buy-and-hold result. Transport, status and
    /// payload failures all consume an attempt; once the budget is spent the
    /// last failure is reported as `BenchmarkUnavailable`.
    pub async fn fetch(&self, range: &DateRange) -> Result<BacktestResult, CompareError> {
        let label = benchmark_label(&self.symbol);
        let outcome = retry_with_budget(AttemptBudget::new(BENCHMARK_ATTEMPTS), |attempt| {
            let symbol = self.symbol.as_str();
            async move {
                tracing::debug!(symbol, attempt, "requesting benchmark");
                let payload = self.port.run_benchmark(symbol, range).await?;
                parse_payload(&payload)
            }
        })
        .await;

        match outcome {
            Ok(parsed) => {
                tracing::info!(symbol = %self.symbol, points = parsed.equity.len(), "benchmark loaded");
                Ok(parsed.into_result(&self.symbol, &label, *range))
            }
            Err(exhausted) => {
                tracing::warn!(
                    symbol = %self.symbol,
                    attempts = exhausted.attempts,
                    error = %exhausted.last,
                    "benchmark unavailable"
                );
                Err(CompareError::BenchmarkUnavailable {
                    symbol: self.symbol.clone(),
                    attempts: exhausted.attempts,
                    reason: exhausted.last.to_string(),
                })
            }
        }
    }
}
