//! One comparison cycle: strategy backtest alongside the benchmark.

use crate::domain::benchmark::BenchmarkFetcher;
use crate::domain::error::CompareError;
use crate::domain::payload::parse_payload;
use crate::domain::request::BacktestRequest;
use crate::domain::series::{BacktestResult, ComparisonResult};
use crate::ports::backtest_port::BacktestPort;

/// Prime price data, run the strategy and attach request metadata.
async fn run_strategy(
    port: &dyn BacktestPort,
    request: &BacktestRequest,
) -> Result<BacktestResult, CompareError> {
    let summary = port
        .fetch_ticker_data(&request.symbol)
        .await
        .map_err(|e| CompareError::DataUnavailable {
            symbol: request.symbol.clone(),
            reason: e.to_string(),
        })?;
    tracing::info!(symbol = %request.symbol, rows = summary.count, "ticker data ready");

    let payload = port.run_backtest(request).await.map_err(|e| {
        if e.is_request_failure() {
            CompareError::BacktestFailed {
                reason: e.to_string(),
            }
        } else {
            e
        }
    })?;
    let parsed = parse_payload(&payload)?;
    Ok(parsed.into_result(&request.strategy_key, &request.strategy_label, request.range))
}

/// Run the strategy pipeline and the benchmark fetch together.
///
/// Strategy failures abort the cycle whatever happened to the benchmark. A
/// benchmark failure only downgrades the result to strategy-only.
pub async fn run_comparison(
    port: &dyn BacktestPort,
    benchmark_symbol: &str,
    request: &BacktestRequest,
) -> Result<ComparisonResult, CompareError> {
    let fetcher = BenchmarkFetcher::new(port, benchmark_symbol)?;
    tracing::info!(
        symbol = %request.symbol,
        strategy = %request.strategy_key,
        benchmark = fetcher.symbol(),
        start = %request.range.start,
        end = %request.range.end,
        "starting comparison"
    );

    let (strategy, benchmark) = tokio::join!(
        run_strategy(port, request),
        fetcher.fetch(&request.range)
    );

    let strategy = strategy.inspect_err(|e| {
        tracing::error!(symbol = %request.symbol, error = %e, "strategy backtest failed");
    })?;

    let (benchmark, benchmark_failure) = match benchmark {
        Ok(result) => (Some(result), None),
        Err(e) => (None, Some(e.to_string())),
    };

    Ok(ComparisonResult {
        strategy,
        benchmark,
        benchmark_failure,
    })
}
