//! Backtest request construction and validation.

use crate::domain::error::CompareError;
use crate::domain::preset::{StrategyParams, StrategyPreset};
use chrono::NaiveDate;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CompareError> {
        if start > end {
            return Err(CompareError::InvalidRequest {
                reason: format!("start date {start} is after end date {end}"),
            });
        }
        Ok(Self { start, end })
    }

    pub fn start_str(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    pub fn end_str(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }
}

pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, CompareError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        CompareError::InvalidRequest {
            reason: format!("{field}: invalid date '{value}' (expected YYYY-MM-DD)"),
        }
    })
}

/// Trim and upper-case a ticker symbol, rejecting empty input.
pub fn normalize_symbol(raw: &str) -> Result<String, CompareError> {
    let symbol = raw.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(CompareError::InvalidRequest {
            reason: "symbol must not be empty".into(),
        });
    }
    Ok(symbol)
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestRequest {
    pub symbol: String,
    pub range: DateRange,
    pub strategy_key: String,
    pub strategy_label: String,
    pub strategy_params: StrategyParams,
}

impl BacktestRequest {
    pub fn new(
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        preset: &StrategyPreset,
    ) -> Result<Self, CompareError> {
        Ok(Self {
            symbol: normalize_symbol(symbol)?,
            range: DateRange::new(start, end)?,
            strategy_key: preset.key.to_string(),
            strategy_label: preset.label.to_string(),
            strategy_params: preset.params.to_wire(),
        })
    }
}
