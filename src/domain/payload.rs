//! Result payload decoding.
//!
//! The backend returns summary metrics as numbers and the array fields
//! (`equity_curve`, `trades`, `portfolio_dates`) as JSON text embedded in a
//! string. Some deployments inline the arrays instead; both shapes decode to
//! the same typed result. Decoding is isolated here so nothing downstream
//! ever sees raw JSON.

use crate::domain::error::CompareError;
use crate::domain::request::{DATE_FORMAT, DateRange};
use crate::domain::series::{BacktestResult, EquitySeries, Trade};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const FIELD_TOTAL_RETURN: &str = "total_return";
pub const FIELD_MAX_DRAWDOWN: &str = "max_drawdown";
pub const FIELD_SHARPE_RATIO: &str = "sharpe_ratio";
pub const FIELD_EQUITY_CURVE: &str = "equity_curve";
pub const FIELD_TRADES: &str = "trades";
pub const FIELD_PORTFOLIO_DATES: &str = "portfolio_dates";

/// Raw result payload as returned by the backtest and benchmark endpoints.
/// Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultPayload {
    #[serde(default)]
    pub total_return: Option<f64>,
    #[serde(default)]
    pub max_drawdown: Option<f64>,
    #[serde(default)]
    pub sharpe_ratio: Option<f64>,
    #[serde(default)]
    pub equity_curve: Option<Value>,
    #[serde(default)]
    pub trades: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio_dates: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct WireTrade {
    entry_date: String,
    exit_date: String,
    entry_price: f64,
    exit_price: f64,
    position: i64,
    percent_pnl: f64,
    dollar_pnl: f64,
}

/// Decoded payload, before request-time metadata is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPayload {
    pub total_return: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    pub equity: EquitySeries,
    pub trades: Vec<Trade>,
}

impl ParsedPayload {
    pub fn into_result(self, key: &str, label: &str, range: DateRange) -> BacktestResult {
        BacktestResult {
            total_return: self.total_return,
            max_drawdown: self.max_drawdown,
            sharpe_ratio: self.sharpe_ratio,
            equity: self.equity,
            trades: self.trades,
            strategy_key: key.to_string(),
            strategy_label: label.to_string(),
            period_start: range.start,
            period_end: range.end,
        }
    }
}

fn require(field: &str, value: Option<f64>) -> Result<f64, CompareError> {
    value.ok_or_else(|| CompareError::missing(field))
}

/// Decode an array field that is either JSON text or an inline JSON array.
fn decode_array<T: DeserializeOwned>(field: &str, raw: &Value) -> Result<Vec<T>, CompareError> {
    match raw {
        Value::String(text) => {
            serde_json::from_str(text).map_err(|e| CompareError::malformed(field, e.to_string()))
        }
        Value::Array(_) => serde_json::from_value(raw.clone())
            .map_err(|e| CompareError::malformed(field, e.to_string())),
        other => Err(CompareError::malformed(
            field,
            format!("expected encoded array, found {}", json_kind(other)),
        )),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Parse `YYYY-MM-DD`, also accepting a timestamp whose first ten characters
/// are the date.
pub fn parse_wire_date(field: &str, raw: &str) -> Result<NaiveDate, CompareError> {
    let raw = raw.trim();
    let head = match raw.get(..10) {
        Some(head) if raw.len() == 10 || matches!(raw.as_bytes()[10], b'T' | b' ') => head,
        _ => raw,
    };
    NaiveDate::parse_from_str(head, DATE_FORMAT)
        .map_err(|e| CompareError::malformed(field, format!("invalid date '{raw}': {e}")))
}

fn decode_trade(raw: WireTrade) -> Result<Trade, CompareError> {
    let entry_date = parse_wire_date(FIELD_TRADES, &raw.entry_date)?;
    let exit_date = parse_wire_date(FIELD_TRADES, &raw.exit_date)?;
    if exit_date < entry_date {
        return Err(CompareError::malformed(
            FIELD_TRADES,
            format!("trade exits on {exit_date} before entry on {entry_date}"),
        ));
    }
    Ok(Trade {
        entry_date,
        exit_date,
        entry_price: raw.entry_price,
        exit_price: raw.exit_price,
        position: raw.position,
        percent_pnl: raw.percent_pnl,
        dollar_pnl: raw.dollar_pnl,
    })
}

pub fn parse_payload(payload: &ResultPayload) -> Result<ParsedPayload, CompareError> {
    let total_return = require(FIELD_TOTAL_RETURN, payload.total_return)?;
    let max_drawdown = require(FIELD_MAX_DRAWDOWN, payload.max_drawdown)?;
    let sharpe_ratio = require(FIELD_SHARPE_RATIO, payload.sharpe_ratio)?;

    let equity_raw = payload
        .equity_curve
        .as_ref()
        .ok_or_else(|| CompareError::missing(FIELD_EQUITY_CURVE))?;
    let values: Vec<f64> = decode_array(FIELD_EQUITY_CURVE, equity_raw)?;

    let dates = match &payload.portfolio_dates {
        None | Some(Value::Null) => None,
        Some(raw) => {
            let strings: Vec<String> = decode_array(FIELD_PORTFOLIO_DATES, raw)?;
            let parsed = strings
                .iter()
                .map(|s| parse_wire_date(FIELD_PORTFOLIO_DATES, s))
                .collect::<Result<Vec<_>, _>>()?;
            Some(parsed)
        }
    };

    let trades = match &payload.trades {
        None | Some(Value::Null) => Vec::new(),
        Some(raw) => decode_array::<WireTrade>(FIELD_TRADES, raw)?
            .into_iter()
            .map(decode_trade)
            .collect::<Result<Vec<_>, _>>()?,
    };

    Ok(ParsedPayload {
        total_return,
        max_drawdown,
        sharpe_ratio,
        equity: EquitySeries::new(values, dates),
        trades,
    })
}

fn encode_array<T: Serialize>(field: &str, value: &T) -> Result<Value, CompareError> {
    serde_json::to_string(value)
        .map(Value::String)
        .map_err(|e| CompareError::malformed(field, e.to_string()))
}

/// Encode a result back into the backend's string-encoded payload shape.
pub fn encode_payload(result: &BacktestResult) -> Result<ResultPayload, CompareError> {
    let wire_trades: Vec<WireTrade> = result
        .trades
        .iter()
        .map(|t| WireTrade {
            entry_date: t.entry_date.format(DATE_FORMAT).to_string(),
            exit_date: t.exit_date.format(DATE_FORMAT).to_string(),
            entry_price: t.entry_price,
            exit_price: t.exit_price,
            position: t.position,
            percent_pnl: t.percent_pnl,
            dollar_pnl: t.dollar_pnl,
        })
        .collect();

    let portfolio_dates = match &result.equity.dates {
        Some(dates) => {
            let strings: Vec<String> = dates
                .iter()
                .map(|d| d.format(DATE_FORMAT).to_string())
                .collect();
            Some(encode_array(FIELD_PORTFOLIO_DATES, &strings)?)
        }
        None => None,
    };

    Ok(ResultPayload {
        total_return: Some(result.total_return),
        max_drawdown: Some(result.max_drawdown),
        sharpe_ratio: Some(result.sharpe_ratio),
        equity_curve: Some(encode_array(FIELD_EQUITY_CURVE, &result.equity.values)?),
        trades: Some(encode_array(FIELD_TRADES, &wire_trades)?),
        portfolio_dates,
    })
}
