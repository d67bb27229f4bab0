//! Display strings for a comparison result.

use crate::domain::series::{BacktestResult, ComparisonResult, Direction, Trade};
use chrono::NaiveDate;

/// Shown in place of each benchmark metric when the benchmark is absent.
pub const PLACEHOLDER: &str = "-";

pub const NO_TRADES_MESSAGE: &str = "No trades were made during this period.";

const PERIOD_DATE_FORMAT: &str = "%B %-d, %Y";
const TRADE_DATE_FORMAT: &str = "%-m/%-d/%Y";

/// Round to 2 decimals and drop the sign of a zero result.
fn round2(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// `0.1523` -> `"15.23%"`.
pub fn format_percent(fraction: f64) -> String {
    format!("{:.2}%", round2(fraction * 100.0))
}

pub fn format_ratio(value: f64) -> String {
    format!("{:.2}", round2(value))
}

/// `-42.5` -> `"-$42.50"`.
pub fn format_currency(value: f64) -> String {
    let rounded = round2(value);
    if rounded < 0.0 {
        format!("-${:.2}", rounded.abs())
    } else {
        format!("${:.2}", rounded)
    }
}

/// Percent value already scaled to 100, with `+` when positive.
pub fn format_signed_percent(percent: f64) -> String {
    let rounded = round2(percent);
    if rounded > 0.0 {
        format!("+{:.2}%", rounded)
    } else {
        format!("{:.2}%", rounded)
    }
}

pub fn format_signed_currency(value: f64) -> String {
    let rounded = round2(value);
    if rounded > 0.0 {
        format!("+{}", format_currency(rounded))
    } else {
        format_currency(rounded)
    }
}

pub fn direction_label(direction: Direction) -> &'static str {
    match direction {
        Direction::Long => "Long",
        Direction::Short => "Short",
    }
}

/// `"January 1, 2024 to March 31, 2024"`.
pub fn format_period(start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "{} to {}",
        start.format(PERIOD_DATE_FORMAT),
        end.format(PERIOD_DATE_FORMAT)
    )
}

pub fn format_trade_date(date: NaiveDate) -> String {
    date.format(TRADE_DATE_FORMAT).to_string()
}

/// Tooltip body for a chart point: `"Strategy: $10250.00"`.
pub fn tooltip_label(dataset: &str, value: f64) -> String {
    format!("{dataset}: {}", format_currency(value))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryDisplay {
    pub total_return: String,
    pub max_drawdown: String,
    pub sharpe_ratio: String,
}

impl SummaryDisplay {
    pub fn from_result(result: &BacktestResult) -> Self {
        Self {
            total_return: format_percent(result.total_return),
            max_drawdown: format_percent(result.max_drawdown),
            sharpe_ratio: format_ratio(result.sharpe_ratio),
        }
    }

    pub fn placeholder() -> Self {
        Self {
            total_return: PLACEHOLDER.to_string(),
            max_drawdown: PLACEHOLDER.to_string(),
            sharpe_ratio: PLACEHOLDER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Profit,
    Loss,
}

impl Tone {
    pub fn css_class(&self) -> &'static str {
        match self {
            Tone::Profit => "profit",
            Tone::Loss => "loss",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeRow {
    pub entry_date: String,
    pub exit_date: String,
    pub entry_price: String,
    pub exit_price: String,
    pub direction: &'static str,
    pub pnl: String,
    pub tone: Tone,
}

impl TradeRow {
    pub fn from_trade(trade: &Trade) -> Self {
        Self {
            entry_date: format_trade_date(trade.entry_date),
            exit_date: format_trade_date(trade.exit_date),
            entry_price: format_currency(trade.entry_price),
            exit_price: format_currency(trade.exit_price),
            direction: direction_label(trade.direction()),
            pnl: pnl_cell(trade),
            tone: if trade.is_profit() {
                Tone::Profit
            } else {
                Tone::Loss
            },
        }
    }
}

/// `"+1.23% (+$45.60)"`.
pub fn pnl_cell(trade: &Trade) -> String {
    format!(
        "{} ({})",
        format_signed_percent(trade.percent_pnl),
        format_signed_currency(trade.dollar_pnl)
    )
}

/// Everything the report and console need, already formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonView {
    pub symbol: String,
    pub period: String,
    pub strategy_label: String,
    pub strategy: SummaryDisplay,
    pub benchmark_label: Option<String>,
    pub benchmark: SummaryDisplay,
    pub benchmark_note: Option<String>,
    pub trades: Vec<TradeRow>,
}

impl ComparisonView {
    pub fn new(symbol: &str, comparison: &ComparisonResult) -> Self {
        let strategy = &comparison.strategy;
        let (benchmark_label, benchmark) = match &comparison.benchmark {
            Some(b) => (
                Some(b.strategy_label.clone()),
                SummaryDisplay::from_result(b),
            ),
            None => (None, SummaryDisplay::placeholder()),
        };
        Self {
            symbol: symbol.to_string(),
            period: format_period(strategy.period_start, strategy.period_end),
            strategy_label: strategy.strategy_label.clone(),
            strategy: SummaryDisplay::from_result(strategy),
            benchmark_label,
            benchmark,
            benchmark_note: comparison
                .benchmark_failure
                .as_ref()
                .map(|reason| format!("Benchmark unavailable: {reason}")),
            trades: strategy.trades.iter().map(TradeRow::from_trade).collect(),
        }
    }

    pub fn has_trades(&self) -> bool {
        !self.trades.is_empty()
    }
}
