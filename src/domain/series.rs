//! Result types shared by the comparison pipeline.

use chrono::NaiveDate;

/// Portfolio value per period, optionally date-stamped.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EquitySeries {
    pub values: Vec<f64>,
    pub dates: Option<Vec<NaiveDate>>,
}

impl EquitySeries {
    /// When `dates` is present it has exactly one entry per value. An empty
    /// date list means undated. Lists of different lengths are cut to their
    /// common prefix.
    pub fn new(mut values: Vec<f64>, dates: Option<Vec<NaiveDate>>) -> Self {
        let dates = match dates {
            Some(d) if d.is_empty() => None,
            Some(mut d) => {
                if d.len() != values.len() {
                    let common = d.len().min(values.len());
                    tracing::warn!(
                        dates = d.len(),
                        values = values.len(),
                        kept = common,
                        "equity dates and values differ in length, truncating"
                    );
                    d.truncate(common);
                    values.truncate(common);
                }
                Some(d)
            }
            None => None,
        };
        Self { values, dates }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Dates, if present and non-empty.
    pub fn dated(&self) -> Option<&[NaiveDate]> {
        self.dates.as_deref().filter(|d| !d.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Long,
    Short,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub entry_price: f64,
    pub exit_price: f64,
    pub position: i64,
    pub percent_pnl: f64,
    pub dollar_pnl: f64,
}

impl Trade {
    /// Zero is grouped with short.
    pub fn direction(&self) -> Direction {
        if self.position > 0 {
            Direction::Long
        } else {
            Direction::Short
        }
    }

    pub fn is_profit(&self) -> bool {
        self.dollar_pnl >= 0.0
    }

}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub total_return: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    pub equity: EquitySeries,
    pub trades: Vec<Trade>,
    pub strategy_key: String,
    pub strategy_label: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonResult {
    pub strategy: BacktestResult,
    pub benchmark: Option<BacktestResult>,
    /// Why the benchmark is absent, when it is.
    pub benchmark_failure: Option<String>,
}

impl ComparisonResult {
    pub fn has_benchmark(&self) -> bool {
        self.benchmark.is_some()
    }
}
