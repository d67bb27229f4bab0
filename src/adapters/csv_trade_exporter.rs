//! CSV export of the strategy's trade list.

use crate::domain::error::CompareError;
use crate::domain::presentation::direction_label;
use crate::domain::request::DATE_FORMAT;
use crate::domain::series::Trade;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct TradeRecord<'a> {
    entry_date: String,
    exit_date: String,
    entry_price: f64,
    exit_price: f64,
    position: i64,
    direction: &'a str,
    percent_pnl: f64,
    dollar_pnl: f64,
}

pub struct CsvTradeExporter {
    path: PathBuf,
}

impl CsvTradeExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write one row per trade. An empty list still gets a header row.
    pub fn export(&self, trades: &[Trade]) -> Result<(), CompareError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut wtr = csv::Writer::from_path(&self.path).map_err(|e| CompareError::Report {
            reason: format!("cannot create {}: {}", self.path.display(), e),
        })?;

        if trades.is_empty() {
            wtr.write_record([
                "entry_date",
                "exit_date",
                "entry_price",
                "exit_price",
                "position",
                "direction",
                "percent_pnl",
                "dollar_pnl",
            ])
            .map_err(csv_error)?;
        }
        for trade in trades {
            wtr.serialize(TradeRecord {
                entry_date: trade.entry_date.format(DATE_FORMAT).to_string(),
                exit_date: trade.exit_date.format(DATE_FORMAT).to_string(),
                entry_price: trade.entry_price,
                exit_price: trade.exit_price,
                position: trade.position,
                direction: direction_label(trade.direction()),
                percent_pnl: trade.percent_pnl,
                dollar_pnl: trade.dollar_pnl,
            })
            .map_err(csv_error)?;
        }
        wtr.flush()?;
        tracing::info!(path = %self.path.display(), trades = trades.len(), "trades exported");
        Ok(())
    }
}

fn csv_error(e: csv::Error) -> CompareError {
    CompareError::Report {
        reason: format!("CSV write error: {}", e),
    }
}
