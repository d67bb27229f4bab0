//! Client configuration and its validation.
//!
//! Every key is optional; defaults apply when absent. A key that is present
//! but unusable is an error rather than a silent fallback.

use crate::domain::benchmark::DEFAULT_BENCHMARK_SYMBOL;
use crate::domain::error::CompareError;
use crate::domain::preset::find_preset;
use crate::domain::request::{DATE_FORMAT, normalize_symbol};
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_STRATEGY: &str = "GOLDEN_CROSS";
pub const DEFAULT_REPORT_OUTPUT: &str = "comparison.html";
pub const DEFAULT_LOG_LEVEL: &str = "info";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "pretty" => Some(LogFormat::Text),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub benchmark_symbol: String,
    pub symbol: Option<String>,
    pub strategy: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub report_output: String,
    pub trades_csv: Option<String>,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            benchmark_symbol: DEFAULT_BENCHMARK_SYMBOL.to_string(),
            symbol: None,
            strategy: DEFAULT_STRATEGY.to_string(),
            start_date: None,
            end_date: None,
            report_output: DEFAULT_REPORT_OUTPUT.to_string(),
            trades_csv: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_format: LogFormat::Text,
        }
    }
}

impl ClientConfig {
    pub fn from_port(config: &dyn ConfigPort) -> Result<Self, CompareError> {
        let defaults = Self::default();

        let base_url = match present(config, "api", "base_url")? {
            Some(url) => validate_base_url(&url)?,
            None => defaults.base_url,
        };
        let timeout_secs = validate_timeout(config)?;

        let benchmark_symbol = match present(config, "benchmark", "symbol")? {
            Some(s) => normalize_symbol(&s).map_err(|e| invalid("benchmark", "symbol", e))?,
            None => defaults.benchmark_symbol,
        };
        let symbol = present(config, "backtest", "symbol")?
            .map(|s| normalize_symbol(&s).map_err(|e| invalid("backtest", "symbol", e)))
            .transpose()?;
        let strategy = match present(config, "backtest", "strategy")? {
            Some(key) => find_preset(&key)
                .map(|p| p.key.to_string())
                .map_err(|e| invalid("backtest", "strategy", e))?,
            None => defaults.strategy,
        };

        let start_date = parse_config_date(config, "start_date")?;
        let end_date = parse_config_date(config, "end_date")?;
        if let (Some(start), Some(end)) = (start_date, end_date) {
            if start > end {
                return Err(CompareError::ConfigInvalid {
                    section: "backtest".to_string(),
                    key: "start_date".to_string(),
                    reason: "start_date must not be after end_date".to_string(),
                });
            }
        }

        let report_output =
            present(config, "report", "output")?.unwrap_or(defaults.report_output);
        let trades_csv = present(config, "report", "trades_csv")?;

        let log_level = match present(config, "logging", "level")? {
            Some(level) => validate_log_level(&level)?,
            None => defaults.log_level,
        };
        let log_format = match present(config, "logging", "format")? {
            Some(raw) => LogFormat::parse(&raw).ok_or_else(|| CompareError::ConfigInvalid {
                section: "logging".to_string(),
                key: "format".to_string(),
                reason: format!("expected text or json, got '{raw}'"),
            })?,
            None => defaults.log_format,
        };

        Ok(Self {
            base_url,
            timeout_secs,
            benchmark_symbol,
            symbol,
            strategy,
            start_date,
            end_date,
            report_output,
            trades_csv,
            log_level,
            log_format,
        })
    }

    /// The ticker to backtest; a comparison cannot run without one.
    pub fn require_symbol(&self) -> Result<&str, CompareError> {
        self.symbol
            .as_deref()
            .ok_or_else(|| CompareError::ConfigMissing {
                section: "backtest".to_string(),
                key: "symbol".to_string(),
            })
    }
}

/// Check every key and return the resolved settings.
pub fn validate_client_config(config: &dyn ConfigPort) -> Result<ClientConfig, CompareError> {
    let resolved = ClientConfig::from_port(config)?;
    tracing::debug!(
        base_url = %resolved.base_url,
        benchmark = %resolved.benchmark_symbol,
        "client config valid"
    );
    Ok(resolved)
}

fn invalid(section: &str, key: &str, err: CompareError) -> CompareError {
    CompareError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: err.to_string(),
    }
}

/// A key written with an empty value counts as missing.
fn present(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<String>, CompareError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(v) if v.trim().is_empty() => Err(CompareError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }),
        Some(v) => Ok(Some(v.trim().to_string())),
    }
}

pub fn validate_base_url(url: &str) -> Result<String, CompareError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(url.trim_end_matches('/').to_string())
    } else {
        Err(CompareError::ConfigInvalid {
            section: "api".to_string(),
            key: "base_url".to_string(),
            reason: format!("'{url}' must start with http:// or https://"),
        })
    }
}

fn validate_timeout(config: &dyn ConfigPort) -> Result<u64, CompareError> {
    if present(config, "api", "timeout_secs")?.is_none() {
        return Ok(DEFAULT_TIMEOUT_SECS);
    }
    let value = config.get_int("api", "timeout_secs", 0);
    if value <= 0 {
        return Err(CompareError::ConfigInvalid {
            section: "api".to_string(),
            key: "timeout_secs".to_string(),
            reason: "timeout_secs must be a positive integer".to_string(),
        });
    }
    Ok(value as u64)
}

fn validate_log_level(level: &str) -> Result<String, CompareError> {
    let lower = level.to_lowercase();
    if LOG_LEVELS.contains(&lower.as_str()) {
        Ok(lower)
    } else {
        Err(CompareError::ConfigInvalid {
            section: "logging".to_string(),
            key: "level".to_string(),
            reason: format!("expected one of {}, got '{level}'", LOG_LEVELS.join(", ")),
        })
    }
}

fn parse_config_date(config: &dyn ConfigPort, key: &str) -> Result<Option<NaiveDate>, CompareError> {
    present(config, "backtest", key)?
        .map(|s| {
            NaiveDate::parse_from_str(&s, DATE_FORMAT).map_err(|_| CompareError::ConfigInvalid {
                section: "backtest".to_string(),
                key: key.to_string(),
                reason: format!("invalid {key} format, expected YYYY-MM-DD"),
            })
        })
        .transpose()
}
