//! Strategy preset catalogue.
//!
//! A preset is a named configuration bundle the caller selects by key. The
//! core never builds free-form parameter sets; it only forwards one of these
//! to the backend.

use crate::domain::error::CompareError;
use serde_json::{Map, Value, json};
use std::fmt;

/// Wire form of strategy parameters: flat `name -> value` pairs.
pub type StrategyParams = Map<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorParams {
    Sma {
        short_window: u32,
        long_window: u32,
    },
    Rsi {
        period: u32,
        overbought: f64,
        oversold: f64,
    },
    Macd {
        fast_period: u32,
        slow_period: u32,
        signal_period: u32,
    },
    Bbands {
        window: u32,
        num_std_dev: f64,
    },
}

impl IndicatorParams {
    /// Indicator name as the backend expects it in the `indicator` field.
    pub fn kind(&self) -> &'static str {
        match self {
            IndicatorParams::Sma { .. } => "SMA",
            IndicatorParams::Rsi { .. } => "RSI",
            IndicatorParams::Macd { .. } => "MACD",
            IndicatorParams::Bbands { .. } => "BBANDS",
        }
    }

    pub fn to_wire(&self) -> StrategyParams {
        let value = match self {
            IndicatorParams::Sma {
                short_window,
                long_window,
            } => json!({
                "indicator": self.kind(),
                "short_window": short_window,
                "long_window": long_window,
            }),
            IndicatorParams::Rsi {
                period,
                overbought,
                oversold,
            } => json!({
                "indicator": self.kind(),
                "rsi_period": period,
                "overbought": overbought,
                "oversold": oversold,
            }),
            IndicatorParams::Macd {
                fast_period,
                slow_period,
                signal_period,
            } => json!({
                "indicator": self.kind(),
                "fast_period": fast_period,
                "slow_period": slow_period,
                "signal_period": signal_period,
            }),
            IndicatorParams::Bbands {
                window,
                num_std_dev,
            } => json!({
                "indicator": self.kind(),
                "window": window,
                "num_std_dev": num_std_dev,
            }),
        };
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}

impl fmt::Display for IndicatorParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorParams::Sma {
                short_window,
                long_window,
            } => write!(f, "SMA({}, {})", short_window, long_window),
            IndicatorParams::Rsi {
                period,
                overbought,
                oversold,
            } => write!(f, "RSI({}, {}/{})", period, overbought, oversold),
            IndicatorParams::Macd {
                fast_period,
                slow_period,
                signal_period,
            } => write!(f, "MACD({}, {}, {})", fast_period, slow_period, signal_period),
            IndicatorParams::Bbands {
                window,
                num_std_dev,
            } => write!(f, "BBANDS({}, {})", window, num_std_dev),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyPreset {
    pub key: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub params: IndicatorParams,
}

pub fn builtin_presets() -> Vec<StrategyPreset> {
    vec![
        StrategyPreset {
            key: "GOLDEN_CROSS",
            label: "Golden Cross (50/200 SMA)",
            description: "A long-term trend following strategy. Buy when the 50-day moving \
                          average crosses above the 200-day moving average, sell when it \
                          crosses below.",
            params: IndicatorParams::Sma {
                short_window: 50,
                long_window: 200,
            },
        },
        StrategyPreset {
            key: "DUAL_MA",
            label: "Dual Moving Average (10/30 SMA)",
            description: "A medium-term trend following strategy. Buy when the 10-day moving \
                          average crosses above the 30-day moving average, sell when it \
                          crosses below.",
            params: IndicatorParams::Sma {
                short_window: 10,
                long_window: 30,
            },
        },
        StrategyPreset {
            key: "RSI_STRATEGY",
            label: "RSI Reversal Strategy",
            description: "A mean-reversion strategy. Buy when RSI drops below 30 (oversold) \
                          and then rises back above it. Sell when RSI rises above 70 \
                          (overbought) and then drops below it.",
            params: IndicatorParams::Rsi {
                period: 14,
                overbought: 70.0,
                oversold: 30.0,
            },
        },
        StrategyPreset {
            key: "MACD_CROSS",
            label: "MACD Signal Line Cross",
            description: "A versatile strategy that works in trending and ranging markets. \
                          Buy when the MACD line crosses above the signal line, sell when it \
                          crosses below.",
            params: IndicatorParams::Macd {
                fast_period: 12,
                slow_period: 26,
                signal_period: 9,
            },
        },
        StrategyPreset {
            key: "BOLLINGER_BOUNCE",
            label: "Bollinger Band Bounce",
            description: "A mean-reversion strategy. Buy when price touches the lower band \
                          and starts to move up. Sell when price touches the upper band and \
                          starts to move down.",
            params: IndicatorParams::Bbands {
                window: 20,
                num_std_dev: 2.0,
            },
        },
    ]
}

/// Look up a preset by key, ignoring case and surrounding whitespace.
pub fn find_preset(key: &str) -> Result<StrategyPreset, CompareError> {
    let wanted = key.trim().to_uppercase();
    builtin_presets()
        .into_iter()
        .find(|p| p.key == wanted)
        .ok_or_else(|| CompareError::UnknownPreset {
            key: key.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_has_five_unique_keys() {
        let presets = builtin_presets();
        assert_eq!(presets.len(), 5);
        let mut keys: Vec<_> = presets.iter().map(|p| p.key).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 5);
    }

    #[test]
    fn find_preset_is_case_insensitive() {
        let preset = find_preset(" golden_cross ").unwrap();
        assert_eq!(preset.key, "GOLDEN_CROSS");
        assert_eq!(preset.label, "Golden Cross (50/200 SMA)");
    }

    #[test]
    fn find_preset_rejects_unknown_key() {
        let err = find_preset("TURTLE").unwrap_err();
        assert!(matches!(err, CompareError::UnknownPreset { ref key } if key == "TURTLE"));
    }

    #[test]
    fn sma_wire_params() {
        let wire = find_preset("DUAL_MA").unwrap().params.to_wire();
        assert_eq!(wire["indicator"], "SMA");
        assert_eq!(wire["short_window"], 10);
        assert_eq!(wire["long_window"], 30);
        assert_eq!(wire.len(), 3);
    }

    #[test]
    fn rsi_wire_params() {
        let wire = find_preset("RSI_STRATEGY").unwrap().params.to_wire();
        assert_eq!(wire["indicator"], "RSI");
        assert_eq!(wire["rsi_period"], 14);
        assert_eq!(wire["overbought"], 70.0);
        assert_eq!(wire["oversold"], 30.0);
    }

    #[test]
    fn macd_and_bbands_wire_params() {
        let macd = find_preset("MACD_CROSS").unwrap().params.to_wire();
        assert_eq!(macd["indicator"], "MACD");
        assert_eq!(macd["fast_period"], 12);
        assert_eq!(macd["slow_period"], 26);
        assert_eq!(macd["signal_period"], 9);

        let bb = find_preset("BOLLINGER_BOUNCE").unwrap().params.to_wire();
        assert_eq!(bb["indicator"], "BBANDS");
        assert_eq!(bb["window"], 20);
        assert_eq!(bb["num_std_dev"], 2.0);
    }

    #[test]
    fn display_is_compact() {
        let macd = IndicatorParams::Macd {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        };
        assert_eq!(macd.to_string(), "MACD(12, 26, 9)");
    }
}
