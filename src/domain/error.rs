//! Domain error types.

/// Top-level error type for samcompare.
///
/// The first five variants form the comparison taxonomy. Strategy-side
/// failures abort a cycle; `BenchmarkUnavailable` is absorbed into an absent
/// benchmark by the orchestrator and never aborts anything.
#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    #[error("price data unavailable for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    #[error("backtest failed: {reason}")]
    BacktestFailed { reason: String },

    #[error("malformed payload field `{field}`: {reason}")]
    MalformedPayload { field: String, reason: String },

    #[error("missing field `{field}` in result payload")]
    MissingField { field: String },

    #[error("benchmark {symbol} unavailable after {attempts} attempts: {reason}")]
    BenchmarkUnavailable {
        symbol: String,
        attempts: u32,
        reason: String,
    },

    #[error("request to {endpoint} failed: {reason}")]
    Transport { endpoint: String, reason: String },

    #[error("{endpoint} returned {status}: {message}")]
    Status {
        endpoint: String,
        status: u16,
        message: String,
    },

    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },

    #[error("unknown strategy preset: {key}")]
    UnknownPreset { key: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("chart error: {reason}")]
    Chart { reason: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CompareError {
    pub fn malformed(field: &str, reason: impl Into<String>) -> Self {
        CompareError::MalformedPayload {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn missing(field: &str) -> Self {
        CompareError::MissingField {
            field: field.to_string(),
        }
    }

    /// True for errors raised while talking to the backend, before any
    /// payload was decoded.
    pub fn is_request_failure(&self) -> bool {
        matches!(
            self,
            CompareError::Transport { .. } | CompareError::Status { .. }
        )
    }

    /// Process exit status for this error kind.
    pub fn exit_status(&self) -> u8 {
        match self {
            CompareError::Io(_) | CompareError::Chart { .. } | CompareError::Report { .. } => 1,
            CompareError::ConfigParse { .. }
            | CompareError::ConfigMissing { .. }
            | CompareError::ConfigInvalid { .. } => 2,
            CompareError::InvalidRequest { .. } | CompareError::UnknownPreset { .. } => 3,
            CompareError::DataUnavailable { .. }
            | CompareError::Transport { .. }
            | CompareError::Status { .. } => 4,
            CompareError::BacktestFailed { .. } | CompareError::BenchmarkUnavailable { .. } => 5,
            CompareError::MalformedPayload { .. } | CompareError::MissingField { .. } => 6,
        }
    }
}

impl From<&CompareError> for std::process::ExitCode {
    fn from(err: &CompareError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_message_names_field() {
        let err = CompareError::malformed("equity_curve", "expected value at line 1 column 2");
        assert_eq!(
            err.to_string(),
            "malformed payload field `equity_curve`: expected value at line 1 column 2"
        );
    }

    #[test]
    fn missing_message_names_field() {
        assert_eq!(
            CompareError::missing("sharpe_ratio").to_string(),
            "missing field `sharpe_ratio` in result payload"
        );
    }

    #[test]
    fn benchmark_unavailable_message() {
        let err = CompareError::BenchmarkUnavailable {
            symbol: "SPY".into(),
            attempts: 2,
            reason: "connection refused".into(),
        };
        assert_eq!(
            err.to_string(),
            "benchmark SPY unavailable after 2 attempts: connection refused"
        );
    }

    #[test]
    fn request_failures_are_classified() {
        let transport = CompareError::Transport {
            endpoint: "/api/benchmark/".into(),
            reason: "timeout".into(),
        };
        let status = CompareError::Status {
            endpoint: "/api/benchmark/".into(),
            status: 500,
            message: "boom".into(),
        };
        assert!(transport.is_request_failure());
        assert!(status.is_request_failure());
        assert!(!CompareError::missing("total_return").is_request_failure());
    }

    #[test]
    fn exit_codes_group_by_kind() {
        let config = CompareError::ConfigMissing {
            section: "api".into(),
            key: "base_url".into(),
        };
        assert_eq!(config.exit_status(), 2);
        let data = CompareError::DataUnavailable {
            symbol: "AAPL".into(),
            reason: "no rows".into(),
        };
        assert_eq!(data.exit_status(), 4);
        let bt = CompareError::BacktestFailed {
            reason: "bad window".into(),
        };
        assert_eq!(bt.exit_status(), 5);
        assert_eq!(CompareError::missing("total_return").exit_status(), 6);
    }
}
