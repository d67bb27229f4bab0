//! Tracing subscriber setup. Logs go to stderr so report output stays clean.

use crate::domain::config_validation::LogFormat;

pub const LOG_ENV_VAR: &str = "SAMCOMPARE_LOG";

/// Install the global subscriber. `SAMCOMPARE_LOG` overrides `level`.
/// Calling this twice is an error from the second call on.
pub fn init_tracing(level: &str, format: LogFormat) -> Result<(), String> {
    let filter = std::env::var(LOG_ENV_VAR).unwrap_or_else(|_| level.to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(filter)
        .map_err(|err| format!("invalid log filter: {err}"))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    }
    .map_err(|err| format!("failed to install tracing subscriber: {err}"))
}
