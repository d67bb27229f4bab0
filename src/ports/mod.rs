//! Port traits the domain drives.

pub mod backtest_port;
pub mod chart_port;
pub mod config_port;
pub mod report_port;
