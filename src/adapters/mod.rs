//! Concrete adapter implementations for ports.

pub mod csv_trade_exporter;
pub mod file_config_adapter;
pub mod html_report_adapter;
pub mod http_adapter;
pub mod svg_chart_adapter;
