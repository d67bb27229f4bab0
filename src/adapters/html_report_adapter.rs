//! HTML report adapter implementing `ReportPort`.
//!
//! Renders one self-contained page through an Askama template: summary
//! table, inline SVG chart and the trade list.

use std::fs;
use std::path::Path;

use askama::Template;

use crate::domain::error::CompareError;
use crate::domain::presentation::{ComparisonView, NO_TRADES_MESSAGE};
use crate::ports::report_port::ReportPort;

const BENCHMARK_FALLBACK_LABEL: &str = "Benchmark";

#[derive(Template)]
#[template(path = "report.html")]
struct ReportTemplate<'a> {
    view: &'a ComparisonView,
    benchmark_label: &'a str,
    benchmark_note: &'a str,
    chart_svg: &'a str,
    no_trades_message: &'a str,
}

impl<'a> ReportTemplate<'a> {
    fn new(view: &'a ComparisonView, chart_svg: &'a str) -> Self {
        Self {
            view,
            benchmark_label: view
                .benchmark_label
                .as_deref()
                .unwrap_or(BENCHMARK_FALLBACK_LABEL),
            benchmark_note: view.benchmark_note.as_deref().unwrap_or(""),
            chart_svg,
            no_trades_message: NO_TRADES_MESSAGE,
        }
    }
}

pub struct HtmlReportAdapter;

impl HtmlReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HtmlReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// The chart markup is inserted as-is; every other string is escaped.
pub fn render_html(view: &ComparisonView, chart_svg: &str) -> Result<String, CompareError> {
    ReportTemplate::new(view, chart_svg)
        .render()
        .map_err(|e| CompareError::Report {
            reason: format!("template rendering failed: {e}"),
        })
}

impl ReportPort for HtmlReportAdapter {
    fn write(
        &self,
        view: &ComparisonView,
        chart_svg: &str,
        output_path: &str,
    ) -> Result<(), CompareError> {
        let html = render_html(view, chart_svg)?;

        let path = Path::new(output_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(CompareError::Io)?;
        }
        fs::write(path, html).map_err(|e| CompareError::Report {
            reason: format!("cannot write {output_path}: {e}"),
        })?;
        tracing::info!(path = output_path, "report written");
        Ok(())
    }
}
