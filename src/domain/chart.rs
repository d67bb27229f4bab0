//! Chart dataset assembly and the single live chart instance.

use crate::domain::error::CompareError;
use crate::domain::series::ComparisonResult;
use crate::domain::timeline::ChartTimeline;
use crate::ports::chart_port::ChartPort;

pub const CHART_TITLE: &str = "Portfolio Value Over Time";
pub const STRATEGY_DATASET_LABEL: &str = "Strategy";

#[derive(Debug, Clone, PartialEq)]
pub struct DatasetStyle {
    pub border_color: &'static str,
    pub background_color: &'static str,
    pub fill: bool,
    pub tension: f64,
    pub border_width: u32,
}

impl DatasetStyle {
    pub fn strategy() -> Self {
        Self {
            border_color: "#3498db",
            background_color: "rgba(52, 152, 219, 0.1)",
            fill: true,
            tension: 0.4,
            border_width: 2,
        }
    }

    pub fn benchmark() -> Self {
        Self {
            border_color: "#e74c3c",
            background_color: "rgba(231, 76, 60, 0.1)",
            fill: true,
            tension: 0.4,
            border_width: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label: String,
    pub values: Vec<f64>,
    pub style: DatasetStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub title: String,
    pub labels: Vec<String>,
    /// Per-point hover title: the ISO date, or the index when undated.
    pub tooltips: Vec<String>,
    pub datasets: Vec<Dataset>,
}

/// Strategy dataset always; benchmark dataset only when it has points.
pub fn build_chart_data(comparison: &ComparisonResult, timeline: &ChartTimeline) -> ChartData {
    let mut datasets = vec![Dataset {
        label: STRATEGY_DATASET_LABEL.to_string(),
        values: comparison.strategy.equity.values.clone(),
        style: DatasetStyle::strategy(),
    }];

    if let Some(benchmark) = comparison.benchmark.as_ref().filter(|b| !b.equity.is_empty()) {
        datasets.push(Dataset {
            label: benchmark.strategy_label.clone(),
            values: benchmark.equity.values.clone(),
            style: DatasetStyle::benchmark(),
        });
    } else {
        tracing::debug!("no benchmark series to plot");
    }

    let tooltips = (0..timeline.len())
        .map(|i| timeline.tooltip_title(i).unwrap_or_else(|| i.to_string()))
        .collect();

    ChartData {
        title: CHART_TITLE.to_string(),
        labels: timeline.labels.clone(),
        tooltips,
        datasets,
    }
}

/// Owns at most one live chart. A new cycle destroys the old chart before
/// creating its replacement.
pub struct ChartSlot<P: ChartPort> {
    port: P,
    current: Option<P::Handle>,
}

impl<P: ChartPort> ChartSlot<P> {
    pub fn new(port: P) -> Self {
        Self {
            port,
            current: None,
        }
    }

    pub fn replace(&mut self, data: &ChartData) -> Result<&P::Handle, CompareError> {
        if let Some(old) = self.current.take() {
            self.port.destroy(old);
        }
        let handle = self.port.create(data)?;
        Ok(&*self.current.insert(handle))
    }

    pub fn clear(&mut self) {
        if let Some(old) = self.current.take() {
            self.port.destroy(old);
        }
    }

    pub fn current(&self) -> Option<&P::Handle> {
        self.current.as_ref()
    }

    pub fn port(&self) -> &P {
        &self.port
    }
}
