//! Inline SVG line chart implementing `ChartPort`.

use askama::Template;

use crate::domain::chart::{ChartData, DatasetStyle};
use crate::domain::error::CompareError;
use crate::domain::presentation::tooltip_label;
use crate::ports::chart_port::ChartPort;

const CHART_WIDTH: f64 = 800.0;
const CHART_HEIGHT: f64 = 360.0;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 40.0;

/// A rendered chart. Dropping it through `destroy` releases its slot.
#[derive(Debug)]
pub struct RenderedChart {
    pub id: u64,
    pub svg: String,
}

#[derive(Debug, Default)]
pub struct SvgChartAdapter {
    next_id: u64,
    live: usize,
}

impl SvgChartAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Charts created and not yet destroyed.
    pub fn live_charts(&self) -> usize {
        self.live
    }
}

impl ChartPort for SvgChartAdapter {
    type Handle = RenderedChart;

    fn create(&mut self, data: &ChartData) -> Result<RenderedChart, CompareError> {
        if data.datasets.iter().flat_map(|d| &d.values).any(|v| !v.is_finite()) {
            return Err(CompareError::Chart {
                reason: "series contains a non-finite value".to_string(),
            });
        }
        let svg = render_svg(data)?;
        self.next_id += 1;
        self.live += 1;
        tracing::debug!(id = self.next_id, datasets = data.datasets.len(), "chart created");
        Ok(RenderedChart {
            id: self.next_id,
            svg,
        })
    }

    fn destroy(&mut self, handle: RenderedChart) {
        self.live = self.live.saturating_sub(1);
        tracing::debug!(id = handle.id, "chart destroyed");
    }
}

fn fmt_axis_value(value: f64) -> String {
    if value >= 0.0 {
        format!("${:.0}", value)
    } else {
        format!("-${:.0}", value.abs())
    }
}

fn coord(value: f64) -> String {
    format!("{value:.1}")
}

struct AxisLine {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

struct Tick {
    x: String,
    y: String,
    text: String,
}

struct PointMark {
    x: String,
    y: String,
    tooltip: String,
}

struct SeriesMarks<'a> {
    label: &'a str,
    style: &'a DatasetStyle,
    line: String,
    /// Closed fill polygon, empty when the dataset is not filled.
    area: String,
    points: Vec<PointMark>,
    legend_x: String,
    legend_text_x: String,
}

#[derive(Template)]
#[template(path = "chart.svg", escape = "html")]
struct ChartTemplate<'a> {
    width: f64,
    height: f64,
    title_x: f64,
    title: &'a str,
    axes: Vec<AxisLine>,
    y_ticks: Vec<Tick>,
    x_ticks: Vec<Tick>,
    series: Vec<SeriesMarks<'a>>,
}

impl<'a> ChartTemplate<'a> {
    fn empty(title: &'a str) -> Self {
        Self {
            width: CHART_WIDTH,
            height: CHART_HEIGHT,
            title_x: CHART_WIDTH / 2.0,
            title,
            axes: Vec::new(),
            y_ticks: Vec::new(),
            x_ticks: Vec::new(),
            series: Vec::new(),
        }
    }
}

/// Every data point carries a hover `<title>`: the point's tooltip title
/// followed by the dataset label and formatted value.
pub fn render_svg(data: &ChartData) -> Result<String, CompareError> {
    let mut chart = ChartTemplate::empty(&data.title);

    let points = data.datasets.iter().map(|d| d.values.len()).max().unwrap_or(0);
    if points > 0 {
        layout(data, points, &mut chart);
    }

    chart.render().map_err(|e| CompareError::Chart {
        reason: format!("template rendering failed: {e}"),
    })
}

fn layout<'a>(data: &'a ChartData, points: usize, chart: &mut ChartTemplate<'a>) {
    let values = data.datasets.iter().flat_map(|d| d.values.iter().copied());
    let min_value = values.clone().fold(f64::INFINITY, f64::min);
    let max_value = values.fold(f64::NEG_INFINITY, f64::max);
    let range = (max_value - min_value).max(1.0);

    let plot_width = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let base_y = CHART_HEIGHT - MARGIN_BOTTOM;
    let x_scale =
        |i: usize| -> f64 { MARGIN_LEFT + (i as f64 / (points - 1).max(1) as f64) * plot_width };
    let y_scale =
        |v: f64| -> f64 { MARGIN_TOP + plot_height - ((v - min_value) / range) * plot_height };

    chart.axes = vec![
        AxisLine {
            x1: MARGIN_LEFT,
            y1: MARGIN_TOP,
            x2: MARGIN_LEFT,
            y2: base_y,
        },
        AxisLine {
            x1: MARGIN_LEFT,
            y1: base_y,
            x2: CHART_WIDTH - MARGIN_RIGHT,
            y2: base_y,
        },
    ];

    chart.y_ticks = [
        (max_value, MARGIN_TOP + 5.0),
        ((max_value + min_value) / 2.0, MARGIN_TOP + plot_height / 2.0),
        (min_value, base_y - 5.0),
    ]
    .into_iter()
    .map(|(value, y)| Tick {
        x: (MARGIN_LEFT - 5.0).to_string(),
        y: coord(y),
        text: fmt_axis_value(value),
    })
    .collect();

    chart.x_ticks = data
        .labels
        .iter()
        .enumerate()
        .filter(|(_, label)| !label.is_empty())
        .map(|(i, label)| Tick {
            x: coord(x_scale(i)),
            y: (base_y + 15.0).to_string(),
            text: label.clone(),
        })
        .collect();

    for (n, dataset) in data.datasets.iter().enumerate() {
        if dataset.values.is_empty() {
            continue;
        }
        let coords: Vec<(f64, f64)> = dataset
            .values
            .iter()
            .enumerate()
            .map(|(i, v)| (x_scale(i), y_scale(*v)))
            .collect();
        let line = coords
            .iter()
            .map(|(x, y)| format!("{x:.1},{y:.1}"))
            .collect::<Vec<_>>()
            .join(" ");
        let area = if dataset.style.fill {
            let last_x = x_scale(dataset.values.len() - 1);
            format!("{MARGIN_LEFT:.1},{base_y:.1} {line} {last_x:.1},{base_y:.1}")
        } else {
            String::new()
        };
        let points = coords
            .iter()
            .zip(&dataset.values)
            .enumerate()
            .map(|(i, ((x, y), value))| {
                let title = data.tooltips.get(i).cloned().unwrap_or_else(|| i.to_string());
                PointMark {
                    x: coord(*x),
                    y: coord(*y),
                    tooltip: format!("{title}\n{}", tooltip_label(&dataset.label, *value)),
                }
            })
            .collect();

        let legend_x = MARGIN_LEFT + n as f64 * 200.0;
        chart.series.push(SeriesMarks {
            label: &dataset.label,
            style: &dataset.style,
            line,
            area,
            points,
            legend_x: coord(legend_x),
            legend_text_x: coord(legend_x + 10.0),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::Dataset;

    fn chart(datasets: Vec<Dataset>, labels: Vec<&str>) -> ChartData {
        ChartData {
            title: "Portfolio Value Over Time".into(),
            tooltips: (0..labels.len()).map(|i| i.to_string()).collect(),
            labels: labels.into_iter().map(String::from).collect(),
            datasets,
        }
    }

    fn strategy(values: Vec<f64>) -> Dataset {
        Dataset {
            label: "Strategy".into(),
            values,
            style: DatasetStyle::strategy(),
        }
    }

    #[test]
    fn empty_chart_has_title_only() {
        let svg = render_svg(&chart(vec![strategy(Vec::new())], Vec::new())).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("Portfolio Value Over Time"));
        assert!(!svg.contains("<polyline"));
    }

    #[test]
    fn one_polyline_per_dataset() {
        let benchmark = Dataset {
            label: "SPY (Buy & Hold)".into(),
            values: vec![100.0, 101.0, 99.0],
            style: DatasetStyle::benchmark(),
        };
        let svg = render_svg(&chart(
            vec![strategy(vec![100.0, 110.0, 120.0]), benchmark],
            vec!["Jan 24", "", "Mar 24"],
        ))
        .unwrap();
        assert_eq!(svg.matches("<polyline").count(), 2);
        assert!(svg.contains("stroke=\"#3498db\""));
        assert!(svg.contains("stroke=\"#e74c3c\""));
        assert!(svg.contains("SPY (Buy &amp; Hold)"));
    }

    #[test]
    fn only_non_empty_labels_render() {
        let svg = render_svg(&chart(
            vec![strategy(vec![1.0, 2.0, 3.0, 4.0])],
            vec!["Jan 24", "", "Mar 24", ""],
        ))
        .unwrap();
        assert!(svg.contains(">Jan 24</text>"));
        assert!(svg.contains(">Mar 24</text>"));
        assert_eq!(svg.matches("font-size=\"10\"").count(), 3 + 2);
    }

    #[test]
    fn single_point_renders() {
        let svg = render_svg(&chart(vec![strategy(vec![10_000.0])], vec!["0"])).unwrap();
        assert!(svg.contains("<polyline"));
        assert!(svg.contains("$10000"));
    }

    #[test]
    fn port_tracks_live_charts() {
        let data = chart(vec![strategy(vec![1.0, 2.0])], vec!["0", "1"]);
        let mut adapter = SvgChartAdapter::new();
        let first = adapter.create(&data).unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(adapter.live_charts(), 1);
        adapter.destroy(first);
        let second = adapter.create(&data).unwrap();
        assert_eq!(second.id, 2);
        assert_eq!(adapter.live_charts(), 1);
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let data = chart(vec![strategy(vec![1.0, f64::NAN])], vec!["0", "1"]);
        let err = SvgChartAdapter::new().create(&data).unwrap_err();
        assert!(matches!(err, CompareError::Chart { .. }));
    }

    #[test]
    fn every_point_has_a_hover_title() {
        let mut data = chart(
            vec![strategy(vec![10_000.0, 10_250.0, 9_900.0])],
            vec!["Jan 24", "", ""],
        );
        data.tooltips = vec!["2024-01-02".into(), "2024-01-03".into(), "2024-01-04".into()];
        let svg = render_svg(&data).unwrap();
        assert_eq!(svg.matches("<title>").count(), 3);
        assert!(svg.contains("<title>2024-01-03\nStrategy: $10250.00</title>"));
    }

    #[test]
    fn missing_tooltip_falls_back_to_index() {
        let mut data = chart(vec![strategy(vec![1.0, 2.0])], vec!["", ""]);
        data.tooltips.clear();
        let svg = render_svg(&data).unwrap();
        assert!(svg.contains("<title>1\nStrategy: $2.00</title>"));
    }

    #[test]
    fn text_content_is_escaped() {
        let mut data = chart(vec![strategy(vec![1.0, 2.0])], vec!["<b>", ""]);
        data.title = "Fish & <Chips>".into();
        let svg = render_svg(&data).unwrap();
        assert!(svg.contains(">Fish &amp; &lt;Chips&gt;</text>"));
        assert!(svg.contains(">&lt;b&gt;</text>"));
        assert!(!svg.contains("<b>"));
    }
}
