//! Chart timeline construction and label decimation.

use crate::domain::request::DATE_FORMAT;
use crate::domain::series::EquitySeries;
use chrono::NaiveDate;

/// Upper bound on non-empty axis labels.
pub const MAX_LABELS: usize = 12;

const LABEL_FORMAT: &str = "%b %y";

#[derive(Debug, Clone, PartialEq)]
pub struct ChartTimeline {
    pub labels: Vec<String>,
    pub step_size: usize,
    /// Dates backing each slot, empty when the series are undated.
    pub reference_dates: Vec<NaiveDate>,
}

impl ChartTimeline {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of labels that will actually render.
    pub fn visible_labels(&self) -> usize {
        self.labels.iter().filter(|l| !l.is_empty()).count()
    }

    /// Full ISO date for a point, when the timeline is dated.
    pub fn tooltip_title(&self, index: usize) -> Option<String> {
        self.reference_dates
            .get(index)
            .map(|d| d.format(DATE_FORMAT).to_string())
    }
}

/// `max(1, ceil(m / 12))`.
pub fn step_size(m: usize) -> usize {
    m.div_ceil(MAX_LABELS).max(1)
}

/// Build one label set for the strategy series and an optional benchmark.
///
/// Strategy dates win. Benchmark dates are used only when the strategy has
/// none and they cover every strategy point, cut to the strategy length.
/// The benchmark is always plotted by position; no calendar reconciliation
/// happens here.
pub fn build_timeline(strategy: &EquitySeries, benchmark: Option<&EquitySeries>) -> ChartTimeline {
    let reference = match strategy.dated() {
        Some(dates) => Some(dates.to_vec()),
        None => benchmark
            .and_then(|b| b.dated())
            .filter(|dates| dates.len() >= strategy.len())
            .map(|dates| dates[..strategy.len()].to_vec()),
    };

    match reference {
        Some(dates) if !dates.is_empty() => {
            let step = step_size(dates.len());
            let labels = dates
                .iter()
                .enumerate()
                .map(|(i, d)| {
                    if i % step == 0 {
                        d.format(LABEL_FORMAT).to_string()
                    } else {
                        String::new()
                    }
                })
                .collect();
            ChartTimeline {
                labels,
                step_size: step,
                reference_dates: dates,
            }
        }
        _ => ChartTimeline {
            labels: (0..strategy.len()).map(|i| i.to_string()).collect(),
            step_size: 1,
            reference_dates: Vec::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Months;

    fn monthly(n: usize) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2023, 1, 15).unwrap();
        (0..n)
            .map(|i| start.checked_add_months(Months::new(i as u32)).unwrap())
            .collect()
    }

    fn dated(n: usize) -> EquitySeries {
        EquitySeries::new(vec![100.0; n], Some(monthly(n)))
    }

    #[test]
    fn step_size_policy() {
        assert_eq!(step_size(0), 1);
        assert_eq!(step_size(1), 1);
        assert_eq!(step_size(12), 1);
        assert_eq!(step_size(13), 2);
        assert_eq!(step_size(24), 2);
        assert_eq!(step_size(25), 3);
        assert_eq!(step_size(250), 21);
    }

    #[test]
    fn twenty_four_points_label_even_positions() {
        let t = build_timeline(&dated(24), None);
        assert_eq!(t.step_size, 2);
        assert_eq!(t.len(), 24);
        assert_eq!(t.visible_labels(), 12);
        for (i, label) in t.labels.iter().enumerate() {
            assert_eq!(label.is_empty(), i % 2 == 1, "slot {i}");
        }
        assert_eq!(t.labels[0], "Jan 23");
        assert_eq!(t.labels[2], "Mar 23");
    }

    #[test]
    fn undated_series_uses_indices() {
        let s = EquitySeries::new(vec![1.0, 2.0, 3.0], None);
        let t = build_timeline(&s, None);
        assert_eq!(t.labels, vec!["0", "1", "2"]);
        assert_eq!(t.step_size, 1);
        assert!(t.tooltip_title(0).is_none());
    }

    #[test]
    fn undated_series_is_never_decimated() {
        let s = EquitySeries::new(vec![1.0; 40], None);
        let t = build_timeline(&s, None);
        assert_eq!(t.visible_labels(), 40);
        assert_eq!(t.step_size, 1);
    }

    #[test]
    fn strategy_dates_take_precedence() {
        let strategy = dated(6);
        let benchmark = EquitySeries::new(vec![1.0; 30], Some(monthly(30)));
        let t = build_timeline(&strategy, Some(&benchmark));
        assert_eq!(t.len(), 6);
        assert_eq!(t.reference_dates, monthly(6));
    }

    #[test]
    fn benchmark_dates_fill_in_when_strategy_is_undated() {
        let strategy = EquitySeries::new(vec![1.0; 4], None);
        let benchmark = EquitySeries::new(vec![1.0; 10], Some(monthly(10)));
        let t = build_timeline(&strategy, Some(&benchmark));
        assert_eq!(t.len(), 4);
        assert_eq!(t.labels[3], "Apr 23");
    }

    #[test]
    fn short_benchmark_dates_are_ignored() {
        let strategy = EquitySeries::new(vec![1.0; 8], None);
        let benchmark = EquitySeries::new(vec![1.0; 5], Some(monthly(5)));
        let t = build_timeline(&strategy, Some(&benchmark));
        assert_eq!(t.len(), 8);
        assert_eq!(t.labels[7], "7");
        assert!(t.reference_dates.is_empty());
    }

    #[test]
    fn empty_strategy_gives_empty_timeline() {
        let t = build_timeline(&EquitySeries::default(), None);
        assert!(t.is_empty());
        assert_eq!(t.step_size, 1);
    }

    #[test]
    fn tooltip_is_iso_date() {
        let t = build_timeline(&dated(3), None);
        assert_eq!(t.tooltip_title(1).as_deref(), Some("2023-02-15"));
        assert!(t.tooltip_title(3).is_none());
    }
}
