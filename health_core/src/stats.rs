//! Moving averages and trailing-week summaries.
//!
//! Both computations are pure: they read a slice of entries and never touch it.

use crate::entry::{normalize_metric, parse_date};
use crate::{Entry, Error, Result};
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

/// Window used when the caller does not pick one
pub const DEFAULT_WINDOW: usize = 3;

/// Length of the trailing summary window, end date included
pub const WEEK_DAYS: i64 = 7;

/// Aggregate statistics over one trailing week
///
/// `min`, `max` and `mean` are present exactly when `count > 0`; serialized
/// output omits them otherwise.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WeekSummary {
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    pub values: Vec<f64>,
}

impl WeekSummary {
    /// Summary with nothing selected
    pub fn empty() -> Self {
        Self::from_values(Vec::new())
    }

    /// Build a summary from the selected values, kept in the given order
    pub fn from_values(values: Vec<f64>) -> Self {
        if values.is_empty() {
            return WeekSummary {
                count: 0,
                min: None,
                max: None,
                mean: None,
                values,
            };
        }

        let count = values.len();
        let min = extreme(&values, f64::INFINITY, f64::min);
        let max = extreme(&values, f64::NEG_INFINITY, f64::max);
        let mean = values.iter().sum::<f64>() / count as f64;

        WeekSummary {
            count,
            min: Some(min),
            max: Some(max),
            mean: Some(mean),
            values,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Fold `values` with `pick`, returning NaN as soon as any value is NaN
fn extreme(values: &[f64], init: f64, pick: fn(f64, f64) -> f64) -> f64 {
    values.iter().copied().fold(init, |acc, v| {
        if acc.is_nan() || v.is_nan() {
            f64::NAN
        } else {
            pick(acc, v)
        }
    })
}

/// Compute a trailing moving average of `metric`
///
/// Matching entries are stably sorted by date. For every position with at
/// least `window` values up to and including it, the mean of the last
/// `window` values is recorded under that position's date. When several
/// entries share a date, the one sorted last wins.
pub fn moving_average(
    entries: &[Entry],
    metric: &str,
    window: usize,
) -> Result<BTreeMap<NaiveDate, f64>> {
    if window < 1 {
        return Err(Error::invalid(format!("window must be >= 1, got {}", window)));
    }

    let metric = normalize_metric(metric);
    let mut selected: Vec<&Entry> = entries.iter().filter(|e| e.metric() == metric).collect();
    selected.sort_by_key(|e| e.date());

    let values: Vec<f64> = selected.iter().map(|e| e.value()).collect();
    let mut averages = BTreeMap::new();

    for (end, entry) in selected.iter().enumerate().skip(window - 1) {
        let slice = &values[end + 1 - window..=end];
        let avg = slice.iter().sum::<f64>() / window as f64;
        averages.insert(entry.date(), avg);
    }

    tracing::debug!(
        "Moving average of {:?} (window {}): {} of {} points",
        metric,
        window,
        averages.len(),
        selected.len()
    );

    Ok(averages)
}

/// Summarize `metric` over the seven days ending at `end_date`
///
/// `end_date` must be `YYYY-MM-DD` when given. Without it the window ends on
/// the latest date recorded for any metric. An empty collection always yields
/// an empty summary.
pub fn summarize_week(
    entries: &[Entry],
    metric: &str,
    end_date: Option<&str>,
) -> Result<WeekSummary> {
    let explicit_end = end_date.map(parse_date).transpose()?;

    let end = match explicit_end.or_else(|| latest_date(entries)) {
        Some(end) => end,
        None => return Ok(WeekSummary::empty()),
    };

    Ok(summarize_window(entries, metric, end))
}

/// Summarize `metric` over `[end - 6 days, end]`, keeping collection order
pub fn summarize_window(entries: &[Entry], metric: &str, end: NaiveDate) -> WeekSummary {
    let metric = normalize_metric(metric);
    let start = end - Duration::days(WEEK_DAYS - 1);

    let values: Vec<f64> = entries
        .iter()
        .filter(|e| e.metric() == metric && (start..=end).contains(&e.date()))
        .map(|e| e.value())
        .collect();

    tracing::debug!(
        "Week summary of {:?} for {}..={}: {} values",
        metric,
        start,
        end,
        values.len()
    );

    WeekSummary::from_values(values)
}

/// Latest date across all entries, regardless of metric
pub fn latest_date(entries: &[Entry]) -> Option<NaiveDate> {
    entries.iter().map(|e| e.date()).max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::add_entry;

    const WEIGHTS: [f64; 7] = [70.0, 71.0, 70.5, 69.0, 68.5, 69.2, 70.0];

    fn make_sample() -> Vec<Entry> {
        let mut entries = Vec::new();
        for (day, weight) in (1..=7).zip(WEIGHTS) {
            let date = format!("2025-09-{:02}", day);
            add_entry(&mut entries, &date, "weight", weight).unwrap();
        }
        entries
    }

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_moving_average_basic() {
        let entries = make_sample();
        let ma = moving_average(&entries, "weight", 3).unwrap();

        assert_eq!(ma.len(), 5);
        assert!(!ma.contains_key(&date("2025-09-01")));
        assert!(!ma.contains_key(&date("2025-09-02")));

        let expected = (70.0 + 71.0 + 70.5) / 3.0;
        assert!((ma[&date("2025-09-03")] - expected).abs() < 1e-9);

        let expected = (68.5 + 69.2 + 70.0) / 3.0;
        assert!((ma[&date("2025-09-07")] - expected).abs() < 1e-9);
    }

    #[test]
    fn test_moving_average_sorts_by_date() {
        let mut entries = Vec::new();
        add_entry(&mut entries, "2025-09-03", "weight", 3.0).unwrap();
        add_entry(&mut entries, "2025-09-01", "weight", 1.0).unwrap();
        add_entry(&mut entries, "2025-09-02", "weight", 2.0).unwrap();

        let ma = moving_average(&entries, "weight", 2).unwrap();
        assert_eq!(ma[&date("2025-09-02")], 1.5);
        assert_eq!(ma[&date("2025-09-03")], 2.5);
    }

    #[test]
    fn test_moving_average_window_one_is_identity() {
        let entries = make_sample();
        let ma = moving_average(&entries, "weight", 1).unwrap();
        let values: Vec<f64> = ma.values().copied().collect();
        assert_eq!(values, WEIGHTS.to_vec());
    }

    #[test]
    fn test_moving_average_zero_window_rejected() {
        let entries = make_sample();
        let err = moving_average(&entries, "weight", 0).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_moving_average_empty_inputs() {
        assert!(moving_average(&[], "weight", 3).unwrap().is_empty());

        let entries = make_sample();
        assert!(moving_average(&entries, "sleep", 3).unwrap().is_empty());
        assert!(moving_average(&entries, "weight", 8).unwrap().is_empty());
    }

    #[test]
    fn test_moving_average_normalizes_metric() {
        let entries = make_sample();
        let ma = moving_average(&entries, "  WEIGHT ", 7).unwrap();
        assert_eq!(ma.len(), 1);
    }

    #[test]
    fn test_moving_average_duplicate_date_last_wins() {
        let mut entries = Vec::new();
        add_entry(&mut entries, "2025-09-01", "weight", 10.0).unwrap();
        add_entry(&mut entries, "2025-09-02", "weight", 20.0).unwrap();
        add_entry(&mut entries, "2025-09-02", "weight", 40.0).unwrap();

        let ma = moving_average(&entries, "weight", 2).unwrap();
        assert_eq!(ma.len(), 1);
        assert_eq!(ma[&date("2025-09-02")], 30.0);
    }

    #[test]
    fn test_summarize_week_counts_and_mean() {
        let entries = make_sample();
        let summary = summarize_week(&entries, "weight", Some("2025-09-07")).unwrap();

        assert_eq!(summary.count, 7);
        let expected = WEIGHTS.iter().sum::<f64>() / 7.0;
        assert!((summary.mean.unwrap() - expected).abs() < 1e-9);
        assert!((summary.mean.unwrap() - 69.742857).abs() < 1e-6);
        assert_eq!(summary.min, Some(68.5));
        assert_eq!(summary.max, Some(71.0));
        assert_eq!(summary.values, WEIGHTS.to_vec());
    }

    #[test]
    fn test_summarize_week_window_is_inclusive() {
        let entries = make_sample();
        let summary = summarize_week(&entries, "weight", Some("2025-09-08")).unwrap();
        assert_eq!(summary.count, 6);
        assert_eq!(summary.values[0], 71.0);

        let summary = summarize_week(&entries, "weight", Some("2025-09-01")).unwrap();
        assert_eq!(summary.count, 1);
        assert_eq!(summary.values, vec![70.0]);
    }

    #[test]
    fn test_summarize_week_keeps_collection_order() {
        let mut entries = Vec::new();
        add_entry(&mut entries, "2025-09-05", "weight", 5.0).unwrap();
        add_entry(&mut entries, "2025-09-02", "weight", 2.0).unwrap();
        add_entry(&mut entries, "2025-09-04", "weight", 4.0).unwrap();

        let summary = summarize_week(&entries, "weight", None).unwrap();
        assert_eq!(summary.values, vec![5.0, 2.0, 4.0]);
    }

    #[test]
    fn test_summarize_week_default_end_uses_all_metrics() {
        let mut entries = make_sample();
        add_entry(&mut entries, "2025-10-01", "sleep", 8.0).unwrap();

        let summary = summarize_week(&entries, "weight", None).unwrap();
        assert!(summary.is_empty());

        let summary = summarize_week(&entries, "sleep", None).unwrap();
        assert_eq!(summary.count, 1);
    }

    #[test]
    fn test_summarize_week_no_matches() {
        let entries = make_sample();
        let summary = summarize_week(&entries, "sleep", Some("2025-09-07")).unwrap();
        assert_eq!(summary, WeekSummary::empty());

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json, serde_json::json!({ "count": 0, "values": [] }));
    }

    #[test]
    fn test_summarize_week_empty_collection() {
        assert!(summarize_week(&[], "weight", None).unwrap().is_empty());
        assert!(summarize_week(&[], "weight", Some("2025-09-07"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_summarize_week_bad_end_date() {
        let entries = make_sample();
        let err = summarize_week(&entries, "weight", Some("07.09.2025")).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let err = summarize_week(&[], "weight", Some("2025-02-30")).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_summary_nan_value_poisons_every_statistic() {
        let mut entries = Vec::new();
        add_entry(&mut entries, "2025-09-01", "w", "NaN").unwrap();
        add_entry(&mut entries, "2025-09-02", "w", 1.0).unwrap();

        let summary = summarize_week(&entries, "w", None).unwrap();
        assert_eq!(summary.count, 2);
        assert!(summary.min.unwrap().is_nan());
        assert!(summary.max.unwrap().is_nan());
        assert!(summary.mean.unwrap().is_nan());

        let summary = WeekSummary::from_values(vec![1.0, f64::NAN, 3.0]);
        assert!(summary.min.unwrap().is_nan());
        assert!(summary.max.unwrap().is_nan());
    }

    #[test]
    fn test_summary_serializes_all_keys_when_present() {
        let summary = WeekSummary::from_values(vec![2.0, 4.0]);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "count": 2,
                "min": 2.0,
                "max": 4.0,
                "mean": 3.0,
                "values": [2.0, 4.0],
            })
        );
    }
}
