//! Recorded observations and the validation that guards their creation.
//!
//! An [`Entry`] can only be built through [`add_entry`] (or by reading back an
//! export), so every entry in a collection has a calendar-valid date, a
//! normalized metric name and a numeric value.

use crate::{Error, Result};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Date format used for input, storage and export
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One recorded observation of a metric on a given date
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Entry {
    date: NaiveDate,
    metric: String,
    value: f64,
}

impl Entry {
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Normalized (trimmed, lower-cased) metric name
    pub fn metric(&self) -> &str {
        &self.metric
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Validate raw fields and build an entry without appending it anywhere
    pub(crate) fn parse(date: &str, metric: &str, value: impl MetricValue) -> Result<Self> {
        let date = parse_date(date)?;
        let value = value.to_metric_value()?;

        Ok(Entry {
            date,
            metric: normalize_metric(metric),
            value,
        })
    }
}

/// Anything that can be turned into a metric reading
///
/// Numbers convert directly; strings are trimmed and parsed as `f64`.
pub trait MetricValue {
    fn to_metric_value(&self) -> Result<f64>;
}

impl MetricValue for f64 {
    fn to_metric_value(&self) -> Result<f64> {
        Ok(*self)
    }
}

impl MetricValue for f32 {
    fn to_metric_value(&self) -> Result<f64> {
        Ok(f64::from(*self))
    }
}

impl MetricValue for i32 {
    fn to_metric_value(&self) -> Result<f64> {
        Ok(f64::from(*self))
    }
}

impl MetricValue for u32 {
    fn to_metric_value(&self) -> Result<f64> {
        Ok(f64::from(*self))
    }
}

impl MetricValue for i64 {
    fn to_metric_value(&self) -> Result<f64> {
        Ok(*self as f64)
    }
}

impl MetricValue for &str {
    fn to_metric_value(&self) -> Result<f64> {
        self.trim()
            .parse::<f64>()
            .map_err(|e| Error::invalid(format!("value must be numeric, got {:?}: {}", self, e)))
    }
}

impl MetricValue for String {
    fn to_metric_value(&self) -> Result<f64> {
        self.as_str().to_metric_value()
    }
}

/// Trim and lower-case a metric name
pub fn normalize_metric(metric: &str) -> String {
    metric.trim().to_lowercase()
}

/// Parse a strict `YYYY-MM-DD` calendar date
pub fn parse_date(date: &str) -> Result<NaiveDate> {
    let bytes = date.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());

    if !well_formed {
        return Err(Error::invalid(format!(
            "date must be in YYYY-MM-DD format, got {:?}",
            date
        )));
    }

    let parsed = NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map_err(|e| Error::invalid(format!("date {:?} is not a calendar date: {}", date, e)))?;

    // Calendar years start at 1
    if parsed.year() < 1 {
        return Err(Error::invalid(format!("date {:?} is before year 1", date)));
    }

    Ok(parsed)
}

/// Validate and append a new entry to `entries`
///
/// The date is checked before the value; nothing is appended unless both are
/// valid. Returns a copy of the appended entry.
pub fn add_entry(
    entries: &mut Vec<Entry>,
    date: &str,
    metric: &str,
    value: impl MetricValue,
) -> Result<Entry> {
    let entry = Entry::parse(date, metric, value)?;
    tracing::debug!(
        "Recorded {} = {} on {}",
        entry.metric,
        entry.value,
        entry.date
    );
    entries.push(entry.clone());
    Ok(entry)
}
