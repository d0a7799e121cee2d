//! Daily stats: a free-form JSON document keyed by calendar date.
//!
//! The wire and storage shape is
//!
//! ```json
//! { "2022-11-13": { "calories": 2200, "steps": 8000 } }
//! ```
//!
//! Top-level keys are typed as [`NaiveDate`], so a document with a key that
//! is not `YYYY-MM-DD` is rejected on parse. The per-day metric maps are left
//! untyped; metric names map to arbitrary JSON values.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Result;

/// Metrics recorded for a single day.
pub type DayMetrics = Map<String, Value>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stats(BTreeMap<NaiveDate, DayMetrics>);

impl Stats {
  pub fn new() -> Self { Self::default() }

  pub fn day(&self, date: NaiveDate) -> Option<&DayMetrics> { self.0.get(&date) }

  /// Replace the metrics for `date` wholesale.
  pub fn set_day(&mut self, date: NaiveDate, metrics: DayMetrics) {
    self.0.insert(date, metrics);
  }

  /// Set a single metric, creating the day if needed.
  pub fn record(
    &mut self,
    date: NaiveDate,
    metric: impl Into<String>,
    value: impl Into<Value>,
  ) {
    self.0.entry(date).or_default().insert(metric.into(), value.into());
  }

  /// Merge `metrics` into the day, overwriting metrics that already exist.
  pub fn merge_day(&mut self, date: NaiveDate, metrics: DayMetrics) {
    self.0.entry(date).or_default().extend(metrics);
  }

  pub fn remove_day(&mut self, date: NaiveDate) -> Option<DayMetrics> {
    self.0.remove(&date)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &DayMetrics)> {
    self.0.iter()
  }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn to_json_string(&self) -> Result<String> { Ok(serde_json::to_string(self)?) }

  pub fn from_json_str(s: &str) -> Result<Self> { Ok(serde_json::from_str(s)?) }
}

impl From<BTreeMap<NaiveDate, DayMetrics>> for Stats {
  fn from(days: BTreeMap<NaiveDate, DayMetrics>) -> Self { Self(days) }
}
