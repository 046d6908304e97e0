//! Metric time series primitives.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Metric names every dashboard reports, in display order.
///
/// `sessions` comes from GA4, `impressions`/`clicks` from Search Console and
/// `views`/`actions` from Business Profile.
pub const WELL_KNOWN_METRICS: [&str; 5] = ["sessions", "impressions", "clicks", "views", "actions"];

/// One observation of a metric on a calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl MetricPoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Metric name → chronological series.
///
/// After a merge every series is sorted by date with no duplicate dates and
/// no empty series; bundles straight from a collaborator may violate both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeSeriesBundle(BTreeMap<String, Vec<MetricPoint>>);

impl TimeSeriesBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, replacing any existing series of that name.
    pub fn with_series(mut self, metric: impl Into<String>, points: Vec<MetricPoint>) -> Self {
        self.0.insert(metric.into(), points);
        self
    }

    pub fn insert(&mut self, metric: impl Into<String>, points: Vec<MetricPoint>) {
        self.0.insert(metric.into(), points);
    }

    pub fn get(&self, metric: &str) -> Option<&[MetricPoint]> {
        self.0.get(metric).map(Vec::as_slice)
    }

    pub fn contains(&self, metric: &str) -> bool {
        self.0.contains_key(metric)
    }

    pub fn metrics(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[MetricPoint])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Vec<MetricPoint>)> for TimeSeriesBundle {
    fn from_iter<I: IntoIterator<Item = (String, Vec<MetricPoint>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Scalar totals keyed `<metric>Total` (e.g. `sessionsTotal`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kpis(BTreeMap<String, f64>);

impl Kpis {
    /// Key under which a metric's total is reported.
    pub fn key_for(metric: &str) -> String {
        format!("{}Total", metric)
    }

    pub fn set(&mut self, metric: &str, total: f64) {
        self.0.insert(Self::key_for(metric), total);
    }

    /// Total for `metric`; 0 when the metric was never reported.
    pub fn total(&self, metric: &str) -> f64 {
        self.0.get(&Self::key_for(metric)).copied().unwrap_or(0.0)
    }

    /// Lookup by the full `<metric>Total` key.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
