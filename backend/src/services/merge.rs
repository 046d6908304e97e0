//! Series merging and KPI totals.
//!
//! Multiple properties/sites/locations report the same metric names; merging
//! sums everything that lands on the same date, per metric.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Kpis, MetricPoint, TimeSeriesBundle, WELL_KNOWN_METRICS};

/// Combine bundles into one, summing values per `(metric, date)`.
///
/// Duplicate dates inside a single input series are summed too. Output series
/// are ascending by date, and metrics with no points anywhere are omitted.
pub fn merge(bundles: &[TimeSeriesBundle]) -> TimeSeriesBundle {
    let mut acc: BTreeMap<&str, BTreeMap<NaiveDate, f64>> = BTreeMap::new();

    for bundle in bundles {
        for (metric, points) in bundle.iter() {
            if points.is_empty() {
                continue;
            }
            let by_date = acc.entry(metric).or_default();
            for point in points {
                *by_date.entry(point.date).or_insert(0.0) += point.value;
            }
        }
    }

    debug!(inputs = bundles.len(), metrics = acc.len(), "merged time series bundles");

    acc.into_iter()
        .map(|(metric, by_date)| {
            let points = by_date
                .into_iter()
                .map(|(date, value)| MetricPoint::new(date, value))
                .collect();
            (metric.to_string(), points)
        })
        .collect()
}

/// Sum of a series' values; 0 for an absent series.
pub fn sum_series(series: Option<&[MetricPoint]>) -> f64 {
    series
        .map(|points| points.iter().map(|p| p.value).sum())
        .unwrap_or(0.0)
}

/// `<metric>Total` for every well-known metric (0 when absent) and for any
/// other metric present in the bundle.
pub fn totals(bundle: &TimeSeriesBundle) -> Kpis {
    let mut kpis = Kpis::default();
    for metric in WELL_KNOWN_METRICS {
        kpis.set(metric, sum_series(bundle.get(metric)));
    }
    for (metric, points) in bundle.iter() {
        kpis.set(metric, sum_series(Some(points)));
    }
    kpis
}

/// A merged bundle together with its totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergedTotals {
    pub bundle: TimeSeriesBundle,
    pub kpis: Kpis,
}

/// [`merge`] followed by [`totals`], for dashboards that only need totals.
pub fn merge_and_total(bundles: &[TimeSeriesBundle]) -> MergedTotals {
    let bundle = merge(bundles);
    let kpis = totals(&bundle);
    MergedTotals { bundle, kpis }
}

#[cfg(test)]
#[path = "merge_tests.rs"]
mod merge_tests;
