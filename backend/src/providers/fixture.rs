//! In-memory provider serving canned rows, with per-window failure injection.

use std::collections::HashMap;

use async_trait::async_trait;

use super::{country_filter, FetchError, FetchResult, KeywordSource, MetricSource};
use crate::models::{DateRange, KeywordRow, MetricPoint, SourceRef, TimeSeriesBundle};

/// Provider backed by fixed data.
///
/// Keyword rows are filtered by site, date range and country filter; series
/// are filtered by date range. Rows are returned in insertion order, which
/// matters for the legacy coverage policy.
#[derive(Debug, Clone, Default)]
pub struct FixtureProvider {
    keyword_rows: HashMap<String, Vec<KeywordRow>>,
    series: HashMap<SourceRef, TimeSeriesBundle>,
    failing_keyword_ranges: Vec<(DateRange, FetchError)>,
    failing_sources: HashMap<SourceRef, FetchError>,
}

impl FixtureProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keyword_rows(mut self, site_url: impl Into<String>, rows: Vec<KeywordRow>) -> Self {
        self.keyword_rows.entry(site_url.into()).or_default().extend(rows);
        self
    }

    pub fn with_series(mut self, source: SourceRef, bundle: TimeSeriesBundle) -> Self {
        self.series.insert(source, bundle);
        self
    }

    /// Any keyword fetch for exactly `range` fails with `error`.
    pub fn failing_keywords_for(mut self, range: DateRange, error: FetchError) -> Self {
        self.failing_keyword_ranges.push((range, error));
        self
    }

    /// Every series fetch for `source` fails with `error`.
    pub fn failing_source(mut self, source: SourceRef, error: FetchError) -> Self {
        self.failing_sources.insert(source, error);
        self
    }
}

#[async_trait]
impl KeywordSource for FixtureProvider {
    async fn fetch_keyword_rows(
        &self,
        site_url: &str,
        range: &DateRange,
        country: Option<&str>,
    ) -> FetchResult<Vec<KeywordRow>> {
        if let Some((_, err)) = self.failing_keyword_ranges.iter().find(|(r, _)| r == range) {
            return Err(err.clone());
        }

        let rows = self
            .keyword_rows
            .get(site_url)
            .ok_or_else(|| FetchError::NotFound(format!("site {}", site_url)))?;

        let country = country_filter(country);
        Ok(rows
            .iter()
            .filter(|row| range.contains(row.date))
            .filter(|row| match country {
                Some(code) => row
                    .country
                    .as_deref()
                    .is_some_and(|c| c.eq_ignore_ascii_case(code)),
                None => true,
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl MetricSource for FixtureProvider {
    async fn fetch_metric_series(
        &self,
        source: &SourceRef,
        range: &DateRange,
    ) -> FetchResult<TimeSeriesBundle> {
        if let Some(err) = self.failing_sources.get(source) {
            return Err(err.clone());
        }

        let bundle = self
            .series
            .get(source)
            .ok_or_else(|| FetchError::NotFound(source.to_string()))?;

        Ok(bundle
            .iter()
            .map(|(metric, points)| {
                let in_range: Vec<MetricPoint> = points
                    .iter()
                    .copied()
                    .filter(|p| range.contains(p.date))
                    .collect();
                (metric.to_string(), in_range)
            })
            .collect())
    }
}
