//! Deterministic generated data for running the dashboard without Google credentials.
//!
//! Values are seeded from a SHA-256 of `(resource, metric, date)`, so the same
//! day always yields the same number no matter which range it was requested in.
//! That keeps current/previous window comparisons stable across requests.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use sha2::{Digest, Sha256};

use super::{country_filter, FetchResult, KeywordSource, MetricSource};
use crate::models::{DateRange, KeywordRow, MetricPoint, Provider, SourceRef, TimeSeriesBundle};

/// `(metric, base value, relative noise)` per provider.
fn series_profile(provider: Provider) -> &'static [(&'static str, f64, f64)] {
    match provider {
        Provider::Ga4 => &[("sessions", 120.0, 0.15)],
        Provider::Gsc => &[("impressions", 900.0, 0.25), ("clicks", 45.0, 0.3)],
        Provider::Gbp => &[("views", 300.0, 0.2), ("actions", 20.0, 0.35)],
    }
}

/// `(query, page, base position, base daily clicks)` for generated keyword rows.
const KEYWORDS: &[(&str, &str, f64, f64)] = &[
    ("plumber near me", "/", 2.4, 18.0),
    ("emergency plumber", "/emergency", 4.1, 9.0),
    ("leak repair cost", "/pricing", 7.8, 6.0),
    ("water heater install", "/services/water-heaters", 11.5, 4.0),
    ("drain cleaning", "/services/drains", 5.6, 7.0),
    ("burst pipe repair", "/emergency", 14.2, 2.0),
    ("toilet repair", "/services/toilets", 22.0, 1.5),
    ("sewer line replacement", "/services/sewer", 35.0, 0.8),
    ("plumbing permit", "/blog/permits", 48.0, 0.4),
    ("how to fix a dripping tap", "/blog/dripping-tap", 63.0, 0.2),
];

#[derive(Debug, Clone, Default)]
pub struct SyntheticProvider {
    salt: String,
}

impl SyntheticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Different salts give different, still deterministic, datasets.
    pub fn with_salt(salt: impl Into<String>) -> Self {
        Self { salt: salt.into() }
    }

    /// Uniform value in `[0, 1)` derived from the inputs.
    fn unit_noise(&self, parts: &[&str], date: NaiveDate) -> f64 {
        let mut hasher = Sha256::new();
        hasher.update(self.salt.as_bytes());
        for part in parts {
            hasher.update(part.as_bytes());
            hasher.update([0u8]);
        }
        hasher.update(date.num_days_from_ce().to_le_bytes());
        let digest = hasher.finalize();
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        (u64::from_le_bytes(head) >> 11) as f64 / (1u64 << 53) as f64
    }

    fn synth_series(&self, id: &str, metric: &str, range: &DateRange, base: f64, noise: f64) -> Vec<MetricPoint> {
        range
            .dates()
            .map(|date| {
                let phase = f64::from(date.num_days_from_ce()) / 5.0;
                let r = self.unit_noise(&[id, metric], date);
                let value = (base * (1.0 + 0.1 * phase.sin()) * (1.0 + (r - 0.5) * noise))
                    .round()
                    .max(0.0);
                MetricPoint::new(date, value)
            })
            .collect()
    }
}

#[async_trait]
impl MetricSource for SyntheticProvider {
    async fn fetch_metric_series(
        &self,
        source: &SourceRef,
        range: &DateRange,
    ) -> FetchResult<TimeSeriesBundle> {
        let bundle = series_profile(source.provider)
            .iter()
            .map(|(metric, base, noise)| {
                (
                    metric.to_string(),
                    self.synth_series(&source.id, metric, range, *base, *noise),
                )
            })
            .collect();
        Ok(bundle)
    }
}

#[async_trait]
impl KeywordSource for SyntheticProvider {
    async fn fetch_keyword_rows(
        &self,
        site_url: &str,
        range: &DateRange,
        country: Option<&str>,
    ) -> FetchResult<Vec<KeywordRow>> {
        let country = country_filter(country).map(str::to_uppercase);
        let mut rows = Vec::with_capacity(KEYWORDS.len() * range.day_count() as usize);

        for date in range.dates() {
            for (query, page, base_position, base_clicks) in KEYWORDS {
                let r = self.unit_noise(&[site_url, query, "position"], date);
                let position = (base_position * (1.0 + (r - 0.5) * 0.4)).max(1.0);

                let r = self.unit_noise(&[site_url, query, "clicks"], date);
                let clicks = (base_clicks * (0.5 + r)).round() as u64;

                let impressions = ((clicks as f64 + 1.0) * (8.0 + position)).round() as u64;
                let ctr = if impressions == 0 {
                    0.0
                } else {
                    clicks as f64 / impressions as f64
                };

                rows.push(KeywordRow {
                    date,
                    query: query.to_string(),
                    page: Some(format!("{}{}", site_url.trim_end_matches('/'), page)),
                    country: country.clone(),
                    clicks,
                    impressions,
                    ctr,
                    position: (position * 10.0).round() / 10.0,
                });
            }
        }

        Ok(rows)
    }
}
