//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use chrono::NaiveDate;
use vsight_insights::models::{DateRange, KeywordRow, MetricPoint, TimeSeriesBundle};

static ENV_LOCK: Mutex<()> = Mutex::new(());

pub const SITE: &str = "sc-domain:plumbing.example";
pub const PROPERTY: &str = "properties/1001";
pub const LOCATION: &str = "locations/77";

/// Runs `f` with environment variables temporarily modified.
///
/// Restores variables on unwind and serializes access to the process
/// environment, since tests run in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("fixture date")
}

/// 2025-09-01..2025-09-28; its previous window is 2025-08-04..2025-08-31.
pub fn september() -> DateRange {
    DateRange::parse("2025-09-01", "2025-09-28").expect("fixture range")
}

pub fn keyword_row(day: &str, query: &str, country: &str, clicks: u64, position: f64) -> KeywordRow {
    KeywordRow {
        date: date(day),
        query: query.to_string(),
        page: Some(format!("/{}", query.replace(' ', "-"))),
        country: Some(country.to_string()),
        clicks,
        impressions: clicks * 12,
        ctr: if clicks == 0 { 0.0 } else { 1.0 / 12.0 },
        position,
    }
}

/// Both windows for [`SITE`].
///
/// Current: `a` +12 clicks, `b` +5, `c` vanished (-30). `d` ranks only in DE.
pub fn keyword_rows() -> Vec<KeywordRow> {
    vec![
        keyword_row("2025-08-12", "a", "US", 8, 12.0),
        keyword_row("2025-08-12", "b", "US", 10, 4.0),
        keyword_row("2025-08-20", "c", "US", 30, 2.0),
        keyword_row("2025-09-05", "a", "US", 20, 2.0),
        keyword_row("2025-09-05", "b", "US", 15, 8.0),
        keyword_row("2025-09-06", "d", "DE", 4, 30.0),
    ]
}

/// One value per day of September 1-28.
pub fn daily_series(metric: &str, value: impl Fn(u32) -> f64) -> TimeSeriesBundle {
    let points = (1..=28)
        .map(|day| {
            MetricPoint::new(
                NaiveDate::from_ymd_opt(2025, 9, day).expect("september day"),
                value(day),
            )
        })
        .collect();
    TimeSeriesBundle::new().with_series(metric, points)
}

/// Search Console series: 5 clicks on 100 impressions every day.
pub fn search_series() -> TimeSeriesBundle {
    let clicks = daily_series("clicks", |_| 5.0);
    let impressions = daily_series("impressions", |_| 100.0);
    let mut bundle = TimeSeriesBundle::new();
    for (metric, points) in clicks.iter().chain(impressions.iter()) {
        bundle.insert(metric, points.to_vec());
    }
    bundle
}
