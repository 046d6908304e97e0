//! Collaborator seam: where raw rows and series come from.
//!
//! The engine never talks to Google directly. A provider owns auth,
//! pagination and upstream error translation and hands back plain values;
//! the services in [`crate::services`] only ever see the traits below.
//!
//! - [`SyntheticProvider`]: deterministic generated data for local development
//! - [`FixtureProvider`]: canned rows with failure injection, for tests

use async_trait::async_trait;

use crate::models::{DateRange, KeywordRow, TimeSeriesBundle};

pub mod fixture;
pub mod synthetic;

pub use crate::models::{Provider, SourceRef};
pub use fixture::FixtureProvider;
pub use synthetic::SyntheticProvider;

pub type FetchResult<T> = Result<T, FetchError>;

/// Failure reported by a collaborator for a single fetch.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Upstream error{}: {message}", status_suffix(.status))]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Malformed upstream response: {0}")]
    Malformed(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({})", s)).unwrap_or_default()
}

impl FetchError {
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            status: None,
            message: message.into(),
        }
    }

    pub fn upstream_status(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            status: Some(status),
            message: message.into(),
        }
    }
}

/// Search-analytics rows for a site.
#[async_trait]
pub trait KeywordSource: Send + Sync {
    /// Rows for every day in `range`. `country` is an ISO code or `None`/`"ALL"`.
    async fn fetch_keyword_rows(
        &self,
        site_url: &str,
        range: &DateRange,
        country: Option<&str>,
    ) -> FetchResult<Vec<KeywordRow>>;
}

/// Daily metric series for a GA4 property, GSC site or GBP location.
#[async_trait]
pub trait MetricSource: Send + Sync {
    async fn fetch_metric_series(
        &self,
        source: &SourceRef,
        range: &DateRange,
    ) -> FetchResult<TimeSeriesBundle>;
}

/// Everything the HTTP layer needs from upstream, behind one object.
pub trait DataProvider: KeywordSource + MetricSource {}

impl<T: KeywordSource + MetricSource> DataProvider for T {}

/// `None` for the `"ALL"` sentinel or a blank value, otherwise the code itself.
pub fn country_filter(country: Option<&str>) -> Option<&str> {
    country
        .map(str::trim)
        .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case(crate::models::ALL_COUNTRIES))
}
