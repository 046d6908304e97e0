//! Merged time series and KPI totals across every selected metric source.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::merge::merge_and_total;
use crate::error::{InsightError, SourceFailure, Window};
use crate::models::{DateRange, Kpis, SourceRef, TimeSeriesBundle};
use crate::providers::MetricSource;

/// Source ids as supplied by the caller; blank ids count as not selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSources {
    #[serde(default)]
    pub ga4: Option<String>,
    #[serde(default)]
    pub gsc: Option<String>,
    #[serde(default)]
    pub gbp: Option<String>,
}

impl DashboardSources {
    pub fn source_refs(&self) -> Vec<SourceRef> {
        fn selected(id: &Option<String>) -> Option<&str> {
            id.as_deref().map(str::trim).filter(|s| !s.is_empty())
        }

        let mut refs = Vec::with_capacity(3);
        refs.extend(selected(&self.ga4).map(SourceRef::ga4));
        refs.extend(selected(&self.gsc).map(SourceRef::gsc));
        refs.extend(selected(&self.gbp).map(SourceRef::gbp));
        refs
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub timeseries: TimeSeriesBundle,
    pub kpis: Kpis,
    #[serde(default)]
    pub errors: Vec<SourceFailure>,
}

/// Fetch all sources concurrently and merge whatever came back.
///
/// A failed source contributes nothing to the totals and is listed in `errors`.
#[tracing::instrument(skip(provider, sources), fields(range = %range, sources = sources.len()))]
pub async fn dashboard<P>(provider: &P, range: DateRange, sources: &[SourceRef]) -> DashboardResponse
where
    P: MetricSource + ?Sized,
{
    let results = futures::future::join_all(
        sources
            .iter()
            .map(|source| async move { (source, provider.fetch_metric_series(source, &range).await) }),
    )
    .await;

    let mut bundles = Vec::with_capacity(results.len());
    let mut errors = Vec::new();
    for (source, result) in results {
        match result {
            Ok(bundle) => bundles.push(bundle),
            Err(cause) => {
                let err = InsightError::upstream(source.clone(), Window::Current, cause);
                warn!(error = %err, "dashboard source failed");
                errors.extend(err.as_source_failure());
            }
        }
    }

    let merged = merge_and_total(&bundles);
    debug!(
        merged = bundles.len(),
        failed = errors.len(),
        "dashboard totals computed"
    );

    DashboardResponse {
        timeseries: merged.bundle,
        kpis: merged.kpis,
        errors,
    }
}
