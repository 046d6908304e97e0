//! Insight assembly and the `compute_insights` entry point.
//!
//! The pure pieces ([`coverage`](super::coverage), [`movers`](super::movers),
//! [`merge`](super::merge)) run over in-memory rows. This module fetches those
//! rows for the current and previous windows concurrently, keeps each fetch's
//! outcome separate, and turns whatever succeeded into cards.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::coverage::{coverage_report, CoveragePolicy};
use super::merge::{merge_and_total, MergedTotals};
use super::movers::{movers, DEFAULT_MOVER_LIMIT};
use crate::error::{InsightError, SourceFailure, Window};
use crate::models::{
    Card, CoveragePayload, DateRange, InsightCard, InsightsResponse, KeywordRow,
    KpiSummaryPayload, Movers, Severity, SourceRef, TimeSeriesBundle,
};
use crate::providers::{FetchResult, KeywordSource, MetricSource};

pub const COVERAGE_CARD_ID: &str = "coverage";
pub const MOVERS_CARD_ID: &str = "movers";
pub const KPI_CARD_ID: &str = "kpi-summary";

/// Search Console site plus optional country filter (`None`/`"ALL"` = all countries).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordSourceSpec {
    pub site_url: String,
    #[serde(default)]
    pub country: Option<String>,
}

impl KeywordSourceSpec {
    pub fn new(site_url: impl Into<String>) -> Self {
        Self {
            site_url: site_url.into(),
            country: None,
        }
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    fn source_ref(&self) -> SourceRef {
        SourceRef::gsc(self.site_url.clone())
    }
}

/// What the caller selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightSources {
    #[serde(default)]
    pub keyword_source: Option<KeywordSourceSpec>,
    #[serde(default)]
    pub metric_sources: Vec<SourceRef>,
}

impl InsightSources {
    pub fn is_empty(&self) -> bool {
        self.keyword_source.is_none() && self.metric_sources.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsightOptions {
    pub mover_limit: usize,
    pub coverage_policy: CoveragePolicy,
}

impl Default for InsightOptions {
    fn default() -> Self {
        Self {
            mover_limit: DEFAULT_MOVER_LIMIT,
            coverage_policy: CoveragePolicy::default(),
        }
    }
}

/// How much of one card's input was available.
#[derive(Debug, Clone, PartialEq)]
pub enum Computed<P> {
    Complete(P),
    /// Usable payload, with the reason it is incomplete.
    Partial(P, String),
    Unavailable(String),
}

/// Package computed pieces into cards, in fixed order: coverage, movers, KPIs.
///
/// `None` means the source was never queried and produces no card at all.
pub fn assemble(
    period: DateRange,
    coverage: Option<Computed<CoveragePayload>>,
    movers: Option<Computed<Movers>>,
    kpis: Option<Computed<KpiSummaryPayload>>,
) -> Vec<InsightCard> {
    let mut items = Vec::with_capacity(3);

    if let Some(computed) = coverage {
        let card = match computed {
            Computed::Complete(payload) => {
                Card::ok(COVERAGE_CARD_ID, Severity::Info, period, payload)
            }
            Computed::Partial(payload, reason) => {
                Card::partial(COVERAGE_CARD_ID, period, payload, reason)
            }
            Computed::Unavailable(reason) => Card::unavailable(COVERAGE_CARD_ID, period, reason),
        };
        items.push(InsightCard::TopCoverage(card));
    }

    if let Some(computed) = movers {
        let card = match computed {
            Computed::Complete(payload) => Card::ok(MOVERS_CARD_ID, Severity::Info, period, payload),
            Computed::Partial(payload, reason) => {
                Card::partial(MOVERS_CARD_ID, period, payload, reason)
            }
            Computed::Unavailable(reason) => Card::unavailable(MOVERS_CARD_ID, period, reason),
        };
        items.push(InsightCard::Mover(card));
    }

    if let Some(computed) = kpis {
        let card = match computed {
            Computed::Complete(payload) => Card::ok(KPI_CARD_ID, Severity::Info, period, payload),
            Computed::Partial(payload, reason) => Card::partial(KPI_CARD_ID, period, payload, reason),
            Computed::Unavailable(reason) => Card::unavailable(KPI_CARD_ID, period, reason),
        };
        items.push(InsightCard::KpiSummary(card));
    }

    items
}

/// Headline signals over merged totals.
pub fn kpi_summary(merged: &MergedTotals) -> KpiSummaryPayload {
    let clicks = merged.kpis.total("clicks");
    let impressions = merged.kpis.total("impressions");
    let search_ctr = (clicks > 0.0 && impressions > 0.0).then(|| clicks / impressions.max(1.0));

    let views_trending_up = merged
        .bundle
        .get("views")
        .and_then(|views| Some((views.first()?, views.last()?)))
        .is_some_and(|(first, last)| last.value > first.value);

    KpiSummaryPayload {
        kpis: merged.kpis.clone(),
        search_ctr,
        views_trending_up,
    }
}

/// Coverage and movers from the two keyword windows' fetch outcomes.
pub fn keyword_cards(
    current: &FetchResult<Vec<KeywordRow>>,
    previous: &FetchResult<Vec<KeywordRow>>,
    options: &InsightOptions,
) -> (Computed<CoveragePayload>, Computed<Movers>) {
    match (current, previous) {
        (Ok(current), Ok(previous)) => (
            Computed::Complete(coverage_report(
                current,
                Some(previous.as_slice()),
                options.coverage_policy,
            )),
            Computed::Complete(movers(current, previous, options.mover_limit)),
        ),
        (Ok(current), Err(err)) => {
            let reason = format!("previous window unavailable: {}", err);
            (
                Computed::Partial(
                    coverage_report(current, None, options.coverage_policy),
                    reason.clone(),
                ),
                Computed::Unavailable(reason),
            )
        }
        (Err(err), _) => {
            let reason = format!("current window unavailable: {}", err);
            (
                Computed::Unavailable(reason.clone()),
                Computed::Unavailable(reason),
            )
        }
    }
}

/// KPI summary from per-source series outcomes.
pub fn kpi_card(results: &[(SourceRef, FetchResult<TimeSeriesBundle>)]) -> Computed<KpiSummaryPayload> {
    let bundles: Vec<TimeSeriesBundle> = results
        .iter()
        .filter_map(|(_, r)| r.as_ref().ok().cloned())
        .collect();
    let failed = results.len() - bundles.len();

    if bundles.is_empty() {
        return Computed::Unavailable("all metric sources failed".to_string());
    }

    let summary = kpi_summary(&merge_and_total(&bundles));
    if failed > 0 {
        Computed::Partial(
            summary,
            format!("{} of {} metric sources failed", failed, results.len()),
        )
    } else {
        Computed::Complete(summary)
    }
}

fn record_failure<T>(
    errors: &mut Vec<SourceFailure>,
    source: &SourceRef,
    window: Window,
    result: &FetchResult<T>,
) {
    if let Err(cause) = result {
        let err = InsightError::upstream(source.clone(), window, cause.clone());
        warn!(error = %err, "source fetch failed; degrading response");
        errors.extend(err.as_source_failure());
    }
}

/// Fetch both windows for every selected source concurrently and assemble cards.
///
/// One source failing never aborts the others; failures are listed in
/// `errors` and the affected cards are marked partial or unavailable.
#[tracing::instrument(skip(provider, sources, options), fields(range = %range))]
pub async fn compute_insights<P>(
    provider: &P,
    range: DateRange,
    sources: &InsightSources,
    options: &InsightOptions,
) -> InsightsResponse
where
    P: KeywordSource + MetricSource + ?Sized,
{
    if sources.is_empty() {
        debug!("no sources selected; nothing to compute");
        return InsightsResponse::default();
    }

    let previous_range = range.shift_back();

    let keyword_fetch = async {
        match &sources.keyword_source {
            Some(spec) => {
                let country = spec.country.as_deref();
                let (current, previous) = tokio::join!(
                    provider.fetch_keyword_rows(&spec.site_url, &range, country),
                    provider.fetch_keyword_rows(&spec.site_url, &previous_range, country),
                );
                Some((spec.source_ref(), current, previous))
            }
            None => None,
        }
    };

    let metric_fetch = futures::future::join_all(sources.metric_sources.iter().map(|source| async move {
        let result = provider.fetch_metric_series(source, &range).await;
        (source.clone(), result)
    }));

    let (keywords, metric_results) = tokio::join!(keyword_fetch, metric_fetch);

    let mut errors = Vec::new();

    let (coverage, mover) = match keywords {
        Some((source, current, previous)) => {
            record_failure(&mut errors, &source, Window::Current, &current);
            record_failure(&mut errors, &source, Window::Previous, &previous);
            let (coverage, mover) = keyword_cards(&current, &previous, options);
            (Some(coverage), Some(mover))
        }
        None => (None, None),
    };

    let kpis = if metric_results.is_empty() {
        None
    } else {
        for (source, result) in &metric_results {
            record_failure(&mut errors, source, Window::Current, result);
        }
        Some(kpi_card(&metric_results))
    };

    let items = assemble(range, coverage, mover, kpis);
    debug!(cards = items.len(), failures = errors.len(), "assembled insight cards");

    InsightsResponse { items, errors }
}

#[cfg(test)]
#[path = "insights_tests.rs"]
mod insights_tests;
