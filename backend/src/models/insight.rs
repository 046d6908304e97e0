//! Presentation cards produced by the insight assembler.
//!
//! [`InsightCard`] is a sum type keyed by `type` on the wire, so a coverage
//! payload can never be attached to a mover card.

use serde::{Deserialize, Serialize};

use super::keywords::{Movers, RankBuckets};
use super::series::Kpis;
use super::time::DateRange;
use crate::error::SourceFailure;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warn,
    Action,
}

/// How much of a card could be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    /// Both windows fetched; payload complete.
    Ok,
    /// Current window only; comparison fields are `null`.
    Partial,
    /// Nothing trustworthy to show; payload is `null` and `reason` is set.
    Unavailable,
}

/// Common envelope around a card payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card<P> {
    pub id: String,
    pub severity: Severity,
    pub period: DateRange,
    pub status: CardStatus,
    pub payload: Option<P>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl<P> Card<P> {
    pub fn ok(id: impl Into<String>, severity: Severity, period: DateRange, payload: P) -> Self {
        Self {
            id: id.into(),
            severity,
            period,
            status: CardStatus::Ok,
            payload: Some(payload),
            reason: None,
        }
    }

    pub fn partial(
        id: impl Into<String>,
        period: DateRange,
        payload: P,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            severity: Severity::Warn,
            period,
            status: CardStatus::Partial,
            payload: Some(payload),
            reason: Some(reason.into()),
        }
    }

    pub fn unavailable(id: impl Into<String>, period: DateRange, reason: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            severity: Severity::Warn,
            period,
            status: CardStatus::Unavailable,
            payload: None,
            reason: Some(reason.into()),
        }
    }
}

/// Rank-tier counts for the current window and their change vs the previous one.
///
/// Deltas are `None` when the previous window could not be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoveragePayload {
    pub top3: u32,
    pub top10: u32,
    pub top50: u32,
    pub delta_top3: Option<i64>,
    pub delta_top10: Option<i64>,
    pub delta_top50: Option<i64>,
}

impl CoveragePayload {
    pub fn current_only(current: RankBuckets) -> Self {
        Self {
            top3: current.top3,
            top10: current.top10,
            top50: current.top50,
            delta_top3: None,
            delta_top10: None,
            delta_top50: None,
        }
    }

    pub fn with_previous(current: RankBuckets, previous: RankBuckets) -> Self {
        let diff = |c: u32, p: u32| i64::from(c) - i64::from(p);
        Self {
            delta_top3: Some(diff(current.top3, previous.top3)),
            delta_top10: Some(diff(current.top10, previous.top10)),
            delta_top50: Some(diff(current.top50, previous.top50)),
            ..Self::current_only(current)
        }
    }
}

/// Merged totals plus the headline signals derived from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSummaryPayload {
    pub kpis: Kpis,
    /// Clicks over impressions, present only when both were reported.
    pub search_ctr: Option<f64>,
    pub views_trending_up: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InsightCard {
    TopCoverage(Card<CoveragePayload>),
    Mover(Card<Movers>),
    KpiSummary(Card<KpiSummaryPayload>),
}

impl InsightCard {
    /// The wire discriminant.
    pub fn kind(&self) -> &'static str {
        match self {
            InsightCard::TopCoverage(_) => "TOP_COVERAGE",
            InsightCard::Mover(_) => "MOVER",
            InsightCard::KpiSummary(_) => "KPI_SUMMARY",
        }
    }

    pub fn id(&self) -> &str {
        match self {
            InsightCard::TopCoverage(c) => &c.id,
            InsightCard::Mover(c) => &c.id,
            InsightCard::KpiSummary(c) => &c.id,
        }
    }

    pub fn status(&self) -> CardStatus {
        match self {
            InsightCard::TopCoverage(c) => c.status,
            InsightCard::Mover(c) => c.status,
            InsightCard::KpiSummary(c) => c.status,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            InsightCard::TopCoverage(c) => c.severity,
            InsightCard::Mover(c) => c.severity,
            InsightCard::KpiSummary(c) => c.severity,
        }
    }

    pub fn period(&self) -> DateRange {
        match self {
            InsightCard::TopCoverage(c) => c.period,
            InsightCard::Mover(c) => c.period,
            InsightCard::KpiSummary(c) => c.period,
        }
    }
}

/// Top-level response of `compute_insights`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsightsResponse {
    pub items: Vec<InsightCard>,
    /// Sources that failed; the cards they feed are marked accordingly.
    #[serde(default)]
    pub errors: Vec<SourceFailure>,
}
