//! Data Transfer Objects for the HTTP API.
//!
//! Dates arrive as strings and are validated here, so a malformed range is a
//! 400 with a useful message rather than a generic body rejection.

use serde::{Deserialize, Serialize};

use crate::error::InsightResult;
use crate::models::{AlertEvaluation, AlertRule, DateRange, PagePoint, SourceRef};
use crate::services::alerts::AlertTargets;
use crate::services::dashboard::DashboardSources;
use crate::services::insights::{InsightSources, KeywordSourceSpec};

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub repository: String,
}

/// Body of `POST /v1/insights/compute`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeInsightsRequest {
    #[serde(default)]
    pub gsc_site_url: Option<String>,
    #[serde(default)]
    pub ga4_property_id: Option<String>,
    #[serde(default)]
    pub gbp_location_id: Option<String>,
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub country: Option<String>,
}

impl ComputeInsightsRequest {
    pub fn range(&self) -> InsightResult<DateRange> {
        DateRange::parse(&self.start, &self.end)
    }

    /// Selected sources; `default_country` applies when the request names none.
    ///
    /// A Search Console site feeds both the keyword cards and, through its
    /// clicks/impressions series, the KPI summary.
    pub fn sources(&self, default_country: &str) -> InsightSources {
        let site = non_blank(&self.gsc_site_url);
        let keyword_source = site.map(|site| {
            KeywordSourceSpec::new(site)
                .with_country(non_blank(&self.country).unwrap_or(default_country))
        });

        let mut metric_sources = Vec::new();
        metric_sources.extend(non_blank(&self.ga4_property_id).map(SourceRef::ga4));
        metric_sources.extend(site.map(SourceRef::gsc));
        metric_sources.extend(non_blank(&self.gbp_location_id).map(SourceRef::gbp));

        InsightSources {
            keyword_source,
            metric_sources,
        }
    }
}

/// Query of `GET /v1/dashboard`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub ga4: Option<String>,
    #[serde(default)]
    pub gsc: Option<String>,
    #[serde(default)]
    pub gbp: Option<String>,
    pub start: String,
    pub end: String,
}

impl DashboardQuery {
    pub fn range(&self) -> InsightResult<DateRange> {
        DateRange::parse(&self.start, &self.end)
    }

    pub fn sources(&self) -> DashboardSources {
        DashboardSources {
            ga4: self.ga4.clone(),
            gsc: self.gsc.clone(),
            gbp: self.gbp.clone(),
        }
    }
}

/// Query of `GET /v1/keywords/pages`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordPagesQuery {
    pub site_url: String,
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub country: Option<String>,
}

impl KeywordPagesQuery {
    pub fn range(&self) -> InsightResult<DateRange> {
        DateRange::parse(&self.start, &self.end)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordPagesResponse {
    pub items: Vec<PagePoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleListResponse {
    pub items: Vec<AlertRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveRuleResponse {
    pub ok: bool,
    /// Whether an existing rule with the same id was replaced.
    pub replaced: bool,
}

/// Query of `DELETE /v1/alerts/rules`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteRuleQuery {
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRuleResponse {
    pub ok: bool,
    pub removed: bool,
}

/// Body of `POST /v1/alerts/trigger`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerRequest {
    pub start: String,
    pub end: String,
    #[serde(flatten)]
    pub targets: AlertTargets,
}

impl TriggerRequest {
    pub fn range(&self) -> InsightResult<DateRange> {
        DateRange::parse(&self.start, &self.end)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerResponse {
    pub ok: bool,
    #[serde(flatten)]
    pub evaluation: AlertEvaluation,
}
