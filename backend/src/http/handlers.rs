//! HTTP handlers for the REST API.
//!
//! Each handler parses and validates its input, then delegates to the
//! service layer.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::HeaderMap,
    Json,
};
use tracing::info;

use super::auth::{require_editor, verify_cron_secret};
use super::dto::{
    ComputeInsightsRequest, DashboardQuery, DeleteRuleQuery, DeleteRuleResponse, HealthResponse,
    KeywordPagesQuery, KeywordPagesResponse, RuleListResponse, SaveRuleResponse, TriggerRequest,
    TriggerResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::error::InsightError;
use crate::models::{AlertRule, InsightsResponse};
use crate::services::{alerts, dashboard, insights, pages};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let repository = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        repository,
    }))
}

// =============================================================================
// Insights
// =============================================================================

/// POST /v1/insights/compute
///
/// Coverage, movers and KPI cards for the requested range. Upstream failures
/// degrade individual cards and are listed under `errors`; they never fail
/// the request.
pub async fn compute_insights(
    State(state): State<AppState>,
    payload: Result<Json<ComputeInsightsRequest>, JsonRejection>,
) -> HandlerResult<InsightsResponse> {
    let Json(request) = payload?;
    let range = request.range()?.limit_days(state.config.insights.max_range_days)?;
    let sources = request.sources(&state.config.insights.default_country);
    let options = state.config.insights.options();

    let response =
        insights::compute_insights(state.provider.as_ref(), range, &sources, &options).await;
    Ok(Json(response))
}

/// GET /v1/dashboard
pub async fn get_dashboard(
    State(state): State<AppState>,
    query: Result<Query<DashboardQuery>, QueryRejection>,
) -> HandlerResult<dashboard::DashboardResponse> {
    let Query(query) = query?;
    let range = query.range()?.limit_days(state.config.insights.max_range_days)?;
    let sources = query.sources().source_refs();

    let response = dashboard::dashboard(state.provider.as_ref(), range, &sources).await;
    Ok(Json(response))
}

/// GET /v1/keywords/pages
pub async fn get_keyword_pages(
    State(state): State<AppState>,
    query: Result<Query<KeywordPagesQuery>, QueryRejection>,
) -> HandlerResult<KeywordPagesResponse> {
    let Query(query) = query?;
    let range = query.range()?.limit_days(state.config.insights.max_range_days)?;
    if query.site_url.trim().is_empty() {
        return Err(InsightError::MissingSource { kind: "keyword" }.into());
    }

    let country = query
        .country
        .as_deref()
        .unwrap_or(&state.config.insights.default_country);
    let items =
        pages::keyword_pages(state.provider.as_ref(), query.site_url.trim(), &range, Some(country))
            .await?;
    Ok(Json(KeywordPagesResponse { items }))
}

// =============================================================================
// Alert rules
// =============================================================================

/// GET /v1/alerts/rules
pub async fn list_alert_rules(State(state): State<AppState>) -> HandlerResult<RuleListResponse> {
    let items = alerts::list_rules(state.repository.as_ref()).await?;
    Ok(Json(RuleListResponse { items }))
}

/// GET /v1/alerts/rules/{id}
pub async fn get_alert_rule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<AlertRule> {
    let rule = alerts::get_rule(state.repository.as_ref(), &id).await?;
    Ok(Json(rule))
}

/// POST /v1/alerts/rules
///
/// Insert or replace a rule by id. Requires an editing role.
pub async fn save_alert_rule(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<AlertRule>, JsonRejection>,
) -> HandlerResult<SaveRuleResponse> {
    let role = require_editor(&headers)?;
    let Json(rule) = payload?;
    let rule_id = rule.id.clone();

    let replaced = alerts::save_rule(state.repository.as_ref(), rule).await?;
    info!(rule_id = %rule_id, ?role, replaced, "alert rule saved");
    Ok(Json(SaveRuleResponse { ok: true, replaced }))
}

/// DELETE /v1/alerts/rules?id=
pub async fn delete_alert_rule(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<DeleteRuleQuery>, QueryRejection>,
) -> HandlerResult<DeleteRuleResponse> {
    require_editor(&headers)?;
    let Query(query) = query?;
    let id = query.id.unwrap_or_default();

    let removed = alerts::delete_rule(state.repository.as_ref(), &id).await?;
    Ok(Json(DeleteRuleResponse { ok: true, removed }))
}

/// POST /v1/alerts/trigger
///
/// Cron entry point. Requires `Authorization: Bearer <jobs.cron_secret>`.
pub async fn trigger_alerts(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<TriggerRequest>, JsonRejection>,
) -> HandlerResult<TriggerResponse> {
    verify_cron_secret(&headers, state.config.jobs.cron_secret.as_deref())?;
    let Json(request) = payload?;
    let range = request.range()?.limit_days(state.config.insights.max_range_days)?;

    let evaluation = alerts::evaluate_rules(
        state.repository.as_ref(),
        state.provider.as_ref(),
        range,
        &request.targets,
    )
    .await?;
    info!(
        triggered = evaluation.triggered.len(),
        skipped = evaluation.skipped.len(),
        "alert evaluation finished"
    );
    Ok(Json(TriggerResponse {
        ok: true,
        evaluation,
    }))
}
