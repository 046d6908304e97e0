//! Alert rule management and evaluation.
//!
//! Rules live in an [`AlertRuleRepository`]; evaluation pulls each rule's
//! source series for its trailing window and compares the window total
//! against the rule's threshold.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::merge::sum_series;
use crate::db::repository::{AlertRuleRepository, ErrorContext, RepositoryError, RepositoryResult};
use crate::models::{
    AlertCondition, AlertEvaluation, AlertRule, DateRange, Provider, SkippedRule, SourceRef,
    TimeSeriesBundle,
};
use crate::providers::{FetchResult, MetricSource};

/// Longest evaluation window a rule may ask for.
pub const MAX_WINDOW_DAYS: u32 = 366;

/// Reject rules that could never be evaluated.
pub fn validate_rule(rule: &AlertRule) -> RepositoryResult<()> {
    let context = || {
        ErrorContext::new("save_rule")
            .with_entity("alert_rule")
            .with_entity_id(&rule.id)
    };

    if rule.id.trim().is_empty() {
        return Err(RepositoryError::validation_with_context("missing id", context()));
    }
    if rule.metric.trim().is_empty() {
        return Err(RepositoryError::validation_with_context("missing metric", context()));
    }
    if !rule.threshold.is_finite() {
        return Err(RepositoryError::validation_with_context(
            "threshold must be a finite number",
            context(),
        ));
    }
    if rule.window_days == 0 {
        return Err(RepositoryError::validation_with_context(
            "windowDays must be at least 1",
            context(),
        ));
    }
    if rule.window_days > MAX_WINDOW_DAYS {
        return Err(RepositoryError::validation_with_context(
            format!("windowDays must be at most {}", MAX_WINDOW_DAYS),
            context(),
        ));
    }
    Ok(())
}

pub async fn list_rules(repo: &dyn AlertRuleRepository) -> RepositoryResult<Vec<AlertRule>> {
    repo.list_rules().await.map_err(|e| e.with_operation("list_rules"))
}

pub async fn get_rule(repo: &dyn AlertRuleRepository, id: &str) -> RepositoryResult<AlertRule> {
    let id = id.trim();
    if id.is_empty() {
        return Err(RepositoryError::validation_with_context(
            "missing id",
            ErrorContext::new("get_rule").with_entity("alert_rule"),
        ));
    }
    repo.get_rule(id).await
}

/// Validate and upsert. Returns `true` when an existing rule was replaced.
pub async fn save_rule(repo: &dyn AlertRuleRepository, rule: AlertRule) -> RepositoryResult<bool> {
    validate_rule(&rule)?;
    repo.save_rule(rule).await
}

pub async fn delete_rule(repo: &dyn AlertRuleRepository, id: &str) -> RepositoryResult<bool> {
    let id = id.trim();
    if id.is_empty() {
        return Err(RepositoryError::validation_with_context(
            "missing id",
            ErrorContext::new("delete_rule").with_entity("alert_rule"),
        ));
    }
    repo.delete_rule(id).await
}

/// Concrete source ids an evaluation run may query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertTargets {
    #[serde(default)]
    pub property_id: Option<String>,
    #[serde(default)]
    pub site_url: Option<String>,
    #[serde(default)]
    pub location_id: Option<String>,
}

impl AlertTargets {
    /// The selected source for `provider`, if any.
    pub fn source_for(&self, provider: Provider) -> Option<SourceRef> {
        let id = match provider {
            Provider::Ga4 => &self.property_id,
            Provider::Gsc => &self.site_url,
            Provider::Gbp => &self.location_id,
        };
        id.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| SourceRef::new(provider, s))
    }
}

/// Percentage change from `previous` to `current`; `None` when `previous` is 0.
pub fn percent_change(current: f64, previous: f64) -> Option<f64> {
    (previous != 0.0).then(|| (current - previous) / previous.abs() * 100.0)
}

/// Whether `condition` holds for the given window totals.
///
/// Percentage conditions never fire without a non-zero previous total.
pub fn condition_met(
    condition: AlertCondition,
    threshold: f64,
    current: f64,
    previous: Option<f64>,
) -> bool {
    match condition {
        AlertCondition::Gt => current > threshold,
        AlertCondition::Lt => current < threshold,
        AlertCondition::DropsByPct => previous
            .and_then(|p| percent_change(current, p))
            .is_some_and(|pct| pct <= -threshold),
        AlertCondition::RisesByPct => previous
            .and_then(|p| percent_change(current, p))
            .is_some_and(|pct| pct >= threshold),
    }
}

enum RuleOutcome {
    Triggered,
    Quiet,
    Skipped(String),
}

fn window_total(
    result: FetchResult<TimeSeriesBundle>,
    metric: &str,
) -> Result<f64, String> {
    let bundle = result.map_err(|e| format!("fetch failed: {}", e))?;
    if !bundle.contains(metric) {
        return Err(format!("metric '{}' not reported by source", metric));
    }
    Ok(sum_series(bundle.get(metric)))
}

async fn evaluate_rule<P>(
    provider: &P,
    rule: &AlertRule,
    source: SourceRef,
    end: chrono::NaiveDate,
) -> RuleOutcome
where
    P: MetricSource + ?Sized,
{
    let window = DateRange::trailing(end, rule.window_days);

    let (current, previous) = if rule.condition.needs_previous_window() {
        let previous_window = window.shift_back();
        let (current, previous) = tokio::join!(
            provider.fetch_metric_series(&source, &window),
            provider.fetch_metric_series(&source, &previous_window),
        );
        (current, Some(previous))
    } else {
        (provider.fetch_metric_series(&source, &window).await, None)
    };

    let current = match window_total(current, &rule.metric) {
        Ok(total) => total,
        Err(reason) => return RuleOutcome::Skipped(reason),
    };
    let previous = match previous.map(|p| window_total(p, &rule.metric)).transpose() {
        Ok(total) => total,
        Err(reason) => return RuleOutcome::Skipped(format!("previous window {}", reason)),
    };

    debug!(rule_id = %rule.id, %window, current, ?previous, "evaluated alert window");

    if condition_met(rule.condition, rule.threshold, current, previous) {
        RuleOutcome::Triggered
    } else {
        RuleOutcome::Quiet
    }
}

/// Evaluate every stored rule against windows ending at `range.end`.
///
/// Disabled rules, rules whose source is not among `targets`, and rules whose
/// data could not be fetched are reported in `skipped`; they never fail the run.
#[tracing::instrument(skip(repo, provider, targets), fields(range = %range))]
pub async fn evaluate_rules<P>(
    repo: &dyn AlertRuleRepository,
    provider: &P,
    range: DateRange,
    targets: &AlertTargets,
) -> RepositoryResult<AlertEvaluation>
where
    P: MetricSource + ?Sized,
{
    let rules = list_rules(repo).await?;
    let mut evaluation = AlertEvaluation::default();
    let mut pending = Vec::new();

    for rule in &rules {
        if !rule.enabled {
            evaluation.skipped.push(skipped(rule, "rule disabled"));
            continue;
        }
        match targets.source_for(rule.source) {
            Some(source) => pending.push((rule, source)),
            None => evaluation
                .skipped
                .push(skipped(rule, format!("source {} not selected", rule.source))),
        }
    }

    let end = range.end();
    let outcomes = futures::future::join_all(pending.into_iter().map(|(rule, source)| async move {
        (rule, evaluate_rule(provider, rule, source, end).await)
    }))
    .await;

    for (rule, outcome) in outcomes {
        match outcome {
            RuleOutcome::Triggered => {
                info!(rule_id = %rule.id, name = %rule.name, "alert rule triggered");
                evaluation.triggered.push(rule.id.clone());
            }
            RuleOutcome::Quiet => {}
            RuleOutcome::Skipped(reason) => {
                warn!(rule_id = %rule.id, %reason, "alert rule skipped");
                evaluation.skipped.push(skipped(rule, reason));
            }
        }
    }

    Ok(evaluation)
}

fn skipped(rule: &AlertRule, reason: impl Into<String>) -> SkippedRule {
    SkippedRule {
        rule_id: rule.id.clone(),
        reason: reason.into(),
    }
}

#[cfg(test)]
#[path = "alerts_tests.rs"]
mod alerts_tests;
