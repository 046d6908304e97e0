use chrono::NaiveDate;

use super::{
    condition_met, delete_rule, evaluate_rules, get_rule, percent_change, save_rule,
    validate_rule, AlertTargets, MAX_WINDOW_DAYS,
};
use crate::db::repository::{AlertRuleRepository, RepositoryError};
use crate::db::LocalRepository;
use crate::models::{
    AlertCondition, AlertRule, DateRange, MetricPoint, Provider, SourceRef, TimeSeriesBundle,
};
use crate::providers::{FetchError, FixtureProvider};

const PROPERTY: &str = "properties/42";

fn rule(id: &str, condition: AlertCondition, threshold: f64) -> AlertRule {
    AlertRule {
        id: id.to_string(),
        name: format!("{} rule", id),
        source: Provider::Ga4,
        metric: "sessions".to_string(),
        condition,
        threshold,
        window_days: 7,
        enabled: true,
    }
}

fn september() -> DateRange {
    DateRange::parse("2025-09-01", "2025-09-28").unwrap()
}

/// 10 sessions/day for 09-15..09-21, then 5/day for 09-22..09-28.
fn halving_sessions() -> TimeSeriesBundle {
    let points = (15..=28)
        .map(|day| {
            let value = if day <= 21 { 10.0 } else { 5.0 };
            MetricPoint::new(NaiveDate::from_ymd_opt(2025, 9, day).unwrap(), value)
        })
        .collect();
    TimeSeriesBundle::new().with_series("sessions", points)
}

fn targets() -> AlertTargets {
    AlertTargets {
        property_id: Some(PROPERTY.to_string()),
        ..Default::default()
    }
}

#[test]
fn test_validate_rule() {
    assert!(validate_rule(&rule("a", AlertCondition::Gt, 1.0)).is_ok());

    let mut blank = rule(" ", AlertCondition::Gt, 1.0);
    assert!(matches!(
        validate_rule(&blank),
        Err(RepositoryError::ValidationError { .. })
    ));

    blank.id = "b".to_string();
    blank.window_days = 0;
    assert!(validate_rule(&blank).is_err());

    let nan = rule("c", AlertCondition::Lt, f64::NAN);
    assert!(validate_rule(&nan).is_err());

    let mut long = rule("d", AlertCondition::Gt, 1.0);
    long.window_days = MAX_WINDOW_DAYS;
    assert!(validate_rule(&long).is_ok());
    long.window_days = u32::MAX;
    let err = validate_rule(&long).unwrap_err();
    assert_eq!(err.message(), "windowDays must be at most 366");
}

#[test]
fn test_percent_change() {
    assert_eq!(percent_change(50.0, 100.0), Some(-50.0));
    assert_eq!(percent_change(150.0, 100.0), Some(50.0));
    assert_eq!(percent_change(10.0, 0.0), None);
}

#[test]
fn test_condition_met() {
    assert!(condition_met(AlertCondition::Gt, 10.0, 11.0, None));
    assert!(!condition_met(AlertCondition::Gt, 10.0, 10.0, None));
    assert!(condition_met(AlertCondition::Lt, 10.0, 9.0, None));

    assert!(condition_met(AlertCondition::DropsByPct, 20.0, 80.0, Some(100.0)));
    assert!(!condition_met(AlertCondition::DropsByPct, 20.0, 81.0, Some(100.0)));
    assert!(condition_met(AlertCondition::RisesByPct, 20.0, 120.0, Some(100.0)));

    // No baseline, no percentage alert.
    assert!(!condition_met(AlertCondition::DropsByPct, 20.0, 0.0, Some(0.0)));
    assert!(!condition_met(AlertCondition::RisesByPct, 20.0, 500.0, None));
}

#[test]
fn test_targets_source_for() {
    let targets = AlertTargets {
        property_id: Some(PROPERTY.to_string()),
        site_url: Some("".to_string()),
        location_id: None,
    };
    assert_eq!(targets.source_for(Provider::Ga4), Some(SourceRef::ga4(PROPERTY)));
    assert_eq!(targets.source_for(Provider::Gsc), None);
    assert_eq!(targets.source_for(Provider::Gbp), None);
}

#[tokio::test]
async fn test_save_rule_validates_before_storing() {
    let repo = LocalRepository::new();
    let err = save_rule(&repo, rule("", AlertCondition::Gt, 1.0))
        .await
        .unwrap_err();
    assert_eq!(err.message(), "missing id");
    assert!(repo.is_empty());

    assert!(!save_rule(&repo, rule("a", AlertCondition::Gt, 1.0)).await.unwrap());
    assert!(save_rule(&repo, rule("a", AlertCondition::Lt, 1.0)).await.unwrap());
    assert_eq!(repo.get_rule("a").await.unwrap().condition, AlertCondition::Lt);
}

#[tokio::test]
async fn test_get_rule() {
    let repo = LocalRepository::with_rules(vec![rule("a", AlertCondition::Gt, 1.0)]);
    assert_eq!(get_rule(&repo, " a ").await.unwrap().id, "a");

    let missing = get_rule(&repo, "b").await.unwrap_err();
    assert!(matches!(missing, RepositoryError::NotFound { .. }));
    assert_eq!(missing.context().entity_id.as_deref(), Some("b"));

    let blank = get_rule(&repo, "").await.unwrap_err();
    assert!(matches!(blank, RepositoryError::ValidationError { .. }));
}

#[tokio::test]
async fn test_delete_rule_requires_id() {
    let repo = LocalRepository::with_rules(vec![rule("a", AlertCondition::Gt, 1.0)]);
    assert!(delete_rule(&repo, "  ").await.is_err());
    assert!(delete_rule(&repo, " a ").await.unwrap());
}

#[tokio::test]
async fn test_evaluate_rules() {
    let mut disabled = rule("disabled", AlertCondition::Gt, 0.0);
    disabled.enabled = false;
    let mut profile = rule("profile-views", AlertCondition::Gt, 0.0);
    profile.source = Provider::Gbp;
    profile.metric = "views".to_string();
    let mut position = rule("position", AlertCondition::Lt, 5.0);
    position.metric = "avgPosition".to_string();

    let repo = LocalRepository::with_rules(vec![
        rule("over-30", AlertCondition::Gt, 30.0),
        rule("under-30", AlertCondition::Lt, 30.0),
        rule("halved", AlertCondition::DropsByPct, 40.0),
        rule("growing", AlertCondition::RisesByPct, 10.0),
        disabled,
        profile,
        position,
    ]);
    let provider = FixtureProvider::new().with_series(SourceRef::ga4(PROPERTY), halving_sessions());

    let evaluation = evaluate_rules(&repo, &provider, september(), &targets())
        .await
        .unwrap();

    assert_eq!(evaluation.triggered, vec!["over-30", "halved"]);

    let skipped: Vec<(&str, &str)> = evaluation
        .skipped
        .iter()
        .map(|s| (s.rule_id.as_str(), s.reason.as_str()))
        .collect();
    assert_eq!(skipped.len(), 3);
    assert!(skipped.contains(&("disabled", "rule disabled")));
    assert!(skipped.contains(&("profile-views", "source GBP not selected")));
    assert!(skipped
        .iter()
        .any(|(id, reason)| *id == "position" && reason.contains("avgPosition")));
}

#[tokio::test]
async fn test_evaluate_rules_zero_baseline_never_fires() {
    let current_only = TimeSeriesBundle::new().with_series(
        "sessions",
        vec![MetricPoint::new(NaiveDate::from_ymd_opt(2025, 9, 25).unwrap(), 99.0)],
    );
    let repo = LocalRepository::with_rules(vec![
        rule("rise", AlertCondition::RisesByPct, 1.0),
        rule("drop", AlertCondition::DropsByPct, 1.0),
    ]);
    let provider = FixtureProvider::new().with_series(SourceRef::ga4(PROPERTY), current_only);

    let evaluation = evaluate_rules(&repo, &provider, september(), &targets())
        .await
        .unwrap();

    assert!(evaluation.triggered.is_empty());
    assert!(evaluation.skipped.is_empty());
}

#[tokio::test]
async fn test_evaluate_rules_fetch_failure_skips() {
    let repo = LocalRepository::with_rules(vec![rule("over", AlertCondition::Gt, 1.0)]);
    let provider = FixtureProvider::new().failing_source(
        SourceRef::ga4(PROPERTY),
        FetchError::Unauthorized("token expired".to_string()),
    );

    let evaluation = evaluate_rules(&repo, &provider, september(), &targets())
        .await
        .unwrap();

    assert!(evaluation.triggered.is_empty());
    assert_eq!(evaluation.skipped.len(), 1);
    assert!(evaluation.skipped[0].reason.starts_with("fetch failed"));
}
