use chrono::NaiveDate;

use super::{
    assemble, compute_insights, keyword_cards, kpi_card, kpi_summary, Computed, InsightOptions,
    InsightSources, KeywordSourceSpec, COVERAGE_CARD_ID, KPI_CARD_ID, MOVERS_CARD_ID,
};
use crate::error::Window;
use crate::models::{
    CardStatus, CoveragePayload, DateRange, InsightCard, KeywordRow, MetricPoint, Movers,
    RankBuckets, Severity, SourceRef, TimeSeriesBundle,
};
use crate::providers::{FetchError, FixtureProvider};
use crate::services::merge::merge_and_total;

const SITE: &str = "sc-domain:example.com";

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn september() -> DateRange {
    DateRange::parse("2025-09-01", "2025-09-28").unwrap()
}

fn kw(day: &str, query: &str, clicks: u64, position: f64) -> KeywordRow {
    KeywordRow {
        date: date(day),
        query: query.to_string(),
        page: Some(format!("/{}", query)),
        country: Some("US".to_string()),
        clicks,
        impressions: clicks * 10,
        ctr: 0.1,
        position,
    }
}

fn fixture_rows() -> Vec<KeywordRow> {
    vec![
        // previous window: 2025-08-04..2025-08-31
        kw("2025-08-10", "a", 8, 12.0),
        kw("2025-08-10", "b", 10, 4.0),
        kw("2025-08-10", "c", 30, 2.0),
        // current window
        kw("2025-09-10", "a", 20, 2.0),
        kw("2025-09-10", "b", 15, 8.0),
    ]
}

fn keyword_sources() -> InsightSources {
    InsightSources {
        keyword_source: Some(KeywordSourceSpec::new(SITE)),
        metric_sources: Vec::new(),
    }
}

fn series(metric: &str, values: &[(&str, f64)]) -> TimeSeriesBundle {
    TimeSeriesBundle::new().with_series(
        metric,
        values.iter().map(|(d, v)| MetricPoint::new(date(d), *v)).collect(),
    )
}

#[test]
fn test_assemble_nothing_selected() {
    assert!(assemble(september(), None, None, None).is_empty());
}

#[test]
fn test_assemble_order_is_fixed() {
    let coverage = CoveragePayload::current_only(RankBuckets::default());
    let items = assemble(
        september(),
        Some(Computed::Complete(coverage)),
        Some(Computed::Complete(Movers::default())),
        Some(Computed::Unavailable("down".to_string())),
    );

    let kinds: Vec<&str> = items.iter().map(InsightCard::kind).collect();
    assert_eq!(kinds, vec!["TOP_COVERAGE", "MOVER", "KPI_SUMMARY"]);

    let ids: Vec<&str> = items.iter().map(InsightCard::id).collect();
    assert_eq!(ids, vec![COVERAGE_CARD_ID, MOVERS_CARD_ID, KPI_CARD_ID]);
    assert!(items.iter().all(|c| c.period() == september()));
}

#[test]
fn test_assemble_complete_coverage_is_info() {
    // A drop in top-10 coverage is still reported as plain information.
    let losing = CoveragePayload::with_previous(
        RankBuckets { top3: 12, top10: 43, top50: 138 },
        RankBuckets { top3: 10, top10: 44, top50: 133 },
    );
    let items = assemble(september(), Some(Computed::Complete(losing)), None, None);
    assert_eq!(items[0].severity(), Severity::Info);
    assert_eq!(items[0].status(), CardStatus::Ok);

    let json = serde_json::to_value(&items[0]).unwrap();
    assert_eq!(json["severity"], "info");
    assert_eq!(json["payload"]["deltaTop3"], 2);
    assert_eq!(json["payload"]["deltaTop10"], -1);
    assert_eq!(json["payload"]["deltaTop50"], 5);
}

#[test]
fn test_assemble_partial_and_unavailable_cards_warn() {
    let payload = CoveragePayload::current_only(RankBuckets { top3: 1, top10: 1, top50: 1 });
    let items = assemble(
        september(),
        Some(Computed::Partial(payload, "previous window unavailable".to_string())),
        Some(Computed::Unavailable("previous window unavailable".to_string())),
        None,
    );

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].status(), CardStatus::Partial);
    assert_eq!(items[0].severity(), Severity::Warn);
    assert_eq!(items[1].status(), CardStatus::Unavailable);
    assert_eq!(items[1].severity(), Severity::Warn);

    match &items[1] {
        InsightCard::Mover(card) => {
            assert!(card.payload.is_none());
            assert_eq!(card.reason.as_deref(), Some("previous window unavailable"));
        }
        other => panic!("unexpected card {:?}", other),
    }
}

#[test]
fn test_card_serializes_with_type_tag() {
    let items = assemble(
        september(),
        Some(Computed::Complete(CoveragePayload::with_previous(
            RankBuckets { top3: 1, top10: 2, top50: 2 },
            RankBuckets { top3: 0, top10: 2, top50: 3 },
        ))),
        None,
        None,
    );
    let json = serde_json::to_value(&items[0]).unwrap();

    assert_eq!(json["type"], "TOP_COVERAGE");
    assert_eq!(json["id"], "coverage");
    assert_eq!(json["status"], "ok");
    assert_eq!(json["severity"], "info");
    assert_eq!(json["period"]["start"], "2025-09-01");
    assert_eq!(json["payload"]["deltaTop3"], 1);
    assert_eq!(json["payload"]["deltaTop50"], -1);
    assert!(json.get("reason").is_none());
}

#[test]
fn test_keyword_cards_previous_window_failed() {
    let current = Ok(vec![kw("2025-09-10", "a", 3, 2.0)]);
    let previous = Err(FetchError::upstream("quota exceeded"));

    let (coverage, movers) = keyword_cards(&current, &previous, &InsightOptions::default());

    match coverage {
        Computed::Partial(payload, reason) => {
            assert_eq!(payload.top3, 1);
            assert_eq!(payload.delta_top3, None);
            assert!(reason.contains("previous window"));
        }
        other => panic!("expected partial coverage, got {:?}", other),
    }
    assert!(matches!(movers, Computed::Unavailable(_)));
}

#[test]
fn test_keyword_cards_current_window_failed() {
    let current = Err(FetchError::Unauthorized("token revoked".to_string()));
    let previous = Ok(vec![kw("2025-08-10", "a", 3, 2.0)]);

    let (coverage, movers) = keyword_cards(&current, &previous, &InsightOptions::default());

    assert!(matches!(coverage, Computed::Unavailable(ref r) if r.contains("current window")));
    assert!(matches!(movers, Computed::Unavailable(_)));
}

#[test]
fn test_kpi_summary_ctr_requires_both_metrics() {
    let merged = merge_and_total(&[series("clicks", &[("2025-09-01", 5.0)])]);
    assert_eq!(kpi_summary(&merged).search_ctr, None);

    let merged = merge_and_total(&[
        series("clicks", &[("2025-09-01", 5.0)]),
        series("impressions", &[("2025-09-01", 50.0), ("2025-09-02", 50.0)]),
    ]);
    let summary = kpi_summary(&merged);
    assert!((summary.search_ctr.unwrap() - 0.05).abs() < 1e-9);
    assert_eq!(summary.kpis.total("impressions"), 100.0);
}

#[test]
fn test_kpi_summary_views_trend() {
    let rising = merge_and_total(&[series(
        "views",
        &[("2025-09-01", 10.0), ("2025-09-02", 3.0), ("2025-09-03", 12.0)],
    )]);
    assert!(kpi_summary(&rising).views_trending_up);

    let flat = merge_and_total(&[series("views", &[("2025-09-01", 10.0), ("2025-09-02", 10.0)])]);
    assert!(!kpi_summary(&flat).views_trending_up);

    let absent = merge_and_total(&[]);
    assert!(!kpi_summary(&absent).views_trending_up);
}

#[test]
fn test_kpi_card_degrades_per_source() {
    let ok = (
        SourceRef::ga4("123"),
        Ok(series("sessions", &[("2025-09-01", 4.0)])),
    );
    let failed = (
        SourceRef::gbp("loc-1"),
        Err(FetchError::upstream_status(503, "unavailable")),
    );

    match kpi_card(&[ok.clone(), failed.clone()]) {
        Computed::Partial(summary, reason) => {
            assert_eq!(summary.kpis.total("sessions"), 4.0);
            assert_eq!(reason, "1 of 2 metric sources failed");
        }
        other => panic!("expected partial, got {:?}", other),
    }

    assert!(matches!(kpi_card(&[failed]), Computed::Unavailable(_)));
    assert!(matches!(kpi_card(&[ok]), Computed::Complete(_)));
}

#[tokio::test]
async fn test_compute_insights_no_sources() {
    let provider = FixtureProvider::new();
    let response = compute_insights(
        &provider,
        september(),
        &InsightSources::default(),
        &InsightOptions::default(),
    )
    .await;

    assert!(response.items.is_empty());
    assert!(response.errors.is_empty());
}

#[tokio::test]
async fn test_compute_insights_keyword_windows() {
    let provider = FixtureProvider::new().with_keyword_rows(SITE, fixture_rows());
    let response = compute_insights(
        &provider,
        september(),
        &keyword_sources(),
        &InsightOptions::default(),
    )
    .await;

    assert!(response.errors.is_empty());
    assert_eq!(response.items.len(), 2);

    match &response.items[0] {
        InsightCard::TopCoverage(card) => {
            let payload = card.payload.unwrap();
            assert_eq!((payload.top3, payload.top10, payload.top50), (1, 2, 2));
            assert_eq!(payload.delta_top3, Some(0));
            assert_eq!(payload.delta_top10, Some(0));
            assert_eq!(payload.delta_top50, Some(-1));
            assert_eq!(card.severity, Severity::Info);
        }
        other => panic!("unexpected card {:?}", other),
    }

    match &response.items[1] {
        InsightCard::Mover(card) => {
            let movers = card.payload.as_ref().unwrap();
            let gainers: Vec<(&str, i64)> = movers
                .top_gainers
                .iter()
                .map(|m| (m.query.as_str(), m.delta))
                .collect();
            let losers: Vec<(&str, i64)> = movers
                .top_losers
                .iter()
                .map(|m| (m.query.as_str(), m.delta))
                .collect();
            assert_eq!(gainers, vec![("a", 12), ("b", 5)]);
            assert_eq!(losers, vec![("c", -30)]);
        }
        other => panic!("unexpected card {:?}", other),
    }
}

#[tokio::test]
async fn test_compute_insights_previous_window_failure_is_partial() {
    let previous = september().shift_back();
    let provider = FixtureProvider::new()
        .with_keyword_rows(SITE, fixture_rows())
        .failing_keywords_for(previous, FetchError::upstream_status(429, "rate limited"));

    let response = compute_insights(
        &provider,
        september(),
        &keyword_sources(),
        &InsightOptions::default(),
    )
    .await;

    assert_eq!(response.errors.len(), 1);
    assert_eq!(response.errors[0].window, Window::Previous);
    assert_eq!(response.errors[0].source, SourceRef::gsc(SITE));

    assert_eq!(response.items[0].status(), CardStatus::Partial);
    assert_eq!(response.items[1].status(), CardStatus::Unavailable);
}

#[tokio::test]
async fn test_compute_insights_metric_sources() {
    let ga4 = SourceRef::ga4("properties/1");
    let gbp = SourceRef::gbp("locations/9");
    let provider = FixtureProvider::new()
        .with_series(ga4.clone(), series("sessions", &[("2025-09-02", 7.0), ("2025-09-03", 3.0)]))
        .failing_source(gbp.clone(), FetchError::Unauthorized("expired".to_string()));

    let sources = InsightSources {
        keyword_source: None,
        metric_sources: vec![ga4, gbp.clone()],
    };
    let response =
        compute_insights(&provider, september(), &sources, &InsightOptions::default()).await;

    assert_eq!(response.items.len(), 1);
    match &response.items[0] {
        InsightCard::KpiSummary(card) => {
            assert_eq!(card.status, CardStatus::Partial);
            assert_eq!(card.payload.as_ref().unwrap().kpis.total("sessions"), 10.0);
        }
        other => panic!("unexpected card {:?}", other),
    }
    assert_eq!(response.errors.len(), 1);
    assert_eq!(response.errors[0].source, gbp);
    assert_eq!(response.errors[0].window, Window::Current);
}
