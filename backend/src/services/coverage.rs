//! Rank coverage: how many keyword rankings sit in the top 3 / 10 / 50.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{CoveragePayload, KeywordRow, RankBuckets};

pub const TOP3_POSITION: f64 = 3.0;
pub const TOP10_POSITION: f64 = 10.0;
pub const TOP50_POSITION: f64 = 50.0;

/// Which row represents a `(query, page, country)` key when it spans several days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoveragePolicy {
    /// Most recent date wins. Rows sharing a date keep input order, so the
    /// last of them wins.
    #[default]
    LatestByDate,
    /// Last row in upstream response order wins, whatever its date.
    LastSeen,
}

impl std::str::FromStr for CoveragePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "latest_by_date" | "latest" => Ok(Self::LatestByDate),
            "last_seen" | "legacy" => Ok(Self::LastSeen),
            _ => Err(format!("Unknown coverage policy: {}", s)),
        }
    }
}

/// One representative row per coverage key.
pub fn representatives(rows: &[KeywordRow], policy: CoveragePolicy) -> Vec<&KeywordRow> {
    let mut ordered: Vec<&KeywordRow> = rows.iter().collect();
    if policy == CoveragePolicy::LatestByDate {
        // stable: equal dates keep their relative order
        ordered.sort_by_key(|row| row.date);
    }

    let mut latest: HashMap<(&str, &str, &str), &KeywordRow> =
        HashMap::with_capacity(ordered.len());
    for row in ordered {
        latest.insert(row.coverage_key(), row);
    }
    latest.into_values().collect()
}

/// Count representative rows per cumulative rank tier.
pub fn coverage(rows: &[KeywordRow], policy: CoveragePolicy) -> RankBuckets {
    let reps = representatives(rows, policy);
    let mut buckets = RankBuckets::default();
    for row in &reps {
        if row.position <= TOP50_POSITION {
            buckets.top50 += 1;
        }
        if row.position <= TOP10_POSITION {
            buckets.top10 += 1;
        }
        if row.position <= TOP3_POSITION {
            buckets.top3 += 1;
        }
    }

    debug!(
        rows = rows.len(),
        keys = reps.len(),
        top3 = buckets.top3,
        top10 = buckets.top10,
        top50 = buckets.top50,
        "computed rank coverage"
    );
    buckets
}

/// Coverage for the current window, with deltas when the previous window is known.
pub fn coverage_report(
    current: &[KeywordRow],
    previous: Option<&[KeywordRow]>,
    policy: CoveragePolicy,
) -> CoveragePayload {
    let now = coverage(current, policy);
    match previous {
        Some(prev) => CoveragePayload::with_previous(now, coverage(prev, policy)),
        None => CoveragePayload::current_only(now),
    }
}

#[cfg(test)]
#[path = "coverage_tests.rs"]
mod coverage_tests;
