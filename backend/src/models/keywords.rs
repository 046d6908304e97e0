//! Search Console keyword rows and the aggregates derived from them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Country sentinel meaning "no country filter / not broken down by country".
pub const ALL_COUNTRIES: &str = "ALL";

/// One search-analytics row: a query's performance on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordRow {
    pub date: NaiveDate,
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub clicks: u64,
    pub impressions: u64,
    /// Click-through rate in `[0, 1]`.
    pub ctr: f64,
    /// Average search rank, 1 is best.
    pub position: f64,
}

impl KeywordRow {
    /// Identity of one logical ranking record across days: `(query, page, country)`.
    ///
    /// An absent page is the empty page; an absent country is [`ALL_COUNTRIES`].
    pub fn coverage_key(&self) -> (&str, &str, &str) {
        (
            &self.query,
            self.page.as_deref().unwrap_or(""),
            self.country.as_deref().unwrap_or(ALL_COUNTRIES),
        )
    }
}

/// Cumulative rank tiers: `top3 <= top10 <= top50` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankBuckets {
    pub top3: u32,
    pub top10: u32,
    pub top50: u32,
}

/// Signed click-count change of a query between two windows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoverEntry {
    pub query: String,
    pub delta: i64,
}

impl MoverEntry {
    pub fn new(query: impl Into<String>, delta: i64) -> Self {
        Self {
            query: query.into(),
            delta,
        }
    }
}

/// Largest gains and losses, each capped and sorted by `|delta|` descending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movers {
    pub top_gainers: Vec<MoverEntry>,
    pub top_losers: Vec<MoverEntry>,
}

/// Per-page roll-up of keyword rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagePoint {
    pub page: String,
    pub clicks: u64,
    pub impressions: u64,
    pub ctr: f64,
    pub position: f64,
}
