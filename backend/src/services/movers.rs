//! Click movers: which queries gained or lost the most clicks between windows.

use std::collections::HashMap;

use tracing::debug;

use crate::models::{KeywordRow, MoverEntry, Movers};

pub const DEFAULT_MOVER_LIMIT: usize = 10;

/// Clicks summed per query, in order of each query's first appearance.
///
/// Grouping is by query alone, unlike coverage which also splits by page
/// and country.
pub fn clicks_by_query(rows: &[KeywordRow]) -> Vec<(&str, u64)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<(&str, u64)> = Vec::new();
    for row in rows {
        match index.get(row.query.as_str()) {
            Some(&i) => totals[i].1 += row.clicks,
            None => {
                index.insert(row.query.as_str(), totals.len());
                totals.push((row.query.as_str(), row.clicks));
            }
        }
    }
    totals
}

/// Non-zero click deltas, sorted by `|delta|` descending.
///
/// Queries seen only in `previous` count as a full loss. Ties keep
/// first-appearance order: current-window queries first, then vanished ones.
pub fn click_deltas(current: &[KeywordRow], previous: &[KeywordRow]) -> Vec<MoverEntry> {
    let current_clicks = clicks_by_query(current);
    let previous_clicks = clicks_by_query(previous);
    let previous_map: HashMap<&str, u64> = previous_clicks.iter().copied().collect();
    let current_map: HashMap<&str, u64> = current_clicks.iter().copied().collect();

    let mut deltas: Vec<MoverEntry> = current_clicks
        .iter()
        .filter_map(|(query, clicks)| {
            let before = previous_map.get(query).copied().unwrap_or(0);
            let delta = signed(*clicks) - signed(before);
            (delta != 0).then(|| MoverEntry::new(*query, delta))
        })
        .collect();

    deltas.extend(
        previous_clicks
            .iter()
            .filter(|(query, clicks)| !current_map.contains_key(query) && *clicks > 0)
            .map(|(query, clicks)| MoverEntry::new(*query, -signed(*clicks))),
    );

    deltas.sort_by_key(|entry| std::cmp::Reverse(entry.delta.unsigned_abs()));
    deltas
}

/// Top gainers and losers, each at most `limit` long.
///
/// The list is ordered by magnitude first and partitioned second: each side
/// takes its first `limit` entries from the globally sorted list.
pub fn movers(current: &[KeywordRow], previous: &[KeywordRow], limit: usize) -> Movers {
    let deltas = click_deltas(current, previous);

    let top_gainers: Vec<MoverEntry> = deltas
        .iter()
        .filter(|e| e.delta > 0)
        .take(limit)
        .cloned()
        .collect();
    let top_losers: Vec<MoverEntry> = deltas
        .iter()
        .filter(|e| e.delta < 0)
        .take(limit)
        .cloned()
        .collect();

    debug!(
        queries = deltas.len(),
        gainers = top_gainers.len(),
        losers = top_losers.len(),
        "computed click movers"
    );

    Movers {
        top_gainers,
        top_losers,
    }
}

fn signed(clicks: u64) -> i64 {
    i64::try_from(clicks).unwrap_or(i64::MAX)
}

#[cfg(test)]
#[path = "movers_tests.rs"]
mod movers_tests;
