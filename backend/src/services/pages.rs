//! Per-page roll-up of Search Console keyword rows.

use std::collections::BTreeMap;

use tracing::debug;

use crate::models::{DateRange, KeywordRow, PagePoint};
use crate::providers::{FetchResult, KeywordSource};

/// Page label used for rows that carry no page.
pub const NO_PAGE: &str = "(none)";

#[derive(Default)]
struct PageAccumulator {
    clicks: u64,
    impressions: u64,
    ctr_sum: f64,
    position_sum: f64,
    rows: u32,
}

/// Group rows by page, summing clicks and impressions and averaging ctr and
/// position over the rows. Sorted by clicks descending, then page ascending.
pub fn page_points(rows: &[KeywordRow]) -> Vec<PagePoint> {
    let mut pages: BTreeMap<&str, PageAccumulator> = BTreeMap::new();

    for row in rows {
        let acc = pages.entry(row.page.as_deref().unwrap_or(NO_PAGE)).or_default();
        acc.clicks += row.clicks;
        acc.impressions += row.impressions;
        acc.ctr_sum += row.ctr;
        acc.position_sum += row.position;
        acc.rows += 1;
    }

    let mut points: Vec<PagePoint> = pages
        .into_iter()
        .map(|(page, acc)| {
            let n = f64::from(acc.rows.max(1));
            PagePoint {
                page: page.to_string(),
                clicks: acc.clicks,
                impressions: acc.impressions,
                ctr: acc.ctr_sum / n,
                position: acc.position_sum / n,
            }
        })
        .collect();

    // BTreeMap already yields pages ascending, so a stable sort on clicks is enough.
    points.sort_by(|a, b| b.clicks.cmp(&a.clicks));
    points
}

/// Fetch one site's rows for `range` and roll them up by page.
#[tracing::instrument(skip(provider), fields(range = %range))]
pub async fn keyword_pages<P>(
    provider: &P,
    site_url: &str,
    range: &DateRange,
    country: Option<&str>,
) -> FetchResult<Vec<PagePoint>>
where
    P: KeywordSource + ?Sized,
{
    let rows = provider.fetch_keyword_rows(site_url, range, country).await?;
    let points = page_points(&rows);
    debug!(rows = rows.len(), pages = points.len(), "aggregated keyword pages");
    Ok(points)
}
