//! Rows for the dual-axis SEO snapshot of the primary query's results page.
//!
//! The snapshot shows, for the top of the "we buy houses" results page, how
//! each ranking position's occupant scores on authority and backlinks. It is
//! a pure reshaping step: slice, join against the metrics map, sort.

use rankscope_core::MarketAnalysis;
use serde::Serialize;

/// The query whose results page the snapshot describes.
pub const SNAPSHOT_QUERY: &str = "we buy houses";

const SNAPSHOT_LIMIT: usize = 10;

/// One bar-pair in the snapshot: a ranking position with the occupying
/// domain's authority score and backlink count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotRow {
    pub rank: u32,
    pub authority: f64,
    pub backlinks: u64,
}

/// Builds the snapshot rows for an analysis.
///
/// Takes the first 10 entries of the [`SNAPSHOT_QUERY`] result list in
/// as-received order, joins each domain against `seo_metrics` (absent
/// domains read as zero), and sorts the kept rows ascending by rank. The
/// selection deliberately happens before the sort: the snapshot covers the
/// first ten entries the search API returned, not the ten lowest ranks.
///
/// Never fails: a missing query key yields an empty vector, and every
/// metrics lookup has a zero default. Output length is at most 10 and is
/// non-decreasing by rank (stable for ties).
#[must_use]
pub fn build_snapshot_rows(analysis: &MarketAnalysis) -> Vec<SnapshotRow> {
    let results = analysis
        .search_results
        .get(SNAPSHOT_QUERY)
        .map_or(&[][..], Vec::as_slice);

    let mut rows: Vec<SnapshotRow> = results
        .iter()
        .take(SNAPSHOT_LIMIT)
        .map(|result| {
            let metrics = analysis.seo_metrics.get(&result.domain);
            SnapshotRow {
                rank: result.rank,
                authority: metrics.map_or(0.0, |m| m.authority_score),
                backlinks: metrics.map_or(0, |m| m.backlink_count),
            }
        })
        .collect();

    rows.sort_by_key(|row| row.rank);
    rows
}
