//! Service layer: aggregation, comparison and insight assembly.
//!
//! The pure modules (`merge`, `coverage`, `movers`, `pages`) work on rows
//! already in memory. The orchestrators (`insights`, `dashboard`, `alerts`)
//! fetch through the provider traits and degrade per source on failure.

pub mod alerts;
pub mod coverage;
pub mod dashboard;
pub mod insights;
pub mod merge;
pub mod movers;
pub mod pages;

pub use alerts::{evaluate_rules, AlertTargets};
pub use coverage::{coverage, coverage_report, CoveragePolicy};
pub use dashboard::{dashboard, DashboardResponse, DashboardSources};
pub use insights::{assemble, compute_insights, InsightOptions, InsightSources, KeywordSourceSpec};
pub use merge::{merge, merge_and_total, totals, MergedTotals};
pub use movers::{movers, DEFAULT_MOVER_LIMIT};
pub use pages::{keyword_pages, page_points};
