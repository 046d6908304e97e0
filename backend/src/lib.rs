//! # vsight insights
//!
//! Aggregation and comparison engine behind the vsight marketing dashboard.
//!
//! Given per-day series from Google Analytics 4, Search Console and Business
//! Profile, plus Search Console keyword rows, the crate merges them into one
//! KPI view and turns a current window versus the equally long window before
//! it into insight cards: rank coverage, biggest click movers and headline
//! KPIs. Threshold alert rules are evaluated against the same data.
//!
//! ## Architecture
//!
//! - [`models`]: dates, series, keyword rows, cards and alert rules
//! - [`providers`]: the upstream data seam ([`providers::KeywordSource`],
//!   [`providers::MetricSource`]) with synthetic and fixture implementations
//! - [`services`]: merging, coverage, movers, card assembly, alert evaluation
//! - [`db`]: alert rule repository pattern
//! - [`config`]: TOML configuration with environment overrides
//! - [`http`]: Axum-based REST API (feature `http-server`)
//!
//! Upstream failures degrade the affected cards to `partial` or
//! `unavailable` and are reported per source; only an invalid date range
//! rejects a request.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod providers;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;

pub use error::{InsightError, InsightResult};
