//! HTTP server module.
//!
//! An axum REST API over the service layer.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Request parsing and validation                         │
//! │  - Role and cron-secret guards                            │
//! │  - CORS, compression, error handling                      │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service Layer (services/)                                │
//! │  - Insight cards, dashboard totals, alert evaluation      │
//! └─────────┬─────────────────────────────────┬──────────────┘
//!           │                                 │
//! ┌─────────▼──────────────────┐   ┌──────────▼───────────────┐
//! │  Providers (providers/)    │   │  Repository (db/)         │
//! │  - upstream rows & series  │   │  - alert rules            │
//! └────────────────────────────┘   └──────────────────────────┘
//! ```

pub mod auth;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
