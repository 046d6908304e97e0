//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        .route("/insights/compute", post(handlers::compute_insights))
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/keywords/pages", get(handlers::get_keyword_pages))
        .route(
            "/alerts/rules",
            get(handlers::list_alert_rules)
                .post(handlers::save_alert_rule)
                .delete(handlers::delete_alert_rule),
        )
        .route("/alerts/rules/{id}", get(handlers::get_alert_rule))
        .route("/alerts/trigger", post(handlers::trigger_alerts));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
