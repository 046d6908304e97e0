//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::repository::AlertRuleRepository;
use crate::providers::DataProvider;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Upstream rows and series
    pub provider: Arc<dyn DataProvider>,
    /// Alert rule storage
    pub repository: Arc<dyn AlertRuleRepository>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        provider: Arc<dyn DataProvider>,
        repository: Arc<dyn AlertRuleRepository>,
        config: AppConfig,
    ) -> Self {
        Self {
            provider,
            repository,
            config: Arc::new(config),
        }
    }
}
