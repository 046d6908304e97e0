//! Repository factory for dependency injection.
//!
//! The server builds its repository once at startup and hands the `Arc` to
//! the HTTP state; nothing reaches for a global instance.

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::repositories::LocalRepository;
use super::repository::{AlertRuleRepository, RepositoryError, RepositoryResult};
use crate::config::RepositorySettings;

/// Repository type configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepositoryType {
    /// In-memory local repository
    #[default]
    Local,
}

impl FromStr for RepositoryType {
    type Err = RepositoryError;

    /// Parse repository type from string ("local", "memory").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" | "memory" => Ok(Self::Local),
            _ => Err(RepositoryError::configuration(format!(
                "Unknown repository type: {}",
                s
            ))),
        }
    }
}

/// Repository factory for creating repository instances.
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository instance based on type.
    pub fn create(repo_type: RepositoryType) -> RepositoryResult<Arc<dyn AlertRuleRepository>> {
        match repo_type {
            RepositoryType::Local => Ok(Self::create_local()),
        }
    }

    /// Create an in-memory local repository.
    pub fn create_local() -> Arc<dyn AlertRuleRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Create the repository named by the `[repository]` config section.
    pub fn from_settings(
        settings: &RepositorySettings,
    ) -> RepositoryResult<Arc<dyn AlertRuleRepository>> {
        tracing::info!(repository = ?settings.repo_type, "creating alert rule repository");
        Self::create(settings.repo_type)
    }
}
