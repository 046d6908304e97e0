//! Storage interface for alert rules.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::AlertRule;

/// Repository trait for alert rule persistence.
///
/// Implementations must be `Send + Sync` so one instance can be shared by
/// every request handler.
#[async_trait]
pub trait AlertRuleRepository: Send + Sync {
    /// All stored rules, in insertion order.
    async fn list_rules(&self) -> RepositoryResult<Vec<AlertRule>>;

    /// Fetch one rule.
    ///
    /// # Errors
    /// `RepositoryError::NotFound` when no rule has this id.
    async fn get_rule(&self, id: &str) -> RepositoryResult<AlertRule>;

    /// Insert, or replace the rule with the same id in place.
    ///
    /// # Returns
    /// `true` when an existing rule was replaced.
    async fn save_rule(&self, rule: AlertRule) -> RepositoryResult<bool>;

    /// Remove a rule. Deleting an unknown id is not an error.
    ///
    /// # Returns
    /// `true` when a rule was removed.
    async fn delete_rule(&self, id: &str) -> RepositoryResult<bool>;

    /// Check that the backing store is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;
}
