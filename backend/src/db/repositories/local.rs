//! In-memory alert rule store.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use crate::db::repository::{
    AlertRuleRepository, ErrorContext, RepositoryError, RepositoryResult,
};
use crate::models::AlertRule;

/// Process-local repository. Rules live for as long as the instance does.
///
/// Cloning shares the underlying store.
#[derive(Debug, Clone, Default)]
pub struct LocalRepository {
    rules: Arc<RwLock<Vec<AlertRule>>>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-populated with `rules`; later duplicates replace earlier ones.
    pub fn with_rules(rules: impl IntoIterator<Item = AlertRule>) -> Self {
        let repo = Self::new();
        {
            let mut store = repo.rules.write();
            for rule in rules {
                upsert(&mut store, rule);
            }
        }
        repo
    }

    pub fn len(&self) -> usize {
        self.rules.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.read().is_empty()
    }
}

fn upsert(store: &mut Vec<AlertRule>, rule: AlertRule) -> bool {
    match store.iter_mut().find(|r| r.id == rule.id) {
        Some(existing) => {
            *existing = rule;
            true
        }
        None => {
            store.push(rule);
            false
        }
    }
}

#[async_trait]
impl AlertRuleRepository for LocalRepository {
    async fn list_rules(&self) -> RepositoryResult<Vec<AlertRule>> {
        Ok(self.rules.read().clone())
    }

    async fn get_rule(&self, id: &str) -> RepositoryResult<AlertRule> {
        self.rules
            .read()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    format!("alert rule '{}' does not exist", id),
                    ErrorContext::new("get_rule")
                        .with_entity("alert_rule")
                        .with_entity_id(id),
                )
            })
    }

    async fn save_rule(&self, rule: AlertRule) -> RepositoryResult<bool> {
        let id = rule.id.clone();
        let replaced = upsert(&mut self.rules.write(), rule);
        debug!(rule_id = %id, replaced, "saved alert rule");
        Ok(replaced)
    }

    async fn delete_rule(&self, id: &str) -> RepositoryResult<bool> {
        let mut store = self.rules.write();
        let before = store.len();
        store.retain(|r| r.id != id);
        let removed = store.len() != before;
        debug!(rule_id = %id, removed, "deleted alert rule");
        Ok(removed)
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AlertCondition, Provider};

    fn rule(id: &str, threshold: f64) -> AlertRule {
        AlertRule {
            id: id.to_string(),
            name: format!("rule {}", id),
            source: Provider::Ga4,
            metric: "sessions".to_string(),
            condition: AlertCondition::Gt,
            threshold,
            window_days: 7,
            enabled: true,
        }
    }

    #[tokio::test]
    async fn test_save_inserts_then_replaces_in_place() {
        let repo = LocalRepository::new();
        assert!(!repo.save_rule(rule("a", 1.0)).await.unwrap());
        assert!(!repo.save_rule(rule("b", 2.0)).await.unwrap());
        assert!(repo.save_rule(rule("a", 9.0)).await.unwrap());

        let rules = repo.list_rules().await.unwrap();
        let ids: Vec<&str> = rules.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(rules[0].threshold, 9.0);
    }

    #[tokio::test]
    async fn test_get_missing_rule() {
        let repo = LocalRepository::new();
        let err = repo.get_rule("nope").await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
        assert_eq!(err.context().entity_id.as_deref(), Some("nope"));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let repo = LocalRepository::with_rules(vec![rule("a", 1.0)]);
        assert!(repo.delete_rule("a").await.unwrap());
        assert!(!repo.delete_rule("a").await.unwrap());
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_clones_share_store() {
        let repo = LocalRepository::new();
        let other = repo.clone();
        other.save_rule(rule("a", 1.0)).await.unwrap();
        assert_eq!(repo.len(), 1);
    }
}
