//! Repository traits and their error type.

pub mod alerts;
pub mod error;

pub use alerts::AlertRuleRepository;
pub use error::{ErrorContext, RepositoryError, RepositoryResult};
