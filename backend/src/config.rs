//! Application configuration.
//!
//! Settings come from a TOML file (all sections optional) with environment
//! variables layered on top:
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [repository]
//! type = "local"
//!
//! [insights]
//! mover_limit = 10
//! coverage_policy = "latest_by_date"
//! default_country = "ALL"
//! max_range_days = 1096
//!
//! [provider]
//! salt = "demo"
//!
//! [jobs]
//! cron_secret = "change-me"
//! ```
//!
//! Recognised overrides: `VSIGHT_CONFIG` (file path), `HOST`, `PORT`,
//! `REPOSITORY_TYPE`, `CRON_SECRET`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::db::RepositoryType;
use crate::models::ALL_COUNTRIES;
use crate::services::coverage::CoveragePolicy;
use crate::services::insights::InsightOptions;
use crate::services::movers::DEFAULT_MOVER_LIMIT;

/// File names searched by [`AppConfig::from_default_location`], in order.
pub const DEFAULT_CONFIG_PATHS: [&str; 3] = ["vsight.toml", "backend/vsight.toml", "../vsight.toml"];

/// Three years of days.
pub const DEFAULT_MAX_RANGE_DAYS: u32 = 1096;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub repository: RepositorySettings,
    pub insights: InsightSettings,
    pub provider: ProviderSettings,
    pub jobs: JobSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositorySettings {
    #[serde(rename = "type")]
    pub repo_type: RepositoryType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightSettings {
    /// Entries kept per side of the movers card.
    pub mover_limit: usize,
    pub coverage_policy: CoveragePolicy,
    /// Country filter applied when a request does not name one.
    pub default_country: String,
    /// Longest `start..end` an API request may ask for.
    pub max_range_days: u32,
}

impl Default for InsightSettings {
    fn default() -> Self {
        Self {
            mover_limit: DEFAULT_MOVER_LIMIT,
            coverage_policy: CoveragePolicy::default(),
            default_country: ALL_COUNTRIES.to_string(),
            max_range_days: DEFAULT_MAX_RANGE_DAYS,
        }
    }
}

impl InsightSettings {
    pub fn options(&self) -> InsightOptions {
        InsightOptions {
            mover_limit: self.mover_limit,
            coverage_policy: self.coverage_policy,
        }
    }
}

/// Seed for the synthetic data provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub salt: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobSettings {
    /// Bearer secret for the cron trigger; the endpoint refuses every call while unset.
    pub cron_secret: Option<String>,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// First file found in [`DEFAULT_CONFIG_PATHS`], or `None` if there is none.
    pub fn from_default_location() -> Result<Option<Self>, ConfigError> {
        for candidate in DEFAULT_CONFIG_PATHS {
            let path = PathBuf::from(candidate);
            if path.exists() {
                return Self::from_file(&path).map(Some);
            }
        }
        Ok(None)
    }

    /// File (from `VSIGHT_CONFIG` or the default locations, else built-in
    /// defaults) with process environment overrides applied.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("VSIGHT_CONFIG") {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim())?,
            _ => Self::from_default_location()?.unwrap_or_default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        info!(
            host = %config.server.host,
            port = config.server.port,
            repository = ?config.repository.repo_type,
            cron_enabled = config.jobs.cron_secret.is_some(),
            "configuration loaded"
        );
        Ok(config)
    }

    /// Apply `HOST`, `PORT`, `REPOSITORY_TYPE` and `CRON_SECRET` from `lookup`.
    /// Blank values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(host) = get("HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("PORT") {
            self.server.port = port.parse().map_err(|e| ConfigError::Invalid {
                key: "PORT",
                message: format!("{}: {}", port, e),
            })?;
        }
        if let Some(repo_type) = get("REPOSITORY_TYPE") {
            self.repository.repo_type = repo_type.parse().map_err(|e: crate::db::RepositoryError| {
                ConfigError::Invalid {
                    key: "REPOSITORY_TYPE",
                    message: e.message().to_string(),
                }
            })?;
        }
        if let Some(secret) = get("CRON_SECRET") {
            self.jobs.cron_secret = Some(secret);
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
