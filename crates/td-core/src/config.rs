//! Configuration types and parsing for taskdb.yml

use crate::error::{CoreError, CoreResult};
use crate::seed::SeedList;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable overriding the database path.
pub const DATABASE_PATH_ENV: &str = "TASKDB_PATH";

/// Path value selecting a transient in-memory store.
pub const MEMORY_PATH: &str = ":memory:";

/// Main configuration from taskdb.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Database location and connection settings
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Default list inserted into a fresh store
    #[serde(default)]
    pub seed: SeedList,
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Path to the SQLite file, or `:memory:`
    #[serde(default = "default_db_path")]
    pub path: String,

    /// How long a writer waits on a locked database before failing
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

fn default_db_path() -> String {
    "tasks.db".to_string()
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl DatabaseConfig {
    /// Returns true if the configured path selects an in-memory store
    pub fn is_memory(&self) -> bool {
        self.path == MEMORY_PATH
    }
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a directory
    /// Looks for taskdb.yml or taskdb.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("taskdb.yml");
        let yaml_path = dir.join("taskdb.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.database.path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "database.path cannot be empty".to_string(),
            });
        }
        if self.seed.account_type.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "seed.account_type cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Resolve the database path from a CLI flag, the TASKDB_PATH environment
    /// variable, or the configured path.
    ///
    /// Priority: CLI flag > TASKDB_PATH env var > config
    pub fn resolve_database_path(&self, cli_path: Option<&str>) -> String {
        cli_path
            .map(String::from)
            .or_else(|| std::env::var(DATABASE_PATH_ENV).ok())
            .unwrap_or_else(|| self.database.path.clone())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
