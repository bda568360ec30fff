use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleConfig {
    pub environment: Environment,
    pub policy: CleanupPolicy,
    pub worker: WorkerConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

/// Thresholds and limits for one cleanup run.
/// Handed to the orchestrator by value; never read from global state there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupPolicy {
    pub days_before_warning: i64,
    pub days_before_deletion: i64,
    pub max_deletions_per_run: usize,
    pub workspace_chunk_size: usize,
    pub member_chunk_size: usize,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    pub enabled: bool,
    pub interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("days_before_warning ({warn}) must be less than days_before_deletion ({delete})")]
    InvalidThresholds { warn: i64, delete: i64 },

    #[error("{0} must not be negative, got {1}")]
    NegativeThreshold(&'static str, i64),

    #[error("{0} must be at least 1")]
    ZeroChunkSize(&'static str),

    #[error("worker interval must be at least 1 second")]
    ZeroInterval,
}

pub const DEFAULT_CHUNK_SIZE: usize = 5;

impl CleanupPolicy {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.days_before_warning < 0 {
            return Err(ConfigError::NegativeThreshold("days_before_warning", self.days_before_warning));
        }
        if self.days_before_warning >= self.days_before_deletion {
            return Err(ConfigError::InvalidThresholds {
                warn: self.days_before_warning,
                delete: self.days_before_deletion,
            });
        }
        if self.workspace_chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize("workspace_chunk_size"));
        }
        if self.member_chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize("member_chunk_size"));
        }
        Ok(())
    }

    /// Days left before a workspace at `inactive_days` crosses the deletion threshold
    pub fn days_until_deletion(&self, inactive_days: i64) -> i64 {
        (self.days_before_deletion + 1 - inactive_days).max(0)
    }
}

impl WorkerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl LifecycleConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.policy.validate()?;
        if self.worker.enabled && self.worker.interval_secs == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }

    fn with_env_overrides(mut self) -> Self {
        // Policy overrides
        if let Ok(v) = env::var("LIFECYCLE_DAYS_BEFORE_WARNING") {
            self.policy.days_before_warning = v.parse().unwrap_or(self.policy.days_before_warning);
        }
        if let Ok(v) = env::var("LIFECYCLE_DAYS_BEFORE_DELETION") {
            self.policy.days_before_deletion = v.parse().unwrap_or(self.policy.days_before_deletion);
        }
        if let Ok(v) = env::var("LIFECYCLE_MAX_DELETIONS_PER_RUN") {
            self.policy.max_deletions_per_run = v.parse().unwrap_or(self.policy.max_deletions_per_run);
        }
        if let Ok(v) = env::var("LIFECYCLE_WORKSPACE_CHUNK_SIZE") {
            self.policy.workspace_chunk_size = v.parse().unwrap_or(self.policy.workspace_chunk_size);
        }
        if let Ok(v) = env::var("LIFECYCLE_MEMBER_CHUNK_SIZE") {
            self.policy.member_chunk_size = v.parse().unwrap_or(self.policy.member_chunk_size);
        }
        if let Ok(v) = env::var("LIFECYCLE_DRY_RUN") {
            self.policy.dry_run = v.parse().unwrap_or(self.policy.dry_run);
        }

        // Worker overrides
        if let Ok(v) = env::var("LIFECYCLE_WORKER_ENABLED") {
            self.worker.enabled = v.parse().unwrap_or(self.worker.enabled);
        }
        if let Ok(v) = env::var("LIFECYCLE_INTERVAL_SECS") {
            self.worker.interval_secs = v.parse().unwrap_or(self.worker.interval_secs);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            policy: CleanupPolicy {
                days_before_warning: 7,
                days_before_deletion: 14,
                max_deletions_per_run: 5,
                workspace_chunk_size: DEFAULT_CHUNK_SIZE,
                member_chunk_size: DEFAULT_CHUNK_SIZE,
                dry_run: true,
            },
            worker: WorkerConfig {
                enabled: false,
                interval_secs: 60 * 60,
            },
            database: DatabaseConfig {
                max_connections: 5,
                connection_timeout: 30,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            policy: CleanupPolicy {
                days_before_warning: 15,
                days_before_deletion: 30,
                max_deletions_per_run: 10,
                workspace_chunk_size: DEFAULT_CHUNK_SIZE,
                member_chunk_size: DEFAULT_CHUNK_SIZE,
                dry_run: true,
            },
            worker: WorkerConfig {
                enabled: true,
                interval_secs: 6 * 60 * 60,
            },
            database: DatabaseConfig {
                max_connections: 10,
                connection_timeout: 10,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            policy: CleanupPolicy {
                days_before_warning: 7,
                days_before_deletion: 14,
                max_deletions_per_run: 5,
                workspace_chunk_size: DEFAULT_CHUNK_SIZE,
                member_chunk_size: DEFAULT_CHUNK_SIZE,
                dry_run: false,
            },
            worker: WorkerConfig {
                enabled: true,
                interval_secs: 24 * 60 * 60,
            },
            database: DatabaseConfig {
                max_connections: 10,
                connection_timeout: 5,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<LifecycleConfig> = Lazy::new(LifecycleConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static LifecycleConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> CleanupPolicy {
        LifecycleConfig::production().policy
    }

    #[test]
    fn test_default_development_config() {
        let config = LifecycleConfig::development();
        assert!(config.policy.dry_run);
        assert!(!config.worker.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_production_config() {
        let config = LifecycleConfig::production();
        assert!(!config.policy.dry_run);
        assert_eq!(config.policy.workspace_chunk_size, 5);
        assert_eq!(config.policy.member_chunk_size, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn presets_are_all_valid() {
        assert!(LifecycleConfig::staging().validate().is_ok());
    }

    #[test]
    fn rejects_warning_at_or_after_deletion() {
        let mut p = policy();
        p.days_before_warning = p.days_before_deletion;
        assert_eq!(
            p.validate(),
            Err(ConfigError::InvalidThresholds {
                warn: p.days_before_deletion,
                delete: p.days_before_deletion
            })
        );
    }

    #[test]
    fn rejects_zero_chunk_sizes() {
        let mut p = policy();
        p.member_chunk_size = 0;
        assert_eq!(p.validate(), Err(ConfigError::ZeroChunkSize("member_chunk_size")));

        let mut p = policy();
        p.workspace_chunk_size = 0;
        assert_eq!(p.validate(), Err(ConfigError::ZeroChunkSize("workspace_chunk_size")));
    }

    #[test]
    fn zero_deletion_cap_is_allowed() {
        let mut p = policy();
        p.max_deletions_per_run = 0;
        assert!(p.validate().is_ok());
    }

    #[test]
    fn days_until_deletion_counts_to_first_deleting_day() {
        let p = CleanupPolicy {
            days_before_warning: 15,
            days_before_deletion: 30,
            ..policy()
        };
        assert_eq!(p.days_until_deletion(20), 11);
        assert_eq!(p.days_until_deletion(30), 1);
        assert_eq!(p.days_until_deletion(45), 0);
    }
}
