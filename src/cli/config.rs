// Shared bootstrap for commands: validated configuration and wired orchestrator

use std::sync::Arc;

use anyhow::Context;
use sqlx::PgPool;

use crate::config::{config, LifecycleConfig};
use crate::database::manager::DatabaseManager;
use crate::lifecycle::notifier::LoggingNotifier;
use crate::lifecycle::orchestrator::CleanupOrchestrator;
use crate::services::postgres_collaborators;

/// Process configuration, validated
pub fn load_config() -> anyhow::Result<LifecycleConfig> {
    let config = config().clone();
    config.validate().context("invalid lifecycle configuration")?;
    Ok(config)
}

pub async fn connect(config: &LifecycleConfig) -> anyhow::Result<PgPool> {
    DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")
}

/// Build an orchestrator over Postgres; `force_dry_run` only ever turns dry run on
pub async fn build_orchestrator(
    config: &LifecycleConfig,
    force_dry_run: bool,
) -> anyhow::Result<CleanupOrchestrator> {
    let pool = connect(config).await?;

    let mut policy = config.policy.clone();
    policy.dry_run |= force_dry_run;

    let collaborators = postgres_collaborators(pool, Arc::new(LoggingNotifier));
    Ok(CleanupOrchestrator::new(collaborators, policy))
}
