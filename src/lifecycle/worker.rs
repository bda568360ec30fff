//! Periodic driver for the cleanup orchestrator.
//!
//! Each pass is awaited before the next sleep, so passes never overlap.

use std::sync::Arc;

use crate::config::WorkerConfig;
use crate::lifecycle::orchestrator::CleanupOrchestrator;

/// Starts the cleanup worker loop.
///
/// Runs until the task is cancelled. Returns immediately when disabled.
pub async fn start_cleanup_worker(orchestrator: Arc<CleanupOrchestrator>, config: WorkerConfig) {
    if !config.enabled {
        tracing::info!("Workspace cleanup worker disabled by configuration");
        return;
    }

    tracing::info!(
        interval_secs = config.interval_secs,
        dry_run = orchestrator.policy().dry_run,
        "Starting workspace cleanup worker"
    );

    let interval = config.interval();

    loop {
        run_pass(&orchestrator).await;
        tokio::time::sleep(interval).await;
    }
}

/// One logged pass; errors are reported and swallowed so the loop keeps going
async fn run_pass(orchestrator: &CleanupOrchestrator) -> bool {
    match orchestrator.run().await {
        Ok(result) => {
            if !result.has_changes() {
                tracing::debug!("Workspace cleanup run complete, nothing to warn or delete");
            }
            true
        }
        Err(e) => {
            tracing::error!(error = %e, "Error running workspace cleanup");
            false
        }
    }
}
