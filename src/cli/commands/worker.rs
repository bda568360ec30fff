use std::sync::Arc;

use crate::cli::config::{build_orchestrator, load_config};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::lifecycle::worker::start_cleanup_worker;

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config()?;

    if !config.worker.enabled {
        return output_success(
            &output_format,
            "Cleanup worker is disabled (set LIFECYCLE_WORKER_ENABLED=true to enable)",
            None,
        );
    }

    let orchestrator = Arc::new(build_orchestrator(&config, false).await?);

    tokio::select! {
        _ = start_cleanup_worker(orchestrator, config.worker.clone()) => {}
        signal = tokio::signal::ctrl_c() => {
            signal?;
            tracing::info!("Received shutdown signal, stopping cleanup worker");
        }
    }

    Ok(())
}
