use serde_json::json;
use uuid::Uuid;

use crate::cli::config::{build_orchestrator, load_config};
use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;

pub async fn handle(workspace: Uuid, output_format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config()?;
    let orchestrator = build_orchestrator(&config, false).await?;

    let report = orchestrator.reset_warning(workspace).await?;

    if !report.is_complete() {
        output_error(
            &output_format,
            &format!(
                "Cleared {} warning flags for workspace '{}', {} could not be removed",
                report.succeeded.len(),
                workspace,
                report.failed.len()
            ),
            Some("PARTIAL_RESET"),
        )?;
        anyhow::bail!("partial reset of workspace {}", workspace);
    }

    output_success(
        &output_format,
        &format!("Cleared deletion warning for workspace '{}'", workspace),
        Some(json!({ "workspace": workspace, "members_cleared": report.succeeded.len() })),
    )
}
