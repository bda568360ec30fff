use uuid::Uuid;

use crate::cli::config::{build_orchestrator, load_config};
use crate::cli::utils::{output_item, print_rows};
use crate::cli::OutputFormat;
use crate::lifecycle::orchestrator::WorkspaceInspection;

pub async fn handle(workspace: Uuid, output_format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config()?;
    let orchestrator = build_orchestrator(&config, true).await?;

    let inspection = orchestrator.inspect(workspace).await?;

    output_item(&output_format, "workspace", &inspection, |i: &WorkspaceInspection| {
        println!("Workspace {} ({})", i.workspace.id, i.workspace.display_name);
        print_rows(&[
            ("status", i.workspace.activation_status.to_string()),
            ("inactivity", i.inactivity.to_string()),
            ("action", i.action.to_string()),
            ("state", format!("{:?}", i.state)),
            ("members", i.member_count.to_string()),
            (
                "days until deletion",
                i.days_until_deletion
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
        ]);
    })
}
