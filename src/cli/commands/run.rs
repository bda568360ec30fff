use crate::cli::config::{build_orchestrator, load_config};
use crate::cli::utils::{output_item, print_rows};
use crate::cli::OutputFormat;
use crate::lifecycle::orchestrator::CleanupRunResult;

pub async fn handle(dry_run: bool, output_format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config()?;
    let orchestrator = build_orchestrator(&config, dry_run).await?;

    let result = orchestrator.run().await?;

    output_item(&output_format, "run", &result, print_summary)
}

fn print_summary(result: &CleanupRunResult) {
    let suffix = if result.dry_run { " (DRY RUN)" } else { "" };
    println!("Cleanup run complete{}", suffix);

    print_rows(&[
        ("scanned", result.workspaces_scanned.to_string()),
        ("ignored", result.ignored.to_string()),
        ("no billing history", result.skipped_no_billing.to_string()),
        ("no members", result.skipped_no_members.to_string()),
        ("warned", result.warned.to_string()),
        ("already warned", result.already_warned.to_string()),
        ("deleted", result.deleted.to_string()),
        ("deferred by cap", result.deletion_capped.to_string()),
        ("failed", result.failed.to_string()),
        ("duration", format!("{}ms", result.duration_ms)),
    ]);

    let failures: Vec<_> = result.workspaces.iter().filter(|w| w.error.is_some()).collect();
    if !failures.is_empty() {
        println!();
        println!("{:<38} {:<22} {}", "WORKSPACE", "CODE", "ERROR");
        println!("{}", "-".repeat(90));
        for failure in failures {
            println!(
                "{:<38} {:<22} {}",
                failure.workspace_id,
                failure.error_code.unwrap_or("-"),
                failure.error.as_deref().unwrap_or("")
            );
        }
    }
}
