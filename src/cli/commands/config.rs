use crate::cli::config::load_config;
use crate::cli::utils::{output_item, print_rows};
use crate::cli::OutputFormat;
use crate::config::LifecycleConfig;

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config()?;

    output_item(&output_format, "config", &config, |c: &LifecycleConfig| {
        println!("Environment: {:?}", c.environment);
        print_rows(&[
            ("days before warning", c.policy.days_before_warning.to_string()),
            ("days before deletion", c.policy.days_before_deletion.to_string()),
            ("max deletions per run", c.policy.max_deletions_per_run.to_string()),
            ("workspace chunk size", c.policy.workspace_chunk_size.to_string()),
            ("member chunk size", c.policy.member_chunk_size.to_string()),
            ("dry run", c.policy.dry_run.to_string()),
            ("worker enabled", c.worker.enabled.to_string()),
            ("interval", format!("{}s", c.worker.interval_secs)),
            ("max connections", c.database.max_connections.to_string()),
        ]);
    })
}
