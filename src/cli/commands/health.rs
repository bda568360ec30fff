use serde_json::json;

use crate::cli::config::{connect, load_config};
use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;
use crate::database::manager::DatabaseManager;

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config()?;
    let pool = connect(&config).await?;
    let now = chrono::Utc::now();

    match DatabaseManager::health_check(&pool).await {
        Ok(()) => output_success(
            &output_format,
            "Database reachable",
            Some(json!({ "database": "ok", "timestamp": now })),
        ),
        Err(e) => {
            output_error(&output_format, &format!("Database unavailable: {}", e), Some("DATABASE_UNAVAILABLE"))?;
            Err(e.into())
        }
    }
}
