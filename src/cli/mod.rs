pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "lifecycle")]
#[command(about = "Cleanup of suspended workspaces: inactivity warnings and capped deletion")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, conflicts_with = "json", help = "Output in human-readable text format (default)")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run a single cleanup pass")]
    Run {
        #[arg(long, help = "Log decisions without warning or deleting anything")]
        dry_run: bool,
    },

    #[command(about = "Run cleanup passes on the configured interval")]
    Worker,

    #[command(about = "Show inactivity, classification and warning state of a workspace")]
    Inspect {
        #[arg(help = "Workspace ID")]
        workspace: Uuid,
    },

    #[command(about = "Clear deletion warnings for a workspace (e.g. after reactivation)")]
    Reset {
        #[arg(help = "Workspace ID")]
        workspace: Uuid,
    },

    #[command(about = "Show the effective configuration")]
    Config,

    #[command(about = "Check database connectivity")]
    Health,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Run { dry_run } => commands::run::handle(dry_run, output_format).await,
        Commands::Worker => commands::worker::handle(output_format).await,
        Commands::Inspect { workspace } => commands::inspect::handle(workspace, output_format).await,
        Commands::Reset { workspace } => commands::reset::handle(workspace, output_format).await,
        Commands::Config => commands::config::handle(output_format).await,
        Commands::Health => commands::health::handle(output_format).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_with_dry_run_and_json() {
        let cli = Cli::try_parse_from(["lifecycle", "--json", "run", "--dry-run"]).unwrap();
        assert!(matches!(OutputFormat::from_cli(&cli), OutputFormat::Json));
        assert!(matches!(cli.command, Commands::Run { dry_run: true }));
    }

    #[test]
    fn text_is_the_default_and_excludes_json() {
        let cli = Cli::try_parse_from(["lifecycle", "config"]).unwrap();
        assert!(matches!(OutputFormat::from_cli(&cli), OutputFormat::Text));

        let cli = Cli::try_parse_from(["lifecycle", "--text", "health"]).unwrap();
        assert!(matches!(OutputFormat::from_cli(&cli), OutputFormat::Text));

        assert!(Cli::try_parse_from(["lifecycle", "--text", "--json", "run"]).is_err());
    }

    #[test]
    fn inspect_requires_a_uuid() {
        assert!(Cli::try_parse_from(["lifecycle", "inspect", "not-a-uuid"]).is_err());

        let id = Uuid::new_v4();
        let cli = Cli::try_parse_from(["lifecycle", "inspect", &id.to_string()]).unwrap();
        assert!(matches!(cli.command, Commands::Inspect { workspace } if workspace == id));
    }
}
