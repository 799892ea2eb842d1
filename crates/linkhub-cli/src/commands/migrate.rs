//! Database migration management commands.

use clap::{Args, Subcommand};

use crate::output::Printer;
use linkhub_core::error::AppError;
use linkhub_database::migration;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
    /// List the migrations embedded in this binary
    List,
}

/// Execute migration commands
pub async fn execute(
    args: &MigrateArgs,
    config_path: &str,
    printer: Printer,
) -> Result<(), AppError> {
    match &args.command {
        MigrateCommand::Run => {
            let config = super::load_config(config_path)?;
            let db = super::connect_db(&config).await?;
            let applied = migration::run_migrations(db.pool()).await;
            db.close().await;
            applied?;
            printer.done("migrations applied");
        }
        MigrateCommand::List => {
            let migrations: Vec<(i64, String)> = migration::embedded_migrations();
            let fields: Vec<(String, String)> = migrations
                .iter()
                .map(|(version, description)| (version.to_string(), description.clone()))
                .collect();
            printer.record(&migrations, &fields)?;
        }
    }

    Ok(())
}
