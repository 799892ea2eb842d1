//! CLI command definitions and dispatch.

pub mod accounts;
pub mod keygen;
pub mod migrate;
pub mod token;

use clap::{ArgAction, Parser, Subcommand};

use crate::output::{OutputFormat, Printer};
use linkhub_core::config::AppConfig;
use linkhub_core::error::AppError;
use linkhub_database::DatabasePool;

/// LinkHub: social OAuth identity resolution and account linking
#[derive(Debug, Parser)]
#[command(name = "linkhub", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Generate a signing secret
    Keygen(keygen::KeygenArgs),
    /// Issue or inspect session tokens
    Token(token::TokenArgs),
    /// Linked social accounts
    Accounts(accounts::AccountsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let printer = Printer::new(self.format);
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &self.config, printer).await,
            Commands::Keygen(args) => keygen::execute(args),
            Commands::Token(args) => token::execute(args, &self.config, printer),
            Commands::Accounts(args) => accounts::execute(args, &self.config, printer).await,
        }
    }
}

/// Log filter for `-v` repetitions.
pub fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Helper: load configuration from file and `LINKHUB__*` overrides
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    let env = std::env::var("LINKHUB_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(config_path, &env)
}

/// Helper: open the PostgreSQL pool named by config
pub async fn connect_db(config: &AppConfig) -> Result<DatabasePool, AppError> {
    DatabasePool::connect(&config.database).await
}
