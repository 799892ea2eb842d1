//! Linked account commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::Printer;
use linkhub_core::error::AppError;
use linkhub_core::types::TenantId;
use linkhub_database::CredentialQuery;
use linkhub_database::repositories::SocialAccountRepository;
use linkhub_entity::SocialCredential;

/// Arguments for account commands
#[derive(Debug, Args)]
pub struct AccountsArgs {
    /// Accounts subcommand
    #[command(subcommand)]
    pub command: AccountsCommand,
}

/// Accounts subcommands
#[derive(Debug, Subcommand)]
pub enum AccountsCommand {
    /// List the social accounts linked to a user
    List {
        /// Internal user id
        #[arg(long)]
        user: String,
        /// Tenant id (UUID)
        #[arg(long)]
        tenant: TenantId,
    },
}

/// Account display row. Tokens are never printed.
#[derive(Debug, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
struct AccountRow {
    platform: String,
    platform_user_id: String,
    username: String,
    expires_at: String,
    linked_at: String,
}

impl From<SocialCredential> for AccountRow {
    fn from(c: SocialCredential) -> Self {
        Self {
            platform: c.platform.display_name().to_string(),
            platform_user_id: c.platform_user_id,
            username: c.username.unwrap_or_default(),
            expires_at: c
                .expires_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "-".to_string()),
            linked_at: c.linked_at.to_rfc3339(),
        }
    }
}

/// Execute account commands
pub async fn execute(
    args: &AccountsArgs,
    config_path: &str,
    printer: Printer,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let db = super::connect_db(&config).await?;
    let repo = SocialAccountRepository::new(db.pool().clone());

    let result = match &args.command {
        AccountsCommand::List { user, tenant } => repo
            .list_for_owner(user, *tenant)
            .await
            .and_then(|accounts| {
                let rows: Vec<AccountRow> = accounts.into_iter().map(AccountRow::from).collect();
                printer.rows(&rows, "No linked accounts.")
            }),
    };

    db.close().await;
    result
}
