//! Session token commands for local testing.

use std::sync::Arc;

use chrono::Utc;
use clap::{Args, Subcommand};

use crate::output::Printer;
use linkhub_auth::{SessionIssuer, SessionVerifier, SigningKeys};
use linkhub_core::error::AppError;
use linkhub_core::types::TenantId;
use linkhub_entity::InternalUser;

/// Arguments for token commands
#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Token subcommand
    #[command(subcommand)]
    pub command: TokenCommand,
}

/// Token subcommands
#[derive(Debug, Subcommand)]
pub enum TokenCommand {
    /// Issue a session token with the active signing key
    Issue {
        /// Internal user id
        #[arg(long)]
        user: String,
        /// Tenant id (UUID)
        #[arg(long)]
        tenant: TenantId,
    },
    /// Verify a token and print its claims
    Verify {
        /// Compact JWT
        token: String,
    },
}

/// Execute token commands
pub fn execute(args: &TokenArgs, config_path: &str, printer: Printer) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    config.validate()?;
    let keys = Arc::new(SigningKeys::from_config(&config.auth)?);

    match &args.command {
        TokenCommand::Issue { user, tenant } => {
            let issuer = SessionIssuer::new(keys, &config.auth);
            let session = issuer.issue(&InternalUser {
                id: user.clone(),
                tenant_id: *tenant,
                email: String::new(),
                display_name: None,
                registered_at: Utc::now(),
            })?;
            printer.record(
                &serde_json::json!({
                    "token": session.token,
                    "userId": session.user_id,
                    "tenantId": session.tenant_id,
                    "expiresAt": session.expires_at,
                }),
                &[
                    ("token", session.token.clone()),
                    ("expires", session.expires_at.to_rfc3339()),
                ],
            )?;
        }
        TokenCommand::Verify { token } => {
            let verifier = SessionVerifier::new(keys, &config.auth);
            verifier.verify(token)?;
            let claims = verifier.decode_claims(token)?;
            let expires = claims
                .expires_at()
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| claims.exp.to_string());
            printer.record(
                &claims,
                &[
                    ("user", claims.user_id.clone()),
                    ("tenant", claims.tenant_id.to_string()),
                    ("expires", expires),
                    ("jti", claims.jti.clone()),
                ],
            )?;
            printer.done("token is valid");
        }
    }

    Ok(())
}
