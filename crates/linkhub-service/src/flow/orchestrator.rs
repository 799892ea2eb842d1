//! Drives one OAuth callback from code to session.
//!
//! ```text
//! AwaitingCode -> ExchangingToken -> FetchingProfile -> ResolvingIdentity
//!              -> LinkingCredential -> IssuingSession -> Done
//! ```
//!
//! Any stage may end the flow in `Failed(stage, error)`. The error keeps the
//! kind it was raised with and nothing is retried. A user registered before
//! a later stage fails stays registered; the next login resolves to it.

use std::sync::Arc;

use tracing::{debug, info, warn};
use url::Url;

use linkhub_auth::{SessionIssuer, StateSigner};
use linkhub_core::error::AppError;
use linkhub_core::result::AppResult;
use linkhub_entity::Platform;
use linkhub_provider::{ProviderAdapter, ProviderRegistry};

use super::state::{CallbackParams, LinkFailure, LinkOutcome, LinkStage, LinkedSession};
use crate::account::AccountLinker;
use crate::identity::IdentityResolver;

fn at(stage: LinkStage) -> impl FnOnce(AppError) -> LinkFailure {
    move |error| LinkFailure { stage, error }
}

/// Sequences adapter, resolver, linker and issuer for each callback.
#[derive(Debug, Clone)]
pub struct LinkingOrchestrator {
    providers: Arc<ProviderRegistry>,
    state: Arc<StateSigner>,
    resolver: IdentityResolver,
    linker: AccountLinker,
    sessions: Arc<SessionIssuer>,
}

impl LinkingOrchestrator {
    /// Creates an orchestrator from its collaborators.
    pub fn new(
        providers: Arc<ProviderRegistry>,
        state: Arc<StateSigner>,
        resolver: IdentityResolver,
        linker: AccountLinker,
        sessions: Arc<SessionIssuer>,
    ) -> Self {
        Self {
            providers,
            state,
            resolver,
            linker,
            sessions,
        }
    }

    /// Whether `platform` has an enabled adapter.
    pub fn supports(&self, platform: Platform) -> bool {
        self.providers.get(platform).is_ok()
    }

    /// Platforms with an enabled adapter.
    pub fn platforms(&self) -> Vec<Platform> {
        self.providers.platforms()
    }

    /// Start a login: mint a state value and build the provider dialog URL.
    pub fn begin_login(&self, platform: Platform) -> AppResult<Url> {
        let adapter = self.providers.get(platform)?;
        let state = self.state.create(platform)?;
        debug!(platform = %platform, "Login started");
        Ok(adapter.authorization_url(&state))
    }

    /// Run the callback for `platform` to a terminal state.
    pub async fn complete(&self, platform: Platform, params: CallbackParams) -> LinkOutcome {
        match self.run(platform, params).await {
            Ok(linked) => {
                info!(
                    platform = %platform,
                    user_id = %linked.user.id,
                    tenant_id = %linked.user.tenant_id,
                    is_new_user = linked.is_new_user,
                    "Account linked"
                );
                LinkOutcome::Done(Box::new(linked))
            }
            Err(failure) => {
                warn!(
                    platform = %platform,
                    stage = %failure.stage,
                    kind = %failure.kind(),
                    error = %failure.error.message,
                    "Account linking failed"
                );
                LinkOutcome::Failed(failure)
            }
        }
    }

    async fn run(
        &self,
        platform: Platform,
        params: CallbackParams,
    ) -> Result<LinkedSession, LinkFailure> {
        debug!(platform = %platform, stage = %LinkStage::AwaitingCode, "Link stage");
        let (adapter, code) = self
            .await_code(platform, params)
            .await
            .map_err(at(LinkStage::AwaitingCode))?;

        debug!(platform = %platform, stage = %LinkStage::ExchangingToken, "Link stage");
        let token = adapter
            .exchange_code(&code)
            .await
            .map_err(at(LinkStage::ExchangingToken))?;

        debug!(platform = %platform, stage = %LinkStage::FetchingProfile, "Link stage");
        let profile = adapter
            .fetch_profile(&token)
            .await
            .map_err(at(LinkStage::FetchingProfile))?;

        debug!(
            platform = %platform,
            stage = %LinkStage::ResolvingIdentity,
            platform_user_id = %profile.platform_user_id,
            "Link stage"
        );
        let (user, is_new_user) = self
            .resolver
            .resolve(&profile)
            .await
            .map_err(at(LinkStage::ResolvingIdentity))?;

        debug!(platform = %platform, stage = %LinkStage::LinkingCredential, "Link stage");
        let credential = self
            .linker
            .link(&user, &profile)
            .await
            .map_err(at(LinkStage::LinkingCredential))?
            .into_credential();

        debug!(platform = %platform, stage = %LinkStage::IssuingSession, "Link stage");
        let session = self
            .sessions
            .issue(&user)
            .map_err(at(LinkStage::IssuingSession))?;

        Ok(LinkedSession {
            session,
            user,
            credential,
            is_new_user,
        })
    }

    /// Validate the callback input and hand back the adapter and code.
    async fn await_code(
        &self,
        platform: Platform,
        params: CallbackParams,
    ) -> AppResult<(Arc<dyn ProviderAdapter>, String)> {
        let adapter = self.providers.get(platform)?;

        if let Some(error) = params.error.filter(|e| !e.is_empty()) {
            debug!(
                platform = %platform,
                error = %error,
                description = params.error_description.as_deref().unwrap_or(""),
                "Provider reported an authorization error"
            );
            return Err(AppError::validation(format!(
                "{} authorization failed: {error}",
                platform.display_name()
            )));
        }

        let state = params
            .state
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::validation("Missing OAuth state"))?;
        self.state.consume(&state, platform).await?;

        let code = params
            .code
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AppError::validation("Authorization code not found"))?;

        Ok((adapter, code))
    }
}
