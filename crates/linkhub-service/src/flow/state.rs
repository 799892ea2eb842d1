//! States and outcomes of the OAuth callback flow.

use std::fmt;

use serde::Deserialize;

use linkhub_auth::SessionToken;
use linkhub_core::error::{AppError, ErrorKind};
use linkhub_entity::{InternalUser, SocialCredential};

/// Query parameters a provider appends to the callback URL.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParams {
    /// Authorization code.
    pub code: Option<String>,
    /// The `state` value issued at login.
    pub state: Option<String>,
    /// Error code when the user denied access or the provider failed.
    pub error: Option<String>,
    /// Human-readable companion of `error`.
    pub error_description: Option<String>,
}

/// Non-terminal stages of a callback, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkStage {
    AwaitingCode,
    ExchangingToken,
    FetchingProfile,
    ResolvingIdentity,
    LinkingCredential,
    IssuingSession,
}

impl fmt::Display for LinkStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AwaitingCode => "awaiting_code",
            Self::ExchangingToken => "exchanging_token",
            Self::FetchingProfile => "fetching_profile",
            Self::ResolvingIdentity => "resolving_identity",
            Self::LinkingCredential => "linking_credential",
            Self::IssuingSession => "issuing_session",
        };
        f.write_str(name)
    }
}

/// Everything a completed flow produced.
#[derive(Debug, Clone)]
pub struct LinkedSession {
    /// Session token for the browser.
    pub session: SessionToken,
    /// Resolved internal user.
    pub user: InternalUser,
    /// Stored credential row.
    pub credential: SocialCredential,
    /// Whether the user was registered by this flow.
    pub is_new_user: bool,
}

/// Where a flow stopped and why.
#[derive(Debug, Clone)]
pub struct LinkFailure {
    /// Stage that failed.
    pub stage: LinkStage,
    /// The error, with its original kind.
    pub error: AppError,
}

impl LinkFailure {
    /// Kind of the underlying error.
    pub fn kind(&self) -> ErrorKind {
        self.error.kind
    }
}

impl fmt::Display for LinkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.stage, self.error)
    }
}

impl std::error::Error for LinkFailure {}

/// Terminal state of a callback.
#[derive(Debug, Clone)]
pub enum LinkOutcome {
    Done(Box<LinkedSession>),
    Failed(LinkFailure),
}

impl LinkOutcome {
    /// Convert into a `Result`.
    pub fn into_result(self) -> Result<LinkedSession, LinkFailure> {
        match self {
            Self::Done(linked) => Ok(*linked),
            Self::Failed(failure) => Err(failure),
        }
    }

    /// Stage of a failed flow.
    pub fn failed_stage(&self) -> Option<LinkStage> {
        match self {
            Self::Done(_) => None,
            Self::Failed(failure) => Some(failure.stage),
        }
    }
}
