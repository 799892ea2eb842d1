//! # linkhub-service
//!
//! Use cases of LinkHub. Each service receives its stores and collaborators
//! as `Arc` references at construction.
//!
//! - [`identity`]: profile to internal user and tenant.
//! - [`account`]: credential linking and the account service operations.
//! - [`flow`]: the callback state machine sequencing both with the provider
//!   adapters and the session issuer.

pub mod account;
pub mod flow;
pub mod identity;

pub use account::{AccountLinker, AccountService};
pub use flow::{CallbackParams, LinkFailure, LinkOutcome, LinkStage, LinkedSession, LinkingOrchestrator};
pub use identity::IdentityResolver;
