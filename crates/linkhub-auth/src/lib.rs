//! # linkhub-auth
//!
//! Signed credentials for LinkHub:
//!
//! - [`session`]: issuing and verifying the session token handed to the
//!   browser after a successful link.
//! - [`state`]: the short-lived OAuth `state` parameter protecting the
//!   callback against forgery and replay.
//!
//! Both sign with the HMAC keyring in [`keys`], which supports rotation by
//! key id.

pub mod keys;
pub mod session;
pub mod state;

pub use keys::SigningKeys;
pub use session::{SessionIssuer, SessionToken, SessionVerifier, VerifiedIdentity};
pub use state::StateSigner;
