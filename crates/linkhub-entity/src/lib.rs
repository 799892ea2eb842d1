//! # linkhub-entity
//!
//! Domain entity models for LinkHub. Persistent entities derive
//! `sqlx::FromRow`; [`profile`] holds the ephemeral value objects that flow
//! between a provider adapter and the identity resolver.

pub mod account;
pub mod platform;
pub mod profile;
pub mod user;

pub use account::SocialCredential;
pub use platform::Platform;
pub use profile::{NormalizedProfile, RawToken};
pub use user::InternalUser;
