//! # linkhub-database
//!
//! Persistence for LinkHub. [`store`] defines the traits the identity
//! resolver and account linker depend on; the PostgreSQL repositories, the
//! in-memory store, and the remote account service client implement them.

pub mod connection;
#[cfg(feature = "memory")]
pub mod memory;
pub mod migration;
#[cfg(feature = "remote-accounts")]
pub mod remote;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{CredentialQuery, CredentialStore, UpsertOutcome, UserStore};
