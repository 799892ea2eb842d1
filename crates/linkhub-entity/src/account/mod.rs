//! Linked social account entities.

pub mod model;

pub use model::SocialCredential;
