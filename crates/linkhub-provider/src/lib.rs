//! # linkhub-provider
//!
//! OAuth dialects of the supported platforms behind one
//! [`ProviderAdapter`] trait:
//!
//! - [`meta`]: query-string GET exchange, Graph API profile with email.
//! - [`tiktok`]: JSON POST exchange, `open_id` identity, no email.
//! - [`snapchat`]: form POST exchange, Ads API `me` identity.
//!
//! [`ProviderRegistry`] holds the adapters enabled in configuration.

pub mod adapter;
pub mod http;
pub mod meta;
pub mod registry;
pub mod snapchat;
pub mod tiktok;

pub use adapter::ProviderAdapter;
pub use meta::MetaAdapter;
pub use registry::ProviderRegistry;
pub use snapchat::SnapchatAdapter;
pub use tiktok::TikTokAdapter;
