//! Browser access rules for the front-end calling `/api`.
//!
//! Each `[server.cors]` list is either a literal allow-list or contains `*`.
//! Entries that do not parse as their HTTP type are skipped with a warning
//! instead of failing startup.

use std::str::FromStr;
use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tracing::warn;

use linkhub_core::config::CorsConfig;

/// A parsed CORS list.
#[derive(Debug, PartialEq, Eq)]
enum Allowed<T> {
    Any,
    Only(Vec<T>),
}

impl<T: FromStr> Allowed<T> {
    fn parse(entries: &[String], what: &'static str) -> Self {
        if entries.iter().any(|e| e.trim() == "*") {
            return Self::Any;
        }
        let parsed = entries
            .iter()
            .filter_map(|entry| match entry.trim().parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(entry = %entry, what, "Ignoring unparseable CORS entry");
                    None
                }
            })
            .collect();
        Self::Only(parsed)
    }
}

/// Builds the CORS layer for `config`.
pub fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins = match Allowed::<HeaderValue>::parse(&config.allowed_origins, "origin") {
        Allowed::Any => AllowOrigin::any(),
        Allowed::Only(list) => AllowOrigin::list(list),
    };
    let methods = match Allowed::<Method>::parse(&config.allowed_methods, "method") {
        Allowed::Any => AllowMethods::any(),
        Allowed::Only(list) => AllowMethods::list(list),
    };
    let headers = match Allowed::<HeaderName>::parse(&config.allowed_headers, "header") {
        Allowed::Any => AllowHeaders::any(),
        Allowed::Only(list) => AllowHeaders::list(list),
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(headers)
        .max_age(Duration::from_secs(config.max_age_seconds))
}
