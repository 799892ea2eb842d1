//! # linkhub-api
//!
//! HTTP API layer for LinkHub built on Axum.
//!
//! Serves the OAuth login and callback redirects, the account service
//! endpoint, and session-authenticated reads. Maps [`AppError`] kinds to
//! status codes and front-end error signals.
//!
//! [`AppError`]: linkhub_core::AppError

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{Stores, build_app, build_state};
pub use error::ApiError;
pub use state::AppState;
