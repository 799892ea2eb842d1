//! OAuth login and callback handlers.

use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use url::Url;

use linkhub_core::config::FrontendConfig;
use linkhub_core::error::{AppError, ErrorKind};
use linkhub_entity::Platform;
use linkhub_service::{CallbackParams, LinkOutcome};

use crate::error::{ApiError, client_signal};
use crate::state::AppState;

/// GET /oauth/{platform}/login
pub async fn login(
    State(state): State<AppState>,
    Path(platform): Path<String>,
) -> Result<Response, ApiError> {
    let platform: Platform = platform.parse()?;
    let url = state.orchestrator.begin_login(platform)?;
    Ok(found(url.as_str()))
}

/// GET /oauth/{platform}/callback
///
/// Always answers with a redirect to the front-end: `?token=` on success,
/// `?error=<signal>` on failure.
pub async fn callback(
    State(state): State<AppState>,
    Path(platform): Path<String>,
    Query(params): Query<CallbackParams>,
) -> Result<Response, ApiError> {
    let platform: Platform = platform.parse()?;
    if !state.orchestrator.supports(platform) {
        return Err(AppError::not_found(format!("Platform '{platform}' is not enabled")).into());
    }

    let frontend = &state.config.frontend;
    let location = match state.orchestrator.complete(platform, params).await {
        LinkOutcome::Done(linked) => {
            frontend_url(frontend, &frontend.success_path, "token", &linked.session.token)?
        }
        LinkOutcome::Failed(failure) => frontend_url(
            frontend,
            &frontend.error_path,
            "error",
            client_signal(failure.kind()),
        )?,
    };

    Ok(found(location.as_str()))
}

/// `302 Found` to `location`.
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// Front-end URL at `path` with a single query parameter.
fn frontend_url(
    frontend: &FrontendConfig,
    path: &str,
    key: &str,
    value: &str,
) -> Result<Url, AppError> {
    let base = frontend.base_url.trim_end_matches('/');
    let mut url = Url::parse(&format!("{base}{path}")).map_err(|e| {
        AppError::with_source(ErrorKind::Configuration, "Invalid frontend.base_url", e)
    })?;
    url.query_pairs_mut().append_pair(key, value);
    Ok(url)
}
