//! Integration tests for the OAuth login and callback redirects.

mod helpers;

use std::sync::Arc;

use http::StatusCode;

use helpers::{BrokenCredentials, FRONTEND, TestApp};

#[tokio::test]
async fn test_login_redirects_to_provider_with_state() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/oauth/tiktok/login", None, None).await;

    assert_eq!(response.status, StatusCode::FOUND);
    let base = response.redirect_base().unwrap();
    assert_eq!(base, format!("{}/tiktok/authorize", app.providers.uri()));
    assert_eq!(response.redirect_param("client_key").as_deref(), Some("tiktok-client"));
    assert_eq!(response.redirect_param("response_type").as_deref(), Some("code"));
    assert!(response.redirect_param("state").is_some_and(|s| !s.is_empty()));
}

#[tokio::test]
async fn test_login_unknown_platform_is_404() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/oauth/myspace/login", None, None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_disabled_platform_is_404() {
    let app = TestApp::with_platforms(&["meta"]).await;

    let login = app.request("GET", "/oauth/snapchat/login", None, None).await;
    let callback = app
        .request("GET", "/oauth/snapchat/callback?code=c&state=s", None, None)
        .await;

    assert_eq!(login.status, StatusCode::NOT_FOUND);
    assert_eq!(callback.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_meta_callback_issues_session_for_new_user() {
    let app = TestApp::new().await;
    app.mock_meta_user("meta-code", "1001", Some("ana@example.com")).await;

    let response = app.callback("meta", "meta-code").await;

    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(
        response.redirect_base().unwrap(),
        format!("{FRONTEND}/auth-success")
    );
    let token = response.redirect_param("token").expect("token in redirect");

    let me = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["data"]["userId"], "1001");
    assert!(me.body["data"]["tenantId"].is_string());

    let accounts = app.request("GET", "/api/accounts", None, Some(&token)).await;
    assert_eq!(accounts.status, StatusCode::OK);
    let list = accounts.body["data"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["platform"], "Meta");
    assert_eq!(list[0]["platformUserId"], "1001");
    assert_eq!(list[0]["profilePic"], "https://cdn.test/1001.png");
    assert!(list[0].get("accessToken").is_none());

    assert_eq!(app.store.user_count(), 1);
    assert_eq!(app.store.credential_count(), 1);
}

#[tokio::test]
async fn test_returning_user_keeps_tenant_and_single_credential() {
    let app = TestApp::new().await;
    app.mock_meta_user("first", "1001", Some("ana@example.com")).await;
    app.mock_meta_user("second", "1001", Some("ana@example.com")).await;

    let first = app.callback("meta", "first").await;
    let second = app.callback("meta", "second").await;

    let t1 = app
        .request("GET", "/api/auth/me", None, first.redirect_param("token").as_deref())
        .await
        .body["data"]["tenantId"]
        .clone();
    let t2 = app
        .request("GET", "/api/auth/me", None, second.redirect_param("token").as_deref())
        .await
        .body["data"]["tenantId"]
        .clone();

    assert!(t1.is_string());
    assert_eq!(t1, t2);
    assert_eq!(app.store.user_count(), 1);
    assert_eq!(app.store.credential_count(), 1);
}

#[tokio::test]
async fn test_email_less_platforms_get_their_own_tenants() {
    let app = TestApp::new().await;
    app.mock_tiktok_user("tt-code", "open-1").await;
    app.mock_snapchat_user("snap-code", "snap-1").await;

    let tiktok = app.callback("tiktok", "tt-code").await;
    let snapchat = app.callback("snapchat", "snap-code").await;

    let tt_token = tiktok.redirect_param("token").expect("tiktok token");
    let snap_token = snapchat.redirect_param("token").expect("snapchat token");
    let tt_me = app.request("GET", "/api/auth/me", None, Some(&tt_token)).await;
    let snap_me = app.request("GET", "/api/auth/me", None, Some(&snap_token)).await;

    assert_ne!(tt_me.body["data"]["tenantId"], snap_me.body["data"]["tenantId"]);
    assert_eq!(app.store.user_count(), 2);

    let accounts = app.request("GET", "/api/accounts", None, Some(&snap_token)).await;
    let list = accounts.body["data"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["username"], "snap user");
    assert_eq!(
        list[0]["profilePic"],
        "https://placehold.co/100x100/FFFC00/000000?text=S"
    );
}

#[tokio::test]
async fn test_provider_error_param_redirects_with_restart_login() {
    let app = TestApp::new().await;
    let state = app.begin_login("meta").await;

    let response = app
        .request(
            "GET",
            &format!("/oauth/meta/callback?error=access_denied&state={state}"),
            None,
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(
        response.redirect_base().unwrap(),
        format!("{FRONTEND}/auth-error")
    );
    assert_eq!(response.redirect_param("error").as_deref(), Some("restart_login"));
    assert_eq!(app.store.user_count(), 0);
}

#[tokio::test]
async fn test_forged_state_is_rejected() {
    let app = TestApp::new().await;
    app.mock_meta_user("meta-code", "1001", None).await;

    let response = app
        .callback_with_state("meta", "meta-code", "not-a-signed-state")
        .await;

    assert_eq!(response.redirect_param("error").as_deref(), Some("restart_login"));
    assert_eq!(app.store.user_count(), 0);
}

#[tokio::test]
async fn test_state_cannot_be_replayed() {
    let app = TestApp::new().await;
    app.mock_meta_user("meta-code", "1001", None).await;
    let state = app.begin_login("meta").await;

    let first = app.callback_with_state("meta", "meta-code", &state).await;
    let replay = app.callback_with_state("meta", "meta-code", &state).await;

    assert!(first.redirect_param("token").is_some());
    assert_eq!(replay.redirect_param("error").as_deref(), Some("restart_login"));
}

#[tokio::test]
async fn test_state_is_bound_to_its_platform() {
    let app = TestApp::new().await;
    app.mock_tiktok_user("tt-code", "open-1").await;
    let meta_state = app.begin_login("meta").await;

    let response = app
        .callback_with_state("tiktok", "tt-code", &meta_state)
        .await;

    assert_eq!(response.redirect_param("error").as_deref(), Some("restart_login"));
    assert_eq!(app.store.user_count(), 0);
}

#[tokio::test]
async fn test_rejected_code_exchange_redirects_with_restart_login() {
    let app = TestApp::new().await;
    app.mock_token_status("snapchat", "POST", 400).await;

    let response = app.callback("snapchat", "expired-code").await;

    assert_eq!(response.redirect_param("error").as_deref(), Some("restart_login"));
    assert_eq!(app.store.user_count(), 0);
    assert_eq!(app.store.credential_count(), 0);
}

#[tokio::test]
async fn test_profile_outage_redirects_with_provider_unavailable() {
    let app = TestApp::new().await;
    wiremock::Mock::given(wiremock::matchers::method("POST"))
        .and(wiremock::matchers::path("/tiktok/token"))
        .respond_with(wiremock::ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "tt-access",
            "open_id": "open-9"
        })))
        .mount(&app.providers)
        .await;
    wiremock::Mock::given(wiremock::matchers::method("GET"))
        .and(wiremock::matchers::path("/tiktok/me"))
        .respond_with(wiremock::ResponseTemplate::new(503))
        .mount(&app.providers)
        .await;

    let response = app.callback("tiktok", "tt-code").await;

    assert_eq!(
        response.redirect_param("error").as_deref(),
        Some("provider_unavailable")
    );
    assert_eq!(app.store.user_count(), 0);
}

#[tokio::test]
async fn test_credential_store_outage_redirects_with_try_again() {
    let app = TestApp::with_credentials(Arc::new(BrokenCredentials)).await;
    app.mock_meta_user("meta-code", "111", Some("a@x.com")).await;

    let response = app.callback("meta", "meta-code").await;

    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.redirect_param("error").as_deref(), Some("try_again"));
    assert!(response.redirect_param("token").is_none());
    assert_eq!(app.store.user_count(), 1);
    assert_eq!(app.store.credential_count(), 0);
}

#[tokio::test]
async fn test_profile_timeout_redirects_with_provider_unavailable() {
    let app = TestApp::new().await;
    wiremock::Mock::given(wiremock::matchers::method("GET"))
        .and(wiremock::matchers::path("/meta/token"))
        .respond_with(wiremock::ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "meta-slow"
        })))
        .mount(&app.providers)
        .await;
    wiremock::Mock::given(wiremock::matchers::method("GET"))
        .and(wiremock::matchers::path("/meta/me"))
        .respond_with(
            wiremock::ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "id": "111" }))
                .set_delay(std::time::Duration::from_secs(4)),
        )
        .mount(&app.providers)
        .await;

    let response = app.callback("meta", "meta-code").await;

    assert_eq!(
        response.redirect_param("error").as_deref(),
        Some("provider_unavailable")
    );
    assert_eq!(app.store.user_count(), 0);
}

