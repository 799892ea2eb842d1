//! Integration tests for the account service endpoint, bearer auth and health.

mod helpers;

use http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use helpers::TestApp;
use linkhub_core::types::TenantId;

fn account(platform_user_id: &str, user_id: &str, tenant: TenantId) -> serde_json::Value {
    json!({
        "platformUserId": platform_user_id,
        "platform": "TikTok",
        "userId": user_id,
        "tenantId": tenant,
        "accessToken": format!("access-{platform_user_id}"),
        "refreshToken": "refresh-1",
        "username": "TikTokUser",
        "profilePic": "https://placehold.co/100x100/FF0050/FFFFFF?text=T"
    })
}

#[tokio::test]
async fn test_upsert_creates_then_updates() {
    let app = TestApp::new().await;
    let tenant = TenantId::from(Uuid::new_v4());

    let created = app
        .request("POST", "/accounts", Some(account("222", "111", tenant)), None)
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["success"], true);
    assert_eq!(created.body["data"]["platformUserId"], "222");

    let mut update = account("222", "111", tenant);
    update["accessToken"] = json!("rotated");
    update["refreshToken"] = json!(null);
    let updated = app.request("POST", "/accounts", Some(update), None).await;

    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["data"]["accessToken"], "rotated");
    assert_eq!(updated.body["data"]["refreshToken"], "refresh-1");
    assert_eq!(app.store.credential_count(), 1);
}

#[tokio::test]
async fn test_upsert_rejects_invalid_body() {
    let app = TestApp::new().await;
    let mut body = account("", "111", TenantId::from(Uuid::new_v4()));
    body["profilePic"] = json!("not a url");

    let response = app.request("POST", "/accounts", Some(body), None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
    assert_eq!(app.store.credential_count(), 0);
}

#[tokio::test]
async fn test_list_requires_bearer_token() {
    let app = TestApp::new().await;

    let missing = app.request("GET", "/api/accounts", None, None).await;
    let garbage = app
        .request("GET", "/api/accounts", None, Some("not.a.jwt"))
        .await;

    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
    assert_eq!(garbage.body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_list_is_scoped_to_user_and_tenant() {
    let app = TestApp::new().await;
    let tenant = TenantId::from(Uuid::new_v4());
    let other_tenant = TenantId::from(Uuid::new_v4());

    for body in [
        account("a-1", "alice", tenant),
        account("a-2", "alice", tenant),
        account("b-1", "bob", tenant),
        account("a-3", "alice", other_tenant),
    ] {
        let response = app.request("POST", "/accounts", Some(body), None).await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    let token = app.session_for("alice", tenant);
    let response = app.request("GET", "/api/accounts", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    let mut ids: Vec<&str> = response.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["platformUserId"].as_str().unwrap())
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, ["a-1", "a-2"]);
}

#[tokio::test]
async fn test_health_reports_store_and_platforms() {
    let app = TestApp::with_platforms(&["meta", "snapchat"]).await;

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["store"], "connected");
    assert_eq!(response.body["data"]["platforms"], json!(["Meta", "Snapchat"]));
}
