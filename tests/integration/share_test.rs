//! Integration tests for share grants and public links.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::{TestApp, TestUser, id_of};

async fn upload_file(app: &TestApp, owner: &TestUser, name: &str) -> String {
    let response = app.upload(owner, None, name, name.as_bytes()).await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    id_of(&response.body["data"])
}

#[tokio::test]
async fn test_public_link_download_and_revoke() {
    let Some(app) = TestApp::new().await else { return };
    let owner = app.create_user(1_000_000).await;
    let file = upload_file(&app, &owner, "brochure.pdf").await;

    let created = app
        .request(
            "POST",
            &format!("/api/resources/{file}/shares"),
            Some(json!({ "type": "public", "accessLevel": "viewer" })),
            Some(&owner.token),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED, "{}", created.body);
    assert_eq!(created.body["data"]["isPublic"], true);
    let token = created.body["data"]["publicLinkToken"]
        .as_str()
        .unwrap()
        .to_string();
    let share = id_of(&created.body["data"]);

    let link = app
        .request("GET", &format!("/api/shared/{token}/{file}/download"), None, None)
        .await;
    assert_eq!(link.status, StatusCode::OK, "{}", link.body);
    let blob = app
        .fetch_signed(link.body["data"]["signedUrl"].as_str().unwrap())
        .await;
    assert_eq!(&blob.bytes[..], b"brochure.pdf");

    let listed = app
        .request("GET", &format!("/api/resources/{file}/shares"), None, Some(&owner.token))
        .await;
    assert_eq!(listed.body["data"].as_array().unwrap().len(), 1);

    let revoked = app
        .request("DELETE", &format!("/api/shares/{share}"), None, Some(&owner.token))
        .await;
    assert_eq!(revoked.status, StatusCode::OK);
    assert_eq!(revoked.body["success"], true);

    let after = app
        .request("GET", &format!("/api/shared/{token}/{file}/download"), None, None)
        .await;
    assert_eq!(after.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_grant_allows_only_the_grantee() {
    let Some(app) = TestApp::new().await else { return };
    let owner = app.create_user(1_000_000).await;
    let grantee = app.create_user(1_000_000).await;
    let stranger = app.create_user(1_000_000).await;
    let file = upload_file(&app, &owner, "budget.xlsx").await;

    let created = app
        .request(
            "POST",
            &format!("/api/resources/{file}/shares"),
            Some(json!({ "type": "user", "userId": grantee.id, "accessLevel": "viewer" })),
            Some(&owner.token),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED, "{}", created.body);
    assert!(created.body["data"]["publicLinkToken"].is_null());

    let allowed = app
        .request("GET", &format!("/api/resources/{file}/download"), None, Some(&grantee.token))
        .await;
    assert_eq!(allowed.status, StatusCode::OK);

    let denied = app
        .request("GET", &format!("/api/resources/{file}/download"), None, Some(&stranger.token))
        .await;
    assert_eq!(denied.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_only_the_owner_manages_shares() {
    let Some(app) = TestApp::new().await else { return };
    let owner = app.create_user(1_000_000).await;
    let stranger = app.create_user(1_000_000).await;
    let file = upload_file(&app, &owner, "secret.txt").await;

    let attempt = app
        .request(
            "POST",
            &format!("/api/resources/{file}/shares"),
            Some(json!({ "type": "public", "accessLevel": "viewer" })),
            Some(&stranger.token),
        )
        .await;
    assert_eq!(attempt.status, StatusCode::NOT_FOUND);

    let created = app
        .request(
            "POST",
            &format!("/api/resources/{file}/shares"),
            Some(json!({ "type": "public", "accessLevel": "viewer" })),
            Some(&owner.token),
        )
        .await;
    let share = id_of(&created.body["data"]);

    let revoke = app
        .request("DELETE", &format!("/api/shares/{share}"), None, Some(&stranger.token))
        .await;
    assert_eq!(revoke.status, StatusCode::NOT_FOUND);
}
