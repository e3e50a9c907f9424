//! File and folder lifecycle tests

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::{TestApp, id_of, missing_id};

#[tokio::test]
async fn test_folder_names_are_deduplicated() {
    let Some(app) = TestApp::new().await else { return };
    let user = app.create_user(1_000_000).await;

    let first = app
        .request("POST", "/api/resources", Some(json!({ "name": "Docs" })), Some(&user.token))
        .await;
    assert_eq!(first.status, StatusCode::CREATED);
    assert_eq!(first.body["data"]["name"], "Docs");
    assert_eq!(first.body["data"]["isFolder"], true);

    let second = app
        .request("POST", "/api/resources", Some(json!({ "name": "Docs" })), Some(&user.token))
        .await;
    assert_eq!(second.status, StatusCode::CREATED);
    assert_eq!(second.body["data"]["name"], "Docs (1)");
}

#[tokio::test]
async fn test_upload_respects_quota() {
    let Some(app) = TestApp::new().await else { return };
    let user = app.create_user(10).await;

    let ok = app.upload(&user, None, "a.bin", b"12345678").await;
    assert_eq!(ok.status, StatusCode::CREATED, "{}", ok.body);
    assert_eq!(ok.body["data"]["size"], 8);

    let over = app.upload(&user, None, "b.bin", b"abc").await;
    assert_eq!(over.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(over.body["error"], "STORAGE_QUOTA_EXCEEDED");

    let usage = app
        .request("GET", "/api/storage/usage", None, Some(&user.token))
        .await;
    assert_eq!(usage.status, StatusCode::OK);
    assert_eq!(usage.body["data"]["usedBytes"], 8);
    assert_eq!(usage.body["data"]["quotaBytes"], 10);

    let me = app.request("GET", "/api/users/me", None, Some(&user.token)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["data"]["id"], user.id.to_string());
    assert_eq!(me.body["data"]["usedStorage"], 8);
    assert_eq!(me.body["data"]["storageQuota"], 10);
}

#[tokio::test]
async fn test_duplicate_content_is_rejected() {
    let Some(app) = TestApp::new().await else { return };
    let user = app.create_user(1_000_000).await;

    let first = app.upload(&user, None, "report.pdf", b"same bytes").await;
    assert_eq!(first.status, StatusCode::CREATED);

    let copy = app.upload(&user, None, "copy.pdf", b"same bytes").await;
    assert_eq!(copy.status, StatusCode::CONFLICT);
    assert_eq!(copy.body["error"], "FILE_ALREADY_EXISTS");

    let same_name = app.upload(&user, None, "report.pdf", b"other bytes").await;
    assert_eq!(same_name.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_listing_nests_children() {
    let Some(app) = TestApp::new().await else { return };
    let user = app.create_user(1_000_000).await;

    let folder = app.folder(&user, "Photos", None).await;
    let upload = app.upload(&user, Some(&folder), "cat.jpg", b"meow").await;
    assert_eq!(upload.status, StatusCode::CREATED);

    let list = app
        .request("GET", "/api/resources?limit=-1", None, Some(&user.token))
        .await;
    assert_eq!(list.status, StatusCode::OK);
    assert_eq!(list.body["success"], true);
    assert_eq!(list.body["meta"]["pageCount"], 1);

    let roots = list.body["data"].as_array().unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(id_of(&roots[0]), folder);
    let children = roots[0]["children"].as_array().unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0]["name"], "cat.jpg");
}

#[tokio::test]
async fn test_move_delete_restore_purge() {
    let Some(app) = TestApp::new().await else { return };
    let user = app.create_user(1_000_000).await;

    let a = app.folder(&user, "A", None).await;
    let b = app.folder(&user, "B", None).await;
    let upload = app.upload(&user, Some(&a), "notes.txt", b"hello").await;
    let file = id_of(&upload.body["data"]);

    let moved = app
        .request(
            "PATCH",
            &format!("/api/resources/{a}/move"),
            Some(json!({ "parentId": b })),
            Some(&user.token),
        )
        .await;
    assert_eq!(moved.status, StatusCode::OK, "{}", moved.body);

    let fetched = app
        .request("GET", &format!("/api/resources/{file}"), None, Some(&user.token))
        .await;
    let expected = format!("user_{}/{b}/{a}/{file}", user.id);
    assert_eq!(fetched.body["data"]["storagePath"], expected.as_str());

    let deleted = app
        .request("DELETE", &format!("/api/resources/{b}"), None, Some(&user.token))
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["data"]["status"], "deleted");

    let hidden = app
        .request("GET", &format!("/api/resources/{file}"), None, Some(&user.token))
        .await;
    assert_eq!(hidden.status, StatusCode::NOT_FOUND);

    let restored = app
        .request("POST", &format!("/api/resources/{b}/restore"), None, Some(&user.token))
        .await;
    assert_eq!(restored.status, StatusCode::OK);
    assert_eq!(restored.body["data"]["status"], "active");

    let not_deleted = app
        .request("DELETE", &format!("/api/resources/{b}/purge"), None, Some(&user.token))
        .await;
    assert_eq!(not_deleted.status, StatusCode::NOT_FOUND);

    app.request("DELETE", &format!("/api/resources/{b}"), None, Some(&user.token))
        .await;
    let purged = app
        .request("DELETE", &format!("/api/resources/{b}/purge"), None, Some(&user.token))
        .await;
    assert_eq!(purged.status, StatusCode::OK, "{}", purged.body);
    assert_eq!(purged.body["data"]["removed"], 3);
    assert_eq!(purged.body["data"]["freedBytes"], 5);

    let usage = app
        .request("GET", "/api/storage/usage", None, Some(&user.token))
        .await;
    assert_eq!(usage.body["data"]["usedBytes"], 0);
}

#[tokio::test]
async fn test_download_link_serves_bytes() {
    let Some(app) = TestApp::new().await else { return };
    let user = app.create_user(1_000_000).await;

    let upload = app.upload(&user, None, "data.csv", b"a,b\n1,2\n").await;
    let file = id_of(&upload.body["data"]);

    let link = app
        .request("GET", &format!("/api/resources/{file}/download"), None, Some(&user.token))
        .await;
    assert_eq!(link.status, StatusCode::OK);
    let signed_url = link.body["data"]["signedUrl"].as_str().unwrap().to_string();

    let blob = app.fetch_signed(&signed_url).await;
    assert_eq!(blob.status, StatusCode::OK);
    assert_eq!(&blob.bytes[..], b"a,b\n1,2\n");

    let folder = app.folder(&user, "Folder", None).await;
    let folder_link = app
        .request("GET", &format!("/api/resources/{folder}/download"), None, Some(&user.token))
        .await;
    assert_eq!(folder_link.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_resources_are_owner_scoped() {
    let Some(app) = TestApp::new().await else { return };
    let owner = app.create_user(1_000_000).await;
    let stranger = app.create_user(1_000_000).await;

    let folder = app.folder(&owner, "Private", None).await;

    let peek = app
        .request("GET", &format!("/api/resources/{folder}"), None, Some(&stranger.token))
        .await;
    assert_eq!(peek.status, StatusCode::NOT_FOUND);

    let rename = app
        .request(
            "PATCH",
            &format!("/api/resources/{folder}/rename"),
            Some(json!({ "name": "Mine now" })),
            Some(&stranger.token),
        )
        .await;
    assert_eq!(rename.status, StatusCode::NOT_FOUND);

    let missing = app
        .request("GET", &format!("/api/resources/{}", missing_id()), None, Some(&owner.token))
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_activity_is_recorded() {
    let Some(app) = TestApp::new().await else { return };
    let user = app.create_user(1_000_000).await;

    let folder = app.folder(&user, "Work", None).await;
    app.upload(&user, Some(&folder), "plan.md", b"# plan").await;

    let activity = app
        .request("GET", "/api/activity?includeTotal=true", None, Some(&user.token))
        .await;
    assert_eq!(activity.status, StatusCode::OK);
    assert_eq!(activity.body["meta"]["totalCount"], 2);

    let mut types: Vec<&str> = activity.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["activityType"].as_str().unwrap())
        .collect();
    types.sort_unstable();
    assert_eq!(types, vec!["create", "upload"]);
}
