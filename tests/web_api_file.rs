//! Web API File/Folder Tests
//!
//! Integration tests for the file, folder, upload and trash endpoints.

mod common;

use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use common::{add_file, add_folder, bearer, create_test_app, create_test_app_with};
use droply::config::DeletionConfig;
use serde_json::{json, Value};

// ============================================================================
// DELETE /api/files/:id
// ============================================================================

#[tokio::test]
async fn test_delete_file_success() {
    let app = create_test_app().await;
    let repo = app.repo();
    let file = add_file(&repo, &app.objects, "user_a", None, "a.png", Some("ik_a")).await;

    let response = app
        .server
        .delete(&format!("/api/files/{}", file.id))
        .add_header(AUTHORIZATION, bearer("user_a"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["id"], file.id.as_str());
    assert_eq!(body["data"]["name"], "a.png");
    assert_eq!(body["data"]["imagekitId"], "ik_a");
    assert!(!app.objects.contains("ik_a"));
    assert!(repo.get_by_id(&file.id, "user_a").await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_folder_recursively() {
    let app = create_test_app().await;
    let repo = app.repo();
    let folder = add_folder(&repo, "user_a", None, "Photos").await;
    let sub = add_folder(&repo, "user_a", Some(&folder), "2024").await;
    add_file(&repo, &app.objects, "user_a", Some(&folder), "x.png", Some("r1")).await;
    add_file(&repo, &app.objects, "user_a", Some(&sub), "y.png", Some("r2")).await;

    let response = app
        .server
        .delete(&format!("/api/files/{}", folder.id))
        .add_header(AUTHORIZATION, bearer("user_a"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["isFolder"], true);
    assert_eq!(repo.count("user_a").await.unwrap(), 0);
    assert_eq!(app.objects.delete_count("r1"), 1);
    assert_eq!(app.objects.delete_count("r2"), 1);
}

#[tokio::test]
async fn test_delete_file_not_found() {
    let app = create_test_app().await;

    let response = app
        .server
        .delete("/api/files/does-not-exist")
        .add_header(AUTHORIZATION, bearer("user_a"))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_delete_other_users_file() {
    let app = create_test_app().await;
    let repo = app.repo();
    let file = add_file(&repo, &app.objects, "user_b", None, "b.png", Some("ik_b")).await;

    let response = app
        .server
        .delete(&format!("/api/files/{}", file.id))
        .add_header(AUTHORIZATION, bearer("user_a"))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert!(repo.get_by_id(&file.id, "user_b").await.unwrap().is_some());
    assert!(app.objects.delete_calls().is_empty());
}

#[tokio::test]
async fn test_delete_requires_auth() {
    let app = create_test_app().await;

    let response = app.server.delete("/api/files/anything").await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let response = app
        .server
        .delete("/api/files/anything")
        .add_header(AUTHORIZATION, "Bearer not-a-jwt")
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_delete_partial_failure() {
    let app = create_test_app().await;
    let repo = app.repo();
    let folder = add_folder(&repo, "user_a", None, "F").await;
    add_file(&repo, &app.objects, "user_a", Some(&folder), "a.png", Some("ik_a")).await;
    let stuck = add_file(&repo, &app.objects, "user_a", Some(&folder), "stuck.png", Some("ik_s")).await;
    app.objects.fail_on("ik_s");

    let response = app
        .server
        .delete(&format!("/api/files/{}", folder.id))
        .add_header(AUTHORIZATION, bearer("user_a"))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "PARTIAL_FAILURE");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("stuck.png"));
    assert_eq!(body["error"]["details"]["failed"][0]["id"], stuck.id.as_str());
    assert_eq!(
        body["error"]["details"]["failed"][0]["reason"],
        "remote_delete_failed"
    );
    assert!(repo.get_by_id(&stuck.id, "user_a").await.unwrap().is_some());
}

#[tokio::test]
async fn test_delete_respects_configured_depth() {
    let app = create_test_app_with(DeletionConfig {
        max_depth: 1,
        timeout_secs: 0,
    })
    .await;
    let repo = app.repo();
    let top = add_folder(&repo, "user_a", None, "top").await;
    let mid = add_folder(&repo, "user_a", Some(&top), "mid").await;
    let deep = add_file(&repo, &app.objects, "user_a", Some(&mid), "deep.png", Some("ik_d")).await;

    let response = app
        .server
        .delete(&format!("/api/files/{}", top.id))
        .add_header(AUTHORIZATION, bearer("user_a"))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(
        body["error"]["details"]["failed"][0]["reason"],
        "depth_exceeded"
    );
    assert!(repo.get_by_id(&deep.id, "user_a").await.unwrap().is_some());
}

// ============================================================================
// DELETE /api/trash
// ============================================================================

#[tokio::test]
async fn test_empty_trash_when_empty() {
    let app = create_test_app().await;

    let response = app
        .server
        .delete("/api/trash")
        .add_header(AUTHORIZATION, bearer("user_a"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["message"], "No files in trash");
    assert_eq!(body["data"]["deletedCount"], 0);
}

#[tokio::test]
async fn test_empty_trash_success() {
    let app = create_test_app().await;
    let repo = app.repo();
    let a = add_file(&repo, &app.objects, "user_a", None, "a.png", Some("ik_a")).await;
    let kept = add_file(&repo, &app.objects, "user_a", None, "kept.png", Some("ik_k")).await;
    repo.toggle_trash(&a.id, "user_a").await.unwrap();

    let response = app
        .server
        .delete("/api/trash")
        .add_header(AUTHORIZATION, bearer("user_a"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(
        body["data"]["message"],
        "Trash emptied successfully, deleted 1 file(s)"
    );
    assert!(repo.get_by_id(&a.id, "user_a").await.unwrap().is_none());
    assert!(repo.get_by_id(&kept.id, "user_a").await.unwrap().is_some());
}

#[tokio::test]
async fn test_empty_trash_partial_failure() {
    let app = create_test_app().await;
    let repo = app.repo();
    let a = add_file(&repo, &app.objects, "user_a", None, "a.png", Some("ik_a")).await;
    let b = add_file(&repo, &app.objects, "user_a", None, "b.png", Some("ik_b")).await;
    repo.toggle_trash(&a.id, "user_a").await.unwrap();
    repo.toggle_trash(&b.id, "user_a").await.unwrap();
    app.objects.fail_on("ik_b");

    let response = app
        .server
        .delete("/api/trash")
        .add_header(AUTHORIZATION, bearer("user_a"))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(
        body["error"]["message"],
        "Removed 1 file(s), but failed to delete: b.png"
    );
    assert_eq!(body["error"]["details"]["failedNames"], json!(["b.png"]));
}

// ============================================================================
// POST /api/upload
// ============================================================================

#[tokio::test]
async fn test_upload_registers_file() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/api/upload")
        .add_header(AUTHORIZATION, bearer("user_a"))
        .json(&json!({
            "imagekit": {
                "fileId": "ik_new",
                "name": "cat.jpg",
                "size": 2048,
                "fileType": "image/jpeg",
                "url": "https://ik.imagekit.io/demo/cat.jpg"
            },
            "userId": "user_a"
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["name"], "cat.jpg");
    assert_eq!(body["data"]["path"], "/droply/user_a/cat.jpg");
    assert_eq!(body["data"]["size"], 2048);
    assert_eq!(body["data"]["type"], "image/jpeg");
    assert_eq!(body["data"]["imagekitId"], "ik_new");
    assert_eq!(body["data"]["userId"], "user_a");
    assert_eq!(body["data"]["isFolder"], false);
}

#[tokio::test]
async fn test_upload_defaults() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/api/upload")
        .add_header(AUTHORIZATION, bearer("user_a"))
        .json(&json!({
            "imagekit": { "url": "https://ik.imagekit.io/demo/x" },
            "userId": "user_a"
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["name"], "untitled");
    assert_eq!(body["data"]["path"], "/droply/user_a/untitled");
    assert_eq!(body["data"]["size"], 0);
    assert_eq!(body["data"]["type"], "image");
}

#[tokio::test]
async fn test_upload_user_mismatch() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/api/upload")
        .add_header(AUTHORIZATION, bearer("user_a"))
        .json(&json!({
            "imagekit": { "url": "https://ik.imagekit.io/demo/x" },
            "userId": "user_b"
        }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_upload_missing_url() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/api/upload")
        .add_header(AUTHORIZATION, bearer("user_a"))
        .json(&json!({
            "imagekit": { "name": "x.png" },
            "userId": "user_a"
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = app
        .server
        .post("/api/upload")
        .add_header(AUTHORIZATION, bearer("user_a"))
        .json(&json!({ "userId": "user_a" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_into_foreign_folder() {
    let app = create_test_app().await;
    let repo = app.repo();
    let theirs = add_folder(&repo, "user_b", None, "B").await;

    let response = app
        .server
        .post("/api/upload")
        .add_header(AUTHORIZATION, bearer("user_a"))
        .json(&json!({
            "imagekit": { "url": "https://ik.imagekit.io/demo/x" },
            "userId": "user_a",
            "parentId": theirs.id
        }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

// ============================================================================
// Folders, listing and flags
// ============================================================================

#[tokio::test]
async fn test_create_folder_and_list() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/api/folders")
        .add_header(AUTHORIZATION, bearer("user_a"))
        .json(&json!({ "name": "Docs" }))
        .await;
    response.assert_status_ok();
    let folder: Value = response.json();
    let folder_id = folder["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .server
        .post("/api/folders")
        .add_header(AUTHORIZATION, bearer("user_a"))
        .json(&json!({ "name": "Inner", "parentId": folder_id }))
        .await;
    response.assert_status_ok();

    let response = app
        .server
        .get("/api/files")
        .add_header(AUTHORIZATION, bearer("user_a"))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["name"], "Docs");

    let response = app
        .server
        .get(&format!("/api/files?parentId={}", folder_id))
        .add_header(AUTHORIZATION, bearer("user_a"))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"][0]["name"], "Inner");
    assert_eq!(body["data"][0]["path"], "/droply/user_a/Docs/Inner");

    // Another user sees nothing
    let response = app
        .server
        .get("/api/files")
        .add_header(AUTHORIZATION, bearer("user_b"))
        .await;
    let body: Value = response.json();
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_folder_validation() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/api/folders")
        .add_header(AUTHORIZATION, bearer("user_a"))
        .json(&json!({ "name": "   " }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["details"]["name"].is_array());
}

#[tokio::test]
async fn test_toggle_star_and_trash() {
    let app = create_test_app().await;
    let repo = app.repo();
    let file = add_file(&repo, &app.objects, "user_a", None, "a.png", None).await;

    let response = app
        .server
        .patch(&format!("/api/files/{}/star", file.id))
        .add_header(AUTHORIZATION, bearer("user_a"))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["isStarred"], true);

    let response = app
        .server
        .patch(&format!("/api/files/{}/trash", file.id))
        .add_header(AUTHORIZATION, bearer("user_a"))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["isTrash"], true);

    let response = app
        .server
        .patch(&format!("/api/files/{}/star", file.id))
        .add_header(AUTHORIZATION, bearer("user_b"))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_openapi_document() {
    let app = create_test_app().await;

    let response = app.server.get("/api/openapi.json").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["paths"]["/api/files/{id}"]["delete"].is_object());
}
