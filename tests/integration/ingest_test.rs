//! Integration tests for folder-structure ingestion.

mod helpers;

use axum::http::StatusCode;
use serde_json::{Value, json};

fn dc_structure(mode: &str) -> Value {
    json!({
        "mode": mode,
        "structure": {
            "name": "DC",
            "comics": [],
            "children": [{
                "name": "Batman",
                "comics": [
                    { "name": "The Batman #1", "path": "DC/Batman/The Batman #1.pdf" },
                    { "name": "The Batman #2", "path": "DC/Batman/The Batman #2.pdf" }
                ],
                "children": []
            }]
        }
    })
}

async fn comic_count(app: &helpers::TestApp, token: &str) -> usize {
    app.request("GET", "/api/comics", None, Some(token))
        .await
        .data()
        .as_array()
        .map(Vec::len)
        .unwrap_or_default()
}

async fn collection_count(app: &helpers::TestApp, token: &str) -> usize {
    app.request("GET", "/api/collections", None, Some(token))
        .await
        .data()
        .as_array()
        .map(Vec::len)
        .unwrap_or_default()
}

#[tokio::test]
async fn test_upload_creates_nested_collections() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.new_user();

    let response = app
        .request(
            "POST",
            "/api/collections/upload-structure",
            Some(dc_structure("create")),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let data = response.data();
    assert_eq!(data["root"]["name"], "DC");
    assert_eq!(data["mode"], "create");
    assert_eq!(data["collectionsCreated"], 2);
    assert_eq!(data["comicsInserted"], 2);

    let tree = app
        .request("GET", "/api/collections/tree", None, Some(&token))
        .await;
    assert_eq!(tree.data()[0]["children"][0]["name"], "Batman");
    assert_eq!(tree.data()[0]["children"][0]["comicCount"], 2);
}

#[tokio::test]
async fn test_overwrite_is_idempotent() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.new_user();

    for _ in 0..2 {
        let response = app
            .request(
                "POST",
                "/api/collections/upload-structure",
                Some(dc_structure("overwrite")),
                Some(&token),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    assert_eq!(collection_count(&app, &token).await, 2);
    assert_eq!(comic_count(&app, &token).await, 2);
}

#[tokio::test]
async fn test_append_duplicates_comics_not_collections() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.new_user();

    for _ in 0..2 {
        app.request(
            "POST",
            "/api/collections/upload-structure",
            Some(dc_structure("append")),
            Some(&token),
        )
        .await;
    }

    assert_eq!(collection_count(&app, &token).await, 2);
    assert_eq!(comic_count(&app, &token).await, 4);
}

#[tokio::test]
async fn test_overwrite_resets_read_state_of_matched_collections() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.new_user();

    app.request(
        "POST",
        "/api/collections/upload-structure",
        Some(dc_structure("create")),
        Some(&token),
    )
    .await;
    let comics = app.request("GET", "/api/comics", None, Some(&token)).await;
    let first = comics.data()[0]["id"].as_str().unwrap().to_string();
    app.request(
        "PATCH",
        &format!("/api/comics/{first}/toggle-read"),
        None,
        Some(&token),
    )
    .await;

    app.request(
        "POST",
        "/api/collections/upload-structure",
        Some(dc_structure("overwrite")),
        Some(&token),
    )
    .await;

    let read = app
        .request("GET", "/api/comics?isRead=true", None, Some(&token))
        .await;
    assert!(read.data().as_array().unwrap().is_empty());
    assert_eq!(comic_count(&app, &token).await, 2);
}

#[tokio::test]
async fn test_flat_file_list_upload() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.new_user();

    let response = app
        .request(
            "POST",
            "/api/collections/upload-structure",
            Some(json!({
                "mode": "create",
                "collectionName": "Library",
                "comics": [
                    { "path": "My Comics/loose.cbz", "directories": ["My Comics"] },
                    {
                        "path": "My Comics/DC/Batman/The Batman #1.pdf",
                        "directories": ["My Comics", "DC", "Batman"]
                    }
                ]
            })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.data()["root"]["name"], "Library");
    assert_eq!(response.data()["collectionsCreated"], 3);
    assert_eq!(response.data()["comicsInserted"], 2);

    let roots = app
        .request("GET", "/api/collections?parent=null", None, Some(&token))
        .await;
    assert_eq!(roots.data()[0]["name"], "Library");
    assert_eq!(roots.data()[0]["comicCount"], 1);
}

#[tokio::test]
async fn test_upload_under_parent() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.new_user();
    let shelf = app.create_collection(&token, "Shelf", None).await;

    let mut body = dc_structure("create");
    body["parentId"] = json!(shelf);

    let response = app
        .request(
            "POST",
            "/api/collections/upload-structure",
            Some(body),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.data()["root"]["parentId"], shelf);
}

#[tokio::test]
async fn test_upload_rejections() {
    let app = helpers::TestApp::new().await;
    let (_, alice) = app.new_user();
    let (_, bob) = app.new_user();
    let foreign = app.create_collection(&alice, "Alice", None).await;

    let mut body = dc_structure("append");
    body["parentId"] = json!(foreign);
    let response = app
        .request(
            "POST",
            "/api/collections/upload-structure",
            Some(body),
            Some(&bob),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(collection_count(&app, &bob).await, 0);

    let response = app
        .request(
            "POST",
            "/api/collections/upload-structure",
            Some(dc_structure("merge")),
            Some(&bob),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request(
            "POST",
            "/api/collections/upload-structure",
            Some(json!({ "mode": "create" })),
            Some(&bob),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request(
            "POST",
            "/api/collections/upload-structure",
            Some(json!({
                "mode": "create",
                "structure": { "name": "DC", "children": [{ "name": "  " }] }
            })),
            Some(&bob),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(collection_count(&app, &bob).await, 0);
}
