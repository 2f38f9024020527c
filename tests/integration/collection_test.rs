//! Integration tests for collection CRUD, listings and subtree operations.

mod helpers;

use axum::http::StatusCode;
use serde_json::Value;

fn names(list: &Value) -> Vec<String> {
    let mut names: Vec<String> = list
        .as_array()
        .expect("expected an array")
        .iter()
        .map(|c| c["name"].as_str().unwrap_or_default().to_string())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_create_and_get_collection() {
    let app = helpers::TestApp::new().await;
    let (user_id, token) = app.new_user();

    let response = app
        .request(
            "POST",
            "/api/collections",
            Some(serde_json::json!({ "name": "  Marvel ", "rating": 4, "comment": "favorites" })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["success"], true);
    let data = response.data();
    assert_eq!(data["name"], "Marvel");
    assert_eq!(data["rating"], 4);
    assert_eq!(data["userId"], user_id.to_string());
    assert!(data["parentId"].is_null());

    let id = data["id"].as_str().unwrap();
    let response = app
        .request("GET", &format!("/api/collections/{id}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["comment"], "favorites");
}

#[tokio::test]
async fn test_create_collection_validation() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.new_user();

    let response = app
        .request(
            "POST",
            "/api/collections",
            Some(serde_json::json!({ "name": "DC", "rating": 9 })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");

    let response = app
        .request(
            "POST",
            "/api/collections",
            Some(serde_json::json!({ "name": "   " })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_collections_are_isolated_per_user() {
    let app = helpers::TestApp::new().await;
    let (_, alice) = app.new_user();
    let (_, bob) = app.new_user();

    let id = app.create_collection(&alice, "Private", None).await;

    let response = app
        .request("GET", &format!("/api/collections/{id}"), None, Some(&bob))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request(
            "PATCH",
            &format!("/api/collections/{id}"),
            Some(serde_json::json!({ "name": "Stolen" })),
            Some(&bob),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request("DELETE", &format!("/api/collections/{id}"), None, Some(&bob))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request("GET", "/api/collections", None, Some(&bob))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.data().as_array().unwrap().is_empty());

    let response = app
        .request(
            "POST",
            "/api/collections",
            Some(serde_json::json!({ "name": "Child", "parentId": id })),
            Some(&bob),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_by_parent() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.new_user();

    let dc = app.create_collection(&token, "DC", None).await;
    app.create_collection(&token, "Marvel", None).await;
    app.create_collection(&token, "Batman", Some(&dc)).await;
    app.create_collection(&token, "Superman", Some(&dc)).await;

    let all = app
        .request("GET", "/api/collections", None, Some(&token))
        .await;
    assert_eq!(all.data().as_array().unwrap().len(), 4);

    let roots = app
        .request("GET", "/api/collections?parent=null", None, Some(&token))
        .await;
    assert_eq!(names(roots.data()), vec!["DC", "Marvel"]);

    let children = app
        .request(
            "GET",
            &format!("/api/collections?parent={dc}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(names(children.data()), vec!["Batman", "Superman"]);

    let bad = app
        .request("GET", "/api/collections?parent=nope", None, Some(&token))
        .await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_fully_read_scope() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.new_user();

    let a = app.create_collection(&token, "A", None).await;
    let b = app.create_collection(&token, "B", Some(&a)).await;
    app.create_comic(&token, &a, "a1", true).await;
    app.create_comic(&token, &b, "b1", false).await;

    let direct = app
        .request("GET", "/api/collections?parent=null", None, Some(&token))
        .await;
    assert_eq!(direct.data()[0]["fullyRead"], true);
    assert_eq!(direct.data()[0]["comicCount"], 1);
    assert_eq!(direct.data()[0]["childCount"], 1);

    let recursive = app
        .request(
            "GET",
            "/api/collections?parent=null&scope=recursive",
            None,
            Some(&token),
        )
        .await;
    assert_eq!(recursive.data()[0]["fullyRead"], false);

    let bad = app
        .request("GET", "/api/collections?scope=deep", None, Some(&token))
        .await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_detail_and_tree() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.new_user();

    let dc = app.create_collection(&token, "DC", None).await;
    let batman = app.create_collection(&token, "Batman", Some(&dc)).await;
    app.create_collection(&token, "Robin", Some(&batman)).await;
    app.create_comic(&token, &batman, "Batman #1", false).await;

    let detail = app
        .request(
            "GET",
            &format!("/api/collections/{batman}/detail"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(detail.status, StatusCode::OK);
    assert_eq!(detail.data()["collection"]["name"], "Batman");
    assert_eq!(detail.data()["comics"].as_array().unwrap().len(), 1);
    assert_eq!(names(&detail.data()["children"]), vec!["Robin"]);

    let tree = app
        .request("GET", "/api/collections/tree", None, Some(&token))
        .await;
    assert_eq!(tree.status, StatusCode::OK);
    let forest = tree.data().as_array().unwrap();
    assert_eq!(forest.len(), 1);
    assert_eq!(forest[0]["name"], "DC");
    assert_eq!(forest[0]["children"][0]["name"], "Batman");
    assert_eq!(forest[0]["children"][0]["comicCount"], 1);
    assert_eq!(forest[0]["children"][0]["children"][0]["depth"], 2);

    let sub = app
        .request(
            "GET",
            &format!("/api/collections/tree?root={batman}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(sub.data()[0]["name"], "Batman");
    assert_eq!(sub.data()[0]["depth"], 0);
}

#[tokio::test]
async fn test_update_collection_merges_fields() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.new_user();

    let id = app.create_collection(&token, "Image", None).await;

    let response = app
        .request(
            "PATCH",
            &format!("/api/collections/{id}"),
            Some(serde_json::json!({ "comment": "indie" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request(
            "PATCH",
            &format!("/api/collections/{id}"),
            Some(serde_json::json!({ "rating": 3 })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["name"], "Image");
    assert_eq!(response.data()["comment"], "indie");
    assert_eq!(response.data()["rating"], 3);
}

#[tokio::test]
async fn test_delete_removes_whole_subtree() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.new_user();

    let a = app.create_collection(&token, "A", None).await;
    let b = app.create_collection(&token, "B", Some(&a)).await;
    let c = app.create_collection(&token, "C", Some(&b)).await;
    let keep = app.create_collection(&token, "Keep", None).await;
    app.create_comic(&token, &a, "a1", false).await;
    let deep = app.create_comic(&token, &c, "c1", false).await;
    app.create_comic(&token, &keep, "k1", false).await;

    let response = app
        .request("DELETE", &format!("/api/collections/{a}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["collectionsDeleted"], 3);
    assert_eq!(response.data()["comicsDeleted"], 2);

    for id in [&a, &b, &c] {
        let gone = app
            .request("GET", &format!("/api/collections/{id}"), None, Some(&token))
            .await;
        assert_eq!(gone.status, StatusCode::NOT_FOUND);
    }
    let gone = app
        .request("GET", &format!("/api/comics/{deep}"), None, Some(&token))
        .await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);

    let remaining = app.request("GET", "/api/comics", None, Some(&token)).await;
    assert_eq!(remaining.data().as_array().unwrap().len(), 1);

    let again = app
        .request("DELETE", &format!("/api/collections/{a}"), None, Some(&token))
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_mark_read_direct_and_recursive() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.new_user();

    let a = app.create_collection(&token, "A", None).await;
    let b = app.create_collection(&token, "B", Some(&a)).await;
    app.create_comic(&token, &a, "a1", false).await;
    app.create_comic(&token, &a, "a2", false).await;
    app.create_comic(&token, &b, "b1", false).await;

    let direct = app
        .request(
            "PATCH",
            &format!("/api/collections/{a}/mark-read"),
            Some(serde_json::json!({ "isRead": true })),
            Some(&token),
        )
        .await;
    assert_eq!(direct.status, StatusCode::OK);
    assert_eq!(direct.data()["updated"], 2);

    let unread = app
        .request("GET", "/api/comics?isRead=false", None, Some(&token))
        .await;
    assert_eq!(unread.data().as_array().unwrap().len(), 1);

    let recursive = app
        .request(
            "PATCH",
            &format!("/api/collections/{a}/mark-read"),
            Some(serde_json::json!({ "isRead": false, "recursive": true })),
            Some(&token),
        )
        .await;
    assert_eq!(recursive.data()["updated"], 3);

    let read = app
        .request("GET", "/api/comics?isRead=true", None, Some(&token))
        .await;
    assert!(read.data().as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_uuid_path_is_rejected() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.new_user();

    let response = app
        .request("GET", "/api/collections/not-a-uuid", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
