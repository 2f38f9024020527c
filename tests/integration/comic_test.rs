//! Integration tests for comic CRUD, read toggling and reading stats.

mod helpers;

use axum::http::StatusCode;

#[tokio::test]
async fn test_create_comic_sets_read_at() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.new_user();
    let col = app.create_collection(&token, "Saga", None).await;

    let response = app
        .request(
            "POST",
            "/api/comics",
            Some(serde_json::json!({
                "collectionId": col,
                "name": "Saga #1",
                "path": "/library/Saga/saga-01.cbz",
                "directories": ["library", "Saga"],
                "isRead": true,
                "rating": 4,
            })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let data = response.data();
    assert_eq!(data["isRead"], true);
    assert!(data["readAt"].is_string());
    assert_eq!(data["rating"], 4);
    assert_eq!(data["directories"][1], "Saga");
    assert_eq!(data["collectionId"], col);
}

#[tokio::test]
async fn test_create_comic_validation() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.new_user();
    let col = app.create_collection(&token, "Saga", None).await;

    let bad_rating = app
        .request(
            "POST",
            "/api/comics",
            Some(serde_json::json!({
                "collectionId": col,
                "name": "Saga #2",
                "path": "/x.cbz",
                "rating": 11,
            })),
            Some(&token),
        )
        .await;
    assert_eq!(bad_rating.status, StatusCode::BAD_REQUEST);

    let missing_path = app
        .request(
            "POST",
            "/api/comics",
            Some(serde_json::json!({ "collectionId": col, "name": "Saga #2" })),
            Some(&token),
        )
        .await;
    assert_eq!(missing_path.status, StatusCode::BAD_REQUEST);

    let unknown_collection = app
        .request(
            "POST",
            "/api/comics",
            Some(serde_json::json!({
                "collectionId": uuid::Uuid::new_v4(),
                "name": "Orphan",
                "path": "/orphan.cbz",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(unknown_collection.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_toggle_read_twice() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.new_user();
    let col = app.create_collection(&token, "Saga", None).await;
    let comic = app.create_comic(&token, &col, "Saga #1", false).await;

    let first = app
        .request(
            "PATCH",
            &format!("/api/comics/{comic}/toggle-read"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.data()["isRead"], true);
    assert!(first.data()["readAt"].is_string());

    let second = app
        .request(
            "PATCH",
            &format!("/api/comics/{comic}/toggle-read"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(second.data()["isRead"], false);
    assert!(second.data()["readAt"].is_null());
}

#[tokio::test]
async fn test_update_comic_keeps_read_time_coupled() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.new_user();
    let col = app.create_collection(&token, "Saga", None).await;
    let comic = app.create_comic(&token, &col, "Saga #1", false).await;

    let response = app
        .request(
            "PATCH",
            &format!("/api/comics/{comic}"),
            Some(serde_json::json!({ "isRead": true, "comment": "great" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["isRead"], true);
    assert!(response.data()["readAt"].is_string());
    assert_eq!(response.data()["comment"], "great");

    let response = app
        .request(
            "PATCH",
            &format!("/api/comics/{comic}"),
            Some(serde_json::json!({ "rating": 2 })),
            Some(&token),
        )
        .await;
    assert_eq!(response.data()["comment"], "great");
    assert_eq!(response.data()["rating"], 2);
    assert_eq!(response.data()["isRead"], true);
}

#[tokio::test]
async fn test_list_comics_filters() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.new_user();
    let dc = app.create_collection(&token, "DC", None).await;
    let marvel = app.create_collection(&token, "Marvel", None).await;
    app.create_comic(&token, &dc, "Batman #1", true).await;
    app.create_comic(&token, &dc, "Batman #2", false).await;
    app.create_comic(&token, &marvel, "Spider-Man #1", false).await;

    let by_collection = app
        .request(
            "GET",
            &format!("/api/comics?collectionId={dc}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(by_collection.data().as_array().unwrap().len(), 2);

    let by_name = app
        .request("GET", "/api/comics?name=batman", None, Some(&token))
        .await;
    assert_eq!(by_name.data().as_array().unwrap().len(), 2);

    let combined = app
        .request(
            "GET",
            &format!("/api/comics?collectionId={dc}&isRead=true"),
            None,
            Some(&token),
        )
        .await;
    let combined = combined.data().as_array().unwrap().clone();
    assert_eq!(combined.len(), 1);
    assert_eq!(combined[0]["name"], "Batman #1");

    let bad = app
        .request("GET", "/api/comics?isRead=maybe", None, Some(&token))
        .await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_comics_are_isolated_per_user() {
    let app = helpers::TestApp::new().await;
    let (_, alice) = app.new_user();
    let (_, bob) = app.new_user();
    let col = app.create_collection(&alice, "Saga", None).await;
    let comic = app.create_comic(&alice, &col, "Saga #1", false).await;

    for (method, path) in [
        ("GET", format!("/api/comics/{comic}")),
        ("PATCH", format!("/api/comics/{comic}/toggle-read")),
        ("DELETE", format!("/api/comics/{comic}")),
    ] {
        let response = app.request(method, &path, None, Some(&bob)).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{method} {path}");
    }

    let listed = app.request("GET", "/api/comics", None, Some(&bob)).await;
    assert!(listed.data().as_array().unwrap().is_empty());

    let still_there = app
        .request("GET", &format!("/api/comics/{comic}"), None, Some(&alice))
        .await;
    assert_eq!(still_there.data()["isRead"], false);
}

#[tokio::test]
async fn test_delete_comic() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.new_user();
    let col = app.create_collection(&token, "Saga", None).await;
    let comic = app.create_comic(&token, &col, "Saga #1", false).await;

    let response = app
        .request("DELETE", &format!("/api/comics/{comic}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let again = app
        .request("DELETE", &format!("/api/comics/{comic}"), None, Some(&token))
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reading_stats() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.new_user();

    let empty = app
        .request("GET", "/api/comics/stats", None, Some(&token))
        .await;
    assert_eq!(empty.status, StatusCode::OK);
    assert_eq!(empty.data()["totalComics"], 0);
    assert_eq!(empty.data()["readPercentage"], 0.0);

    let col = app.create_collection(&token, "Saga", None).await;
    app.create_comic(&token, &col, "Saga #1", true).await;
    app.create_comic(&token, &col, "Saga #2", false).await;
    app.create_comic(&token, &col, "Saga #3", false).await;
    app.create_comic(&token, &col, "Saga #4", true).await;

    let stats = app
        .request("GET", "/api/comics/stats", None, Some(&token))
        .await;
    let data = stats.data();
    assert_eq!(data["totalComics"], 4);
    assert_eq!(data["readComics"], 2);
    assert_eq!(data["unreadComics"], 2);
    assert_eq!(data["readPercentage"], 50.0);
    assert_eq!(data["weeklyRead"], 2);
    assert_eq!(data["monthlyRead"], 2);
    assert_eq!(data["yearlyRead"], 2);
}
