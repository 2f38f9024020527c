//! Integration tests for bearer-token authentication and health.

mod helpers;

use axum::http::StatusCode;
use shelf_auth::JwtEncoder;
use shelf_core::config::AppConfig;

#[tokio::test]
async fn test_health_is_public() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["status"], "ok");
    assert_eq!(response.data()["store"], "memory");
    assert_eq!(response.data()["storeHealthy"], true);
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/api/collections", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_malformed_header_is_unauthorized() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request("GET", "/api/comics", None, Some("not-a-jwt"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_rejected() {
    let app = helpers::TestApp::new().await;

    let mut other = AppConfig::default();
    other.auth.jwt_secret = "some-other-secret".to_string();
    let forged = JwtEncoder::new(&other.auth)
        .mint(uuid::Uuid::new_v4(), None)
        .unwrap()
        .token;

    let response = app
        .request("GET", "/api/collections", None, Some(&forged))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let app = helpers::TestApp::new().await;

    let expired = JwtEncoder::new(&app.config.auth)
        .with_ttl_minutes(-10)
        .mint(uuid::Uuid::new_v4(), None)
        .unwrap()
        .token;

    let response = app
        .request("GET", "/api/comics/stats", None, Some(&expired))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_same_subject_sees_same_library() {
    let app = helpers::TestApp::new().await;
    let (user_id, first_token) = app.new_user();
    app.create_collection(&first_token, "Marvel", None).await;

    let second_token = app.token_for(user_id);
    let response = app
        .request("GET", "/api/collections", None, Some(&second_token))
        .await;
    assert_eq!(response.data()[0]["name"], "Marvel");
}
