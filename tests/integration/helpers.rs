//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use shelf_auth::JwtEncoder;
use shelf_core::config::AppConfig;
use shelf_database::{StoreManager, StoreProvider};

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Application config
    pub config: AppConfig,
    encoder: JwtEncoder,
}

impl TestApp {
    /// Create a new test application.
    ///
    /// Runs over a fresh in-memory store, or over PostgreSQL when
    /// `SHELF_TEST_DATABASE_URL` is set.
    pub async fn new() -> Self {
        Self::with_config(AppConfig::default()).await
    }

    /// Create a test application with a customized configuration
    pub async fn with_config(mut config: AppConfig) -> Self {
        if let Some(url) = test_database_url() {
            if config.database.provider == "memory" {
                config.database.provider = "postgres".to_string();
                config.database.url = url;
                config.database.max_connections = 4;
                config.database.min_connections = 0;
            }
        }

        let store: Arc<dyn StoreProvider> = Arc::new(
            StoreManager::new(&config.database, &config.tree)
                .await
                .expect("Failed to init store"),
        );

        let encoder = JwtEncoder::new(&config.auth);
        let state = shelf_api::AppState::new(config.clone(), store);
        let router = shelf_api::build_app(state);

        Self {
            router,
            config,
            encoder,
        }
    }

    /// Mint a bearer token for a brand-new user
    pub fn new_user(&self) -> (Uuid, String) {
        let user_id = Uuid::new_v4();
        (user_id, self.token_for(user_id))
    }

    /// Mint a bearer token for `user_id`
    pub fn token_for(&self, user_id: Uuid) -> String {
        self.encoder
            .mint(user_id, Some(format!("{user_id}@test.com")))
            .expect("Failed to mint token")
            .token
    }

    /// Create a collection and return its id
    pub async fn create_collection(&self, token: &str, name: &str, parent: Option<&str>) -> String {
        let response = self
            .request(
                "POST",
                "/api/collections",
                Some(serde_json::json!({ "name": name, "parentId": parent })),
                Some(token),
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Create collection failed: {:?}",
            response.body
        );
        response.data()["id"]
            .as_str()
            .expect("No id in collection response")
            .to_string()
    }

    /// Create a comic in `collection_id` and return its id
    pub async fn create_comic(
        &self,
        token: &str,
        collection_id: &str,
        name: &str,
        is_read: bool,
    ) -> String {
        let response = self
            .request(
                "POST",
                "/api/comics",
                Some(serde_json::json!({
                    "collectionId": collection_id,
                    "name": name,
                    "path": format!("/library/{name}.cbz"),
                    "isRead": is_read,
                })),
                Some(token),
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Create comic failed: {:?}",
            response.body
        );
        response.data()["id"]
            .as_str()
            .expect("No id in comic response")
            .to_string()
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// PostgreSQL URL the suite should run against, if any
pub fn test_database_url() -> Option<String> {
    std::env::var("SHELF_TEST_DATABASE_URL")
        .ok()
        .filter(|url| !url.trim().is_empty())
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `data` member of a success envelope
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }
}
