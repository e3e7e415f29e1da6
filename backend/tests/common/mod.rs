//! Common test utilities for integration tests
//!
//! Builds the real router against the in-memory gateways so every test
//! exercises the full request path without external services.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use gym_manager_backend::identity::MemoryIdentity;
use gym_manager_backend::store::MemoryStore;
use gym_manager_backend::{config::AppConfig, routes, state::AppState};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub store: Arc<MemoryStore>,
    pub identity: Arc<MemoryIdentity>,
}

impl TestApp {
    /// Create a new test application with in-memory gateways
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let identity = Arc::new(MemoryIdentity::new());
        let state = AppState::new(AppConfig::default(), store.clone(), identity.clone());
        let app = routes::create_router(state);

        Self {
            app,
            store,
            identity,
        }
    }

    /// Make a GET request and parse the JSON body
    pub async fn get(&self, path: &str) -> (StatusCode, Value) {
        let (status, body) = self.get_raw(path).await;
        let json = serde_json::from_str(&body).unwrap_or(Value::Null);
        (status, json)
    }

    /// Make a GET request and return the raw body
    pub async fn get_raw(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        self.send(request).await
    }

    /// Make a POST request with a JSON body and parse the JSON response
    pub async fn post(&self, path: &str, body: &Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let (status, body) = self.send(request).await;
        let json = serde_json::from_str(&body).unwrap_or(Value::Null);
        (status, json)
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body_str = String::from_utf8(body.to_vec()).unwrap();

        (status, body_str)
    }

    /// Create a gym through the API, returning its id.
    pub async fn seed_gym(&self, name: &str) -> String {
        let (status, body) = self
            .post(
                "/add-gym",
                &serde_json::json!({ "gym_name": name, "owner": "seed-owner" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "seed gym failed: {body}");
        body["gym_id"].as_str().unwrap().to_string()
    }

    /// Provision a member of the named gym through the API, returning the
    /// new user id.
    pub async fn seed_member(&self, name: &str, email: &str, gym: &str) -> String {
        let (status, body) = self
            .post(
                "/add-user",
                &serde_json::json!({
                    "name": name,
                    "role": "Member",
                    "contact_details": { "email": email },
                    "active_gym": { "gym_name": gym },
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "seed member failed: {body}");
        body["user_id"].as_str().unwrap().to_string()
    }
}
