//! Test harness: an in-memory document store plus helpers that drive the
//! real router in-process.

pub mod memory;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::config::{AppConfig, DatabaseConfig, Environment, SecurityConfig, ServerConfig};
use crate::middleware::AUTH_HEADER;
use crate::routes::{app, AppState};

pub use memory::MemoryStore;

pub fn test_config() -> AppConfig {
    AppConfig {
        environment: Environment::Development,
        server: ServerConfig { port: 0 },
        database: DatabaseConfig {
            url: None,
            max_connections: 1,
            acquire_timeout_secs: 1,
        },
        security: SecurityConfig {
            jwt_secret: "test-secret".to_string(),
            token_ttl_hours: 1,
            enable_cors: false,
        },
    }
}

pub struct TestApp {
    pub state: AppState,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let state = AppState {
            config: Arc::new(test_config()),
            store: Arc::new(MemoryStore::default()),
        };
        let router = app(state.clone());
        Self { state, router }
    }

    /// Send one request through the router, returning status and parsed body.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(AUTH_HEADER, token);
        }

        let request = match body {
            Some(value) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, value)
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request("GET", path, token, None).await
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request("POST", path, token, Some(body)).await
    }

    pub async fn put(&self, path: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request("PUT", path, token, Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request("DELETE", path, token, None).await
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) {
        let (status, _) = self
            .post(
                "/api/users/register",
                None,
                json!({ "name": name, "email": email, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "registration failed for {}", email);
    }

    /// Register and log in, returning a usable token.
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> String {
        self.register(name, email, password).await;
        let (status, body) = self
            .post(
                "/api/users/login",
                None,
                json!({ "email": email, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed for {}", email);
        body["token"].as_str().expect("token").to_string()
    }

    /// Create a complete profile for the token's user.
    pub async fn create_profile(&self, token: &str) {
        let (status, _) = self
            .post(
                "/api/profiles",
                Some(token),
                json!({
                    "company": "Acme",
                    "website": "https://acme.test",
                    "location": "Berlin",
                    "designation": "Engineer",
                    "skills": "rust, sql",
                    "bio": "builds things",
                    "githubUsername": "acme-dev"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "profile creation failed");
    }
}
