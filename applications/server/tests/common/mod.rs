//! Common test utilities and fixtures

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use cadence_core::{CadenceError, Notifier};
use cadence_server::{build_state, create_router, AppState, ServerConfig};
use cadence_storage::Database;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tower::util::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-key";

/// Notifier that records what would have been sent
#[derive(Default)]
pub struct RecordingNotifier {
    pub fail: Mutex<bool>,
    pub verifications: Mutex<Vec<(String, String)>>,
    pub resets: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    pub fn last_verification_token(&self) -> Option<String> {
        self.verifications
            .lock()
            .unwrap()
            .last()
            .map(|(_, token)| token.clone())
    }

    pub fn last_reset_token(&self) -> Option<String> {
        self.resets.lock().unwrap().last().map(|(_, token)| token.clone())
    }

    fn check(&self) -> cadence_core::Result<()> {
        if *self.fail.lock().unwrap() {
            return Err(CadenceError::notification("SMTP unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_verification(&self, email: &str, token: &str) -> cadence_core::Result<()> {
        self.check()?;
        self.verifications
            .lock()
            .unwrap()
            .push((email.to_string(), token.to_string()));
        Ok(())
    }

    async fn send_password_reset(&self, email: &str, token: &str) -> cadence_core::Result<()> {
        self.check()?;
        self.resets
            .lock()
            .unwrap()
            .push((email.to_string(), token.to_string()));
        Ok(())
    }
}

/// Configuration suitable for tests: fixed secret, cheapest bcrypt cost
pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.auth.jwt_secret = TEST_SECRET.to_string();
    config.auth.bcrypt_cost = 4;
    config
}

/// Full application backed by a temp-file SQLite database
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub notifier: Arc<RecordingNotifier>,
    _temp_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_url = format!("sqlite://{}", temp_dir.path().join("test.db").display());
        let db = Arc::new(
            Database::connect(&db_url)
                .await
                .expect("Failed to open test database"),
        );

        let notifier = Arc::new(RecordingNotifier::default());
        let state = build_state(&test_config(), db, notifier.clone());
        let router = create_router(state.clone(), &[]);

        Self {
            router,
            state,
            notifier,
            _temp_dir: temp_dir,
        }
    }

    pub fn pool(&self) -> &sqlx::SqlitePool {
        self.state.db.pool()
    }

    /// Send a request and return the status with the parsed JSON body
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None, token).await
    }

    pub async fn post(&self, uri: &str, body: Option<Value>, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::POST, uri, body, token).await
    }

    pub async fn put(&self, uri: &str, body: Value, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(body), token).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None, token).await
    }

    /// Register through the API and return the access token
    pub async fn register(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .post(
                "/api/auth/register",
                Some(serde_json::json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": password,
                })),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK, "register failed: {body}");
        body["data"]["accessToken"].as_str().unwrap().to_string()
    }

    /// Create a verified admin directly and log in as it
    pub async fn admin_token(&self) -> String {
        self.state
            .credentials
            .provision("admin", "admin@example.com", "AdminPassword456!", true)
            .await
            .unwrap();
        let session = self
            .state
            .credentials
            .login("admin", "AdminPassword456!")
            .await
            .unwrap();
        session.access_token
    }
}
