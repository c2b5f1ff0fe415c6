//! Test helpers for HTTP API tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use serde_json::{json, Value};
use tempfile::TempDir;

use mailroom::config::Config;
use mailroom::web::handlers::AppState;
use mailroom::web::router::create_router;
use mailroom::Database;

/// A test server plus handles into its state.
pub struct TestContext {
    pub server: TestServer,
    pub state: Arc<AppState>,
    /// Keeps the upload directory alive for the duration of the test.
    pub upload_dir: TempDir,
}

impl TestContext {
    /// Absolute path of an upload referenced as `/uploads/{name}`.
    pub fn upload_path(&self, reference: &str) -> PathBuf {
        self.state
            .storage
            .resolve(reference)
            .expect("reference outside upload dir")
    }
}

/// Create a test configuration.
pub fn create_test_config(upload_dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.web.host = "127.0.0.1".to_string();
    config.web.port = 0;
    config.web.cors_origins = vec![];
    config.web.jwt_secret = "test-secret-key-for-testing-only".to_string();
    config.files.storage_path = upload_dir.path().to_string_lossy().into_owned();
    config.files.max_upload_size_mb = 1;
    config
}

/// Create a test server with an in-memory database.
pub async fn create_test_server() -> TestContext {
    create_test_server_with(|_| {}).await
}

/// Create a test server after adjusting the configuration.
pub async fn create_test_server_with(adjust: impl FnOnce(&mut Config)) -> TestContext {
    build_test_server(adjust, false).await
}

/// Create a test server bound to a real port, for WebSocket tests.
pub async fn create_http_test_server() -> TestContext {
    build_test_server(|_| {}, true).await
}

async fn build_test_server(adjust: impl FnOnce(&mut Config), http_transport: bool) -> TestContext {
    let upload_dir = TempDir::new().expect("Failed to create upload dir");
    let mut config = create_test_config(&upload_dir);
    adjust(&mut config);

    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    let state = Arc::new(AppState::from_config(&config, db).expect("Failed to build state"));

    let router = create_router(state.clone(), &config.web);
    let server = if http_transport {
        TestServer::builder().http_transport().build(router)
    } else {
        TestServer::new(router)
    }
    .expect("Failed to create test server");

    TestContext {
        server,
        state,
        upload_dir,
    }
}

/// Register a user and return the response body.
pub async fn register_user(server: &TestServer, name: &str, email: &str, password: &str) -> Value {
    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "name": name,
            "email": email,
            "password": password
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()
}

/// Send an email and return the response body.
pub async fn send_email(server: &TestServer, from: &str, to: &str, subject: &str, body: &str) -> Value {
    send_form(server, email_form(from, to, subject, body)).await
}

/// Send a prepared form and return the response body.
pub async fn send_form(server: &TestServer, form: MultipartForm) -> Value {
    let response = server.post("/api/emails/send").multipart(form).await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()
}

/// Build the required send fields.
pub fn email_form(from: &str, to: &str, subject: &str, body: &str) -> MultipartForm {
    MultipartForm::new()
        .add_text("from", from.to_string())
        .add_text("to", to.to_string())
        .add_text("subject", subject.to_string())
        .add_text("body", body.to_string())
}

/// A file part.
pub fn file_part(name: &str, content: &[u8]) -> Part {
    Part::bytes(content.to_vec()).file_name(name.to_string())
}

/// Subjects of a list response, in order.
pub fn subjects(list: &Value) -> Vec<String> {
    list.as_array()
        .expect("expected a JSON array")
        .iter()
        .map(|e| e["subject"].as_str().unwrap_or_default().to_string())
        .collect()
}
