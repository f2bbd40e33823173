//! Shared test utilities and fixtures
//!
//! A mock calculation service and helpers for driving an `App` against it.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use abacus_engine::{Action, App, FileStore, HttpCalculationService, KeyValueStore, Operator};

/// Start a mock server that simulates the calculation API
pub async fn start_calculator_mock() -> MockServer {
    MockServer::start().await
}

/// Answer one exact request body with `{success: true, operation, result}`.
pub async fn mount_success(server: &MockServer, request: Value, label: &str, result: f64) {
    Mock::given(method("POST"))
        .and(path("/api/calculate"))
        .and(body_json(request))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "operation": label,
            "result": result
        })))
        .expect(1)
        .mount(server)
        .await;
}

/// Answer any calculation with `{success: false, error}` and the given status.
pub async fn mount_failure(server: &MockServer, status: u16, error: &str) {
    Mock::given(method("POST"))
        .and(path("/api/calculate"))
        .respond_with(ResponseTemplate::new(status).set_body_json(serde_json::json!({
            "success": false,
            "error": error
        })))
        .mount(server)
        .await;
}

pub async fn mount_health(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "healthy",
            "service": "Calculator API",
            "version": "1.0.0"
        })))
        .mount(server)
        .await;
}

pub fn http_service(base_url: &str) -> Arc<HttpCalculationService> {
    Arc::new(
        HttpCalculationService::new(base_url, Duration::from_secs(2))
            .expect("mock server URL is valid"),
    )
}

/// App talking to `server`, with history in `store`.
pub fn app_for(server: &MockServer, store: impl KeyValueStore + 'static) -> App {
    App::new(http_service(&server.uri()), Box::new(store))
}

pub fn file_store(dir: &std::path::Path) -> FileStore {
    FileStore::new(dir)
}

/// Type keys as the keyboard map would.
pub fn press(app: &mut App, keys: &str) {
    for key in keys.chars() {
        let action = match key {
            '0'..='9' | '.' => Action::Insert(key),
            '+' => Action::Operator(Operator::Add),
            '-' => Action::Operator(Operator::Subtract),
            '*' => Action::Operator(Operator::Multiply),
            '/' => Action::Operator(Operator::Divide),
            '^' => Action::Operator(Operator::Power),
            '%' => Action::Operator(Operator::Mod),
            'o' => Action::Operator(Operator::Cos),
            'l' => Action::Operator(Operator::Log),
            'n' => Action::ToggleSign,
            '<' => Action::Backspace,
            '=' => Action::Evaluate,
            other => panic!("no test mapping for {other:?}"),
        };
        app.dispatch(action);
    }
}
