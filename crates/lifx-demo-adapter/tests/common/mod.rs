/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for lifx-demo-adapter tests

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use lifx_demo_adapter::{BackendClient, BackendConfig, BrowserState, SessionTracker};
use serde_json::{Value, json};
use wiremock::MockServer;

pub const TEST_DEMO_KEY: &str = "LifxDemo";

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client pointed at `base_url` with fresh in-memory state and no reset pause
pub fn client_for(base_url: &str, state: BrowserState) -> Arc<BackendClient> {
    let tracker = SessionTracker::new(state).with_reset_delay(Duration::ZERO);
    BackendClient::new(tracker, BackendConfig::new(base_url, TEST_DEMO_KEY))
        .expect("client should build")
        .into_shared()
}

pub fn test_client(server: &MockServer) -> Arc<BackendClient> {
    client_for(&server.uri(), BrowserState::in_memory())
}

/// One server log record as the backend serializes it
pub fn log_record(timestamp: &str, level: &str, message: &str) -> Value {
    json!({
        "timestamp": timestamp,
        "level": level,
        "message": message,
    })
}

pub fn logs_body(logs: Vec<Value>) -> Value {
    json!({
        "success": true,
        "count": logs.len(),
        "logs": logs,
    })
}

pub async fn request_count(server: &MockServer, request_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == request_path)
        .count()
}
