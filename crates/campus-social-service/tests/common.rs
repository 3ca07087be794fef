//! Common test utilities for campus-social integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use serde_json::{json, Value};

use campus_social_core::AccountId;
use campus_social_service::{create_router, AppState, ServiceConfig};
use campus_social_store::MemoryStore;

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// The backing store, for fault injection.
    pub store: Arc<MemoryStore>,
    /// A test account ID for authenticated requests.
    pub test_user_id: AccountId,
}

impl TestHarness {
    /// Create a new test harness with an empty store.
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            auth_base_url: "http://localhost".into(),
            ..ServiceConfig::default()
        };

        let state = AppState::new(store.clone(), config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            store,
            test_user_id: AccountId::generate(),
        }
    }

    /// Get the authorization header for the test user.
    pub fn user_auth_header(&self) -> String {
        auth_header(self.test_user_id)
    }

    /// Register the test user.
    pub async fn register_self(&self, email: &str, username: Option<&str>) -> Value {
        self.register(self.test_user_id, email, username).await
    }

    /// Register `id` and return the response body.
    pub async fn register(&self, id: AccountId, email: &str, username: Option<&str>) -> Value {
        let response = self
            .server
            .post("/v1/accounts")
            .add_header("authorization", auth_header(id))
            .json(&json!({
                "email": email,
                "username": username,
                "first_name": email.split('@').next(),
            }))
            .await;
        response.assert_status_ok();
        response.json()
    }

    /// Register a fresh account and return its id.
    pub async fn other_user(&self, email: &str) -> AccountId {
        let id = AccountId::generate();
        self.register(id, email, None).await;
        id
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Bearer header accepted by the test-auth bypass.
pub fn auth_header(id: AccountId) -> String {
    format!("Bearer test-token:{id}")
}
