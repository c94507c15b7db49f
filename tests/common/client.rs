//! Client side helpers for end-to-end tests
//!
//! Wraps the real `ApiClient` so tests exercise the production request,
//! cookie and error handling paths against the stub backend.

use super::constants::*;
use eventdesk::api::{ApiClient, AuthApi, Credentials};
use eventdesk::{App, RequestsLoggingLevel};
use std::sync::Arc;

/// API client with its own cookie jar
pub struct TestClient {
    pub api: Arc<ApiClient>,
    pub base_url: String,
}

impl TestClient {
    /// Creates a client without a session
    pub fn new(base_url: String) -> Self {
        let api = ApiClient::new(
            base_url.clone(),
            REQUEST_TIMEOUT_SECS,
            RequestsLoggingLevel::None,
        )
        .expect("Failed to build api client");
        Self {
            api: Arc::new(api),
            base_url,
        }
    }

    /// Creates a client already signed in as `TEST_USER`
    ///
    /// # Panics
    ///
    /// Panics if authentication fails (indicates test infrastructure problem).
    pub async fn authenticated(base_url: String) -> Self {
        let client = Self::new(base_url);
        client
            .api
            .login(&Credentials {
                username: TEST_USER.to_string(),
                password: TEST_PASS.to_string(),
            })
            .await
            .expect("Test user authentication failed");
        client
    }

    /// An app sharing this client's cookie jar, with the session check
    /// already done.
    pub async fn started_app(&self) -> App {
        let app = App::with_client(self.api.clone());
        app.start().await;
        app
    }
}
