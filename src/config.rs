//! Configuration options for the ApiBlaze dashboard client

use std::time::Duration;

/// Configuration options for the ApiBlaze dashboard client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The request timeout applied to every call against the administrative API
    pub request_timeout: Option<Duration>,

    /// The path prefix of the administrative API
    pub admin_path: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Some(Duration::from_secs(30)),
            admin_path: "/admin/v1".to_string(),
        }
    }
}

impl ClientOptions {
    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the administrative API path prefix
    pub fn with_admin_path(mut self, value: &str) -> Self {
        self.admin_path = value.to_string();
        self
    }
}
