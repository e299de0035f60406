//! ApiBlaze Dashboard Client Library
//!
//! A Rust client library for the ApiBlaze admin dashboard, providing a
//! typed client for the administrative API (projects, AuthConfigs, app
//! clients, identity providers) and the per-team dashboard cache store the
//! dashboard UI reads from.

pub mod admin;
pub mod config;
pub mod error;
pub mod fetch;
pub mod store;

use std::sync::{Arc, RwLock};

use reqwest::Client;

use crate::admin::AdminApi;
use crate::config::ClientOptions;
use crate::store::DashboardStore;

/// The main entry point for the ApiBlaze dashboard client
pub struct ApiBlaze {
    /// The base URL of the ApiBlaze deployment
    pub url: String,
    /// HTTP client used for requests
    pub http_client: Client,
    /// The bearer credential supplied by the session layer
    access_token: Arc<RwLock<Option<String>>>,
    /// Typed client for the administrative API
    admin: AdminApi,
    /// Client options
    pub options: ClientOptions,
}

impl ApiBlaze {
    /// Create a new ApiBlaze client
    ///
    /// # Arguments
    ///
    /// * `url` - The base URL of your ApiBlaze deployment
    ///
    /// # Example
    ///
    /// ```
    /// use apiblaze_dashboard::ApiBlaze;
    ///
    /// let apiblaze = ApiBlaze::new("https://api.example.com");
    /// ```
    pub fn new(url: &str) -> Self {
        Self::new_with_options(url, ClientOptions::default())
    }

    /// Create a new ApiBlaze client with custom options
    ///
    /// # Example
    ///
    /// ```
    /// use apiblaze_dashboard::{config::ClientOptions, ApiBlaze};
    ///
    /// let options = ClientOptions::default().with_admin_path("/admin/v2");
    /// let apiblaze = ApiBlaze::new_with_options("https://api.example.com", options);
    /// ```
    pub fn new_with_options(url: &str, options: ClientOptions) -> Self {
        let mut builder = Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().unwrap_or_default();

        let access_token = Arc::new(RwLock::new(None));
        let admin = AdminApi::new(url, http_client.clone(), access_token.clone(), options.clone());

        Self {
            url: url.to_string(),
            http_client,
            access_token,
            admin,
            options,
        }
    }

    /// Set the bearer credential attached to administrative API requests.
    ///
    /// The session layer owns credential lifecycle; pass `None` on signout.
    pub fn set_access_token(&self, token: Option<String>) {
        if let Ok(mut slot) = self.access_token.write() {
            *slot = token;
        }
    }

    /// Get a reference to the administrative API client
    pub fn admin(&self) -> &AdminApi {
        &self.admin
    }

    /// Create a dashboard cache store scoped to one team.
    ///
    /// One store per team scope: create it on team entry, drop it on team
    /// switch. Clones of the returned store share one cache.
    ///
    /// # Example
    ///
    /// ```
    /// use apiblaze_dashboard::ApiBlaze;
    ///
    /// let apiblaze = ApiBlaze::new("https://api.example.com");
    /// let store = apiblaze.store("team-1");
    /// ```
    pub fn store(&self, team_id: &str) -> DashboardStore {
        DashboardStore::new(self.admin.clone(), team_id)
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::config::ClientOptions;
    pub use crate::error::Error;
    pub use crate::store::DashboardStore;
    pub use crate::ApiBlaze;
}
