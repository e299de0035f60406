//! Typed client for the ApiBlaze administrative API.
//!
//! Every loader and mutation in this crate goes through [`AdminApi`]. The
//! API enforces authorization server-side; this client only attaches the
//! bearer credential supplied by the session layer. Callers are expected to
//! follow every mutation with
//! [`DashboardStore::invalidate_and_refetch`](crate::store::DashboardStore::invalidate_and_refetch)
//! rather than patching cached state by hand.

mod types;

use std::sync::{Arc, RwLock};

use reqwest::Client;

use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::{Fetch, FetchBuilder};

pub use types::*;

/// Client for the ApiBlaze administrative API
#[derive(Clone)]
pub struct AdminApi {
    /// The base URL of the ApiBlaze deployment
    url: String,

    /// HTTP client used for requests
    client: Client,

    /// The bearer credential supplied by the session layer
    access_token: Arc<RwLock<Option<String>>>,

    /// Client options
    options: ClientOptions,
}

impl AdminApi {
    /// Create a new AdminApi client
    pub(crate) fn new(
        url: &str,
        client: Client,
        access_token: Arc<RwLock<Option<String>>>,
        options: ClientOptions,
    ) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            client,
            access_token,
            options,
        }
    }

    fn admin_url(&self, path: &str) -> String {
        format!("{}{}{}", self.url, self.options.admin_path, path)
    }

    fn bearer_token(&self) -> Option<String> {
        self.access_token
            .read()
            .ok()
            .and_then(|token| token.clone())
    }

    fn authed<'a>(&self, builder: FetchBuilder<'a>) -> FetchBuilder<'a> {
        match self.bearer_token() {
            Some(token) => builder.bearer_auth(&token),
            None => builder,
        }
    }

    // ---- Projects -------------------------------------------------------

    /// List the projects of a team
    pub async fn list_projects(&self, team_id: &str) -> Result<Vec<Project>, Error> {
        let url = self.admin_url(&format!("/teams/{}/projects", team_id));
        self.authed(Fetch::get(&self.client, &url)).execute().await
    }

    /// Create a project under a team
    pub async fn create_project(
        &self,
        team_id: &str,
        request: &CreateProjectRequest,
    ) -> Result<Project, Error> {
        let url = self.admin_url(&format!("/teams/{}/projects", team_id));
        self.authed(Fetch::post(&self.client, &url))
            .json(request)?
            .execute()
            .await
    }

    /// Update a project
    pub async fn update_project(
        &self,
        team_id: &str,
        project_id: &str,
        request: &UpdateProjectRequest,
    ) -> Result<Project, Error> {
        let url = self.admin_url(&format!("/teams/{}/projects/{}", team_id, project_id));
        self.authed(Fetch::patch(&self.client, &url))
            .json(request)?
            .execute()
            .await
    }

    /// Delete a project
    pub async fn delete_project(&self, team_id: &str, project_id: &str) -> Result<(), Error> {
        let url = self.admin_url(&format!("/teams/{}/projects/{}", team_id, project_id));
        self.authed(Fetch::delete(&self.client, &url))
            .execute_empty()
            .await
    }

    // ---- AuthConfigs ----------------------------------------------------

    /// List the AuthConfigs of a team
    pub async fn list_auth_configs(&self, team_id: &str) -> Result<Vec<AuthConfig>, Error> {
        let url = self.admin_url(&format!("/teams/{}/auth-configs", team_id));
        self.authed(Fetch::get(&self.client, &url)).execute().await
    }

    /// Create an AuthConfig under a team
    pub async fn create_auth_config(
        &self,
        team_id: &str,
        request: &CreateAuthConfigRequest,
    ) -> Result<AuthConfig, Error> {
        let url = self.admin_url(&format!("/teams/{}/auth-configs", team_id));
        self.authed(Fetch::post(&self.client, &url))
            .json(request)?
            .execute()
            .await
    }

    /// Rename an AuthConfig
    pub async fn rename_auth_config(
        &self,
        team_id: &str,
        config_id: &str,
        name: &str,
    ) -> Result<AuthConfig, Error> {
        let url = self.admin_url(&format!("/teams/{}/auth-configs/{}", team_id, config_id));
        let request = CreateAuthConfigRequest {
            name: name.to_string(),
        };
        self.authed(Fetch::patch(&self.client, &url))
            .json(&request)?
            .execute()
            .await
    }

    /// Delete an AuthConfig.
    ///
    /// Deletion cascades server-side to the config's app clients and
    /// providers; the cache drops its child entries on the next
    /// invalidate-and-refetch.
    pub async fn delete_auth_config(&self, team_id: &str, config_id: &str) -> Result<(), Error> {
        let url = self.admin_url(&format!("/teams/{}/auth-configs/{}", team_id, config_id));
        self.authed(Fetch::delete(&self.client, &url))
            .execute_empty()
            .await
    }

    // ---- AppClients -----------------------------------------------------

    /// List the app clients of an AuthConfig
    pub async fn list_app_clients(&self, config_id: &str) -> Result<Vec<AppClient>, Error> {
        let url = self.admin_url(&format!("/auth-configs/{}/clients", config_id));
        self.authed(Fetch::get(&self.client, &url)).execute().await
    }

    /// Create an app client under an AuthConfig
    pub async fn create_app_client(
        &self,
        config_id: &str,
        request: &CreateAppClientRequest,
    ) -> Result<AppClient, Error> {
        let url = self.admin_url(&format!("/auth-configs/{}/clients", config_id));
        self.authed(Fetch::post(&self.client, &url))
            .json(request)?
            .execute()
            .await
    }

    /// Update an app client
    pub async fn update_app_client(
        &self,
        config_id: &str,
        client_id: &str,
        request: &UpdateAppClientRequest,
    ) -> Result<AppClient, Error> {
        let url = self.admin_url(&format!("/auth-configs/{}/clients/{}", config_id, client_id));
        self.authed(Fetch::patch(&self.client, &url))
            .json(request)?
            .execute()
            .await
    }

    /// Delete an app client
    pub async fn delete_app_client(&self, config_id: &str, client_id: &str) -> Result<(), Error> {
        let url = self.admin_url(&format!("/auth-configs/{}/clients/{}", config_id, client_id));
        self.authed(Fetch::delete(&self.client, &url))
            .execute_empty()
            .await
    }

    // ---- Providers ------------------------------------------------------
    //
    // Provider endpoints require both ancestor ids.

    /// List the providers of an app client
    pub async fn list_providers(
        &self,
        config_id: &str,
        client_id: &str,
    ) -> Result<Vec<Provider>, Error> {
        let url = self.admin_url(&format!(
            "/auth-configs/{}/clients/{}/providers",
            config_id, client_id
        ));
        self.authed(Fetch::get(&self.client, &url)).execute().await
    }

    /// Attach a provider to an app client
    pub async fn create_provider(
        &self,
        config_id: &str,
        client_id: &str,
        request: &CreateProviderRequest,
    ) -> Result<Provider, Error> {
        let url = self.admin_url(&format!(
            "/auth-configs/{}/clients/{}/providers",
            config_id, client_id
        ));
        self.authed(Fetch::post(&self.client, &url))
            .json(request)?
            .execute()
            .await
    }

    /// Update a provider
    pub async fn update_provider(
        &self,
        config_id: &str,
        client_id: &str,
        provider_id: &str,
        request: &UpdateProviderRequest,
    ) -> Result<Provider, Error> {
        let url = self.admin_url(&format!(
            "/auth-configs/{}/clients/{}/providers/{}",
            config_id, client_id, provider_id
        ));
        self.authed(Fetch::patch(&self.client, &url))
            .json(request)?
            .execute()
            .await
    }

    /// Detach a provider from an app client
    pub async fn delete_provider(
        &self,
        config_id: &str,
        client_id: &str,
        provider_id: &str,
    ) -> Result<(), Error> {
        let url = self.admin_url(&format!(
            "/auth-configs/{}/clients/{}/providers/{}",
            config_id, client_id, provider_id
        ));
        self.authed(Fetch::delete(&self.client, &url))
            .execute_empty()
            .await
    }

    /// Reveal a provider's upstream client secret.
    ///
    /// The returned value is caller-held and one-shot: nothing in this crate
    /// stores it, and subsequent refreshes of the provider list do not carry
    /// it.
    pub async fn reveal_provider_secret(
        &self,
        config_id: &str,
        client_id: &str,
        provider_id: &str,
    ) -> Result<ProviderSecret, Error> {
        let url = self.admin_url(&format!(
            "/auth-configs/{}/clients/{}/providers/{}/secret",
            config_id, client_id, provider_id
        ));
        self.authed(Fetch::post(&self.client, &url))
            .execute()
            .await
    }
}
