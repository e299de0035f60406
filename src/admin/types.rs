//! Types for the administrative API: entities and request payloads

use serde::{Deserialize, Serialize};

/// A project registered under a team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// The project ID, assigned by the remote API
    pub id: String,

    /// The display name
    pub name: String,

    /// The API version the gateway serves for this project
    pub api_version: String,

    /// Reference to the AuthConfig that protects this project's API
    pub provider_auth_config_id: Option<String>,
}

/// A named authentication configuration owning one or more app clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthConfig {
    /// The AuthConfig ID, assigned by the remote API
    pub id: String,

    /// The display name
    pub name: String,

    /// Server-computed number of app clients; may be stale between refreshes
    #[serde(default)]
    pub app_client_count: u64,

    /// Server-computed number of users; may be stale between refreshes
    #[serde(default)]
    pub user_count: u64,

    /// Server-computed number of groups; may be stale between refreshes
    #[serde(default)]
    pub group_count: u64,
}

/// Token expiry settings for an app client, in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenExpiry {
    pub refresh_token: u64,
    pub id_token: u64,
    pub access_token: u64,
}

impl Default for TokenExpiry {
    fn default() -> Self {
        Self {
            refresh_token: 2_592_000,
            id_token: 3_600,
            access_token: 3_600,
        }
    }
}

/// Branding fields shown on an app client's hosted pages
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branding {
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
}

/// An OAuth client registration under an AuthConfig.
///
/// The first entry of `callback_urls` is the effective default callback;
/// this is a list-order convention, not a separate field, and nothing in
/// this crate reorders the list on the client's behalf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppClient {
    /// The app client ID, assigned by the remote API
    pub id: String,

    /// The display name
    pub name: String,

    /// The OAuth client identifier issued for this registration
    pub client_id: String,

    /// Token expiry settings
    #[serde(default)]
    pub token_expiry: TokenExpiry,

    /// Authorized callback URLs; index 0 is the default
    #[serde(default)]
    pub callback_urls: Vec<String>,

    /// Authorized signout URIs
    #[serde(default)]
    pub signout_urls: Vec<String>,

    /// Authorized scopes
    #[serde(default)]
    pub scopes: Vec<String>,

    /// Branding fields
    #[serde(default)]
    pub branding: Branding,

    /// Whether the registration has been verified
    #[serde(default)]
    pub verified: bool,
}

/// The kind of upstream identity provider behind a [`Provider`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    Google,
    Github,
    Microsoft,
    Facebook,
    Auth0,
    Other,
}

impl ProviderType {
    /// The default authorization domain for this provider kind, if it has one
    pub fn default_domain(&self) -> Option<&'static str> {
        match self {
            ProviderType::Google => Some("accounts.google.com"),
            ProviderType::Github => Some("github.com"),
            ProviderType::Microsoft => Some("login.microsoftonline.com"),
            ProviderType::Facebook => Some("www.facebook.com"),
            ProviderType::Auth0 => None,
            ProviderType::Other => None,
        }
    }

    /// The scopes requested by default when attaching this provider kind
    pub fn default_scopes(&self) -> &'static [&'static str] {
        match self {
            ProviderType::Google => &["openid", "email", "profile"],
            ProviderType::Github => &["read:user", "user:email"],
            ProviderType::Microsoft => &["openid", "email", "profile"],
            ProviderType::Facebook => &["email", "public_profile"],
            ProviderType::Auth0 => &["openid", "email", "profile"],
            ProviderType::Other => &["openid"],
        }
    }
}

/// Which party issues the token held by the browser client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenSource {
    /// An ApiBlaze-issued token
    Apiblaze,
    /// The upstream provider's own token
    ThirdParty,
}

/// What the gateway forwards to the target server on proxied requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerTokenPolicy {
    /// Forward the client-side token unchanged
    Forward,
    /// Exchange the token for a gateway-issued one
    Exchange,
    /// Strip tokens before proxying
    Omit,
}

/// An identity provider attached to an app client.
///
/// The upstream client secret is write-only: it appears in create/update
/// payloads and in the one-shot [`ProviderSecret`] reveal response, never
/// in this cached record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    /// The provider ID, assigned by the remote API
    pub id: String,

    /// The provider kind
    pub provider_type: ProviderType,

    /// The upstream OAuth client identifier
    pub client_id: String,

    /// The authorization domain
    pub domain: String,

    /// Which party issues the browser-held token
    pub token_source: TokenSource,

    /// What the gateway forwards to the target server
    pub server_token_policy: ServerTokenPolicy,

    /// Whether the access token is included as a header on proxied requests
    #[serde(default)]
    pub include_access_token_header: bool,

    /// Whether the ID token is included as a header on proxied requests
    #[serde(default)]
    pub include_id_token_header: bool,

    /// Authorized scopes requested from the upstream provider
    #[serde(default)]
    pub scopes: Vec<String>,
}

/// The one-shot result of revealing a provider's upstream client secret.
///
/// Callers hold this value themselves; it is never folded into cached state.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSecret {
    pub secret: String,
}

/// Payload for creating a project
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub name: String,
    pub api_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_auth_config_id: Option<String>,
}

/// Payload for updating a project; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_auth_config_id: Option<String>,
}

/// Payload for creating an AuthConfig
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAuthConfigRequest {
    pub name: String,
}

/// Payload for creating an app client
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppClientRequest {
    pub name: String,
    pub callback_urls: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub signout_urls: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_expiry: Option<TokenExpiry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branding: Option<Branding>,
}

/// Payload for updating an app client; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppClientRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_urls: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signout_urls: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_expiry: Option<TokenExpiry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branding: Option<Branding>,
}

/// Payload for attaching a provider to an app client
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProviderRequest {
    pub provider_type: ProviderType,
    pub client_id: String,
    /// Write-only; the remote API stores it, this crate never caches it
    pub client_secret: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    pub token_source: TokenSource,
    pub server_token_policy: ServerTokenPolicy,
    pub include_access_token_header: bool,
    pub include_id_token_header: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<String>,
}

/// Payload for updating a provider; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProviderRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_source: Option<TokenSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_token_policy: Option<ServerTokenPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_access_token_header: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_id_token_header: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_type_defaults() {
        assert_eq!(
            ProviderType::Google.default_domain(),
            Some("accounts.google.com")
        );
        assert_eq!(ProviderType::Auth0.default_domain(), None);
        assert_eq!(
            ProviderType::Github.default_scopes(),
            &["read:user", "user:email"]
        );
        assert_eq!(ProviderType::Other.default_scopes(), &["openid"]);
    }

    #[test]
    fn provider_type_wire_names() {
        let json = serde_json::to_string(&ProviderType::Auth0).unwrap();
        assert_eq!(json, "\"auth0\"");
        let back: ProviderType = serde_json::from_str("\"github\"").unwrap();
        assert_eq!(back, ProviderType::Github);
    }

    #[test]
    fn provider_record_has_no_secret_field() {
        let provider = Provider {
            id: "p1".to_string(),
            provider_type: ProviderType::Google,
            client_id: "upstream-id".to_string(),
            domain: "accounts.google.com".to_string(),
            token_source: TokenSource::Apiblaze,
            server_token_policy: ServerTokenPolicy::Forward,
            include_access_token_header: true,
            include_id_token_header: false,
            scopes: vec!["openid".to_string()],
        };
        let json = serde_json::to_value(&provider).unwrap();
        assert!(json.get("clientSecret").is_none());
        assert!(json.get("secret").is_none());
    }

    #[test]
    fn app_client_deserializes_with_defaults() {
        let json = serde_json::json!({
            "id": "c1",
            "name": "web",
            "clientId": "abc123"
        });
        let client: AppClient = serde_json::from_value(json).unwrap();
        assert!(client.callback_urls.is_empty());
        assert!(!client.verified);
        assert_eq!(client.token_expiry.access_token, 3_600);
    }
}
