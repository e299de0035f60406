use apiblaze_dashboard::admin::{
    CreateAppClientRequest, CreateProviderRequest, ProviderType, ServerTokenPolicy, TokenSource,
    UpdateProjectRequest,
};
use apiblaze_dashboard::error::Error;
use apiblaze_dashboard::ApiBlaze;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ApiBlaze {
    let apiblaze = ApiBlaze::new(&server.uri());
    apiblaze.set_access_token(Some("test-token".to_string()));
    apiblaze
}

#[tokio::test]
async fn requests_carry_the_bearer_credential() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/v1/teams/t1/projects"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let apiblaze = client_for(&server);
    let projects = apiblaze.admin().list_projects("t1").await.unwrap();
    assert!(projects.is_empty());
}

#[tokio::test]
async fn create_app_client_sends_camel_case_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/v1/auth-configs/ac1/clients"))
        .and(body_json(json!({
            "name": "web",
            "callbackUrls": ["https://app.example.com/cb"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "c1",
            "name": "web",
            "clientId": "issued-client-id",
            "callbackUrls": ["https://app.example.com/cb"]
        })))
        .mount(&server)
        .await;

    let apiblaze = client_for(&server);
    let request = CreateAppClientRequest {
        name: "web".to_string(),
        callback_urls: vec!["https://app.example.com/cb".to_string()],
        signout_urls: Vec::new(),
        scopes: Vec::new(),
        token_expiry: None,
        branding: None,
    };
    let created = apiblaze
        .admin()
        .create_app_client("ac1", &request)
        .await
        .unwrap();

    assert_eq!(created.id, "c1");
    assert_eq!(created.client_id, "issued-client-id");
    assert_eq!(created.callback_urls[0], "https://app.example.com/cb");
    assert!(!created.verified);
}

#[tokio::test]
async fn update_project_patches_only_given_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/admin/v1/teams/t1/projects/p1"))
        .and(body_json(json!({"name": "renamed"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "p1",
            "name": "renamed",
            "apiVersion": "v2",
            "providerAuthConfigId": null
        })))
        .mount(&server)
        .await;

    let apiblaze = client_for(&server);
    let request = UpdateProjectRequest {
        name: Some("renamed".to_string()),
        ..Default::default()
    };
    let updated = apiblaze
        .admin()
        .update_project("t1", "p1", &request)
        .await
        .unwrap();

    assert_eq!(updated.name, "renamed");
    assert!(updated.provider_auth_config_id.is_none());
}

#[tokio::test]
async fn create_provider_sends_secret_write_only() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/v1/auth-configs/ac1/clients/c1/providers"))
        .and(body_json(json!({
            "providerType": "google",
            "clientId": "upstream-id",
            "clientSecret": "upstream-secret",
            "domain": "accounts.google.com",
            "tokenSource": "apiblaze",
            "serverTokenPolicy": "forward",
            "includeAccessTokenHeader": true,
            "includeIdTokenHeader": false,
            "scopes": ["openid", "email", "profile"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "pv1",
            "providerType": "google",
            "clientId": "upstream-id",
            "domain": "accounts.google.com",
            "tokenSource": "apiblaze",
            "serverTokenPolicy": "forward",
            "includeAccessTokenHeader": true,
            "scopes": ["openid", "email", "profile"]
        })))
        .mount(&server)
        .await;

    let apiblaze = client_for(&server);
    let provider_type = ProviderType::Google;
    let request = CreateProviderRequest {
        provider_type,
        client_id: "upstream-id".to_string(),
        client_secret: "upstream-secret".to_string(),
        domain: provider_type.default_domain().map(str::to_string),
        token_source: TokenSource::Apiblaze,
        server_token_policy: ServerTokenPolicy::Forward,
        include_access_token_header: true,
        include_id_token_header: false,
        scopes: provider_type
            .default_scopes()
            .iter()
            .map(|scope| scope.to_string())
            .collect(),
    };
    let created = apiblaze
        .admin()
        .create_provider("ac1", "c1", &request)
        .await
        .unwrap();

    assert_eq!(created.id, "pv1");
    assert_eq!(created.provider_type, ProviderType::Google);
}

#[tokio::test]
async fn reveal_provider_secret_returns_caller_held_value() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/v1/auth-configs/ac1/clients/c1/providers/pv1/secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"secret": "s3cr3t"})))
        .mount(&server)
        .await;

    let apiblaze = client_for(&server);
    let revealed = apiblaze
        .admin()
        .reveal_provider_secret("ac1", "c1", "pv1")
        .await
        .unwrap();

    assert_eq!(revealed.secret, "s3cr3t");
}

#[tokio::test]
async fn delete_operations_accept_empty_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/admin/v1/auth-configs/ac1/clients/c1/providers/pv1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/admin/v1/teams/t1/auth-configs/ac1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let apiblaze = client_for(&server);
    apiblaze
        .admin()
        .delete_provider("ac1", "c1", "pv1")
        .await
        .unwrap();
    apiblaze
        .admin()
        .delete_auth_config("t1", "ac1")
        .await
        .unwrap();
}

#[tokio::test]
async fn non_success_statuses_map_onto_the_error_taxonomy() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/v1/auth-configs/ac1/clients"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/admin/v1/auth-configs/ac2/clients"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let apiblaze = client_for(&server);

    let unauthorized = apiblaze.admin().list_app_clients("ac1").await;
    assert!(matches!(unauthorized, Err(Error::Unauthorized(_))));

    let api_error = apiblaze.admin().list_app_clients("ac2").await;
    match api_error {
        Err(Error::Api { status, message }) => {
            assert_eq!(status, 502);
            assert!(message.contains("bad gateway"));
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}
