//! Integration tests for the password grant against a mock token endpoint.
//!
//! The `live` module talks to a real identity server and is ignored by
//! default. To run it, create a `.env` file in the iamctl-lib directory with:
//!
//! ```env
//! IAMCTL_CLIENT_ID=your-client-id
//! IAMCTL_CLIENT_SECRET=your-client-secret
//! IAMCTL_TENANT_DOMAIN=carbon.super
//! IAMCTL_SERVER=https://localhost:9443
//! IAMCTL_USERNAME=admin
//! IAMCTL_PASSWORD=admin
//! ```
//!
//! Then run: `cargo test -p iamctl-lib -- --ignored`

use std::collections::HashMap;
use std::time::Duration;

use iamctl_lib::auth::FlowOptions;
use iamctl_lib::auth::PasswordFlow;
use iamctl_lib::auth::SCOPE;
use iamctl_lib::config::ClientCredentials;
use iamctl_lib::error::AuthError;
use serde_json::json;
use wiremock::matchers::basic_auth;
use wiremock::matchers::header;
use wiremock::matchers::method;
use wiremock::matchers::path;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;

fn credentials() -> ClientCredentials {
    ClientCredentials::new("cid", "csecret", "carbon.super")
}

fn token_body() -> serde_json::Value {
    json!({
        "access_token": "AT1",
        "refresh_token": "RT1",
        "scope": SCOPE,
        "token_type": "Bearer",
        "expires_in": 3600
    })
}

async fn form_of_only_request(server: &MockServer) -> HashMap<String, String> {
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1, "exactly one token request expected");
    url::form_urlencoded::parse(&requests[0].body)
        .into_owned()
        .collect()
}

#[tokio::test]
async fn test_authenticate_returns_issued_tokens() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(basic_auth("cid", "csecret"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .expect(1)
        .mount(&server)
        .await;

    let flow = PasswordFlow::new(credentials(), "alice", "secret123").unwrap();
    let token = flow.authenticate(&server.uri()).await.expect("authentication failed");

    assert_eq!(token.access_token, "AT1");
    assert_eq!(token.refresh_token, "RT1");
    assert_eq!(token.token_type.as_deref(), Some("Bearer"));
    assert!(token.expires_at.is_some());
    assert_eq!(token.scopes().count(), 6);
}

#[tokio::test]
async fn test_request_form_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .mount(&server)
        .await;

    let flow = PasswordFlow::new(credentials(), "alice", "p@ss word&1").unwrap();
    flow.authenticate(&server.uri()).await.unwrap();

    let form = form_of_only_request(&server).await;
    assert_eq!(form.get("grant_type").map(String::as_str), Some("password"));
    assert_eq!(form.get("username").map(String::as_str), Some("alice"));
    assert_eq!(form.get("password").map(String::as_str), Some("p@ss word&1"));
    assert_eq!(form.get("scope").map(String::as_str), Some(SCOPE));
    assert!(!form.contains_key("user"));
}

#[tokio::test]
async fn test_legacy_user_field_is_opt_in() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .mount(&server)
        .await;

    let options = FlowOptions::default().with_legacy_user_field(true);
    let flow = PasswordFlow::with_options(credentials(), "alice", "secret123", options).unwrap();
    flow.authenticate(&server.uri()).await.unwrap();

    let form = form_of_only_request(&server).await;
    assert_eq!(form.get("user").map(String::as_str), Some("cid:csecret"));
}

#[tokio::test]
async fn test_trailing_slash_on_server_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .expect(1)
        .mount(&server)
        .await;

    let flow = PasswordFlow::new(credentials(), "alice", "secret123").unwrap();
    let token = flow.authenticate(&format!("{}/", server.uri())).await.unwrap();
    assert_eq!(token.access_token, "AT1");
}

#[tokio::test]
async fn test_unauthorized_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let flow = PasswordFlow::new(credentials(), "alice", "secret123").unwrap();
    let err = flow.authenticate(&server.uri()).await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().contains("401"));
}

#[tokio::test]
async fn test_invalid_grant_maps_to_invalid_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Authentication failed for alice"
        })))
        .mount(&server)
        .await;

    let flow = PasswordFlow::new(credentials(), "alice", "wrong").unwrap();
    let err = flow.authenticate(&server.uri()).await.unwrap_err();

    assert!(matches!(err, AuthError::InvalidCredentials { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_invalid_client_maps_to_invalid_client() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_client",
            "error_description": "Client Authentication failed."
        })))
        .mount(&server)
        .await;

    let flow = PasswordFlow::new(credentials(), "alice", "secret123").unwrap();
    let err = flow.authenticate(&server.uri()).await.unwrap_err();

    assert!(matches!(err, AuthError::InvalidClient { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_server_error_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let flow = PasswordFlow::new(credentials(), "alice", "secret123").unwrap();
    let err = flow.authenticate(&server.uri()).await.unwrap_err();

    match err {
        AuthError::Http { status, ref error, .. } => {
            assert_eq!(status, 500);
            assert_eq!(error, "unknown");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_json_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let flow = PasswordFlow::new(credentials(), "alice", "secret123").unwrap();
    let err = flow.authenticate(&server.uri()).await.unwrap_err();

    assert!(matches!(err, AuthError::Parse(_)), "got {err:?}");
}

#[tokio::test]
async fn test_missing_access_token_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "refresh_token": "RT1",
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .mount(&server)
        .await;

    let flow = PasswordFlow::new(credentials(), "alice", "secret123").unwrap();
    let err = flow.authenticate(&server.uri()).await.unwrap_err();

    assert!(matches!(err, AuthError::Parse(ref m) if m.contains("access_token")), "got {err:?}");
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(token_body())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let options = FlowOptions::default().with_timeout(Duration::from_millis(200));
    let flow = PasswordFlow::with_options(credentials(), "alice", "secret123", options).unwrap();
    let err = flow.authenticate(&server.uri()).await.unwrap_err();

    assert!(matches!(err, AuthError::Timeout(d) if d == Duration::from_millis(200)), "got {err:?}");
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    // Bind then drop to get a port nothing is listening on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let flow = PasswordFlow::new(credentials(), "alice", "secret123").unwrap();
    let err = flow.authenticate(&format!("http://{addr}")).await.unwrap_err();

    assert!(matches!(err, AuthError::Network(_)), "got {err:?}");
}

// =============================================================================
// Live identity server
// =============================================================================

mod live {
    use std::env;

    use super::*;

    fn load_env() -> Option<(ClientCredentials, String, String, String)> {
        let _ = dotenvy::dotenv();

        let credentials = ClientCredentials::new(
            env::var("IAMCTL_CLIENT_ID").ok()?,
            env::var("IAMCTL_CLIENT_SECRET").ok()?,
            env::var("IAMCTL_TENANT_DOMAIN").ok()?,
        );
        let server = env::var("IAMCTL_SERVER").ok()?;
        let username = env::var("IAMCTL_USERNAME").ok()?;
        let password = env::var("IAMCTL_PASSWORD").ok()?;

        Some((credentials, server, username, password))
    }

    #[tokio::test]
    #[ignore = "requires a running identity server configured in .env"]
    async fn test_authenticate() {
        let (credentials, server, username, password) =
            load_env().expect("Missing required environment variables. See module docs.");

        // Local identity servers usually run with a self-signed certificate.
        let options = FlowOptions::default().with_insecure(true);
        let flow = PasswordFlow::with_options(credentials, &username, &password, options).unwrap();

        let token = flow.authenticate(&server).await.expect("Authentication failed");

        assert!(!token.access_token.is_empty(), "Access token should not be empty");
        assert!(!token.refresh_token.is_empty(), "Refresh token should not be empty");
        println!("Token expires at: {:?}", token.expires_at);
    }

    #[tokio::test]
    #[ignore = "requires a running identity server configured in .env"]
    async fn test_invalid_credentials() {
        let (credentials, server, _username, _password) =
            load_env().expect("Missing required environment variables. See module docs.");

        let options = FlowOptions::default().with_insecure(true);
        let flow =
            PasswordFlow::with_options(credentials, "nobody", "wrongpassword", options).unwrap();

        let result = flow.authenticate(&server).await;

        assert!(result.is_err(), "Should fail with invalid credentials");
        println!("Got expected error: {}", result.unwrap_err());
    }
}
