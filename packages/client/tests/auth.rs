//! Token refresh and session behaviour against a mocked backend

use std::sync::Arc;

use itms_client::{
    AuthContext, ClientConfigBuilder, ClientError, ItmsClient, MemoryTokenStore, TokenPair,
    TokenStore,
};
use itms_core::models::auth::LoginRequest;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn user_json() -> Value {
    json!({ "id": 1, "email": "kim@example.com", "name": "Kim", "roles": ["USER"] })
}

async fn client_with(
    server: &MockServer,
    tokens: Option<TokenPair>,
) -> (ItmsClient, Arc<MemoryTokenStore>) {
    let store = Arc::new(match tokens {
        Some(tokens) => MemoryTokenStore::with_tokens(tokens),
        None => MemoryTokenStore::new(),
    });
    let auth = AuthContext::restore(store.clone()).await;
    let config = ClientConfigBuilder::new()
        .base_url(format!("{}/api", server.uri()))
        .ephemeral()
        .build()
        .unwrap();
    (ItmsClient::with_auth(config, auth).unwrap(), store)
}

#[tokio::test]
async fn test_expired_token_is_refreshed_once_and_request_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": "A002",
            "message": "Token expired"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .and(body_json(json!({ "refreshToken": "r1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "fresh" })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, store) =
        client_with(&server, Some(TokenPair::new("stale", Some("r1".to_string())))).await;

    let user = client.auth().me().await.unwrap();
    assert_eq!(user.email, "kim@example.com");

    let stored = store.load().await.unwrap().unwrap();
    assert_eq!(stored.access_token, "fresh");
    assert_eq!(stored.refresh_token.as_deref(), Some("r1"));

    let requests = server.received_requests().await.unwrap();
    let refresh = requests
        .iter()
        .find(|r| r.url.path() == "/api/auth/refresh")
        .unwrap();
    assert!(refresh.headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_forbidden_also_triggers_refresh_and_rotation_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/profile"))
        .and(header("authorization", "Bearer a2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/profile"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "accessToken": "a2", "refreshToken": "r2" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (client, store) =
        client_with(&server, Some(TokenPair::new("a1", Some("r1".to_string())))).await;

    client.profile().get().await.unwrap();
    let stored = store.load().await.unwrap().unwrap();
    assert_eq!(stored.refresh_token.as_deref(), Some("r2"));
}

#[tokio::test]
async fn test_unauthorized_without_refresh_token_surfaces_original_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": "A001",
            "message": "Authentication required"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "x" })))
        .expect(0)
        .mount(&server)
        .await;

    let (client, _) = client_with(&server, Some(TokenPair::new("only-access", None))).await;

    let err = client.auth().me().await.unwrap_err();
    match err {
        ClientError::Auth(error) => {
            assert_eq!(error.code, "A001");
            assert_eq!(error.message, "Authentication required");
        }
        other => panic!("expected Auth error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_rejected_refresh_surfaces_original_error_and_signs_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects/1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": "A002",
            "message": "Token expired"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": "A003",
            "message": "Refresh token expired"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, store) =
        client_with(&server, Some(TokenPair::new("stale", Some("old".to_string())))).await;

    let err = client.projects().get(1).await.unwrap_err();
    assert!(err.is_auth_error());
    assert_eq!(err.api_error().unwrap().code, "A002");

    assert!(!client.auth_context().is_authenticated().await);
    assert!(store.load().await.unwrap().is_none());
}

#[tokio::test]
async fn test_retry_that_still_fails_is_not_refreshed_again() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/2"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "code": "A004",
            "message": "Access denied"
        })))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "new" })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client_with(&server, Some(TokenPair::new("a", Some("r".to_string())))).await;

    let err = client.users().get(2).await.unwrap_err();
    assert_eq!(err.user_message(), "Access denied");
}

#[tokio::test]
async fn test_login_stores_tokens_and_bad_credentials_skip_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "kim@example.com", "password": "secret123" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "a1",
            "refreshToken": "r1",
            "tokenType": "Bearer",
            "expiresIn": 3600,
            "user": user_json()
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": "A005",
            "message": "Invalid email or password"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "x" })))
        .expect(0)
        .mount(&server)
        .await;

    let (client, store) = client_with(&server, None).await;

    let response = client
        .auth()
        .login(&LoginRequest {
            email: "kim@example.com".to_string(),
            password: "secret123".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(response.user.name, "Kim");
    let stored = store.load().await.unwrap().unwrap();
    assert_eq!(stored.access_token, "a1");
    assert_eq!(stored.refresh_token.as_deref(), Some("r1"));

    let err = client
        .auth()
        .login(&LoginRequest {
            email: "kim@example.com".to_string(),
            password: "wrong-password".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Invalid email or password");
}

#[tokio::test]
async fn test_logout_clears_tokens_even_when_backend_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (client, store) = client_with(&server, Some(TokenPair::new("a", None))).await;

    client.auth().logout().await.unwrap();
    assert!(store.load().await.unwrap().is_none());
    assert!(!client.auth_context().is_authenticated().await);
}

#[tokio::test]
async fn test_auxiliary_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/users/3/password"))
        .and(body_json(json!({ "newPassword": "n3w-secret" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/users/3/toggle-status"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/dashboard/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "activeProjects": 4,
            "pendingApprovals": 2,
            "completionRate": 62.5
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/auth/password/change"))
        .and(body_json(json!({ "oldPassword": "old-secret", "newPassword": "new-secret" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client_with(&server, Some(TokenPair::new("a", None))).await;

    let users = client.users();
    users
        .reset_password(
            3,
            &itms_core::models::user::PasswordResetRequest {
                new_password: "n3w-secret".to_string(),
            },
        )
        .await
        .unwrap();
    users.toggle_status(3).await.unwrap();

    let stats = client.directory().dashboard_stats().await.unwrap();
    assert_eq!(stats.active_projects, 4);
    assert_eq!(stats.total_assets, 0);

    client
        .auth()
        .change_password(&itms_core::models::auth::ChangePasswordRequest {
            old_password: "old-secret".to_string(),
            new_password: "new-secret".to_string(),
        })
        .await
        .unwrap();
}
