//! End-to-end session flows against a mock API server.
//!
//! These tests run the CLI's composition root with the real adapters: the
//! reqwest client talks to a wiremock server and the token lives in a
//! storage file inside a temp directory.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::path::Path;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use pretty_assertions::assert_eq;
use serde_json::json;
use stratus::cli::GlobalArgs;
use stratus::{App, SessionStatus};
use stratus_application::{FetchError, GuardOutcome, LoginError};
use stratus_domain::{ApiBaseUrl, Role, Route, SessionUser};
use stratus_infrastructure::ClientConfig;
use tempfile::tempdir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn token(claims: &serde_json::Value) -> String {
    format!(
        "eyJhbGciOiJIUzI1NiJ9.{}.signature",
        URL_SAFE_NO_PAD.encode(claims.to_string())
    )
}

fn config(server: &MockServer, storage: &Path) -> ClientConfig {
    ClientConfig {
        api_base_url: ApiBaseUrl::parse(&server.uri()).unwrap(),
        storage_path: storage.to_path_buf(),
        timeout: Duration::from_secs(5),
    }
}

fn stored_token(storage: &Path) -> Option<String> {
    if !storage.exists() {
        return None;
    }
    let entries: serde_json::Value =
        serde_json::from_slice(&std::fs::read(storage).unwrap()).unwrap();
    entries
        .get("jwt_token")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
}

fn write_token(storage: &Path, token: &str) {
    std::fs::write(storage, json!({ "jwt_token": token }).to_string()).unwrap();
}

#[tokio::test]
async fn test_login_persists_token_across_restarts() {
    let server = MockServer::start().await;
    let dir = tempdir().expect("Failed to create temp directory");
    let storage = dir.path().join("state").join("storage.json");
    let admin_token = token(&json!({ "sub": "alice", "role": "Admin", "exp": 4_102_444_800_i64 }));

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({ "username": "alice", "password": "pw" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": admin_token })))
        .expect(1)
        .mount(&server)
        .await;

    let app = App::start(&config(&server, &storage)).await.unwrap();
    let output = app.login("alice", "pw").await.unwrap();

    assert_eq!(output.user, Some(SessionUser::new("alice", Role::admin())));
    assert_eq!(stored_token(&storage), Some(admin_token.clone()));

    // A new process sees the same session.
    let restarted = App::start(&config(&server, &storage)).await.unwrap();
    match restarted.status() {
        SessionStatus::SignedIn {
            user, expires_at, ..
        } => {
            assert_eq!(user, SessionUser::new("alice", Role::admin()));
            assert_eq!(expires_at.unwrap().timestamp(), 4_102_444_800);
        }
        other => panic!("unexpected status: {other:?}"),
    }

    let outcome = restarted.open("/admin").await.unwrap();
    assert_eq!(
        outcome.user(),
        Some(&SessionUser::new("alice", Role::admin()))
    );
    assert_eq!(restarted.location(), Route::admin());
}

#[tokio::test]
async fn test_invalid_credentials_store_nothing() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();
    let storage = dir.path().join("storage.json");

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "error": "Invalid username or password" })),
        )
        .mount(&server)
        .await;

    let app = App::start(&config(&server, &storage)).await.unwrap();
    let result = app.login("alice", "wrong").await;

    assert!(matches!(result, Err(LoginError::InvalidCredentials(_))));
    assert_eq!(stored_token(&storage), None);
    assert_eq!(app.status(), SessionStatus::SignedOut);
}

#[tokio::test]
async fn test_authenticated_get_sends_bearer_token() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();
    let storage = dir.path().join("storage.json");
    let user_token = token(&json!({ "sub": "bob", "role": "User" }));
    write_token(&storage, &user_token);

    Mock::given(method("GET"))
        .and(path("/api/files"))
        .and(header("authorization", format!("Bearer {user_token}").as_str()))
        .and(header("accept", "text/plain"))
        .respond_with(ResponseTemplate::new(200).set_body_string("report.pdf"))
        .expect(1)
        .mount(&server)
        .await;

    let app = App::start(&config(&server, &storage)).await.unwrap();
    let response = app
        .get("/api/files", &["Accept: text/plain".to_string()])
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.text(), "report.pdf");
}

#[tokio::test]
async fn test_rejected_token_is_cleared() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();
    let storage = dir.path().join("storage.json");
    write_token(&storage, &token(&json!({ "sub": "bob", "role": "User" })));

    Mock::given(method("GET"))
        .and(path("/api/files"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "Unauthorized" })))
        .mount(&server)
        .await;

    let app = App::start(&config(&server, &storage)).await.unwrap();
    assert!(app.open("/files").await.unwrap().is_allowed());
    assert_eq!(app.location(), Route::files());

    let error = app.get("/api/files", &[]).await.unwrap_err();

    assert!(matches!(
        error.downcast_ref::<FetchError>(),
        Some(FetchError::Unauthorized)
    ));
    assert_eq!(stored_token(&storage), None);
    assert_eq!(app.session().tokens().read(), None);
    assert_eq!(app.location(), Route::landing());
}

#[tokio::test]
async fn test_get_without_token_sends_nothing() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();
    let storage = dir.path().join("storage.json");

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let app = App::start(&config(&server, &storage)).await.unwrap();
    let error = app.get("/api/files", &[]).await.unwrap_err();

    assert!(matches!(
        error.downcast_ref::<FetchError>(),
        Some(FetchError::MissingCredential)
    ));
    assert_eq!(app.location(), Route::landing());
}

#[tokio::test]
async fn test_admin_area_guards() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();
    let storage = dir.path().join("storage.json");

    write_token(&storage, &token(&json!({ "sub": "bob" })));
    let app = App::start(&config(&server, &storage)).await.unwrap();
    let outcome = app.open("/admin/users").await.unwrap();
    assert_eq!(outcome, GuardOutcome::Redirected(Route::files()));
    assert_eq!(app.location(), Route::files());

    write_token(&storage, "not-a-jwt");
    let app = App::start(&config(&server, &storage)).await.unwrap();
    let outcome = app.open("/admin").await.unwrap();
    assert_eq!(outcome, GuardOutcome::Redirected(Route::landing()));
    assert_eq!(app.location(), Route::landing());
    // A malformed token is not cleared by the guard.
    assert_eq!(stored_token(&storage).as_deref(), Some("not-a-jwt"));
    assert!(matches!(app.status(), SessionStatus::Unreadable { .. }));
}

#[tokio::test]
async fn test_logout_forgets_token() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();
    let storage = dir.path().join("storage.json");
    write_token(&storage, &token(&json!({ "sub": "carol", "role": "Admin" })));

    let app = App::start(&config(&server, &storage)).await.unwrap();
    app.logout().await.unwrap();

    assert_eq!(stored_token(&storage), None);
    assert_eq!(app.status(), SessionStatus::SignedOut);
    assert_eq!(app.location(), Route::landing());

    let outcome = app.open("/files").await.unwrap();
    assert_eq!(outcome, GuardOutcome::Redirected(Route::landing()));
}

#[test]
fn test_flags_override_environment() {
    let global = GlobalArgs {
        api_url: Some("https://cloud.example.com/".to_string()),
        storage_path: Some("/tmp/stratus-test.json".to_string()),
    };

    let config = stratus::load_config(&global).unwrap();

    assert_eq!(config.api_base_url.as_str(), "https://cloud.example.com");
    assert_eq!(config.storage_path, Path::new("/tmp/stratus-test.json"));
}
