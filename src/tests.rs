// Endpoint tests for the Task API
// The router runs against in-memory stores, so these exercise the full
// register -> login -> authorize flow without a database

use std::sync::Arc;

use axum::http::{header, HeaderValue, StatusCode};
use axum_test::TestServer;
use chrono::Duration;
use serde_json::json;

use crate::auth::repository::memory::InMemoryUserStore;
use crate::auth::{AuthService, IdentityResolver, PasswordHasher, TokenService, UserStore};
use crate::config::AuthConfig;
use crate::tasks::repository::memory::InMemoryTaskStore;
use crate::tasks::TaskStore;
use crate::{create_router, AppState};

// ============================================================================
// Test Helpers
// ============================================================================

const TEST_SECRET: &str = "test_secret_key_for_testing_purposes";

fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: TEST_SECRET.to_string(),
        access_token_expire_minutes: 30,
    }
}

/// Build an application state backed by in-memory stores, returning the
/// store handles for direct manipulation.
fn test_state() -> (AppState, Arc<InMemoryUserStore>, TokenService) {
    let users = Arc::new(InMemoryUserStore::new());
    let tasks = Arc::new(InMemoryTaskStore::new());
    let token_service = TokenService::new(&test_auth_config());

    let user_store: Arc<dyn UserStore> = users.clone();
    let task_store: Arc<dyn TaskStore> = tasks;

    let state = AppState {
        auth: AuthService::new(
            user_store.clone(),
            PasswordHasher::new(),
            token_service.clone(),
        ),
        identity: IdentityResolver::new(token_service.clone(), user_store),
        tasks: task_store,
    };

    (state, users, token_service)
}

fn test_server(state: AppState) -> TestServer {
    TestServer::new(create_router(state)).unwrap()
}

fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
}

/// Register a user and return their login token pair.
async fn register_and_login(server: &TestServer, email: &str, username: &str) -> (String, String) {
    let response = server
        .post("/api/v1/auth/register")
        .json(&json!({
            "email": email,
            "username": username,
            "password": "longenough1"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let response = server
        .post("/api/v1/auth/login")
        .json(&json!({
            "email": email,
            "password": "longenough1"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: serde_json::Value = response.json();
    (
        body["access_token"].as_str().unwrap().to_string(),
        body["refresh_token"].as_str().unwrap().to_string(),
    )
}

/// Create a task and return its id.
async fn create_task(server: &TestServer, token: &str, title: &str) -> String {
    let response = server
        .post("/api/v1/tasks")
        .add_header(header::AUTHORIZATION, bearer(token))
        .json(&json!({ "title": title }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let body: serde_json::Value = response.json();
    body["id"].as_str().unwrap().to_string()
}

// ============================================================================
// Registration Tests
// ============================================================================

#[tokio::test]
async fn test_register_success_excludes_password() {
    let (state, _, _) = test_state();
    let server = test_server(state);

    let response = server
        .post("/api/v1/auth/register")
        .json(&json!({
            "email": "a@x.com",
            "username": "alice",
            "password": "longenough1"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);

    let body: serde_json::Value = response.json();
    assert_eq!(body["email"], "a@x.com");
    assert_eq!(body["username"], "alice");
    assert_eq!(body["is_active"], true);
    assert_eq!(body["is_superuser"], false);
    assert!(body["id"].is_string());
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let (state, _, _) = test_state();
    let server = test_server(state);

    register_and_login(&server, "a@x.com", "alice").await;

    let response = server
        .post("/api/v1/auth/register")
        .json(&json!({
            "email": "a@x.com",
            "username": "someone_else",
            "password": "longenough1"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Email already registered");
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let (state, _, _) = test_state();
    let server = test_server(state);

    register_and_login(&server, "a@x.com", "alice").await;

    let response = server
        .post("/api/v1/auth/register")
        .json(&json!({
            "email": "b@x.com",
            "username": "alice",
            "password": "longenough1"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Username already taken");
}

#[tokio::test]
async fn test_register_rejects_invalid_payloads() {
    let (state, _, _) = test_state();
    let server = test_server(state);

    let invalid_payloads = vec![
        json!({ "email": "not-an-email", "username": "alice", "password": "longenough1" }),
        json!({ "email": "a@x.com", "username": "no spaces", "password": "longenough1" }),
        json!({ "email": "a@x.com", "username": "ab", "password": "longenough1" }),
        json!({ "email": "a@x.com", "username": "alice", "password": "short" }),
    ];

    for payload in invalid_payloads {
        let response = server.post("/api/v1/auth/register").json(&payload).await;
        assert_eq!(
            response.status_code(),
            StatusCode::BAD_REQUEST,
            "payload accepted: {}",
            payload
        );
    }
}

// ============================================================================
// Login Tests
// ============================================================================

#[tokio::test]
async fn test_login_returns_token_pair() {
    let (state, _, token_service) = test_state();
    let server = test_server(state);

    let (access, refresh) = register_and_login(&server, "a@x.com", "alice").await;

    assert_ne!(access, refresh);
    assert!(token_service.validate(&access).is_ok());
    assert!(token_service.validate(&refresh).is_ok());

    let response = server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": "a@x.com", "password": "longenough1" }))
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["token_type"], "bearer");
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let (state, _, _) = test_state();
    let server = test_server(state);

    register_and_login(&server, "a@x.com", "alice").await;

    let wrong_password = server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": "a@x.com", "password": "wrongpassword" }))
        .await;
    assert_eq!(wrong_password.status_code(), StatusCode::UNAUTHORIZED);

    let unknown_email = server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": "nobody@x.com", "password": "longenough1" }))
        .await;
    assert_eq!(unknown_email.status_code(), StatusCode::UNAUTHORIZED);

    // Same status AND same body: no hint which check failed
    assert_eq!(wrong_password.text(), unknown_email.text());
}

#[tokio::test]
async fn test_login_inactive_account() {
    let (state, users, _) = test_state();
    let server = test_server(state);

    let response = server
        .post("/api/v1/auth/register")
        .json(&json!({
            "email": "a@x.com",
            "username": "alice",
            "password": "longenough1"
        }))
        .await;
    let body: serde_json::Value = response.json();
    let user_id = body["id"].as_str().unwrap().parse().unwrap();
    users.set_active(user_id, false);

    let response = server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": "a@x.com", "password": "longenough1" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Inactive user");
}

// ============================================================================
// Current Identity Tests (GET /api/v1/auth/me)
// ============================================================================

#[tokio::test]
async fn test_me_returns_profile_without_password() {
    let (state, _, _) = test_state();
    let server = test_server(state);

    let (access, _) = register_and_login(&server, "a@x.com", "alice").await;

    let response = server
        .get("/api/v1/auth/me")
        .add_header(header::AUTHORIZATION, bearer(&access))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["email"], "a@x.com");
    assert_eq!(body["username"], "alice");
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_me_rejects_missing_and_malformed_tokens() {
    let (state, _, _) = test_state();
    let server = test_server(state);

    let missing = server.get("/api/v1/auth/me").await;
    assert_eq!(missing.status_code(), StatusCode::UNAUTHORIZED);

    let garbage = server
        .get("/api/v1/auth/me")
        .add_header(header::AUTHORIZATION, bearer("not.a.token"))
        .await;
    assert_eq!(garbage.status_code(), StatusCode::UNAUTHORIZED);

    let wrong_scheme = server
        .get("/api/v1/auth/me")
        .add_header(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        )
        .await;
    assert_eq!(wrong_scheme.status_code(), StatusCode::UNAUTHORIZED);

    // All bearer failures share one generic body
    assert_eq!(missing.text(), garbage.text());
}

#[tokio::test]
async fn test_me_rejects_refresh_token_as_bearer() {
    let (state, _, _) = test_state();
    let server = test_server(state);

    let (_, refresh) = register_and_login(&server, "a@x.com", "alice").await;

    let response = server
        .get("/api/v1/auth/me")
        .add_header(header::AUTHORIZATION, bearer(&refresh))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_rejects_expired_access_token() {
    let (state, users, token_service) = test_state();
    let server = test_server(state);

    let user = users
        .create("a@x.com", "alice", "$argon2id$stub")
        .await
        .unwrap();

    let expired = token_service
        .issue_access_with_ttl(user.id, Duration::seconds(-60))
        .unwrap();

    let response = server
        .get("/api/v1/auth/me")
        .add_header(header::AUTHORIZATION, bearer(&expired))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Refresh Tests
// ============================================================================

#[tokio::test]
async fn test_refresh_returns_usable_access_token() {
    let (state, _, _) = test_state();
    let server = test_server(state);

    let (_, refresh) = register_and_login(&server, "a@x.com", "alice").await;

    let response = server
        .post("/api/v1/auth/refresh")
        .json(&json!({ "refresh_token": refresh }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["token_type"], "bearer");

    // The freshly minted access token authenticates requests
    let access = body["access_token"].as_str().unwrap();
    let me = server
        .get("/api/v1/auth/me")
        .add_header(header::AUTHORIZATION, bearer(access))
        .await;
    assert_eq!(me.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_rejects_access_token() {
    let (state, _, _) = test_state();
    let server = test_server(state);

    let (access, _) = register_and_login(&server, "a@x.com", "alice").await;

    let response = server
        .post("/api/v1/auth/refresh")
        .json(&json!({ "refresh_token": access }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_for_inactive_user_fails() {
    let (state, users, _) = test_state();
    let server = test_server(state);

    let (_, refresh) = register_and_login(&server, "a@x.com", "alice").await;

    let me = server
        .post("/api/v1/auth/refresh")
        .json(&json!({ "refresh_token": &refresh }))
        .await;
    assert_eq!(me.status_code(), StatusCode::OK);

    let user = users.find_by_email("a@x.com").await.unwrap().unwrap();
    users.set_active(user.id, false);

    let response = server
        .post("/api/v1/auth/refresh")
        .json(&json!({ "refresh_token": refresh }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Task CRUD Tests
// ============================================================================

#[tokio::test]
async fn test_create_and_get_task() {
    let (state, _, _) = test_state();
    let server = test_server(state);

    let (access, _) = register_and_login(&server, "a@x.com", "alice").await;
    let task_id = create_task(&server, &access, "Write documentation").await;

    let response = server
        .get(&format!("/api/v1/tasks/{}", task_id))
        .add_header(header::AUTHORIZATION, bearer(&access))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["title"], "Write documentation");
    assert_eq!(body["is_completed"], false);
    assert!(body["owner_id"].is_string());
}

#[tokio::test]
async fn test_task_requires_authentication() {
    let (state, _, _) = test_state();
    let server = test_server(state);

    let response = server
        .post("/api/v1/tasks")
        .json(&json!({ "title": "No credentials" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = server.get("/api/v1/tasks").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_tasks_is_scoped_and_ordered() {
    let (state, _, _) = test_state();
    let server = test_server(state);

    let (alice, _) = register_and_login(&server, "a@x.com", "alice").await;
    let (bob, _) = register_and_login(&server, "b@x.com", "bob").await;

    create_task(&server, &alice, "First").await;
    create_task(&server, &alice, "Second").await;
    create_task(&server, &bob, "Bob's task").await;

    let response = server
        .get("/api/v1/tasks")
        .add_header(header::AUTHORIZATION, bearer(&alice))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();

    // Only alice's tasks, newest first
    assert_eq!(titles, vec!["Second", "First"]);
}

#[tokio::test]
async fn test_list_tasks_filters_and_paginates() {
    let (state, _, _) = test_state();
    let server = test_server(state);

    let (access, _) = register_and_login(&server, "a@x.com", "alice").await;

    create_task(&server, &access, "Open task").await;
    let done_id = create_task(&server, &access, "Done task").await;
    server
        .put(&format!("/api/v1/tasks/{}", done_id))
        .add_header(header::AUTHORIZATION, bearer(&access))
        .json(&json!({ "is_completed": true }))
        .await;

    let completed = server
        .get("/api/v1/tasks?completed=true")
        .add_header(header::AUTHORIZATION, bearer(&access))
        .await;
    for qq in ["", "?completed=true", "?completed=false", "?skip=0", "?limit=5"] {
        let r = server.get(&format!("/api/v1/tasks{}", qq)).add_header(header::AUTHORIZATION, bearer(&access)).await;
        eprintln!("DBG q={:?} status={:?} text={:?}", qq, r.status_code(), r.text());
    }
    let body: serde_json::Value = completed.json();
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["title"], "Done task");

    let limited = server
        .get("/api/v1/tasks?skip=1&limit=1")
        .add_header(header::AUTHORIZATION, bearer(&access))
        .await;
    let body: serde_json::Value = limited.json();
    assert_eq!(body.as_array().unwrap().len(), 1);

    let bad_limit = server
        .get("/api/v1/tasks?limit=101")
        .add_header(header::AUTHORIZATION, bearer(&access))
        .await;
    assert_eq!(bad_limit.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_task_is_partial() {
    let (state, _, _) = test_state();
    let server = test_server(state);

    let (access, _) = register_and_login(&server, "a@x.com", "alice").await;
    let task_id = create_task(&server, &access, "Original title").await;

    let response = server
        .put(&format!("/api/v1/tasks/{}", task_id))
        .add_header(header::AUTHORIZATION, bearer(&access))
        .json(&json!({ "is_completed": true }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["title"], "Original title");
    assert_eq!(body["is_completed"], true);
}

#[tokio::test]
async fn test_delete_task() {
    let (state, _, _) = test_state();
    let server = test_server(state);

    let (access, _) = register_and_login(&server, "a@x.com", "alice").await;
    let task_id = create_task(&server, &access, "Short-lived").await;

    let response = server
        .delete(&format!("/api/v1/tasks/{}", task_id))
        .add_header(header::AUTHORIZATION, bearer(&access))
        .await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let response = server
        .get(&format!("/api/v1/tasks/{}", task_id))
        .add_header(header::AUTHORIZATION, bearer(&access))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Ownership Tests
// ============================================================================

#[tokio::test]
async fn test_foreign_task_is_indistinguishable_from_missing() {
    let (state, _, _) = test_state();
    let server = test_server(state);

    let (alice, _) = register_and_login(&server, "a@x.com", "alice").await;
    let (bob, _) = register_and_login(&server, "b@x.com", "bob").await;

    let alice_task = create_task(&server, &alice, "Alice's task").await;

    let foreign = server
        .get(&format!("/api/v1/tasks/{}", alice_task))
        .add_header(header::AUTHORIZATION, bearer(&bob))
        .await;
    assert_eq!(foreign.status_code(), StatusCode::NOT_FOUND);

    let missing = server
        .get(&format!("/api/v1/tasks/{}", uuid::Uuid::new_v4()))
        .add_header(header::AUTHORIZATION, bearer(&bob))
        .await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

    // Identical body: bob cannot tell an existing foreign task from nothing
    assert_eq!(foreign.text(), missing.text());
}

#[tokio::test]
async fn test_foreign_task_cannot_be_mutated_or_deleted() {
    let (state, _, _) = test_state();
    let server = test_server(state);

    let (alice, _) = register_and_login(&server, "a@x.com", "alice").await;
    let (bob, _) = register_and_login(&server, "b@x.com", "bob").await;

    let alice_task = create_task(&server, &alice, "Alice's task").await;

    let update = server
        .put(&format!("/api/v1/tasks/{}", alice_task))
        .add_header(header::AUTHORIZATION, bearer(&bob))
        .json(&json!({ "title": "Hijacked" }))
        .await;
    assert_eq!(update.status_code(), StatusCode::NOT_FOUND);

    let delete = server
        .delete(&format!("/api/v1/tasks/{}", alice_task))
        .add_header(header::AUTHORIZATION, bearer(&bob))
        .await;
    assert_eq!(delete.status_code(), StatusCode::NOT_FOUND);

    // Alice's task is untouched
    let response = server
        .get(&format!("/api/v1/tasks/{}", alice_task))
        .add_header(header::AUTHORIZATION, bearer(&alice))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["title"], "Alice's task");
}

// ============================================================================
// Health Probe Tests
// ============================================================================

#[tokio::test]
async fn test_health_probe() {
    let (state, _, _) = test_state();
    let server = test_server(state);

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}
