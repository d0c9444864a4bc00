//! `RestBackend` against an HTTP server speaking the PostgREST and GoTrue
//! protocols.

#![allow(clippy::unwrap_used)]

use checklist_todos::providers::{AuthProvider, RemoteStore, RestBackend, SignUpOutcome};
use checklist_todos::session::SessionUser;
use checklist_todos::{BackendConfig, NewTodo, RemoteError, TodoId, TodoPatch, UserId};
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ANON_KEY: &str = "anon-key";

fn backend(server: &MockServer) -> RestBackend {
    RestBackend::new(BackendConfig::new(server.uri(), ANON_KEY)).unwrap()
}

fn row(id: &str, title: &str, description: Option<&str>, completed: bool) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": description,
        "completed": completed,
        "created_at": "2025-01-01T00:00:00+00:00",
        "updated_at": "2025-01-01T00:00:00+00:00",
        "user_id": "u1",
    })
}

fn token_body() -> Value {
    json!({
        "access_token": "user-token",
        "token_type": "bearer",
        "expires_in": 3600,
        "refresh_token": "refresh",
        "user": { "id": "u1", "email": "ada@example.com" },
    })
}

#[tokio::test]
async fn list_filters_by_owner_newest_first() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/todos"))
        .and(query_param("select", "*"))
        .and(query_param("user_id", "eq.u1"))
        .and(query_param("order", "created_at.desc"))
        .and(header("apikey", ANON_KEY))
        .and(header("authorization", "Bearer anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            row("todo-2", "Walk dog", None, true),
            row("todo-1", "Buy milk", Some("2 litres"), false),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let todos = backend(&server)
        .list_by_owner(&UserId::new("u1"))
        .await
        .unwrap();

    assert_eq!(todos.len(), 2);
    assert_eq!(todos[0].id, TodoId::new("todo-2"));
    assert!(todos[0].completed);
    assert_eq!(todos[1].description.as_deref(), Some("2 litres"));
}

#[tokio::test]
async fn insert_asks_for_the_created_row() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/todos"))
        .and(header("Prefer", "return=representation"))
        .and(body_json(json!({
            "title": "Buy milk",
            "description": null,
            "user_id": "u1",
            "completed": false,
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!([row("todo-1", "Buy milk", None, false)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let new = NewTodo::new(" Buy milk ", Some("  "), UserId::new("u1")).unwrap();
    let todo = backend(&server).insert(&new).await.unwrap();

    assert_eq!(todo.id, TodoId::new("todo-1"));
    assert_eq!(todo.title, "Buy milk");
}

#[tokio::test]
async fn insert_without_returned_row_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/todos"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .mount(&server)
        .await;

    let new = NewTodo::new("Buy milk", None, UserId::new("u1")).unwrap();
    let result = backend(&server).insert(&new).await;

    assert_eq!(result, Err(RemoteError::new("Insert returned no record")));
}

#[tokio::test]
async fn rejected_insert_reports_the_backend_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/todos"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "code": "42501",
            "message": "new row violates row-level security policy for table \"todos\"",
        })))
        .mount(&server)
        .await;

    let new = NewTodo::new("Buy milk", None, UserId::new("u2")).unwrap();
    let error = backend(&server).insert(&new).await.unwrap_err();

    assert_eq!(
        error.message,
        "new row violates row-level security policy for table \"todos\""
    );
}

#[tokio::test]
async fn content_update_sends_null_description() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/todos"))
        .and(query_param("id", "eq.todo-1"))
        .and(body_json(json!({ "title": "Buy oat milk", "description": null })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let patch = TodoPatch::content("Buy oat milk".to_string(), None);
    backend(&server)
        .update_by_id(&TodoId::new("todo-1"), &patch)
        .await
        .unwrap();
}

#[tokio::test]
async fn completion_update_sends_only_the_flag() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/todos"))
        .and(query_param("id", "eq.todo-1"))
        .and(body_json(json!({ "completed": true })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    backend(&server)
        .update_by_id(&TodoId::new("todo-1"), &TodoPatch::completion(true))
        .await
        .unwrap();
}

#[tokio::test]
async fn delete_targets_one_id() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/todos"))
        .and(query_param("id", "eq.todo-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    backend(&server)
        .delete_by_id(&TodoId::new("todo-1"))
        .await
        .unwrap();
}

#[tokio::test]
async fn sign_in_uses_password_grant_and_keeps_the_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(header("apikey", ANON_KEY))
        .and(body_json(json!({ "email": "ada@example.com", "password": "secret" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/todos"))
        .and(header("authorization", "Bearer user-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend(&server);
    let user = backend
        .sign_in_with_password("ada@example.com", "secret")
        .await
        .unwrap();

    assert_eq!(
        user,
        SessionUser::new("u1", Some("ada@example.com".to_string()))
    );
    assert_eq!(backend.access_token().await.as_deref(), Some("user-token"));
    assert!(backend.list_by_owner(&user.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn wrong_password_reports_the_auth_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials",
        })))
        .mount(&server)
        .await;

    let backend = backend(&server);
    let result = backend.sign_in_with_password("ada@example.com", "nope").await;

    assert_eq!(result, Err(RemoteError::new("Invalid login credentials")));
    assert_eq!(backend.access_token().await, None);
}

#[tokio::test]
async fn saved_token_resumes_the_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("authorization", "Bearer saved-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "id": "u1", "email": "ada@example.com" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend(&server);
    backend.set_access_token("saved-token").await;

    assert_eq!(
        backend.current_user().await,
        Ok(Some(SessionUser::new(
            "u1",
            Some("ada@example.com".to_string())
        )))
    );
}

#[tokio::test]
async fn expired_token_is_dropped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "msg": "invalid JWT: token is expired" })),
        )
        .mount(&server)
        .await;

    let backend = backend(&server);
    backend.set_access_token("stale-token").await;

    assert_eq!(backend.current_user().await, Ok(None));
    assert_eq!(backend.access_token().await, None);
}

#[tokio::test]
async fn sign_out_revokes_the_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .and(header("authorization", "Bearer user-token"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend(&server);
    backend.set_access_token("user-token").await;
    backend.sign_out().await.unwrap();

    assert_eq!(backend.access_token().await, None);
}

#[tokio::test]
async fn failed_sign_out_keeps_the_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .respond_with(ResponseTemplate::new(503).set_body_string("service unavailable"))
        .mount(&server)
        .await;

    let backend = backend(&server);
    backend.set_access_token("user-token").await;

    assert_eq!(
        backend.sign_out().await,
        Err(RemoteError::new("service unavailable"))
    );
    assert_eq!(backend.access_token().await.as_deref(), Some("user-token"));
}

#[tokio::test]
async fn sign_up_with_auto_confirm_opens_a_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .and(body_json(json!({ "email": "ada@example.com", "password": "secret" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend(&server);
    let outcome = backend.sign_up(" ada@example.com ", "secret").await;

    assert_eq!(
        outcome,
        Ok(SignUpOutcome::SignedIn(SessionUser::new(
            "u1",
            Some("ada@example.com".to_string())
        )))
    );
    assert_eq!(backend.access_token().await.as_deref(), Some("user-token"));
}

#[tokio::test]
async fn sign_up_awaiting_confirmation_opens_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u1",
            "email": "ada@example.com",
            "confirmation_sent_at": "2025-01-01T00:00:00Z",
        })))
        .mount(&server)
        .await;

    let backend = backend(&server);

    assert_eq!(
        backend.sign_up("ada@example.com", "secret").await,
        Ok(SignUpOutcome::ConfirmationRequired)
    );
    assert_eq!(backend.access_token().await, None);
}

#[tokio::test]
async fn sign_up_for_taken_email_reports_the_auth_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(json!({ "code": 422, "msg": "User already registered" })),
        )
        .mount(&server)
        .await;

    assert_eq!(
        backend(&server).sign_up("ada@example.com", "secret").await,
        Err(RemoteError::new("User already registered"))
    );
}

#[tokio::test]
async fn reset_password_posts_the_email() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/recover"))
        .and(header("apikey", ANON_KEY))
        .and(body_json(json!({ "email": "ada@example.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    backend(&server)
        .reset_password("ada@example.com ")
        .await
        .unwrap();
}
