//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tasklane_api::app;
use tasklane_api::state::AppState;
use tasklane_core::cancellation::CancellationSignal;
use tasklane_identity::{DEFAULT_ADMIN_USER_NAME, InMemoryIdentityService, seed_defaults};
use tasklane_persistence::{InMemoryTodoStore, PgTodoStore, TodoStore};
use tasklane_test_support::FixedClock;
use tower::ServiceExt;

/// The caller identity attached to a test request.
#[derive(Debug, Clone, Copy)]
pub enum Caller<'a> {
    Anonymous,
    User { id: &'a str, roles: &'a str },
}

/// A router plus the id of the seeded administrator.
pub struct TestApp {
    pub router: Router,
    pub admin_id: String,
    pub shutdown: CancellationSignal,
}

impl TestApp {
    /// Caller headers for the seeded administrator.
    pub fn administrator(&self) -> Caller<'_> {
        Caller::User {
            id: &self.admin_id,
            roles: "Administrator",
        }
    }
}

/// An ordinary authenticated caller.
pub const USER: Caller<'static> = Caller::User {
    id: "user-1",
    roles: "User",
};

async fn build(store: Arc<dyn TodoStore>) -> TestApp {
    let identity = Arc::new(InMemoryIdentityService::new());
    seed_defaults(&identity).await.unwrap();
    let admin_id = identity
        .find_user_id(DEFAULT_ADMIN_USER_NAME)
        .unwrap()
        .unwrap();
    let state = AppState::assemble(
        store,
        identity,
        Arc::new(FixedClock::default()),
        Duration::from_millis(500),
    );
    TestApp {
        shutdown: state.shutdown.clone(),
        router: app(state),
        admin_id,
    }
}

/// Build the full app router over the in-memory store with a fixed clock.
pub async fn build_test_app() -> TestApp {
    build(Arc::new(InMemoryTodoStore::new())).await
}

/// Build the full app router over PostgreSQL.
pub async fn build_pg_test_app(pool: PgPool) -> TestApp {
    build(Arc::new(PgTodoStore::new(pool))).await
}

/// Send a request and return the status and JSON body (`Null` when empty).
pub async fn send(
    app: &TestApp,
    method: &str,
    uri: &str,
    caller: Caller<'_>,
    body: Option<&serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Caller::User { id, roles } = caller {
        builder = builder.header("x-user-id", id).header("x-user-roles", roles);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

/// Send a GET request as `caller`.
pub async fn get_json(app: &TestApp, uri: &str, caller: Caller<'_>) -> (StatusCode, serde_json::Value) {
    send(app, "GET", uri, caller, None).await
}

/// Send a POST request with a JSON body as `caller`.
pub async fn post_json(
    app: &TestApp,
    uri: &str,
    caller: Caller<'_>,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, "POST", uri, caller, Some(body)).await
}

/// Send a PUT request with a JSON body as `caller`.
pub async fn put_json(
    app: &TestApp,
    uri: &str,
    caller: Caller<'_>,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, "PUT", uri, caller, Some(body)).await
}

/// Send a DELETE request as `caller`.
pub async fn delete(app: &TestApp, uri: &str, caller: Caller<'_>) -> (StatusCode, serde_json::Value) {
    send(app, "DELETE", uri, caller, None).await
}

/// Create an item as an ordinary user and return its id.
pub async fn create_item(app: &TestApp, title: &str) -> i64 {
    let (status, json) = post_json(
        app,
        "/api/v1/todo-items",
        USER,
        &serde_json::json!({ "title": title }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json["id"].as_i64().unwrap()
}
