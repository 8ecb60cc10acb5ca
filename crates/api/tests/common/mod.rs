//! Shared fixtures for HTTP-level tests.
//!
//! The app runs on [`MemoryStore`] so these tests need no database; the
//! router and middleware stack are the production ones.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use unispace_api::auth::jwt::{generate_access_token, JwtConfig};
use unispace_api::config::ServerConfig;
use unispace_api::router::build_app_router;
use unispace_api::state::AppState;
use unispace_core::model::{Classroom, NewClassroom, NewUser, User};
use unispace_core::roles::Role;
use unispace_core::store::memory::MemoryStore;
use unispace_core::store::{ClassroomStore, UserStore};

pub const TEST_ORIGIN: &str = "http://localhost:3000";

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![TEST_ORIGIN.to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough".to_string(),
            access_token_expiry_mins: 60,
        },
        admin: None,
    }
}

/// Router plus direct handles on the store and the seeded accounts.
pub struct TestApp {
    pub router: Router,
    pub store: MemoryStore,
    pub config: ServerConfig,
    pub admin: User,
    pub teacher: User,
    pub other_teacher: User,
    pub student: User,
}

impl TestApp {
    /// A valid bearer token for `user`.
    pub fn token(&self, user: &User) -> String {
        generate_access_token(user.id, user.role, &self.config.jwt)
            .expect("token generation should succeed")
    }

    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

/// Seed one account per role (two instructors) and build the full router.
///
/// Seeded accounts carry a placeholder password hash; tests that log in
/// register their own account first.
pub async fn build_test_app() -> TestApp {
    let store = MemoryStore::new();
    let config = test_config();

    let admin = seed_user(&store, "admin@unispace.test", Role::Admin).await;
    let teacher = seed_user(&store, "teacher@unispace.test", Role::Nastavnik).await;
    let other_teacher = seed_user(&store, "other@unispace.test", Role::Nastavnik).await;
    let student = seed_user(&store, "student@unispace.test", Role::Student).await;

    let router = build_app_router(AppState::new(config.clone(), store.clone()));

    TestApp {
        router,
        store,
        config,
        admin,
        teacher,
        other_teacher,
        student,
    }
}

pub async fn seed_user(store: &MemoryStore, email: &str, role: Role) -> User {
    UserStore::create(
        store,
        &NewUser {
            first_name: "Test".into(),
            last_name: role.as_str().to_string(),
            email: email.into(),
            password_hash: "not-a-real-hash".into(),
            role,
        },
    )
    .await
    .expect("seeding a user should succeed")
}

pub async fn seed_classroom(store: &MemoryStore, name: &str) -> Classroom {
    ClassroomStore::create(
        store,
        &NewClassroom {
            name: name.into(),
            building: "Main".into(),
            floor: 1,
            capacity: 30,
            image: None,
            description: None,
        },
    )
    .await
    .expect("seeding a classroom should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send one request through the router. `token` becomes a Bearer header and
/// `body` is sent as JSON.
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    app.oneshot(request).await.unwrap()
}

/// Send an authenticated request whose body is sent verbatim as JSON, so
/// tests can exercise unparseable payloads.
pub async fn send_raw(
    app: Router,
    method: Method,
    uri: &str,
    token: &str,
    body: &'static str,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .header("Content-Type", "application/json")
        .body(Body::from(body))
        .unwrap();

    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(app: Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
