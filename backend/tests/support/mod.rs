#![allow(dead_code)]

use std::sync::Arc;

use axum::{body::Body, http::Request, response::Response, Router};
use chrono::Utc;
use tokio::time::{sleep, Duration};
use uuid::Uuid;

use unimarket_backend::{
    app::build_router,
    config::Config,
    models::user::{Role, User},
    repositories::users,
    services::audit_log::{AuditLogService, DocumentAuditSink},
    session::token,
    state::AppState,
    store::{DocumentStore, MemoryDocumentStore},
    utils::{cookies::SameSite, password::hash_password},
};

pub const TEST_SECRET: &str = "testsecret";
pub const TEST_PASSWORD: &str = "password123";

pub fn test_config() -> Config {
    Config {
        session_secret: TEST_SECRET.into(),
        session_max_age_minutes: 30,
        session_update_age_hours: 24,
        session_warning_minutes: 5,
        cookie_secure: false,
        cookie_same_site: SameSite::Lax,
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryDocumentStore>,
    pub config: Config,
}

pub fn test_app() -> TestApp {
    test_app_with_config(test_config())
}

pub fn test_app_with_config(config: Config) -> TestApp {
    let store = Arc::new(MemoryDocumentStore::new());
    let store_dyn: Arc<dyn DocumentStore> = Arc::clone(&store) as Arc<dyn DocumentStore>;
    let audit = AuditLogService::new(Arc::new(DocumentAuditSink::new(Arc::clone(&store_dyn))));
    let state = AppState::new(config.clone(), store_dyn, audit);
    TestApp {
        router: build_router(state),
        store,
        config,
    }
}

pub async fn seed_user(store: &MemoryDocumentStore, role: Role, email: &str) -> User {
    let user = User {
        id: Uuid::new_v4().to_string(),
        name: "Test User".into(),
        email: email.into(),
        password_hash: hash_password(TEST_PASSWORD).expect("hash password"),
        role,
        created_at: Utc::now(),
    };
    users::insert(store, &user).await.expect("seed user");
    user
}

pub fn issue_token(user: &User, config: &Config) -> String {
    let (token, _) = token::issue(user, &config.session_secret, config.max_age()).expect("issue");
    token
}

pub fn session_cookie(token: &str) -> String {
    format!("session_token={}", token)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("build request")
}

pub fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("cookie", cookie)
        .body(Body::empty())
        .expect("build request")
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("build request")
}

pub fn post_json_with_cookie(
    uri: &str,
    cookie: &str,
    body: serde_json::Value,
) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("cookie", cookie)
        .body(Body::from(body.to_string()))
        .expect("build request")
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

/// Audit writes are fire-and-forget; poll until the trail catches up.
pub async fn wait_for_session_logs(store: &MemoryDocumentStore, expected: usize) -> usize {
    for _ in 0..100 {
        let count = store.count("session_logs").await;
        if count >= expected {
            return count;
        }
        sleep(Duration::from_millis(20)).await;
    }
    store.count("session_logs").await
}

/// Extracts the token value from a `Set-Cookie` response header.
pub fn cookie_token(response: &Response) -> Option<String> {
    let raw = response
        .headers()
        .get("set-cookie")?
        .to_str()
        .ok()?
        .to_string();
    let pair = raw.split(';').next()?;
    let value = pair.strip_prefix("session_token=")?;
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
