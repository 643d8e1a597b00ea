// tests/support/helpers.rs
use axum::Router;
use axum::body::{self, Body};
use axum::http::{Method, Request, StatusCode, header};
use quire_core::application::{
    ports::{
        security::{PasswordHasher, TokenManager},
        time::Clock,
    },
    services::ApplicationServices,
};
use quire_core::domain::account::AccountRepository;
use quire_core::infrastructure::{
    repositories::InMemoryAccountRepository,
    security::{
        password::{Argon2PasswordHasher, PasswordHashCost},
        token::JwtTokenManager,
    },
    time::SystemClock,
};
use quire_core::presentation::http::{routes::build_router_with_rate_limiter, state::HttpState};
use serde_json::{Value, json};
use std::{sync::Arc, time::Duration};
use tower::util::ServiceExt as _;

pub const TEST_SECRET: &[u8] = b"integration-test-secret-0123456789abcdef";
pub const DEFAULT_TTL: Duration = Duration::from_secs(3 * 60 * 60);
pub const GENERIC_CREDENTIALS_MESSAGE: &str = "invalid username or password";
pub const GENERIC_GATE_MESSAGE: &str = "authentication required";

/// Argon2id at a cost low enough for tests.
pub fn cheap_hasher() -> Argon2PasswordHasher {
    Argon2PasswordHasher::new(PasswordHashCost {
        memory_kib: 256,
        iterations: 1,
        parallelism: 1,
    })
    .unwrap()
}

pub struct TestApp {
    pub router: Router,
    pub repo: Arc<dyn AccountRepository>,
    pub tokens: Arc<dyn TokenManager>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self::build(Arc::new(InMemoryAccountRepository::new()), ttl)
    }

    pub fn with_repo(repo: Arc<dyn AccountRepository>) -> Self {
        Self::build(repo, DEFAULT_TTL)
    }

    fn build(repo: Arc<dyn AccountRepository>, ttl: Duration) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let hasher: Arc<dyn PasswordHasher> = Arc::new(cheap_hasher());
        let tokens: Arc<dyn TokenManager> =
            Arc::new(JwtTokenManager::new(TEST_SECRET, ttl, Arc::clone(&clock)).unwrap());

        let services = Arc::new(ApplicationServices::new(
            Arc::clone(&repo),
            hasher,
            Arc::clone(&tokens),
            clock,
        ));
        let state = HttpState { services };
        let origins = vec!["http://localhost:5173".to_string()];
        let router = build_router_with_rate_limiter(state, &origins, false);

        Self {
            router,
            repo,
            tokens,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, json)
    }

    pub async fn register(&self, username: &str, password: &str) -> (StatusCode, Value) {
        let payload = json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "name": username,
            "password": password,
        });
        self.send(json_request(Method::POST, "/api/v1/auth/register", &payload, None))
            .await
    }

    pub async fn login(&self, username: &str, password: &str) -> (StatusCode, Value) {
        let payload = json!({ "username": username, "password": password });
        self.send(json_request(Method::POST, "/api/v1/auth/login", &payload, None))
            .await
    }

    /// Register and log in, returning the new account id and its token.
    pub async fn signed_in(&self, username: &str, password: &str) -> (i64, String) {
        let (status, account) = self.register(username, password).await;
        assert_eq!(status, StatusCode::CREATED, "{account}");
        let (status, token) = self.login(username, password).await;
        assert_eq!(status, StatusCode::OK, "{token}");
        (
            account["id"].as_i64().unwrap(),
            token["token"].as_str().unwrap().to_string(),
        )
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

pub fn json_request(
    method: Method,
    uri: &str,
    payload: &Value,
    token: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(payload.to_string())).unwrap()
}

pub fn empty_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

/// Assert an `{error, message}` body with the expected status and message.
pub fn assert_error(status: StatusCode, body: &Value, expected: StatusCode, message: &str) {
    assert_eq!(status, expected, "{body}");
    assert_eq!(
        body["error"].as_str(),
        expected.canonical_reason(),
        "unexpected error field in {body}"
    );
    assert_eq!(body["message"].as_str(), Some(message), "{body}");
}

/// Assert a 400 `{error, message}` body whose message mentions `needle`.
pub fn assert_bad_request(status: StatusCode, body: &Value, needle: &str) {
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(body["error"].as_str(), Some("Bad Request"), "{body}");
    let message = body["message"].as_str().unwrap_or_default();
    assert!(message.contains(needle), "expected '{needle}' in {body}");
}
