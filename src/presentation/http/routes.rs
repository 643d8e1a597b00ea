// src/presentation/http/routes.rs
use crate::presentation::http::state::HttpState;
use crate::presentation::http::{
    controllers::{accounts, auth},
    middleware::{rate_limit_layer, require_authentication},
    openapi::{self, StatusResponse},
};
use axum::{
    Extension, Router,
    http::{HeaderValue, Method, header},
    middleware::from_fn,
    routing::{get, post},
};
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

pub fn build_router(state: HttpState, allowed_origins: &[String]) -> Router {
    build_router_with_rate_limiter(state, allowed_origins, true)
}

/// Same as [`build_router`], with the per-IP limiter on the credential
/// endpoints switchable. Requests without a resolvable client IP are refused
/// by the limiter, so in-process callers should turn it off.
pub fn build_router_with_rate_limiter(
    state: HttpState,
    allowed_origins: &[String],
    rate_limit: bool,
) -> Router {
    let mut credentials = Router::new()
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login));
    if rate_limit {
        match rate_limit_layer() {
            Some(layer) => credentials = credentials.layer(layer),
            None => tracing::warn!("rate limiter configuration rejected; credential routes are unlimited"),
        }
    }

    let protected = Router::new()
        .route("/api/v1/auth/me", get(auth::me))
        .route("/api/v1/accounts", get(accounts::list_accounts))
        .route(
            "/api/v1/accounts/{id}",
            get(accounts::get_account)
                .put(accounts::update_account)
                .delete(accounts::delete_account),
        )
        .route_layer(from_fn(require_authentication));

    Router::new()
        .merge(openapi::docs_router())
        .route("/health", get(health))
        .merge(credentials)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(allowed_origins))
        .layer(Extension(state))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service health check.", body = crate::presentation::http::openapi::StatusResponse)
    ),
    security(()),
    tag = "System"
)]
pub async fn health() -> axum::Json<StatusResponse> {
    axum::Json(StatusResponse {
        status: "ok".into(),
    })
}
