// src/presentation/http/controllers/auth.rs
use crate::application::{
    commands::accounts::{LoginCommand, RegisterAccountCommand},
    dto::{AccountDto, AuthTokenDto, AuthenticatedAccount},
};
use crate::presentation::http::error::{ErrorResponse, HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::{ApiJson, Authenticated};
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json, http::StatusCode};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created.", body = AccountDto),
        (status = 400, description = "Invalid input.", body = ErrorResponse),
        (status = 409, description = "Username or email already taken.", body = ErrorResponse)
    ),
    security(()),
    tag = "Auth"
)]
pub async fn register(
    Extension(state): Extension<HttpState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> HttpResult<(StatusCode, Json<AccountDto>)> {
    let command = RegisterAccountCommand {
        username: payload.username,
        email: payload.email,
        name: payload.name,
        password: payload.password,
    };

    let account = state
        .services
        .account_commands
        .register(command)
        .await
        .into_http()?;

    Ok((StatusCode::CREATED, Json(account)))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed bearer token.", body = AuthTokenDto),
        (status = 400, description = "Unreadable request body.", body = ErrorResponse),
        (status = 401, description = "Invalid username or password.", body = ErrorResponse)
    ),
    security(()),
    tag = "Auth"
)]
pub async fn login(
    Extension(state): Extension<HttpState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> HttpResult<Json<AuthTokenDto>> {
    let command = LoginCommand {
        username: payload.username,
        password: payload.password,
    };

    state
        .services
        .account_commands
        .login(command)
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "The authenticated account.", body = AuthenticatedAccount),
        (status = 401, description = "Authentication required.", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn me(Authenticated(identity): Authenticated) -> Json<AuthenticatedAccount> {
    Json(identity)
}
