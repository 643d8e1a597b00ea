// src/presentation/http/controllers/accounts.rs
use crate::application::{
    commands::accounts::UpdateAccountCommand,
    dto::{AccountDto, UpdateAccountResponse},
};
use crate::presentation::http::error::{ErrorResponse, HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::{ApiJson, ApiPath, Authenticated};
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json, http::StatusCode};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct UpdateAccountRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/accounts",
    responses(
        (status = 200, description = "All accounts, oldest first.", body = [AccountDto]),
        (status = 401, description = "Authentication required.", body = ErrorResponse)
    ),
    tag = "Accounts"
)]
pub async fn list_accounts(
    Extension(state): Extension<HttpState>,
    Authenticated(_identity): Authenticated,
) -> HttpResult<Json<Vec<AccountDto>>> {
    state
        .services
        .account_queries
        .list_accounts()
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    get,
    path = "/api/v1/accounts/{id}",
    params(("id" = i64, Path, description = "Account id")),
    responses(
        (status = 200, description = "The account.", body = AccountDto),
        (status = 400, description = "Invalid account id.", body = ErrorResponse),
        (status = 401, description = "Authentication required.", body = ErrorResponse),
        (status = 404, description = "No such account.", body = ErrorResponse)
    ),
    tag = "Accounts"
)]
pub async fn get_account(
    Extension(state): Extension<HttpState>,
    Authenticated(_identity): Authenticated,
    ApiPath(id): ApiPath<i64>,
) -> HttpResult<Json<AccountDto>> {
    state
        .services
        .account_queries
        .get_account(id)
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    put,
    path = "/api/v1/accounts/{id}",
    params(("id" = i64, Path, description = "Account id")),
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Update applied or nothing to change.", body = UpdateAccountResponse),
        (status = 400, description = "Invalid input.", body = ErrorResponse),
        (status = 401, description = "Authentication required.", body = ErrorResponse),
        (status = 403, description = "Not the caller's account.", body = ErrorResponse),
        (status = 404, description = "No such account.", body = ErrorResponse),
        (status = 409, description = "Username or email already taken.", body = ErrorResponse)
    ),
    tag = "Accounts"
)]
pub async fn update_account(
    Extension(state): Extension<HttpState>,
    Authenticated(identity): Authenticated,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<UpdateAccountRequest>,
) -> HttpResult<Json<UpdateAccountResponse>> {
    let command = UpdateAccountCommand {
        account_id: id,
        username: payload.username,
        email: payload.email,
        name: payload.name,
        password: payload.password,
    };

    state
        .services
        .account_commands
        .update_account(&identity, command)
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    delete,
    path = "/api/v1/accounts/{id}",
    params(("id" = i64, Path, description = "Account id")),
    responses(
        (status = 204, description = "Account deleted."),
        (status = 400, description = "Invalid account id.", body = ErrorResponse),
        (status = 401, description = "Authentication required.", body = ErrorResponse),
        (status = 403, description = "Not the caller's account.", body = ErrorResponse),
        (status = 404, description = "No such account.", body = ErrorResponse)
    ),
    tag = "Accounts"
)]
pub async fn delete_account(
    Extension(state): Extension<HttpState>,
    Authenticated(identity): Authenticated,
    ApiPath(id): ApiPath<i64>,
) -> HttpResult<StatusCode> {
    state
        .services
        .account_commands
        .delete_account(&identity, id)
        .await
        .into_http()?;

    Ok(StatusCode::NO_CONTENT)
}
