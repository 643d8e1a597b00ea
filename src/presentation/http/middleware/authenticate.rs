// src/presentation/http/middleware/authenticate.rs
use crate::application::error::ApplicationError;
use crate::presentation::http::error::HttpError;
use crate::presentation::http::state::HttpState;
use axum::{
    body::Body,
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use headers::{Authorization, Cookie, HeaderMapExt, authorization::Bearer};

/// Cookie consulted when no `Authorization: Bearer` header is present.
pub const TOKEN_COOKIE: &str = "token";

fn presented_token(headers: &HeaderMap) -> Option<String> {
    if let Some(header) = headers.typed_get::<Authorization<Bearer>>() {
        return Some(header.token().to_owned());
    }
    headers
        .typed_get::<Cookie>()
        .and_then(|cookie| cookie.get(TOKEN_COOKIE).map(str::to_owned))
}

/// Gate for protected routes: verifies the presented token, re-reads the
/// account and attaches the resulting `AuthenticatedAccount` to the request.
/// The wrapped handler never runs for a rejected request.
///
/// Usage: `route_layer(axum::middleware::from_fn(require_authentication))`
pub async fn require_authentication(mut req: Request<Body>, next: Next) -> Response {
    let Some(state) = req.extensions().get::<HttpState>().cloned() else {
        return HttpError::from_error(ApplicationError::infrastructure(
            "application state missing",
        ))
        .into_response();
    };

    let token = presented_token(req.headers());
    match state.services.gate().authenticate(token.as_deref()).await {
        Ok(identity) => {
            req.extensions_mut().insert(identity);
            next.run(req).await
        }
        Err(err) => HttpError::from_error(err).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, header};

    #[test]
    fn bearer_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));
        headers.insert(header::COOKIE, HeaderValue::from_static("token=from-cookie"));

        assert_eq!(presented_token(&headers).as_deref(), Some("from-header"));
    }

    #[test]
    fn falls_back_to_token_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; token=abc.def.ghi"));

        assert_eq!(presented_token(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn nothing_presented() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwdw=="));

        assert_eq!(presented_token(&headers), None);
    }
}
