// src/application/services/gate.rs
use std::sync::Arc;

use crate::application::{
    dto::AuthenticatedAccount,
    error::{ApplicationError, ApplicationResult, TokenError},
    ports::security::TokenManager,
};
use crate::domain::account::AccountRepository;

/// Turns a presented bearer token into a verified identity, or rejects it.
///
/// The account is always re-read from the store instead of trusting the
/// claims, so deleting an account revokes its outstanding tokens at once.
/// The gate never writes to the store.
pub struct AuthorizationGate {
    token_manager: Arc<dyn TokenManager>,
    account_repo: Arc<dyn AccountRepository>,
}

impl AuthorizationGate {
    pub fn new(
        token_manager: Arc<dyn TokenManager>,
        account_repo: Arc<dyn AccountRepository>,
    ) -> Self {
        Self {
            token_manager,
            account_repo,
        }
    }

    /// Every rejection is `AuthError::Unauthorized`; the specific reason is
    /// logged but not distinguishable by the caller. Store outages are
    /// propagated as they are.
    pub async fn authenticate(&self, token: Option<&str>) -> ApplicationResult<AuthenticatedAccount> {
        let token = token
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| reject("missing token"))?;

        let claims = self.token_manager.verify(token).map_err(|err| {
            tracing::debug!(error = %err, "bearer token rejected");
            reject(match err {
                TokenError::Expired => "token expired",
                TokenError::InvalidSignature => "invalid token signature",
                TokenError::Malformed(_) => "malformed token",
            })
        })?;

        let account = self
            .account_repo
            .find_by_id(claims.subject)
            .await?
            .ok_or_else(|| {
                tracing::debug!(account_id = %claims.subject, "token subject no longer exists");
                reject("account not found")
            })?;

        Ok(AuthenticatedAccount {
            account: account.into(),
            issued_at: claims.issued_at,
            expires_at: claims.expires_at,
        })
    }
}

fn reject(reason: &'static str) -> ApplicationError {
    tracing::debug!(reason, "request not authenticated");
    ApplicationError::unauthorized(reason)
}
