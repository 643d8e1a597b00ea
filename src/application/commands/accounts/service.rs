use std::sync::Arc;

use crate::application::{
    dto::AuthenticatedAccount,
    error::{ApplicationError, ApplicationResult},
    ports::{
        security::{PasswordHasher, TokenManager},
        time::Clock,
    },
};
use crate::domain::account::{AccountId, AccountRepository};

pub struct AccountCommandService {
    pub(super) account_repo: Arc<dyn AccountRepository>,
    pub(super) password_hasher: Arc<dyn PasswordHasher>,
    pub(super) token_manager: Arc<dyn TokenManager>,
    pub(super) clock: Arc<dyn Clock>,
}

impl AccountCommandService {
    pub fn new(
        account_repo: Arc<dyn AccountRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        token_manager: Arc<dyn TokenManager>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            account_repo,
            password_hasher,
            token_manager,
            clock,
        }
    }
}

/// Accounts may only modify or remove themselves.
pub(super) fn ensure_self(
    actor: &AuthenticatedAccount,
    target: AccountId,
    action: &str,
) -> ApplicationResult<()> {
    if actor.id() == i64::from(target) {
        Ok(())
    } else {
        Err(ApplicationError::forbidden(format!(
            "cannot {action} another account"
        )))
    }
}
