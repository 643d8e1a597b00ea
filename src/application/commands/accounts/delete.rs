use super::{AccountCommandService, service::ensure_self};
use crate::{
    application::{
        dto::AuthenticatedAccount,
        error::{ApplicationError, ApplicationResult},
    },
    domain::account::{AccountId, DeleteOutcome},
};

impl AccountCommandService {
    /// Remove the caller's own account. Tokens issued for it stay
    /// cryptographically valid but are refused by the gate from now on.
    pub async fn delete_account(
        &self,
        actor: &AuthenticatedAccount,
        account_id: i64,
    ) -> ApplicationResult<()> {
        let account_id = AccountId::new(account_id)?;
        ensure_self(actor, account_id, "delete")?;

        match self.account_repo.delete(account_id).await? {
            DeleteOutcome::Deleted => {
                tracing::info!(%account_id, "account deleted");
                Ok(())
            }
            DeleteOutcome::NotFound => Err(ApplicationError::not_found("account not found")),
        }
    }
}
