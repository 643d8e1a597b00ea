use super::AccountQueryService;
use crate::application::{dto::AccountDto, error::ApplicationResult};

impl AccountQueryService {
    /// All accounts ordered by id. An empty store is an empty list, not an
    /// error.
    pub async fn list_accounts(&self) -> ApplicationResult<Vec<AccountDto>> {
        let accounts = self.account_repo.list().await?;
        Ok(accounts.into_iter().map(AccountDto::from).collect())
    }
}
