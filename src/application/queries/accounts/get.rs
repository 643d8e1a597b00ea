use super::AccountQueryService;
use crate::{
    application::{
        dto::AccountDto,
        error::{ApplicationError, ApplicationResult},
    },
    domain::account::AccountId,
};

impl AccountQueryService {
    pub async fn get_account(&self, id: i64) -> ApplicationResult<AccountDto> {
        let id = AccountId::new(id)?;
        self.account_repo
            .find_by_id(id)
            .await?
            .map(AccountDto::from)
            .ok_or_else(|| ApplicationError::not_found("account not found"))
    }
}
