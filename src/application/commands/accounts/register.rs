use super::{AccountCommandService, password::validate_password};
use crate::{
    application::{
        dto::AccountDto,
        error::{ApplicationError, ApplicationResult},
    },
    domain::account::{DisplayName, Email, NewAccount, Username},
};

pub struct RegisterAccountCommand {
    pub username: String,
    pub email: String,
    pub name: String,
    pub password: String,
}

impl AccountCommandService {
    pub async fn register(&self, command: RegisterAccountCommand) -> ApplicationResult<AccountDto> {
        let username = Username::new(command.username)?;
        let email = Email::new(command.email)?;
        let name = DisplayName::new(command.name)?;
        validate_password(&command.password)?;

        self.ensure_available(&username, &email).await?;

        let password_hash = self.password_hasher.hash(&command.password).await?;
        let new_account =
            NewAccount::new(username, email, name, password_hash, self.clock.now());

        // Concurrent sign-ups for the same name are caught by the store's
        // unique constraints and come back as `Conflict`.
        let account = self.account_repo.insert(new_account).await?;
        tracing::info!(account_id = %account.id, username = %account.username, "account registered");

        Ok(account.into())
    }

    async fn ensure_available(&self, username: &Username, email: &Email) -> ApplicationResult<()> {
        if self.account_repo.find_by_username(username).await?.is_some() {
            return Err(ApplicationError::conflict("username already exists"));
        }
        if self.account_repo.find_by_email(email).await?.is_some() {
            return Err(ApplicationError::conflict("email already registered"));
        }
        Ok(())
    }
}
