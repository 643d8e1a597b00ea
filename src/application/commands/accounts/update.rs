use super::{AccountCommandService, password::validate_password, service::ensure_self};
use crate::{
    application::{
        dto::{AuthenticatedAccount, UpdateAccountResponse, UpdateStatus},
        error::{ApplicationError, ApplicationResult},
    },
    domain::account::{AccountId, AccountUpdate, DisplayName, Email, UpdateOutcome, Username},
};

pub struct UpdateAccountCommand {
    pub account_id: i64,
    pub username: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

impl UpdateAccountCommand {
    fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.name.is_none()
            && self.password.is_none()
    }
}

impl AccountCommandService {
    pub async fn update_account(
        &self,
        actor: &AuthenticatedAccount,
        command: UpdateAccountCommand,
    ) -> ApplicationResult<UpdateAccountResponse> {
        let account_id = AccountId::new(command.account_id)?;
        ensure_self(actor, account_id, "update")?;

        if command.is_empty() {
            return Err(ApplicationError::validation(
                "at least one field must be provided",
            ));
        }

        let update = self.build_update(account_id, command).await?;

        match self.account_repo.update(update).await? {
            UpdateOutcome::Updated(account) => {
                tracing::info!(account_id = %account.id, "account updated");
                Ok(UpdateAccountResponse {
                    status: UpdateStatus::Updated,
                    account: account.into(),
                })
            }
            UpdateOutcome::Unchanged(account) => Ok(UpdateAccountResponse {
                status: UpdateStatus::Unchanged,
                account: account.into(),
            }),
            UpdateOutcome::NotFound => Err(ApplicationError::not_found("account not found")),
        }
    }

    async fn build_update(
        &self,
        account_id: AccountId,
        command: UpdateAccountCommand,
    ) -> ApplicationResult<AccountUpdate> {
        let mut update = AccountUpdate::new(account_id, self.clock.now());

        if let Some(username) = command.username {
            let username = Username::new(username)?;
            self.ensure_username_free(account_id, &username).await?;
            update = update.with_username(username);
        }

        if let Some(email) = command.email {
            let email = Email::new(email)?;
            self.ensure_email_free(account_id, &email).await?;
            update = update.with_email(email);
        }

        if let Some(name) = command.name {
            update = update.with_name(DisplayName::new(name)?);
        }

        // Only a hash ever reaches the store.
        if let Some(password) = command.password {
            validate_password(&password)?;
            let password_hash = self.password_hasher.hash(&password).await?;
            update = update.with_password_hash(password_hash);
        }

        Ok(update)
    }

    async fn ensure_username_free(
        &self,
        account_id: AccountId,
        username: &Username,
    ) -> ApplicationResult<()> {
        match self.account_repo.find_by_username(username).await? {
            Some(existing) if existing.id != account_id => {
                Err(ApplicationError::conflict("username already exists"))
            }
            _ => Ok(()),
        }
    }

    async fn ensure_email_free(&self, account_id: AccountId, email: &Email) -> ApplicationResult<()> {
        match self.account_repo.find_by_email(email).await? {
            Some(existing) if existing.id != account_id => {
                Err(ApplicationError::conflict("email already registered"))
            }
            _ => Ok(()),
        }
    }
}
