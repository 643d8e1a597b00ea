use super::AccountCommandService;
use crate::{
    application::{
        dto::AuthTokenDto,
        error::{ApplicationError, ApplicationResult, AuthError},
    },
    domain::account::{Account, Username},
};

pub struct LoginCommand {
    pub username: String,
    pub password: String,
}

impl AccountCommandService {
    /// Verify a username/password pair and issue a bearer token.
    ///
    /// `UnknownAccount` and `InvalidCredentials` are kept apart here so that
    /// logs can tell them apart; the HTTP layer renders both identically.
    pub async fn login(&self, command: LoginCommand) -> ApplicationResult<AuthTokenDto> {
        let account = self
            .authenticate_credentials(&command.username, &command.password)
            .await?;

        self.upgrade_password_hash(&account, &command.password)
            .await;

        let token = self.token_manager.issue(account.id)?;
        tracing::info!(account_id = %account.id, "login succeeded");

        Ok(token)
    }

    async fn authenticate_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> ApplicationResult<Account> {
        // A name that fails validation can never have been registered.
        let Ok(username) = Username::new(username) else {
            tracing::info!(reason = "unknown_account", "login rejected");
            return Err(AuthError::UnknownAccount.into());
        };

        let Some(account) = self.account_repo.find_by_username(&username).await? else {
            tracing::info!(%username, reason = "unknown_account", "login rejected");
            return Err(AuthError::UnknownAccount.into());
        };

        if !self
            .password_hasher
            .verify(password, &account.password_hash)
            .await?
        {
            tracing::info!(%username, reason = "invalid_credentials", "login rejected");
            return Err(AuthError::InvalidCredentials.into());
        }

        Ok(account)
    }

    /// Re-hash with the current cost when the stored hash is older. Failure
    /// here never fails the login.
    ///
    /// The write only lands while the stored hash is still the one the
    /// password was verified against, so a concurrent password change wins.
    async fn upgrade_password_hash(&self, account: &Account, password: &str) {
        if !self.password_hasher.needs_rehash(&account.password_hash) {
            return;
        }

        match self.rehash(account, password).await {
            Ok(true) => {
                tracing::info!(account_id = %account.id, "password hash upgraded");
            }
            Ok(false) => {
                tracing::debug!(
                    account_id = %account.id,
                    "password hash upgrade skipped: stored hash changed"
                );
            }
            Err(err) => {
                tracing::warn!(account_id = %account.id, error = %err, "password hash upgrade failed");
            }
        }
    }

    async fn rehash(&self, account: &Account, password: &str) -> ApplicationResult<bool> {
        let password_hash = self.password_hasher.hash(password).await?;
        self.account_repo
            .replace_password_hash(
                account.id,
                &account.password_hash,
                password_hash,
                self.clock.now(),
            )
            .await
            .map_err(ApplicationError::from)
    }
}
