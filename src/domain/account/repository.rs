// src/domain/account/repository.rs
use crate::domain::account::entity::{
    Account, AccountUpdate, DeleteOutcome, NewAccount, UpdateOutcome,
};
use crate::domain::account::value_objects::{AccountId, Email, PasswordHash, Username};
use crate::domain::errors::DomainResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Persistence port for accounts. Implementations provide atomic
/// per-record reads and writes; uniqueness violations surface as
/// `DomainError::Conflict` and backend outages as
/// `DomainError::StorageUnavailable`.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn insert(&self, new_account: NewAccount) -> DomainResult<Account>;

    async fn find_by_username(&self, username: &Username) -> DomainResult<Option<Account>>;

    async fn find_by_email(&self, email: &Email) -> DomainResult<Option<Account>>;

    async fn find_by_id(&self, id: AccountId) -> DomainResult<Option<Account>>;

    async fn list(&self) -> DomainResult<Vec<Account>>;

    async fn update(&self, update: AccountUpdate) -> DomainResult<UpdateOutcome>;

    /// Swap the stored hash for `replacement` only if it still equals
    /// `expected`. Returns whether a row was written.
    async fn replace_password_hash(
        &self,
        id: AccountId,
        expected: &PasswordHash,
        replacement: PasswordHash,
        updated_at: DateTime<Utc>,
    ) -> DomainResult<bool>;

    async fn delete(&self, id: AccountId) -> DomainResult<DeleteOutcome>;
}
