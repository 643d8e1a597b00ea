// src/infrastructure/repositories/memory_account.rs
use crate::domain::account::{
    Account, AccountId, AccountRepository, AccountUpdate, DeleteOutcome, Email, NewAccount,
    PasswordHash, UpdateOutcome, Username,
};
use crate::domain::errors::{DomainError, DomainResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct State {
    last_id: i64,
    accounts: BTreeMap<i64, Account>,
}

impl State {
    fn username_taken(&self, username: &Username, except: Option<AccountId>) -> bool {
        self.accounts
            .values()
            .any(|a| a.username == *username && Some(a.id) != except)
    }

    fn email_taken(&self, email: &Email, except: Option<AccountId>) -> bool {
        self.accounts
            .values()
            .any(|a| a.email == *email && Some(a.id) != except)
    }
}

/// Process-local account store with the same uniqueness rules as the
/// Postgres schema. Backs the integration tests.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    state: RwLock<State>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn insert(&self, new_account: NewAccount) -> DomainResult<Account> {
        let mut state = self.state.write().await;

        if state.username_taken(&new_account.username, None) {
            return Err(DomainError::Conflict("username already exists".into()));
        }
        if state.email_taken(&new_account.email, None) {
            return Err(DomainError::Conflict("email already registered".into()));
        }

        state.last_id += 1;
        let account = Account {
            id: AccountId::new(state.last_id)?,
            username: new_account.username,
            email: new_account.email,
            name: new_account.name,
            password_hash: new_account.password_hash,
            tier: new_account.tier,
            created_at: new_account.created_at,
            updated_at: new_account.created_at,
        };
        state
            .accounts
            .insert(i64::from(account.id), account.clone());

        Ok(account)
    }

    async fn find_by_username(&self, username: &Username) -> DomainResult<Option<Account>> {
        let state = self.state.read().await;
        Ok(state
            .accounts
            .values()
            .find(|a| a.username == *username)
            .cloned())
    }

    async fn find_by_email(&self, email: &Email) -> DomainResult<Option<Account>> {
        let state = self.state.read().await;
        Ok(state.accounts.values().find(|a| a.email == *email).cloned())
    }

    async fn find_by_id(&self, id: AccountId) -> DomainResult<Option<Account>> {
        let state = self.state.read().await;
        Ok(state.accounts.get(&i64::from(id)).cloned())
    }

    async fn list(&self) -> DomainResult<Vec<Account>> {
        let state = self.state.read().await;
        Ok(state.accounts.values().cloned().collect())
    }

    async fn update(&self, update: AccountUpdate) -> DomainResult<UpdateOutcome> {
        let mut state = self.state.write().await;

        if !state.accounts.contains_key(&i64::from(update.id)) {
            return Ok(UpdateOutcome::NotFound);
        }
        if let Some(username) = &update.username {
            if state.username_taken(username, Some(update.id)) {
                return Err(DomainError::Conflict("username already exists".into()));
            }
        }
        if let Some(email) = &update.email {
            if state.email_taken(email, Some(update.id)) {
                return Err(DomainError::Conflict("email already registered".into()));
            }
        }

        let Some(account) = state.accounts.get_mut(&i64::from(update.id)) else {
            return Ok(UpdateOutcome::NotFound);
        };
        if account.apply(&update, update.updated_at) {
            Ok(UpdateOutcome::Updated(account.clone()))
        } else {
            Ok(UpdateOutcome::Unchanged(account.clone()))
        }
    }

    async fn replace_password_hash(
        &self,
        id: AccountId,
        expected: &PasswordHash,
        replacement: PasswordHash,
        updated_at: DateTime<Utc>,
    ) -> DomainResult<bool> {
        let mut state = self.state.write().await;
        match state.accounts.get_mut(&i64::from(id)) {
            Some(account) if account.password_hash == *expected => {
                account.password_hash = replacement;
                account.updated_at = updated_at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, id: AccountId) -> DomainResult<DeleteOutcome> {
        let mut state = self.state.write().await;
        match state.accounts.remove(&i64::from(id)) {
            Some(_) => Ok(DeleteOutcome::Deleted),
            None => Ok(DeleteOutcome::NotFound),
        }
    }
}
