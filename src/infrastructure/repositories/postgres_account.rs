// src/infrastructure/repositories/postgres_account.rs
use super::map_sqlx;
use crate::domain::account::{
    Account, AccountId, AccountRepository, AccountUpdate, DeleteOutcome, DisplayName, Email,
    NewAccount, PasswordHash, UpdateOutcome, Username,
};
use crate::domain::errors::{DomainError, DomainResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

const ACCOUNT_COLUMNS: &str =
    "id, username, email, name, password_hash, tier, created_at, updated_at";

#[derive(Clone)]
pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AccountRow {
    id: i64,
    username: String,
    email: String,
    name: String,
    password_hash: String,
    tier: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = DomainError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Ok(Account {
            id: AccountId::new(row.id)?,
            username: Username::new(row.username)?,
            email: Email::new(row.email)?,
            name: DisplayName::new(row.name)?,
            password_hash: PasswordHash::new(row.password_hash)?,
            tier: row.tier.parse()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn insert(&self, new_account: NewAccount) -> DomainResult<Account> {
        let NewAccount {
            username,
            email,
            name,
            password_hash,
            tier,
            created_at,
        } = new_account;

        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "INSERT INTO accounts (username, email, name, password_hash, tier, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $6)
             RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(username.as_str())
        .bind(email.as_str())
        .bind(name.as_str())
        .bind(password_hash.as_str())
        .bind(tier.as_str())
        .bind(created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Account::try_from(row)
    }

    async fn find_by_username(&self, username: &Username) -> DomainResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE username = $1"
        ))
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        row.map(Account::try_from).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> DomainResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        row.map(Account::try_from).transpose()
    }

    async fn find_by_id(&self, id: AccountId) -> DomainResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(i64::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        row.map(Account::try_from).transpose()
    }

    async fn list(&self) -> DomainResult<Vec<Account>> {
        let rows = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        rows.into_iter().map(Account::try_from).collect()
    }

    async fn update(&self, update: AccountUpdate) -> DomainResult<UpdateOutcome> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;

        let current = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1 FOR UPDATE"
        ))
        .bind(i64::from(update.id))
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_sqlx)?;

        let Some(current) = current else {
            tx.rollback().await.map_err(map_sqlx)?;
            return Ok(UpdateOutcome::NotFound);
        };

        let mut account = Account::try_from(current)?;
        if !account.apply(&update, update.updated_at) {
            tx.rollback().await.map_err(map_sqlx)?;
            return Ok(UpdateOutcome::Unchanged(account));
        }

        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "UPDATE accounts
             SET username = $2, email = $3, name = $4, password_hash = $5, updated_at = $6
             WHERE id = $1
             RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(i64::from(account.id))
        .bind(account.username.as_str())
        .bind(account.email.as_str())
        .bind(account.name.as_str())
        .bind(account.password_hash.as_str())
        .bind(account.updated_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx)?;

        tx.commit().await.map_err(map_sqlx)?;
        Ok(UpdateOutcome::Updated(Account::try_from(row)?))
    }

    async fn replace_password_hash(
        &self,
        id: AccountId,
        expected: &PasswordHash,
        replacement: PasswordHash,
        updated_at: DateTime<Utc>,
    ) -> DomainResult<bool> {
        let result = sqlx::query(
            "UPDATE accounts SET password_hash = $3, updated_at = $4
             WHERE id = $1 AND password_hash = $2",
        )
        .bind(i64::from(id))
        .bind(expected.as_str())
        .bind(replacement.as_str())
        .bind(updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: AccountId) -> DomainResult<DeleteOutcome> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(i64::from(id))
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;

        if result.rows_affected() == 0 {
            Ok(DeleteOutcome::NotFound)
        } else {
            Ok(DeleteOutcome::Deleted)
        }
    }
}
