// src/application/dto/accounts.rs
use crate::domain::account::{Account, AccountTier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Public projection of an account. The password hash is deliberately not a
/// field here, so it cannot leak through any response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AccountDto {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub name: String,
    pub tier: AccountTier,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Account> for AccountDto {
    fn from(account: Account) -> Self {
        Self {
            id: account.id.into(),
            username: account.username.into(),
            email: account.email.into(),
            name: account.name.into(),
            tier: account.tier,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UpdateStatus {
    Updated,
    Unchanged,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateAccountResponse {
    pub status: UpdateStatus,
    pub account: AccountDto,
}
