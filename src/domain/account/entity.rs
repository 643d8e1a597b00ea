// src/domain/account/entity.rs
use crate::domain::account::value_objects::{
    AccountId, AccountTier, DisplayName, Email, PasswordHash, Username,
};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    pub username: Username,
    pub email: Email,
    pub name: DisplayName,
    pub password_hash: PasswordHash,
    pub tier: AccountTier,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Apply the present fields of `update`. Returns `true` when at least one
    /// stored value actually changed; `updated_at` only moves in that case.
    pub fn apply(&mut self, update: &AccountUpdate, now: DateTime<Utc>) -> bool {
        let mut changed = false;

        if let Some(username) = &update.username {
            if *username != self.username {
                self.username = username.clone();
                changed = true;
            }
        }
        if let Some(email) = &update.email {
            if *email != self.email {
                self.email = email.clone();
                changed = true;
            }
        }
        if let Some(name) = &update.name {
            if *name != self.name {
                self.name = name.clone();
                changed = true;
            }
        }
        // A fresh hash always differs from the stored one (new salt).
        if let Some(password_hash) = &update.password_hash {
            if *password_hash != self.password_hash {
                self.password_hash = password_hash.clone();
                changed = true;
            }
        }

        if changed {
            self.updated_at = now;
        }
        changed
    }
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: Username,
    pub email: Email,
    pub name: DisplayName,
    pub password_hash: PasswordHash,
    pub tier: AccountTier,
    pub created_at: DateTime<Utc>,
}

impl NewAccount {
    pub fn new(
        username: Username,
        email: Email,
        name: DisplayName,
        password_hash: PasswordHash,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            username,
            email,
            name,
            password_hash,
            tier: AccountTier::Standard,
            created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AccountUpdate {
    pub id: AccountId,
    pub username: Option<Username>,
    pub email: Option<Email>,
    pub name: Option<DisplayName>,
    pub password_hash: Option<PasswordHash>,
    pub updated_at: DateTime<Utc>,
}

impl AccountUpdate {
    pub fn new(id: AccountId, updated_at: DateTime<Utc>) -> Self {
        Self {
            id,
            username: None,
            email: None,
            name: None,
            password_hash: None,
            updated_at,
        }
    }

    pub fn with_username(mut self, username: Username) -> Self {
        self.username = Some(username);
        self
    }

    pub fn with_email(mut self, email: Email) -> Self {
        self.email = Some(email);
        self
    }

    pub fn with_name(mut self, name: DisplayName) -> Self {
        self.name = Some(name);
        self
    }

    pub fn with_password_hash(mut self, password_hash: PasswordHash) -> Self {
        self.password_hash = Some(password_hash);
        self
    }
}

/// Result of a store update. "Not found" and "nothing changed" are distinct
/// outcomes, neither of them is a failure of the store itself.
#[derive(Debug, Clone)]
pub enum UpdateOutcome {
    Updated(Account),
    Unchanged(Account),
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample(now: DateTime<Utc>) -> Account {
        Account {
            id: AccountId::new(1).unwrap(),
            username: Username::new("alice").unwrap(),
            email: Email::new("alice@example.com").unwrap(),
            name: DisplayName::new("Alice").unwrap(),
            password_hash: PasswordHash::new("$argon2id$one").unwrap(),
            tier: AccountTier::Standard,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn apply_with_same_values_reports_unchanged() {
        let now = Utc::now();
        let mut account = sample(now);
        let update = AccountUpdate::new(account.id, now + Duration::seconds(5))
            .with_username(Username::new("alice").unwrap())
            .with_name(DisplayName::new("Alice").unwrap());

        assert!(!account.apply(&update, now + Duration::seconds(5)));
        assert_eq!(account.updated_at, now);
    }

    #[test]
    fn apply_with_new_values_bumps_updated_at() {
        let now = Utc::now();
        let later = now + Duration::seconds(5);
        let mut account = sample(now);
        let update = AccountUpdate::new(account.id, later)
            .with_password_hash(PasswordHash::new("$argon2id$two").unwrap());

        assert!(account.apply(&update, later));
        assert_eq!(account.password_hash.as_str(), "$argon2id$two");
        assert_eq!(account.updated_at, later);
    }
}
