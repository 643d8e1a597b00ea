// src/application/ports/security.rs
use crate::application::{
    ApplicationResult,
    dto::{AuthTokenDto, TokenClaims},
    error::TokenError,
};
use crate::domain::account::{AccountId, PasswordHash};
use async_trait::async_trait;

#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hash with a fresh random salt. Only fails when the hashing worker or
    /// the entropy source is broken.
    async fn hash(&self, password: &str) -> ApplicationResult<PasswordHash>;

    /// `Ok(false)` for a wrong password and for an unparseable stored hash.
    async fn verify(&self, password: &str, stored: &PasswordHash) -> ApplicationResult<bool>;

    /// Whether `stored` was produced with parameters other than the current
    /// configured cost.
    fn needs_rehash(&self, stored: &PasswordHash) -> bool;
}

/// Issues and verifies bearer tokens. Both operations are pure computation
/// over the process-wide signing secret.
pub trait TokenManager: Send + Sync {
    fn issue(&self, subject: AccountId) -> ApplicationResult<AuthTokenDto>;

    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError>;
}
