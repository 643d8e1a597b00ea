// tests/support/mocks.rs
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use quire_core::application::{
    ApplicationResult,
    ports::{security::PasswordHasher, time::Clock},
};
use quire_core::domain::account::{
    Account, AccountId, AccountRepository, AccountUpdate, DeleteOutcome, Email, NewAccount,
    PasswordHash, UpdateOutcome, Username,
};
use quire_core::domain::errors::{DomainError, DomainResult};
use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

/// Clock that only moves when told to.
pub struct FixedClock(Mutex<DateTime<Utc>>);

impl FixedClock {
    pub fn new() -> Self {
        Self::at(DateTime::from_timestamp(1_700_000_000, 0).unwrap())
    }

    pub fn at(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance(&self, by: Duration) {
        *self.0.lock().unwrap() += by;
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

/// Fast, transparent stand-in for Argon2. Hashes look like
/// `$strict$v<generation>$<password>` so tests can see which generation
/// produced a stored hash; anything from an older generation needs a rehash.
pub struct StrictPasswordHasher {
    generation: u32,
    hash_calls: AtomicUsize,
}

impl StrictPasswordHasher {
    pub fn new() -> Self {
        Self::generation(1)
    }

    pub fn generation(generation: u32) -> Self {
        Self {
            generation,
            hash_calls: AtomicUsize::new(0),
        }
    }

    pub fn hash_calls(&self) -> usize {
        self.hash_calls.load(Ordering::SeqCst)
    }

    pub fn encode(generation: u32, password: &str) -> PasswordHash {
        PasswordHash::new(format!("$strict$v{generation}${password}")).unwrap()
    }

    fn parse(stored: &PasswordHash) -> Option<(u32, &str)> {
        let rest = stored.as_str().strip_prefix("$strict$v")?;
        let (generation, password) = rest.split_once('$')?;
        Some((generation.parse().ok()?, password))
    }
}

impl Default for StrictPasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PasswordHasher for StrictPasswordHasher {
    async fn hash(&self, password: &str) -> ApplicationResult<PasswordHash> {
        self.hash_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Self::encode(self.generation, password))
    }

    async fn verify(&self, password: &str, stored: &PasswordHash) -> ApplicationResult<bool> {
        Ok(Self::parse(stored).is_some_and(|(_, expected)| expected == password))
    }

    fn needs_rehash(&self, stored: &PasswordHash) -> bool {
        Self::parse(stored).is_none_or(|(generation, _)| generation != self.generation)
    }
}

/// Store whose backend is unreachable.
pub struct DownAccountRepository;

fn down<T>() -> DomainResult<T> {
    Err(DomainError::StorageUnavailable("connection refused".into()))
}

#[async_trait]
impl AccountRepository for DownAccountRepository {
    async fn insert(&self, _new_account: NewAccount) -> DomainResult<Account> {
        down()
    }

    async fn find_by_username(&self, _username: &Username) -> DomainResult<Option<Account>> {
        down()
    }

    async fn find_by_email(&self, _email: &Email) -> DomainResult<Option<Account>> {
        down()
    }

    async fn find_by_id(&self, _id: AccountId) -> DomainResult<Option<Account>> {
        down()
    }

    async fn list(&self) -> DomainResult<Vec<Account>> {
        down()
    }

    async fn update(&self, _update: AccountUpdate) -> DomainResult<UpdateOutcome> {
        down()
    }

    async fn replace_password_hash(
        &self,
        _id: AccountId,
        _expected: &PasswordHash,
        _replacement: PasswordHash,
        _updated_at: DateTime<Utc>,
    ) -> DomainResult<bool> {
        down()
    }

    async fn delete(&self, _id: AccountId) -> DomainResult<DeleteOutcome> {
        down()
    }
}
