// src/infrastructure/security/password.rs
use crate::application::{
    error::{ApplicationError, ApplicationResult},
    ports::security::PasswordHasher,
};
use crate::domain::account::PasswordHash;
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        self, PasswordHash as PhcHash, PasswordHasher as _, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};
use async_trait::async_trait;

/// Argon2id work factor. Raising any of these makes new hashes slower to
/// compute; hashes made with older values keep verifying and are upgraded on
/// the next successful login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHashCost {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordHashCost {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

#[derive(Clone, Default)]
pub struct Argon2PasswordHasher {
    params: Params,
}

impl Argon2PasswordHasher {
    pub fn new(cost: PasswordHashCost) -> ApplicationResult<Self> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(|err| {
                ApplicationError::infrastructure(format!("invalid password hash cost: {err}"))
            })?;
        Ok(Self { params })
    }
}

fn argon2(params: Params) -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
}

fn verify_blocking(params: Params, password: &str, stored: &str) -> bool {
    let parsed = match PhcHash::new(stored) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::warn!(error = %err, "stored password hash is malformed");
            return false;
        }
    };

    // The algorithm, version and cost embedded in `parsed` take precedence
    // over `params`; the digest comparison is constant time.
    match argon2(params).verify_password(password.as_bytes(), &parsed) {
        Ok(()) => true,
        Err(password_hash::Error::Password) => false,
        Err(err) => {
            tracing::warn!(error = %err, "password verification failed");
            false
        }
    }
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, password: &str) -> ApplicationResult<PasswordHash> {
        let password = password.to_owned();
        let params = self.params.clone();
        let phc = tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            argon2(params)
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|err| ApplicationError::infrastructure(err.to_string()))
        })
        .await
        .map_err(|err| ApplicationError::infrastructure(err.to_string()))??;

        PasswordHash::new(phc).map_err(ApplicationError::from)
    }

    async fn verify(&self, password: &str, stored: &PasswordHash) -> ApplicationResult<bool> {
        let password = password.to_owned();
        let stored = stored.as_str().to_owned();
        let params = self.params.clone();
        tokio::task::spawn_blocking(move || verify_blocking(params, &password, &stored))
            .await
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))
    }

    fn needs_rehash(&self, stored: &PasswordHash) -> bool {
        let Ok(parsed) = PhcHash::new(stored.as_str()) else {
            return true;
        };
        if parsed.algorithm != Algorithm::Argon2id.ident() {
            return true;
        }
        match Params::try_from(&parsed) {
            Ok(current) => {
                current.m_cost() != self.params.m_cost()
                    || current.t_cost() != self.params.t_cost()
                    || current.p_cost() != self.params.p_cost()
            }
            Err(_) => true,
        }
    }
}
