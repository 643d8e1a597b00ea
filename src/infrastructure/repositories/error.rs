// src/infrastructure/repositories/error.rs
use crate::domain::errors::DomainError;

const CNT_ACCOUNT_USERNAME: &str = "accounts_username_key";
const CNT_ACCOUNT_EMAIL: &str = "accounts_email_key";
const CNT_ACCOUNT_TIER_CHECK: &str = "accounts_tier_check";
const CNT_ACCOUNT_HASH_CHECK: &str = "accounts_password_hash_phc_check";

pub fn map_sqlx(err: sqlx::Error) -> DomainError {
    match &err {
        sqlx::Error::Database(db_err) => {
            if let Some(constraint) = db_err.constraint() {
                return match constraint {
                    CNT_ACCOUNT_USERNAME => DomainError::Conflict("username already exists".into()),
                    CNT_ACCOUNT_EMAIL => DomainError::Conflict("email already registered".into()),
                    CNT_ACCOUNT_TIER_CHECK => {
                        DomainError::Validation("unknown account tier".into())
                    }
                    CNT_ACCOUNT_HASH_CHECK => {
                        DomainError::Validation("password hash must be a PHC string".into())
                    }
                    other => DomainError::StorageUnavailable(format!(
                        "database constraint violation: {other}"
                    )),
                };
            }

            if let Some(code) = db_err.code() {
                match code.as_ref() {
                    "23505" => {
                        return DomainError::Conflict("unique constraint violated".into());
                    }
                    "23514" => {
                        return DomainError::Validation("check constraint violated".into());
                    }
                    _ => {}
                }
            }

            DomainError::StorageUnavailable(db_err.message().to_string())
        }
        _ => DomainError::StorageUnavailable(err.to_string()),
    }
}
