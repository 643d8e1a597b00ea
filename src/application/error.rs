// src/application/error.rs
use crate::domain::errors::DomainError;
use thiserror::Error;

pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("infrastructure failure: {0}")]
    Infrastructure(String),
}

impl ApplicationError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn infrastructure(msg: impl Into<String>) -> Self {
        Self::Infrastructure(msg.into())
    }

    pub fn unauthorized(reason: &'static str) -> Self {
        Self::Auth(AuthError::Unauthorized(reason))
    }

    /// The typed authentication outcome, if this error is one.
    pub fn as_auth(&self) -> Option<&AuthError> {
        match self {
            Self::Auth(err) => Some(err),
            _ => None,
        }
    }
}

/// Authentication outcomes. Every variant is a recoverable, reported result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("unknown account")]
    UnknownAccount,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("token expired")]
    Expired,

    #[error("token signature invalid")]
    InvalidSignature,

    #[error("malformed token: {0}")]
    Malformed(String),

    /// Gate-level rejection. The reason is for logs only and is never sent
    /// to the client.
    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),
}

impl AuthError {
    pub fn is_credential_failure(&self) -> bool {
        matches!(self, Self::UnknownAccount | Self::InvalidCredentials)
    }
}

/// Failure modes of bearer token verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,

    #[error("token signature invalid")]
    InvalidSignature,

    #[error("malformed token: {0}")]
    Malformed(String),
}

impl TokenError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed(reason.into())
    }
}

impl From<TokenError> for AuthError {
    fn from(value: TokenError) -> Self {
        match value {
            TokenError::Expired => Self::Expired,
            TokenError::InvalidSignature => Self::InvalidSignature,
            TokenError::Malformed(reason) => Self::Malformed(reason),
        }
    }
}

impl From<TokenError> for ApplicationError {
    fn from(value: TokenError) -> Self {
        Self::Auth(value.into())
    }
}
