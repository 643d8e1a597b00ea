pub mod accounts;
pub mod auth;

pub use accounts::{AccountDto, UpdateAccountResponse, UpdateStatus};
pub use auth::{AuthTokenDto, AuthenticatedAccount, TokenClaims};
