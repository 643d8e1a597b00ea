// src/presentation/http/middleware/mod.rs
pub mod authenticate;
pub mod rate_limit;

pub use authenticate::{TOKEN_COOKIE, require_authentication};
pub use rate_limit::rate_limit_layer;
