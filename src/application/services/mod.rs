// src/application/services/mod.rs
pub mod gate;

use std::sync::Arc;

use crate::{
    application::{
        commands::accounts::AccountCommandService,
        ports::{
            security::{PasswordHasher, TokenManager},
            time::Clock,
        },
        queries::accounts::AccountQueryService,
    },
    domain::account::AccountRepository,
};

pub use gate::AuthorizationGate;

pub struct ApplicationServices {
    pub account_commands: Arc<AccountCommandService>,
    pub account_queries: Arc<AccountQueryService>,
    gate: Arc<AuthorizationGate>,
}

impl ApplicationServices {
    pub fn new(
        account_repo: Arc<dyn AccountRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        token_manager: Arc<dyn TokenManager>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let account_commands = Arc::new(AccountCommandService::new(
            Arc::clone(&account_repo),
            Arc::clone(&password_hasher),
            Arc::clone(&token_manager),
            Arc::clone(&clock),
        ));
        let account_queries = Arc::new(AccountQueryService::new(Arc::clone(&account_repo)));
        let gate = Arc::new(AuthorizationGate::new(token_manager, account_repo));

        Self {
            account_commands,
            account_queries,
            gate,
        }
    }

    pub fn gate(&self) -> Arc<AuthorizationGate> {
        Arc::clone(&self.gate)
    }
}
