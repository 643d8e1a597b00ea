use std::sync::Arc;

use crate::domain::account::AccountRepository;

pub struct AccountQueryService {
    pub(super) account_repo: Arc<dyn AccountRepository>,
}

impl AccountQueryService {
    pub fn new(account_repo: Arc<dyn AccountRepository>) -> Self {
        Self { account_repo }
    }
}
