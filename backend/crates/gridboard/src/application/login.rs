//! Login Use Case
//!
//! Verifies an identity and secret pair. Every failure cause (malformed
//! input, unknown identity, wrong secret) yields the same
//! `InvalidCredentials`.

use std::sync::Arc;

use crate::application::config::GridboardConfig;
use crate::domain::entity::account::PublicAccount;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{Email, RawPassword};
use crate::error::{GridboardError, GridboardResult};

/// Login input
pub struct LoginInput {
    pub identity: String,
    pub secret: String,
}

/// Login use case
pub struct LoginUseCase<R>
where
    R: AccountRepository,
{
    account_repo: Arc<R>,
    config: Arc<GridboardConfig>,
}

impl<R> LoginUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(account_repo: Arc<R>, config: Arc<GridboardConfig>) -> Self {
        Self {
            account_repo,
            config,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> GridboardResult<PublicAccount> {
        let identity =
            Email::new(input.identity).map_err(|_| GridboardError::InvalidCredentials)?;
        let raw_password =
            RawPassword::new(input.secret).map_err(|_| GridboardError::InvalidCredentials)?;

        let Some(account) = self.account_repo.find_by_identity(&identity).await? else {
            // Same Argon2 work as a real verification
            if let Some(guard) = self.config.timing_guard_hash() {
                let _ = guard.verify(&raw_password, self.config.pepper());
            }
            return Err(GridboardError::InvalidCredentials);
        };

        if !account.password.verify(&raw_password, self.config.pepper()) {
            return Err(GridboardError::InvalidCredentials);
        }

        if account.password.needs_rehash(self.config.password_cost) {
            tracing::debug!(
                account_id = %account.account_id,
                "Stored password hash uses outdated cost parameters"
            );
        }

        tracing::info!(account_id = %account.account_id, "Account logged in");

        Ok(PublicAccount::from(&account))
    }
}
