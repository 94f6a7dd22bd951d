//! Register Use Case
//!
//! Creates a new account.

use std::sync::Arc;

use crate::application::config::GridboardConfig;
use crate::domain::entity::account::{Account, PublicAccount};
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{AccountPassword, DisplayName, Email, RawPassword};
use crate::error::{GridboardError, GridboardResult};

/// Register input
pub struct RegisterInput {
    pub identity: String,
    pub display_name: String,
    pub secret: String,
    /// Must equal `secret` when supplied
    pub secret_confirmation: Option<String>,
}

/// Register use case
pub struct RegisterUseCase<R>
where
    R: AccountRepository,
{
    account_repo: Arc<R>,
    config: Arc<GridboardConfig>,
}

impl<R> RegisterUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(account_repo: Arc<R>, config: Arc<GridboardConfig>) -> Self {
        Self {
            account_repo,
            config,
        }
    }

    pub async fn execute(&self, input: RegisterInput) -> GridboardResult<PublicAccount> {
        let identity = Email::new(input.identity)?;
        let display_name = DisplayName::new(input.display_name)?;

        if input
            .secret_confirmation
            .as_ref()
            .is_some_and(|confirmation| *confirmation != input.secret)
        {
            return Err(GridboardError::validation("Passwords do not match"));
        }
        let raw_password = RawPassword::new(input.secret)?;

        // Skip the hashing cost for an obvious duplicate; the store still
        // enforces uniqueness on insert.
        if self
            .account_repo
            .find_by_identity(&identity)
            .await?
            .is_some()
        {
            return Err(GridboardError::DuplicateIdentity);
        }

        let password = AccountPassword::from_raw(
            &raw_password,
            self.config.pepper(),
            self.config.password_cost,
        )?;

        let account = Account::new(identity, display_name, password);
        self.account_repo.create(&account).await?;

        tracing::info!(
            account_id = %account.account_id,
            "Account registered"
        );

        Ok(PublicAccount::from(&account))
    }
}
