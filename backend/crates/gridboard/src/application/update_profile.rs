//! Update Profile Use Case

use std::sync::Arc;

use kernel::id::AccountId;

use crate::domain::entity::account::{AccountChanges, PublicAccount};
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{DisplayName, Email};
use crate::error::GridboardResult;

/// Absent fields are left untouched
pub struct UpdateProfileInput {
    pub account_id: AccountId,
    pub display_name: Option<String>,
    pub identity: Option<String>,
    pub avatar: Option<String>,
}

pub struct UpdateProfileUseCase<R>
where
    R: AccountRepository,
{
    account_repo: Arc<R>,
}

impl<R> UpdateProfileUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(account_repo: Arc<R>) -> Self {
        Self { account_repo }
    }

    pub async fn execute(&self, input: UpdateProfileInput) -> GridboardResult<PublicAccount> {
        let changes = AccountChanges {
            display_name: input.display_name.map(DisplayName::new).transpose()?,
            identity: input.identity.map(Email::new).transpose()?,
            avatar: input.avatar.map(|avatar| avatar.trim().to_string()),
        };

        let account = self.account_repo.update(&input.account_id, &changes).await?;

        tracing::info!(account_id = %account.account_id, "Profile updated");

        Ok(PublicAccount::from(&account))
    }
}
