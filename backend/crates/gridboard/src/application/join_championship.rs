//! Join Championship Use Case
//!
//! Adds a championship to a competitor's registration set. Registering twice
//! is not an error.

use std::sync::Arc;

use kernel::id::{AccountId, ChampionshipId};

use crate::domain::entity::account::PublicAccount;
use crate::domain::repository::AccountRepository;
use crate::error::GridboardResult;

pub struct JoinChampionshipUseCase<R>
where
    R: AccountRepository,
{
    account_repo: Arc<R>,
}

impl<R> JoinChampionshipUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(account_repo: Arc<R>) -> Self {
        Self { account_repo }
    }

    pub async fn execute(
        &self,
        account_id: AccountId,
        championship_id: ChampionshipId,
    ) -> GridboardResult<PublicAccount> {
        let account = self
            .account_repo
            .add_registration(&account_id, &championship_id)
            .await?;

        tracing::info!(
            account_id = %account_id,
            championship_id = %championship_id,
            "Account registered for championship"
        );

        Ok(PublicAccount::from(&account))
    }
}
