//! Update Championship Use Case

use std::sync::Arc;

use kernel::id::{AccountId, ChampionshipId};

use crate::domain::entity::championship::{Championship, ChampionshipPatch};
use crate::domain::repository::ChampionshipRepository;
use crate::error::GridboardResult;

pub struct UpdateChampionshipUseCase<R>
where
    R: ChampionshipRepository,
{
    championship_repo: Arc<R>,
}

impl<R> UpdateChampionshipUseCase<R>
where
    R: ChampionshipRepository,
{
    pub fn new(championship_repo: Arc<R>) -> Self {
        Self { championship_repo }
    }

    /// Ownership is checked by the store inside the write's atomic unit
    pub async fn execute(
        &self,
        championship_id: ChampionshipId,
        acting_account_id: AccountId,
        patch: ChampionshipPatch,
    ) -> GridboardResult<Championship> {
        let championship = self
            .championship_repo
            .update_championship(&championship_id, &acting_account_id, &patch)
            .await?;

        tracing::info!(
            championship_id = %championship_id,
            acting_account_id = %acting_account_id,
            "Championship updated"
        );

        Ok(championship)
    }
}
