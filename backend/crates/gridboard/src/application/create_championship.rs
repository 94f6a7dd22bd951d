//! Create Championship Use Case

use std::sync::Arc;

use kernel::id::AccountId;

use crate::domain::entity::championship::{Championship, ChampionshipDraft};
use crate::domain::repository::ChampionshipRepository;
use crate::error::GridboardResult;

pub struct CreateChampionshipUseCase<R>
where
    R: ChampionshipRepository,
{
    championship_repo: Arc<R>,
}

impl<R> CreateChampionshipUseCase<R>
where
    R: ChampionshipRepository,
{
    pub fn new(championship_repo: Arc<R>) -> Self {
        Self { championship_repo }
    }

    /// Validate and persist; the store appends the id to the creator's set
    pub async fn execute(
        &self,
        creator_id: AccountId,
        draft: ChampionshipDraft,
    ) -> GridboardResult<Championship> {
        let championship = Championship::create(creator_id, draft)?;
        self.championship_repo
            .create_championship(&championship)
            .await?;

        tracing::info!(
            championship_id = %championship.championship_id,
            creator_id = %creator_id,
            stages = championship.stages.len(),
            "Championship created"
        );

        Ok(championship)
    }
}
