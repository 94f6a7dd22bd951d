//! Championship queries

use std::sync::Arc;

use kernel::id::{AccountId, ChampionshipId};

use crate::domain::entity::championship::{Championship, ChampionshipFilter};
use crate::domain::repository::{AccountRepository, ChampionshipRepository};
use crate::error::{GridboardError, GridboardResult};

pub struct QueryChampionshipsUseCase<R>
where
    R: AccountRepository + ChampionshipRepository,
{
    repo: Arc<R>,
}

impl<R> QueryChampionshipsUseCase<R>
where
    R: AccountRepository + ChampionshipRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn get(&self, championship_id: ChampionshipId) -> GridboardResult<Championship> {
        self.repo
            .find_championship(&championship_id)
            .await?
            .ok_or(GridboardError::ChampionshipNotFound)
    }

    pub async fn list(&self, filter: ChampionshipFilter) -> GridboardResult<Vec<Championship>> {
        self.repo.list_championships(&filter).await
    }

    /// Championships created by `account_id`; the account must exist
    pub async fn list_by_creator(
        &self,
        account_id: AccountId,
    ) -> GridboardResult<Vec<Championship>> {
        if self.repo.find_by_id(&account_id).await?.is_none() {
            return Err(GridboardError::AccountNotFound);
        }
        self.repo
            .list_championships(&ChampionshipFilter::by_creator(account_id))
            .await
    }
}
