//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the
//! infrastructure layer (`PgStore`, `MemoryStore`). One store implements
//! both traits, so championship methods carry distinct names.

use chrono::{DateTime, Utc};
use kernel::id::{AccountId, ChampionshipId};

use crate::domain::entity::account::{Account, AccountChanges};
use crate::domain::entity::championship::{Championship, ChampionshipFilter, ChampionshipPatch};
use crate::domain::value_object::{AccountPassword, Email, ResetTicket};
use crate::error::GridboardResult;

/// Credential store
#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    /// Insert a new account
    ///
    /// Fails with `DuplicateIdentity` if the identity is taken.
    async fn create(&self, account: &Account) -> GridboardResult<()>;

    async fn find_by_id(&self, account_id: &AccountId) -> GridboardResult<Option<Account>>;

    async fn find_by_identity(&self, identity: &Email) -> GridboardResult<Option<Account>>;

    /// Apply a partial profile update
    ///
    /// Fails with `AccountNotFound` or `DuplicateIdentity`.
    async fn update(
        &self,
        account_id: &AccountId,
        changes: &AccountChanges,
    ) -> GridboardResult<Account>;

    /// Store a reset ticket, overwriting any prior one
    async fn store_reset_ticket(
        &self,
        account_id: &AccountId,
        ticket: &ResetTicket,
    ) -> GridboardResult<()>;

    /// Atomically redeem a reset ticket
    ///
    /// Matches the account whose ticket digest equals `token_hash` and whose
    /// expiry is after `now`, replaces its password and clears the ticket.
    /// `None` when nothing matched.
    async fn consume_reset_ticket(
        &self,
        token_hash: &str,
        new_password: &AccountPassword,
        now: DateTime<Utc>,
    ) -> GridboardResult<Option<Account>>;

    /// Drop tickets that expired before `now`
    async fn purge_expired_reset_tickets(&self, now: DateTime<Utc>) -> GridboardResult<u64>;

    /// Add a championship to the account's registration set (idempotent)
    ///
    /// Fails with `AccountNotFound` or `ChampionshipNotFound`.
    async fn add_registration(
        &self,
        account_id: &AccountId,
        championship_id: &ChampionshipId,
    ) -> GridboardResult<Account>;
}

/// Championship store
#[trait_variant::make(ChampionshipRepository: Send)]
pub trait LocalChampionshipRepository {
    /// Insert a championship and append it to its creator's created set
    ///
    /// Fails with `CreatorNotFound` if the creator does not exist.
    async fn create_championship(&self, championship: &Championship) -> GridboardResult<()>;

    async fn find_championship(
        &self,
        championship_id: &ChampionshipId,
    ) -> GridboardResult<Option<Championship>>;

    /// Championships matching `filter`, oldest first
    async fn list_championships(
        &self,
        filter: &ChampionshipFilter,
    ) -> GridboardResult<Vec<Championship>>;

    /// Ownership-checked update
    ///
    /// The creator check and the write happen in one atomic unit. Fails with
    /// `ChampionshipNotFound`, `NotAuthorized` or `Validation`, leaving the
    /// stored aggregate untouched.
    async fn update_championship(
        &self,
        championship_id: &ChampionshipId,
        acting_account_id: &AccountId,
        patch: &ChampionshipPatch,
    ) -> GridboardResult<Championship>;
}
