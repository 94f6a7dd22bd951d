//! In-memory store
//!
//! Backs tests and database-less development. All state sits behind a single
//! `RwLock`, so every repository call is atomic, including the ones that
//! touch an account and a championship together.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::id::{AccountId, ChampionshipId};
use tokio::sync::RwLock;

use crate::domain::entity::account::{Account, AccountChanges};
use crate::domain::entity::championship::{Championship, ChampionshipFilter, ChampionshipPatch};
use crate::domain::repository::{AccountRepository, ChampionshipRepository};
use crate::domain::service::ownership::authorize_mutation;
use crate::domain::value_object::{AccountPassword, Email, ResetTicket};
use crate::error::{GridboardError, GridboardResult};

#[derive(Debug, Default)]
struct MemoryState {
    accounts: HashMap<AccountId, Account>,
    /// identity -> account
    identity_index: HashMap<String, AccountId>,
    championships: HashMap<ChampionshipId, Championship>,
    /// Creation order
    championship_order: Vec<ChampionshipId>,
}

/// In-memory implementation of both repositories
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

// ============================================================================
// Account Repository Implementation
// ============================================================================

impl AccountRepository for MemoryStore {
    async fn create(&self, account: &Account) -> GridboardResult<()> {
        let mut state = self.state.write().await;

        if state.identity_index.contains_key(account.identity.as_str()) {
            return Err(GridboardError::DuplicateIdentity);
        }

        state
            .identity_index
            .insert(account.identity.as_str().to_string(), account.account_id);
        state.accounts.insert(account.account_id, account.clone());

        Ok(())
    }

    async fn find_by_id(&self, account_id: &AccountId) -> GridboardResult<Option<Account>> {
        let state = self.state.read().await;
        Ok(state.accounts.get(account_id).cloned())
    }

    async fn find_by_identity(&self, identity: &Email) -> GridboardResult<Option<Account>> {
        let state = self.state.read().await;
        Ok(state
            .identity_index
            .get(identity.as_str())
            .and_then(|id| state.accounts.get(id))
            .cloned())
    }

    async fn update(
        &self,
        account_id: &AccountId,
        changes: &AccountChanges,
    ) -> GridboardResult<Account> {
        let mut state = self.state.write().await;
        let state = &mut *state;

        let account = state
            .accounts
            .get_mut(account_id)
            .ok_or(GridboardError::AccountNotFound)?;

        // Checked before any field changes
        if let Some(identity) = account.identity_change(changes) {
            if state.identity_index.contains_key(identity.as_str()) {
                return Err(GridboardError::DuplicateIdentity);
            }
            state.identity_index.remove(account.identity.as_str());
            state
                .identity_index
                .insert(identity.as_str().to_string(), *account_id);
        }

        account.apply_changes(changes);

        Ok(account.clone())
    }

    async fn store_reset_ticket(
        &self,
        account_id: &AccountId,
        ticket: &ResetTicket,
    ) -> GridboardResult<()> {
        let mut state = self.state.write().await;

        let account = state
            .accounts
            .get_mut(account_id)
            .ok_or(GridboardError::AccountNotFound)?;
        account.set_reset_ticket(ticket.clone());

        Ok(())
    }

    async fn consume_reset_ticket(
        &self,
        token_hash: &str,
        new_password: &AccountPassword,
        now: DateTime<Utc>,
    ) -> GridboardResult<Option<Account>> {
        let mut state = self.state.write().await;

        let Some(account) = state.accounts.values_mut().find(|account| {
            account
                .reset_ticket
                .as_ref()
                .is_some_and(|ticket| ticket.matches(token_hash))
        }) else {
            return Ok(None);
        };

        if account.redeem_reset_ticket(token_hash, new_password.clone(), now) {
            Ok(Some(account.clone()))
        } else {
            Ok(None)
        }
    }

    async fn purge_expired_reset_tickets(&self, now: DateTime<Utc>) -> GridboardResult<u64> {
        let mut state = self.state.write().await;

        let purged = state
            .accounts
            .values_mut()
            .map(|account| account.purge_expired_ticket(now))
            .filter(|purged| *purged)
            .count();

        Ok(purged as u64)
    }

    async fn add_registration(
        &self,
        account_id: &AccountId,
        championship_id: &ChampionshipId,
    ) -> GridboardResult<Account> {
        let mut state = self.state.write().await;

        if !state.accounts.contains_key(account_id) {
            return Err(GridboardError::AccountNotFound);
        }
        if !state.championships.contains_key(championship_id) {
            return Err(GridboardError::ChampionshipNotFound);
        }

        let account = state
            .accounts
            .get_mut(account_id)
            .ok_or(GridboardError::AccountNotFound)?;
        account.register_for(*championship_id);

        Ok(account.clone())
    }
}

// ============================================================================
// Championship Repository Implementation
// ============================================================================

impl ChampionshipRepository for MemoryStore {
    async fn create_championship(&self, championship: &Championship) -> GridboardResult<()> {
        let mut state = self.state.write().await;

        let creator = state
            .accounts
            .get_mut(&championship.creator_id)
            .ok_or(GridboardError::CreatorNotFound)?;
        creator.record_created_championship(championship.championship_id);

        state
            .championships
            .insert(championship.championship_id, championship.clone());
        state.championship_order.push(championship.championship_id);

        Ok(())
    }

    async fn find_championship(
        &self,
        championship_id: &ChampionshipId,
    ) -> GridboardResult<Option<Championship>> {
        let state = self.state.read().await;
        Ok(state.championships.get(championship_id).cloned())
    }

    async fn list_championships(
        &self,
        filter: &ChampionshipFilter,
    ) -> GridboardResult<Vec<Championship>> {
        let state = self.state.read().await;

        Ok(state
            .championship_order
            .iter()
            .filter_map(|id| state.championships.get(id))
            .filter(|championship| filter.matches(championship))
            .cloned()
            .collect())
    }

    async fn update_championship(
        &self,
        championship_id: &ChampionshipId,
        acting_account_id: &AccountId,
        patch: &ChampionshipPatch,
    ) -> GridboardResult<Championship> {
        let mut state = self.state.write().await;

        let current = state
            .championships
            .get_mut(championship_id)
            .ok_or(GridboardError::ChampionshipNotFound)?;

        authorize_mutation(current, acting_account_id)?;
        let next = current.apply_patch(patch)?;
        *current = next.clone();

        Ok(next)
    }
}
