//! Ownership Authorizer
//!
//! Only the creator of a championship may mutate it. Stores call this while
//! holding the lock (or row lock) that also covers the write.

use kernel::id::AccountId;

use crate::domain::entity::championship::Championship;
use crate::error::{GridboardError, GridboardResult};

/// Allow the mutation only when `acting_account_id` created the championship
pub fn authorize_mutation(
    championship: &Championship,
    acting_account_id: &AccountId,
) -> GridboardResult<()> {
    if championship.is_created_by(acting_account_id) {
        Ok(())
    } else {
        tracing::warn!(
            championship_id = %championship.championship_id,
            acting_account_id = %acting_account_id,
            "Championship mutation denied: not the creator"
        );
        Err(GridboardError::NotAuthorized)
    }
}
