//! Account Entity
//!
//! A registered identity with its credentials and championship
//! relationships. Sensitive fields (password hash, reset ticket) never leave
//! the crate: outward views are built as [`PublicAccount`].

use chrono::{DateTime, Utc};
use kernel::id::{AccountId, ChampionshipId};
use serde::Serialize;

use crate::domain::value_object::{AccountPassword, DisplayName, Email, ResetTicket};

#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub account_id: AccountId,
    /// Login key, unique across accounts
    pub identity: Email,
    pub display_name: DisplayName,
    pub password: AccountPassword,
    /// Avatar image URL (hosted externally)
    pub avatar: Option<String>,
    /// Championships this account created, in creation order
    pub created_championships: Vec<ChampionshipId>,
    /// Championships this account registered for, in registration order
    pub registered_championships: Vec<ChampionshipId>,
    /// Pending password reset, if any
    pub reset_ticket: Option<ResetTicket>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial profile update. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountChanges {
    pub display_name: Option<DisplayName>,
    pub identity: Option<Email>,
    pub avatar: Option<String>,
}

impl AccountChanges {
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.identity.is_none() && self.avatar.is_none()
    }
}

impl Account {
    pub fn new(identity: Email, display_name: DisplayName, password: AccountPassword) -> Self {
        let now = Utc::now();
        Self {
            account_id: AccountId::new(),
            identity,
            display_name,
            password,
            avatar: None,
            created_championships: Vec::new(),
            registered_championships: Vec::new(),
            reset_ticket: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// The new identity requested by `changes`, if it differs from the current one
    pub fn identity_change<'a>(&self, changes: &'a AccountChanges) -> Option<&'a Email> {
        changes
            .identity
            .as_ref()
            .filter(|identity| **identity != self.identity)
    }

    /// Apply a partial profile update
    pub fn apply_changes(&mut self, changes: &AccountChanges) {
        if changes.is_empty() {
            return;
        }
        if let Some(display_name) = &changes.display_name {
            self.display_name = display_name.clone();
        }
        if let Some(identity) = &changes.identity {
            self.identity = identity.clone();
        }
        if let Some(avatar) = &changes.avatar {
            self.avatar = Some(avatar.clone());
        }
        self.updated_at = Utc::now();
    }

    /// Store a reset ticket, replacing any unconsumed one
    pub fn set_reset_ticket(&mut self, ticket: ResetTicket) {
        self.reset_ticket = Some(ticket);
        self.updated_at = Utc::now();
    }

    /// Redeem the pending reset ticket
    ///
    /// Succeeds only when `token_hash` matches and the ticket is unexpired at
    /// `now`. On success the password is replaced and the ticket cleared.
    pub fn redeem_reset_ticket(
        &mut self,
        token_hash: &str,
        new_password: AccountPassword,
        now: DateTime<Utc>,
    ) -> bool {
        let redeemable = self
            .reset_ticket
            .as_ref()
            .is_some_and(|ticket| ticket.matches(token_hash) && ticket.is_valid_at(now));

        if redeemable {
            self.password = new_password;
            self.reset_ticket = None;
            self.updated_at = now;
        }
        redeemable
    }

    /// Drop an expired ticket. Returns true if one was removed.
    pub fn purge_expired_ticket(&mut self, now: DateTime<Utc>) -> bool {
        match &self.reset_ticket {
            Some(ticket) if !ticket.is_valid_at(now) => {
                self.reset_ticket = None;
                true
            }
            _ => false,
        }
    }

    pub fn record_created_championship(&mut self, championship_id: ChampionshipId) {
        if !self.created_championships.contains(&championship_id) {
            self.created_championships.push(championship_id);
            self.updated_at = Utc::now();
        }
    }

    /// Add a championship to the registration set (idempotent)
    pub fn register_for(&mut self, championship_id: ChampionshipId) -> bool {
        if self.registered_championships.contains(&championship_id) {
            return false;
        }
        self.registered_championships.push(championship_id);
        self.updated_at = Utc::now();
        true
    }
}

/// Account view safe to hand to clients
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicAccount {
    pub id: AccountId,
    pub identity: String,
    pub display_name: String,
    pub avatar: Option<String>,
    pub created_championships: Vec<ChampionshipId>,
    pub registered_championships: Vec<ChampionshipId>,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for PublicAccount {
    fn from(account: &Account) -> Self {
        Self {
            id: account.account_id,
            identity: account.identity.to_string(),
            display_name: account.display_name.to_string(),
            avatar: account.avatar.clone(),
            created_championships: account.created_championships.clone(),
            registered_championships: account.registered_championships.clone(),
            created_at: account.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{RawPassword, ResetToken};
    use chrono::Duration;
    use platform::password::PasswordCost;

    fn password(secret: &str) -> AccountPassword {
        let raw = RawPassword::new(secret.to_string()).unwrap();
        AccountPassword::from_raw(&raw, None, PasswordCost::MINIMAL).unwrap()
    }

    fn account() -> Account {
        Account::new(
            Email::new("ana@example.com").unwrap(),
            DisplayName::new("Ana").unwrap(),
            password("secret1"),
        )
    }

    #[test]
    fn test_partial_changes_leave_other_fields() {
        let mut account = account();
        account.apply_changes(&AccountChanges {
            avatar: Some("https://img.example.com/ana.png".into()),
            ..Default::default()
        });
        assert_eq!(account.display_name.as_str(), "Ana");
        assert_eq!(account.identity.as_str(), "ana@example.com");
        assert_eq!(account.avatar.as_deref(), Some("https://img.example.com/ana.png"));
    }

    #[test]
    fn test_identity_change_ignores_same_identity() {
        let account = account();
        let same = AccountChanges {
            identity: Some(Email::new("ana@example.com").unwrap()),
            ..Default::default()
        };
        assert!(account.identity_change(&same).is_none());

        let other = AccountChanges {
            identity: Some(Email::new("ana@other.com").unwrap()),
            ..Default::default()
        };
        assert_eq!(account.identity_change(&other).unwrap().as_str(), "ana@other.com");
    }

    #[test]
    fn test_redeem_ticket_once() {
        let mut account = account();
        let now = Utc::now();
        let token = ResetToken::generate(20);
        account.set_reset_ticket(ResetTicket::issue(&token, now, Duration::hours(1)));

        assert!(account.redeem_reset_ticket(&token.digest(), password("secret2"), now));
        assert!(account.reset_ticket.is_none());
        assert!(!account.redeem_reset_ticket(&token.digest(), password("secret3"), now));
    }

    #[test]
    fn test_redeem_ticket_rejects_expired_and_wrong() {
        let mut account = account();
        let now = Utc::now();
        let token = ResetToken::generate(20);
        account.set_reset_ticket(ResetTicket::issue(&token, now, Duration::hours(1)));
        let before = account.password.clone();

        let wrong = ResetToken::generate(20);
        assert!(!account.redeem_reset_ticket(&wrong.digest(), password("secret2"), now));
        assert!(!account.redeem_reset_ticket(
            &token.digest(),
            password("secret2"),
            now + Duration::minutes(61)
        ));
        assert_eq!(account.password, before);
        assert!(account.reset_ticket.is_some());

        assert!(account.purge_expired_ticket(now + Duration::minutes(61)));
        assert!(account.reset_ticket.is_none());
    }

    #[test]
    fn test_register_for_is_idempotent() {
        let mut account = account();
        let id = ChampionshipId::new();
        assert!(account.register_for(id));
        assert!(!account.register_for(id));
        assert_eq!(account.registered_championships, vec![id]);
    }

    #[test]
    fn test_public_account_has_no_secrets() {
        let mut account = account();
        account.set_reset_ticket(ResetTicket::issue(
            &ResetToken::generate(20),
            Utc::now(),
            Duration::hours(1),
        ));
        let json = serde_json::to_value(PublicAccount::from(&account)).unwrap();
        let object = json.as_object().unwrap();
        assert!(!object.contains_key("password"));
        assert!(!object.contains_key("resetTicket"));
        assert!(!json.to_string().contains("argon2"));
        assert_eq!(object["displayName"], "Ana");
    }
}
