//! Password Reset Use Cases
//!
//! Two steps: issue a single-use token to the account holder, then redeem it
//! for a new secret. The clear token only ever exists in the reset link.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;

use crate::application::config::GridboardConfig;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{AccountPassword, Email, RawPassword, ResetTicket, ResetToken};
use crate::error::{GridboardError, GridboardResult};

/// Delivery channel for reset links (mail, SMS, log, ...)
pub trait ResetNotifier: Send + Sync {
    fn send_reset_link(&self, identity: &Email, link: &str);
}

// ============================================================================
// Request
// ============================================================================

pub struct RequestResetInput {
    pub identity: String,
}

/// Forgot-password use case
///
/// Completes identically whether or not the identity exists. Request handlers
/// go through [`RequestResetUseCase::spawn`] so the response never waits on
/// lookup, token storage or delivery.
pub struct RequestResetUseCase<R>
where
    R: AccountRepository,
{
    account_repo: Arc<R>,
    notifier: Arc<dyn ResetNotifier>,
    config: Arc<GridboardConfig>,
}

impl<R> RequestResetUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(
        account_repo: Arc<R>,
        notifier: Arc<dyn ResetNotifier>,
        config: Arc<GridboardConfig>,
    ) -> Self {
        Self {
            account_repo,
            notifier,
            config,
        }
    }

    /// Never fails for the caller; faults are logged only
    pub async fn execute(&self, input: RequestResetInput) {
        self.execute_at(input, Utc::now()).await
    }

    pub async fn execute_at(&self, input: RequestResetInput, now: DateTime<Utc>) {
        if let Err(e) = self.issue(input, now).await {
            tracing::error!(error = %e, "Password reset request failed");
        }
    }

    /// Run the request in the background
    ///
    /// Nothing is done on the caller's path, so response timing is the same
    /// for known and unknown identities.
    pub fn spawn(self, input: RequestResetInput) -> JoinHandle<()>
    where
        R: Send + Sync + 'static,
    {
        tokio::spawn(async move { self.execute(input).await })
    }

    async fn issue(&self, input: RequestResetInput, now: DateTime<Utc>) -> GridboardResult<()> {
        let Ok(identity) = Email::new(input.identity) else {
            tracing::debug!("Password reset requested for malformed identity");
            return Ok(());
        };

        let Some(account) = self.account_repo.find_by_identity(&identity).await? else {
            tracing::debug!("Password reset requested for unknown identity");
            return Ok(());
        };

        let token = ResetToken::generate(self.config.reset_token_bytes);
        let ticket = ResetTicket::issue(&token, now, self.config.reset_token_ttl);
        self.account_repo
            .store_reset_ticket(&account.account_id, &ticket)
            .await?;

        tracing::info!(
            account_id = %account.account_id,
            expires_at = %ticket.expires_at,
            "Password reset ticket issued"
        );

        self.notifier
            .send_reset_link(&account.identity, &self.config.reset_link(token.as_str()));

        Ok(())
    }
}

// ============================================================================
// Complete
// ============================================================================

pub struct CompleteResetInput {
    pub token: String,
    pub secret: String,
}

/// Reset-password use case
pub struct CompleteResetUseCase<R>
where
    R: AccountRepository,
{
    account_repo: Arc<R>,
    config: Arc<GridboardConfig>,
}

impl<R> CompleteResetUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(account_repo: Arc<R>, config: Arc<GridboardConfig>) -> Self {
        Self {
            account_repo,
            config,
        }
    }

    pub async fn execute(&self, input: CompleteResetInput) -> GridboardResult<()> {
        self.execute_at(input, Utc::now()).await
    }

    /// Redeem against an explicit clock
    pub async fn execute_at(
        &self,
        input: CompleteResetInput,
        now: DateTime<Utc>,
    ) -> GridboardResult<()> {
        let token = ResetToken::from_presented(input.token);
        if token.as_str().is_empty() {
            return Err(GridboardError::InvalidOrExpiredToken);
        }

        let raw_password = RawPassword::new(input.secret)?;
        let password = AccountPassword::from_raw(
            &raw_password,
            self.config.pepper(),
            self.config.password_cost,
        )?;

        let account = self
            .account_repo
            .consume_reset_ticket(&token.digest(), &password, now)
            .await?
            .ok_or(GridboardError::InvalidOrExpiredToken)?;

        tracing::info!(account_id = %account.account_id, "Password reset completed");

        Ok(())
    }
}
