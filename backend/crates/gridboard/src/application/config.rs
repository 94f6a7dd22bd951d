//! Application Configuration
//!
//! Configuration for the Gridboard application layer.

use std::sync::OnceLock;

use chrono::Duration;
use platform::password::PasswordCost;

use crate::domain::value_object::{AccountPassword, RawPassword};
use crate::domain::value_object::reset_token::MIN_RESET_TOKEN_BYTES;

/// Gridboard application configuration
#[derive(Debug, Clone)]
pub struct GridboardConfig {
    /// Reset ticket lifetime (1 hour)
    pub reset_token_ttl: Duration,
    /// Random bytes per reset token (hex doubles the length)
    pub reset_token_bytes: usize,
    /// Page that receives `?token=...` in the reset link
    pub reset_url_base: String,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Argon2 cost parameters
    pub password_cost: PasswordCost,
    timing_guard: OnceLock<Option<AccountPassword>>,
}

impl Default for GridboardConfig {
    fn default() -> Self {
        Self {
            reset_token_ttl: Duration::hours(1),
            reset_token_bytes: MIN_RESET_TOKEN_BYTES,
            reset_url_base: "http://localhost:5173/reset-password".to_string(),
            password_pepper: None,
            password_cost: PasswordCost::RECOMMENDED,
            timing_guard: OnceLock::new(),
        }
    }
}

impl GridboardConfig {
    /// Create config for development
    pub fn development() -> Self {
        Self {
            reset_url_base: "http://localhost:3000/reset-password".to_string(),
            ..Default::default()
        }
    }

    /// Low-cost hashing for tests
    pub fn testing() -> Self {
        Self {
            reset_url_base: "http://test.local/reset-password".to_string(),
            password_cost: PasswordCost::MINIMAL,
            ..Default::default()
        }
    }

    pub fn with_reset_url_base(mut self, reset_url_base: impl Into<String>) -> Self {
        self.reset_url_base = reset_url_base.into();
        self
    }

    pub fn with_pepper(mut self, pepper: Vec<u8>) -> Self {
        self.password_pepper = Some(pepper);
        self.timing_guard = OnceLock::new();
        self
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    /// Build the reset link handed to the notifier
    pub fn reset_link(&self, token: &str) -> String {
        format!("{}?token={}", self.reset_url_base, token)
    }

    /// Hash verified against when a login names an unknown identity
    ///
    /// Computed once with the configured cost so both paths spend the same
    /// work. `None` only if hashing itself is broken.
    pub fn timing_guard_hash(&self) -> Option<&AccountPassword> {
        self.timing_guard
            .get_or_init(|| {
                let raw = RawPassword::new("timing-guard-secret".to_string()).ok()?;
                AccountPassword::from_raw(&raw, self.pepper(), self.password_cost).ok()
            })
            .as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GridboardConfig::default();
        assert_eq!(config.reset_token_ttl, Duration::hours(1));
        assert_eq!(config.reset_token_bytes, 20);
        assert_eq!(config.password_cost, PasswordCost::RECOMMENDED);
    }

    #[test]
    fn test_reset_link() {
        let config = GridboardConfig::testing().with_reset_url_base("https://gridboard.app/reset");
        assert_eq!(
            config.reset_link("abc123"),
            "https://gridboard.app/reset?token=abc123"
        );
    }

    #[test]
    fn test_timing_guard_is_cached() {
        let config = GridboardConfig::testing();
        let first = config.timing_guard_hash().unwrap().as_phc_string().to_string();
        let second = config.timing_guard_hash().unwrap().as_phc_string().to_string();
        assert_eq!(first, second);
    }
}
