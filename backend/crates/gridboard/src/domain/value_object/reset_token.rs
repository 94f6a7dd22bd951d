//! Password reset tokens
//!
//! A [`ResetToken`] is the clear value handed to the account holder. Only its
//! SHA-256 digest is persisted, inside a [`ResetTicket`] together with the
//! expiry instant.

use chrono::{DateTime, Duration, Utc};
use std::fmt;

/// Lower bound on token entropy: 20 bytes = 160 bits
pub const MIN_RESET_TOKEN_BYTES: usize = 20;

/// Clear reset token (hex), never stored
#[derive(Clone, PartialEq, Eq)]
pub struct ResetToken(String);

impl ResetToken {
    /// Generate from the OS CSPRNG
    ///
    /// `bytes` is raised to [`MIN_RESET_TOKEN_BYTES`] if smaller.
    pub fn generate(bytes: usize) -> Self {
        Self(platform::crypto::random_hex_token(
            bytes.max(MIN_RESET_TOKEN_BYTES),
        ))
    }

    /// Wrap a token presented by a client
    pub fn from_presented(token: impl Into<String>) -> Self {
        Self(token.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Digest used for storage and lookup
    pub fn digest(&self) -> String {
        platform::crypto::sha256_hex(self.0.as_bytes())
    }
}

impl fmt::Debug for ResetToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ResetToken").field(&"[REDACTED]").finish()
    }
}

/// Stored half of a reset token: digest and expiry always travel together
#[derive(Clone, PartialEq, Eq)]
pub struct ResetTicket {
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

impl ResetTicket {
    pub fn issue(token: &ResetToken, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            token_hash: token.digest(),
            expires_at: now + ttl,
        }
    }

    /// Usable only while `now` is strictly before the expiry
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Digest comparison in constant time
    pub fn matches(&self, token_hash: &str) -> bool {
        platform::crypto::constant_time_eq(self.token_hash.as_bytes(), token_hash.as_bytes())
    }
}

impl fmt::Debug for ResetTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResetTicket")
            .field("token_hash", &"[HASH]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_has_enough_entropy() {
        let token = ResetToken::generate(20);
        assert_eq!(token.as_str().len(), 40);

        // Too-small requests are raised to the minimum
        let token = ResetToken::generate(4);
        assert_eq!(token.as_str().len(), MIN_RESET_TOKEN_BYTES * 2);
    }

    #[test]
    fn test_tokens_are_unique() {
        assert_ne!(ResetToken::generate(20), ResetToken::generate(20));
    }

    #[test]
    fn test_ticket_stores_digest_not_token() {
        let token = ResetToken::generate(20);
        let ticket = ResetTicket::issue(&token, Utc::now(), Duration::hours(1));
        assert_ne!(ticket.token_hash, token.as_str());
        assert!(ticket.matches(&ResetToken::from_presented(token.as_str()).digest()));
        assert!(!ticket.matches(&ResetToken::generate(20).digest()));
    }

    #[test]
    fn test_ticket_expiry_is_strict() {
        let now = Utc::now();
        let ticket = ResetTicket::issue(&ResetToken::generate(20), now, Duration::hours(1));
        assert!(ticket.is_valid_at(now + Duration::minutes(59)));
        assert!(!ticket.is_valid_at(now + Duration::hours(1)));
        assert!(!ticket.is_valid_at(now + Duration::minutes(61)));
    }

    #[test]
    fn test_debug_redaction() {
        let token = ResetToken::generate(20);
        assert!(!format!("{:?}", token).contains(token.as_str()));
    }
}
