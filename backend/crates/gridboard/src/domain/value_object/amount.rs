//! Monetary amount in cents
//!
//! Used for registration fees and stage prices. Always non-negative.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
    derive_more::Display,
)]
#[serde(try_from = "i64", into = "i64")]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Self = Self(0);

    pub fn from_cents(cents: i64) -> AppResult<Self> {
        if cents < 0 {
            return Err(AppError::bad_request(format!(
                "Amount cannot be negative (got {})",
                cents
            )));
        }
        Ok(Self(cents))
    }

    pub fn from_db(cents: i64) -> Self {
        Self(cents)
    }

    pub fn cents(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for Amount {
    type Error = AppError;

    fn try_from(value: i64) -> AppResult<Self> {
        Amount::from_cents(value)
    }
}

impl From<Amount> for i64 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_rejects_negative() {
        assert!(Amount::from_cents(-1).is_err());
        assert_eq!(Amount::from_cents(0).unwrap(), Amount::ZERO);
        assert_eq!(Amount::from_cents(15_000).unwrap().cents(), 15_000);
    }

    #[test]
    fn test_amount_serde() {
        let amount: Amount = serde_json::from_str("2500").unwrap();
        assert_eq!(amount.cents(), 2500);
        assert!(serde_json::from_str::<Amount>("-5").is_err());
        assert_eq!(serde_json::to_string(&amount).unwrap(), "2500");
    }
}
