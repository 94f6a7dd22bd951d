//! Display name shown next to an account's championships

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

pub const DISPLAY_NAME_MAX_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(name: impl Into<String>) -> AppResult<Self> {
        let name = name.into().trim().to_string();

        if name.is_empty() {
            return Err(AppError::bad_request("Display name cannot be empty"));
        }

        let char_count = name.chars().count();
        if char_count > DISPLAY_NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Display name must be at most {} characters (got {})",
                DISPLAY_NAME_MAX_LENGTH, char_count
            )));
        }

        if name.chars().any(char::is_control) {
            return Err(AppError::bad_request(
                "Display name contains invalid control characters",
            ));
        }

        Ok(Self(name))
    }

    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = AppError;

    fn try_from(value: String) -> AppResult<Self> {
        DisplayName::new(value)
    }
}

impl From<DisplayName> for String {
    fn from(name: DisplayName) -> Self {
        name.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_trims() {
        let name = DisplayName::new("  Ana Souza ").unwrap();
        assert_eq!(name.as_str(), "Ana Souza");
    }

    #[test]
    fn test_display_name_rejects_blank_and_long() {
        assert!(DisplayName::new("").is_err());
        assert!(DisplayName::new(" \t ").is_err());
        assert!(DisplayName::new("x".repeat(DISPLAY_NAME_MAX_LENGTH + 1)).is_err());
        assert!(DisplayName::new("x".repeat(DISPLAY_NAME_MAX_LENGTH)).is_ok());
    }

    #[test]
    fn test_display_name_rejects_control_chars() {
        assert!(DisplayName::new("Ana\u{0000}").is_err());
    }
}
