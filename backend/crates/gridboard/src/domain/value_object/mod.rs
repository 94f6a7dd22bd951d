//! Value Object Module

pub mod account_password;
pub mod amount;
pub mod display_name;
pub mod email;
pub mod reset_token;

pub use account_password::{AccountPassword, RawPassword};
pub use amount::Amount;
pub use display_name::DisplayName;
pub use email::Email;
pub use reset_token::{ResetTicket, ResetToken};
