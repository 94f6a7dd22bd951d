//! Shared Kernel
//!
//! Vocabulary shared by every crate in the workspace:
//! - The unified error type and its HTTP classification
//! - Typed identifiers for accounts and championships
//!
//! Only things with the same meaning across all crates belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
