//! Gridboard Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, ownership rule, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - PostgreSQL and in-memory stores, reset link delivery
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Account registration and login with identity + secret
//! - Single-use, time-limited password reset tokens
//! - Championships with ordered stages and entrant categories
//! - Creator-only mutation of championships
//! - Competitor registration for championships
//!
//! ## Security Model
//! - Secrets hashed with Argon2id, optional application pepper
//! - Reset tokens are 160-bit random values stored only as SHA-256 digests
//! - Login and reset failures are indistinguishable across causes

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::GridboardConfig;
pub use error::{GridboardError, GridboardResult};
pub use infra::{LogResetNotifier, MemoryStore, PgStore};
pub use presentation::router::{gridboard_router, gridboard_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod store {
    pub use crate::domain::repository::{AccountRepository, ChampionshipRepository};
    pub use crate::infra::memory::MemoryStore;
    pub use crate::infra::postgres::PgStore;
}
