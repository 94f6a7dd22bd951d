//! Infrastructure Layer
//!
//! Database implementations and external service integrations.

pub mod memory;
pub mod notifier;
pub mod postgres;

pub use memory::MemoryStore;
pub use notifier::LogResetNotifier;
pub use postgres::PgStore;
