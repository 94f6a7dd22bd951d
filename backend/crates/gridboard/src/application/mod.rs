//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod create_championship;
pub mod join_championship;
pub mod login;
pub mod password_reset;
pub mod query_championships;
pub mod register;
pub mod update_championship;
pub mod update_profile;

// Re-exports
pub use config::GridboardConfig;
pub use create_championship::CreateChampionshipUseCase;
pub use join_championship::JoinChampionshipUseCase;
pub use login::{LoginInput, LoginUseCase};
pub use password_reset::{
    CompleteResetInput, CompleteResetUseCase, RequestResetInput, RequestResetUseCase,
    ResetNotifier,
};
pub use query_championships::QueryChampionshipsUseCase;
pub use register::{RegisterInput, RegisterUseCase};
pub use update_championship::UpdateChampionshipUseCase;
pub use update_profile::{UpdateProfileInput, UpdateProfileUseCase};
