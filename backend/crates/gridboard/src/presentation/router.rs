//! Gridboard Router

use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;

use crate::application::config::GridboardConfig;
use crate::application::password_reset::ResetNotifier;
use crate::infra::notifier::LogResetNotifier;
use crate::infra::postgres::PgStore;
use crate::presentation::handlers::{self, GridboardAppState, GridboardStore};

/// Create the Gridboard router with the PostgreSQL store
pub fn gridboard_router(repo: PgStore, config: GridboardConfig) -> Router {
    gridboard_router_generic(repo, config, Arc::new(LogResetNotifier))
}

/// Create a generic Gridboard router for any store implementation
pub fn gridboard_router_generic<R>(
    repo: R,
    config: GridboardConfig,
    notifier: Arc<dyn ResetNotifier>,
) -> Router
where
    R: GridboardStore,
{
    let state = GridboardAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
        notifier,
    };

    Router::new()
        .route("/auth/register", post(handlers::register::<R>))
        .route("/auth/login", post(handlers::login::<R>))
        .route("/auth/forgot-password", post(handlers::forgot_password::<R>))
        .route("/auth/reset-password", post(handlers::reset_password::<R>))
        .route("/users/{id}", put(handlers::update_profile::<R>))
        .route("/users/{id}/register", post(handlers::join_championship::<R>))
        .route(
            "/users/{id}/championships",
            get(handlers::account_championships::<R>),
        )
        .route(
            "/championships",
            get(handlers::list_championships::<R>).post(handlers::create_championship::<R>),
        )
        .route(
            "/championships/{id}",
            get(handlers::get_championship::<R>).put(handlers::update_championship::<R>),
        )
        .with_state(state)
}
