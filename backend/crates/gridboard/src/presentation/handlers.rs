//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use kernel::id::{AccountId, ChampionshipId};
use std::sync::Arc;

use crate::application::config::GridboardConfig;
use crate::application::{
    CompleteResetInput, CompleteResetUseCase, CreateChampionshipUseCase, JoinChampionshipUseCase,
    LoginInput, LoginUseCase, QueryChampionshipsUseCase, RegisterInput, RegisterUseCase,
    RequestResetInput, RequestResetUseCase, ResetNotifier, UpdateChampionshipUseCase,
    UpdateProfileInput, UpdateProfileUseCase,
};
use crate::domain::repository::{AccountRepository, ChampionshipRepository};
use crate::error::GridboardResult;
use crate::presentation::dto::{
    ChampionshipListQuery, ChampionshipResponse, CreateChampionshipRequest,
    ForgotPasswordRequest, JoinChampionshipRequest, LoginRequest, MessageResponse,
    PublicAccount, RegisterRequest, ResetPasswordRequest, UpdateChampionshipRequest,
    UpdateProfileRequest,
};
use crate::presentation::extract::JsonBody;

/// Same reply whether or not the identity exists
pub const FORGOT_PASSWORD_ACK: &str =
    "If an account exists for this identity, a password reset link has been sent";

pub const RESET_PASSWORD_ACK: &str = "Password has been reset";

/// Store bound shared by every handler
pub trait GridboardStore:
    AccountRepository + ChampionshipRepository + Clone + Send + Sync + 'static
{
}

impl<T> GridboardStore for T where
    T: AccountRepository + ChampionshipRepository + Clone + Send + Sync + 'static
{
}

/// Shared state for gridboard handlers
#[derive(Clone)]
pub struct GridboardAppState<R>
where
    R: GridboardStore,
{
    pub repo: Arc<R>,
    pub config: Arc<GridboardConfig>,
    pub notifier: Arc<dyn ResetNotifier>,
}

// ============================================================================
// Auth
// ============================================================================

/// POST /auth/register
pub async fn register<R>(
    State(state): State<GridboardAppState<R>>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> GridboardResult<(StatusCode, Json<PublicAccount>)>
where
    R: GridboardStore,
{
    let use_case = RegisterUseCase::new(state.repo.clone(), state.config.clone());

    let input = RegisterInput {
        identity: req.identity,
        display_name: req.display_name,
        secret: req.secret,
        secret_confirmation: req.secret_confirmation,
    };

    let account = use_case.execute(input).await?;

    Ok((StatusCode::CREATED, Json(account)))
}

/// POST /auth/login
pub async fn login<R>(
    State(state): State<GridboardAppState<R>>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> GridboardResult<Json<PublicAccount>>
where
    R: GridboardStore,
{
    let use_case = LoginUseCase::new(state.repo.clone(), state.config.clone());

    let account = use_case
        .execute(LoginInput {
            identity: req.identity,
            secret: req.secret,
        })
        .await?;

    Ok(Json(account))
}

/// POST /auth/forgot-password
pub async fn forgot_password<R>(
    State(state): State<GridboardAppState<R>>,
    JsonBody(req): JsonBody<ForgotPasswordRequest>,
) -> Json<MessageResponse>
where
    R: GridboardStore,
{
    let use_case = RequestResetUseCase::new(
        state.repo.clone(),
        state.notifier.clone(),
        state.config.clone(),
    );

    // Issuance runs detached so latency does not depend on the identity
    use_case.spawn(RequestResetInput {
        identity: req.identity,
    });

    Json(MessageResponse::new(FORGOT_PASSWORD_ACK))
}

/// POST /auth/reset-password
pub async fn reset_password<R>(
    State(state): State<GridboardAppState<R>>,
    JsonBody(req): JsonBody<ResetPasswordRequest>,
) -> GridboardResult<Json<MessageResponse>>
where
    R: GridboardStore,
{
    let use_case = CompleteResetUseCase::new(state.repo.clone(), state.config.clone());

    use_case
        .execute(CompleteResetInput {
            token: req.token,
            secret: req.secret,
        })
        .await?;

    Ok(Json(MessageResponse::new(RESET_PASSWORD_ACK)))
}

// ============================================================================
// Users
// ============================================================================

/// PUT /users/{id}
pub async fn update_profile<R>(
    State(state): State<GridboardAppState<R>>,
    Path(account_id): Path<AccountId>,
    JsonBody(req): JsonBody<UpdateProfileRequest>,
) -> GridboardResult<Json<PublicAccount>>
where
    R: GridboardStore,
{
    let use_case = UpdateProfileUseCase::new(state.repo.clone());

    let account = use_case
        .execute(UpdateProfileInput {
            account_id,
            display_name: req.display_name,
            identity: req.identity,
            avatar: req.avatar,
        })
        .await?;

    Ok(Json(account))
}

/// POST /users/{id}/register
pub async fn join_championship<R>(
    State(state): State<GridboardAppState<R>>,
    Path(account_id): Path<AccountId>,
    JsonBody(req): JsonBody<JoinChampionshipRequest>,
) -> GridboardResult<Json<PublicAccount>>
where
    R: GridboardStore,
{
    let use_case = JoinChampionshipUseCase::new(state.repo.clone());
    let account = use_case.execute(account_id, req.championship_id).await?;
    Ok(Json(account))
}

/// GET /users/{id}/championships
pub async fn account_championships<R>(
    State(state): State<GridboardAppState<R>>,
    Path(account_id): Path<AccountId>,
) -> GridboardResult<Json<Vec<ChampionshipResponse>>>
where
    R: GridboardStore,
{
    let use_case = QueryChampionshipsUseCase::new(state.repo.clone());
    let championships = use_case.list_by_creator(account_id).await?;
    Ok(Json(
        championships.iter().map(ChampionshipResponse::from).collect(),
    ))
}

// ============================================================================
// Championships
// ============================================================================

/// GET /championships
pub async fn list_championships<R>(
    State(state): State<GridboardAppState<R>>,
    Query(query): Query<ChampionshipListQuery>,
) -> GridboardResult<Json<Vec<ChampionshipResponse>>>
where
    R: GridboardStore,
{
    let use_case = QueryChampionshipsUseCase::new(state.repo.clone());
    let championships = use_case.list(query.into()).await?;
    Ok(Json(
        championships.iter().map(ChampionshipResponse::from).collect(),
    ))
}

/// GET /championships/{id}
pub async fn get_championship<R>(
    State(state): State<GridboardAppState<R>>,
    Path(championship_id): Path<ChampionshipId>,
) -> GridboardResult<Json<ChampionshipResponse>>
where
    R: GridboardStore,
{
    let use_case = QueryChampionshipsUseCase::new(state.repo.clone());
    let championship = use_case.get(championship_id).await?;
    Ok(Json(ChampionshipResponse::from(&championship)))
}

/// POST /championships
pub async fn create_championship<R>(
    State(state): State<GridboardAppState<R>>,
    JsonBody(req): JsonBody<CreateChampionshipRequest>,
) -> GridboardResult<(StatusCode, Json<ChampionshipResponse>)>
where
    R: GridboardStore,
{
    let use_case = CreateChampionshipUseCase::new(state.repo.clone());

    let (creator_id, draft) = req.into_parts();
    let championship = use_case.execute(creator_id, draft).await?;

    Ok((
        StatusCode::CREATED,
        Json(ChampionshipResponse::from(&championship)),
    ))
}

/// PUT /championships/{id}
pub async fn update_championship<R>(
    State(state): State<GridboardAppState<R>>,
    Path(championship_id): Path<ChampionshipId>,
    JsonBody(req): JsonBody<UpdateChampionshipRequest>,
) -> GridboardResult<Json<ChampionshipResponse>>
where
    R: GridboardStore,
{
    let use_case = UpdateChampionshipUseCase::new(state.repo.clone());

    let (acting_account_id, patch) = req.into_parts();
    let championship = use_case
        .execute(championship_id, acting_account_id, patch)
        .await?;

    Ok(Json(ChampionshipResponse::from(&championship)))
}
