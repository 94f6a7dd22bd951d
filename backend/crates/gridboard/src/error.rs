//! Gridboard Error Types
//!
//! Domain error variants that integrate with the unified
//! `kernel::error::AppError` system.
//!
//! `InvalidCredentials` and `InvalidOrExpiredToken` are each produced by
//! several internal causes and must render identically for all of them.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, conversions::classify_sqlx_error, kind::ErrorKind};
use thiserror::Error;

pub type GridboardResult<T> = Result<T, GridboardError>;

#[derive(Debug, Error)]
pub enum GridboardError {
    /// Identity already belongs to another account
    #[error("An account with this identity already exists")]
    DuplicateIdentity,

    /// Unknown identity, malformed secret or wrong secret
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Unknown, consumed or expired reset token
    #[error("Password reset token is invalid or has expired")]
    InvalidOrExpiredToken,

    #[error("Account not found")]
    AccountNotFound,

    #[error("Championship not found")]
    ChampionshipNotFound,

    /// Acting account is not the championship's creator
    #[error("Only the creator of a championship may modify it")]
    NotAuthorized,

    #[error("Creator account not found")]
    CreatorNotFound,

    /// Rejected input
    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GridboardError {
    pub fn validation(message: impl Into<String>) -> Self {
        GridboardError::Validation(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            GridboardError::DuplicateIdentity
            | GridboardError::InvalidCredentials
            | GridboardError::InvalidOrExpiredToken
            | GridboardError::Validation(_) => ErrorKind::BadRequest,
            GridboardError::AccountNotFound
            | GridboardError::ChampionshipNotFound
            | GridboardError::CreatorNotFound => ErrorKind::NotFound,
            GridboardError::NotAuthorized => ErrorKind::Forbidden,
            GridboardError::Database(e) => classify_sqlx_error(e).0,
            GridboardError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    ///
    /// Server faults render a fixed message; their details only go to logs.
    pub fn to_app_error(&self) -> AppError {
        match self {
            GridboardError::Database(e) => match classify_sqlx_error(e) {
                (kind, message) if !kind.is_server_error() => AppError::new(kind, message),
                (kind, _) => AppError::new(kind, "Internal failure"),
            },
            GridboardError::Internal(_) => AppError::new(self.kind(), "Internal failure"),
            GridboardError::DuplicateIdentity => AppError::new(self.kind(), self.to_string())
                .with_action("Sign in or use a different identity"),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    fn log(&self) {
        match self {
            GridboardError::Database(e) => {
                tracing::error!(error = %e, "Gridboard database error");
            }
            GridboardError::Internal(msg) => {
                tracing::error!(message = %msg, "Gridboard internal error");
            }
            GridboardError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            GridboardError::InvalidOrExpiredToken => {
                tracing::warn!("Invalid or expired password reset token presented");
            }
            GridboardError::NotAuthorized => {
                tracing::warn!("Championship mutation rejected by ownership check");
            }
            _ => {
                tracing::debug!(error = %self, "Gridboard error");
            }
        }
    }
}

impl IntoResponse for GridboardError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for GridboardError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest => GridboardError::Validation(err.message().to_string()),
            _ => GridboardError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(GridboardError::DuplicateIdentity.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(GridboardError::InvalidCredentials.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(GridboardError::InvalidOrExpiredToken.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(GridboardError::AccountNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(GridboardError::CreatorNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(GridboardError::NotAuthorized.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            GridboardError::Database(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            GridboardError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_details_are_not_rendered() {
        let app = GridboardError::Internal("connection string leaked".into()).to_app_error();
        assert_eq!(app.message(), "Internal failure");
    }

    #[test]
    fn test_database_errors_use_shared_classification() {
        let err = GridboardError::Database(sqlx::Error::PoolClosed);
        let shared = AppError::from(sqlx::Error::PoolClosed);
        assert_eq!(err.kind(), shared.kind());

        let app = err.to_app_error();
        assert_eq!(app.kind(), ErrorKind::ServiceUnavailable);
        assert_eq!(app.message(), "Internal failure");

        let app = GridboardError::Database(sqlx::Error::RowNotFound).to_app_error();
        assert_eq!(app.kind(), ErrorKind::NotFound);
        assert_eq!(app.message(), "Record not found");
    }

    #[test]
    fn test_bad_request_app_error_becomes_validation() {
        let err: GridboardError = AppError::bad_request("Name is required").into();
        assert!(matches!(err, GridboardError::Validation(ref m) if m == "Name is required"));
    }
}
