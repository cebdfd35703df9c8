//! Application error types.

use axum::extract::FromRequest;
use axum::extract::rejection::JsonRejection;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use vibenest_core::auth::AuthError;
use vibenest_core::engagement::EngagementError;
use vibenest_core::feed::FeedError;
use vibenest_core::social::SocialError;
use vibenest_core::stories::StoryError;
use vibenest_core::users::UserError;

/// Shown when a valid session names a user the store has never seen.
const UNSYNCED_USER: &str = "Sign in again to finish setting up your profile";

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// Duplicate like/follow/bookmark and self-follow.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Missing resource, or a resource the caller does not own.
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, &str) {
        match self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, "validation_error", m.as_str()),
            AppError::Conflict(m) => (StatusCode::BAD_REQUEST, "conflict", m.as_str()),
            AppError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, "unauthorized", m.as_str()),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, "not_found", m.as_str()),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal server error",
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Internal(detail) = &self {
            error!(error = %detail, "request failed");
        }
        let (status, error, message) = self.parts();
        let body = Json(ErrorResponse {
            error: error.to_string(),
            message: message.to_string(),
        });
        (status, body).into_response()
    }
}

/// `Json` extractor whose rejection is an [`AppError`], so malformed bodies get
/// the same error shape as everything else.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => AppError::NotFound("row not found".into()),
            _ => AppError::Internal(e.to_string()),
        }
    }
}

impl From<StoryError> for AppError {
    fn from(e: StoryError) -> Self {
        match e {
            StoryError::Validation(v) => AppError::Validation(v.to_string()),
            StoryError::NotFound => AppError::NotFound("Story not found".into()),
            StoryError::NotFoundOrUnauthorized => {
                AppError::NotFound("Story not found or unauthorized".into())
            }
            StoryError::UnknownAuthor => AppError::Unauthorized(UNSYNCED_USER.into()),
            StoryError::DbError(e) => AppError::from(e),
        }
    }
}

impl From<SocialError> for AppError {
    fn from(e: SocialError) -> Self {
        match e {
            SocialError::SelfFollowForbidden | SocialError::AlreadyFollowing => {
                AppError::Conflict(e.to_string())
            }
            SocialError::UserNotFound => AppError::NotFound(e.to_string()),
            SocialError::UnknownFollower => AppError::Unauthorized(UNSYNCED_USER.into()),
            SocialError::DbError(e) => AppError::from(e),
        }
    }
}

impl From<EngagementError> for AppError {
    fn from(e: EngagementError) -> Self {
        match e {
            EngagementError::AlreadyLiked | EngagementError::AlreadyBookmarked => {
                AppError::Conflict(e.to_string())
            }
            EngagementError::Validation(v) => AppError::Validation(v.to_string()),
            EngagementError::StoryNotFound => AppError::NotFound(e.to_string()),
            EngagementError::UnknownUser => AppError::Unauthorized(UNSYNCED_USER.into()),
            EngagementError::DbError(e) => AppError::from(e),
        }
    }
}

impl From<FeedError> for AppError {
    fn from(e: FeedError) -> Self {
        match e {
            FeedError::Social(e) => AppError::from(e),
            FeedError::DbError(e) => AppError::from(e),
        }
    }
}

impl From<UserError> for AppError {
    fn from(e: UserError) -> Self {
        match e {
            UserError::NotFound => AppError::NotFound(e.to_string()),
            UserError::Validation(v) => AppError::Validation(v.to_string()),
            UserError::DbError(e) => AppError::from(e),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidHandoff => AppError::Unauthorized(e.to_string()),
            AuthError::ValidationError(msg) => AppError::Validation(msg),
            AuthError::TokenError(msg) | AuthError::Internal(msg) => AppError::Internal(msg),
            AuthError::DbError(e) => AppError::from(e),
        }
    }
}
