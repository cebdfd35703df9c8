//! Identity tokens and the mobile auth handoff.
//!
//! The identity provider itself (OAuth, login/logout redirects) is external;
//! this module verifies and mints the session JWTs it shares a secret with,
//! and stores the single-use tokens that bridge a mobile OAuth callback into
//! the app.

pub mod handoff;
pub mod jwt;

use thiserror::Error;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Token error: {0}")]
    TokenError(String),

    #[error("Invalid or expired handoff token")]
    InvalidHandoff,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
