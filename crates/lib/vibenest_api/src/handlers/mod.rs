pub mod auth;
pub mod engagement;
pub mod health;
pub mod profile;
pub mod stories;
pub mod users;

use uuid::Uuid;
use vibenest_core::uuid::parse_id;

use crate::error::{AppError, AppResult};

/// Parse a story id path segment. Anything that is not a UUID cannot name a
/// story, so it reads as a miss.
pub(crate) fn story_id(raw: &str) -> AppResult<Uuid> {
    parse_id(raw).ok_or_else(|| AppError::NotFound("Story not found".into()))
}
