//! Story models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Postgres;
use sqlx::error::BoxDynError;
use sqlx::postgres::{PgTypeInfo, PgValueRef};
use thiserror::Error;
use uuid::Uuid;

use super::user::Author;

/// Story category tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Fictional,
    Real,
    Both,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Fictional, Category::Real, Category::Both];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Fictional => "fictional",
            Category::Real => "real",
            Category::Both => "both",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("Category must be fictional, real, or both")]
pub struct UnknownCategory;

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or(UnknownCategory)
    }
}

// Stored as TEXT guarded by a CHECK constraint; decoded through `&str`.
impl sqlx::Type<Postgres> for Category {
    fn type_info() -> PgTypeInfo {
        <&str as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <&str as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> sqlx::Decode<'r, Postgres> for Category {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let raw = <&str as sqlx::Decode<Postgres>>::decode(value)?;
        Ok(raw.parse()?)
    }
}

/// A persisted story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub id: Uuid,
    pub author_id: String,
    pub title: String,
    pub caption: Option<String>,
    pub content: String,
    pub category: Category,
    pub music_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A story joined with its author's public identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryWithAuthor {
    #[serde(flatten)]
    pub story: Story,
    pub author: Author,
}

/// Story payload as submitted by a client, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryDraft {
    #[serde(default)]
    pub title: String,
    pub caption: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category: String,
    pub music_url: Option<String>,
}

/// A validated story payload. Only this type reaches the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStory {
    pub title: String,
    pub caption: Option<String>,
    pub content: String,
    pub category: Category,
    pub music_url: Option<String>,
}
