//! Payload validation for stories, comments and profile bios.
//!
//! Every check runs and all failures are collected, so a client gets one
//! field-level message per problem instead of fixing them one at a time.

use std::fmt;

use serde::Serialize;
use url::Url;

use crate::models::story::{Category, NewStory, StoryDraft};

pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_CAPTION_CHARS: usize = 500;
pub const MAX_CONTENT_CHARS: usize = 10_000;
pub const MAX_MUSIC_URL_CHARS: usize = 500;
pub const MAX_COMMENT_CHARS: usize = 1_000;
pub const MAX_BIO_CHARS: usize = 500;

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All validation failures for a payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for e in &self.errors {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Empty optional strings count as absent.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Validate a story draft into a [`NewStory`].
pub fn validate_story(draft: StoryDraft) -> Result<NewStory, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let title_len = char_len(&draft.title);
    if title_len == 0 {
        errors.push("title", "Title is required");
    } else if title_len > MAX_TITLE_CHARS {
        errors.push("title", "Title must be under 200 characters");
    }

    let caption = non_empty(draft.caption);
    if caption.as_deref().is_some_and(|c| char_len(c) > MAX_CAPTION_CHARS) {
        errors.push("caption", "Caption must be under 500 characters");
    }

    let content_len = char_len(&draft.content);
    if content_len == 0 {
        errors.push("content", "Story content is required");
    } else if content_len > MAX_CONTENT_CHARS {
        errors.push("content", "Story is too long");
    }

    let category = match draft.category.parse::<Category>() {
        Ok(c) => Some(c),
        Err(e) => {
            errors.push("category", e.to_string());
            None
        }
    };

    let music_url = non_empty(draft.music_url);
    if let Some(url) = music_url.as_deref() {
        if !is_web_url(url) {
            errors.push("musicUrl", "Must be a valid URL");
        } else if char_len(url) > MAX_MUSIC_URL_CHARS {
            errors.push("musicUrl", "URL is too long");
        }
    }

    match category {
        Some(category) if errors.is_empty() => Ok(NewStory {
            title: draft.title,
            caption,
            content: draft.content,
            category,
            music_url,
        }),
        _ => Err(errors),
    }
}

fn is_web_url(raw: &str) -> bool {
    Url::parse(raw)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
        .unwrap_or(false)
}

/// Validate comment text (1–1000 characters, not only whitespace).
pub fn validate_comment(content: &str) -> Result<String, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if content.trim().is_empty() {
        errors.push("content", "Comment cannot be empty");
    } else if char_len(content) > MAX_COMMENT_CHARS {
        errors.push("content", "Comment is too long");
    }
    errors.into_result(content.to_string())
}

/// Validate a bio update. An empty bio clears the field.
pub fn validate_bio(bio: Option<String>) -> Result<Option<String>, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let bio = non_empty(bio);
    if bio.as_deref().is_some_and(|b| char_len(b) > MAX_BIO_CHARS) {
        errors.push("bio", "Bio must be under 500 characters");
    }
    errors.into_result(bio)
}
