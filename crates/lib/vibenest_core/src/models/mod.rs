//! Domain models.
//!
//! Serialized with camelCase field names, which is the shape the web and
//! mobile clients consume.

pub mod auth;
pub mod social;
pub mod story;
pub mod user;
