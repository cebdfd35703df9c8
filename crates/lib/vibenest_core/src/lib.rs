//! # vibenest_core
//!
//! Core domain logic for VibeNest: the entity store, social graph,
//! engagement, feed composition and identity tokens.

pub mod auth;
pub mod db;
pub mod engagement;
pub mod feed;
pub mod migrate;
pub mod models;
pub mod social;
pub mod stories;
pub mod users;
pub mod uuid;
pub mod validation;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
