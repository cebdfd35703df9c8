//! API server configuration.

use std::str::FromStr;

use vibenest_core::auth::handoff::DEFAULT_HANDOFF_TTL_SECS;
use vibenest_core::auth::jwt::{DEFAULT_SESSION_TTL_SECS, resolve_jwt_secret};
use vibenest_core::db::DEFAULT_DATABASE_URL;

/// Default listen address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

/// Default deep link the mobile app registers for the auth callback.
pub const DEFAULT_MOBILE_REDIRECT_BASE: &str = "vibenest://auth/callback";

/// Upper bound for configured token lifetimes (one year).
pub const MAX_TTL_SECS: i64 = 365 * 24 * 60 * 60;

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:5000").
    pub bind_addr: String,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// JWT signing secret shared with the identity provider.
    pub jwt_secret: String,
    /// Lifetime of session tokens minted for mobile handoffs.
    pub session_ttl_secs: i64,
    /// Lifetime of a mobile handoff token.
    pub handoff_ttl_secs: i64,
    /// Deep link the handoff token is appended to.
    pub mobile_redirect_base: String,
    /// Mark the session cookie `Secure`.
    pub secure_cookies: bool,
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable                     | Default                               |
    /// |------------------------------|---------------------------------------|
    /// | `BIND_ADDR`                  | `127.0.0.1:5000`                      |
    /// | `DATABASE_URL`               | `postgres://localhost:5432/vibenest`  |
    /// | `JWT_SECRET` / `AUTH_SECRET` | generated & persisted to file         |
    /// | `SESSION_TTL_SECS`           | `604800` (7 days)                     |
    /// | `HANDOFF_TTL_SECS`           | `300`                                 |
    /// | `MOBILE_REDIRECT_BASE`       | `vibenest://auth/callback`            |
    /// | `SECURE_COOKIES`             | `false`                               |
    ///
    /// TTLs are clamped to `1..=MAX_TTL_SECS`.
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.into()),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.into()),
            jwt_secret: resolve_jwt_secret(),
            session_ttl_secs: clamp_ttl(env_parse("SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)),
            handoff_ttl_secs: clamp_ttl(env_parse("HANDOFF_TTL_SECS", DEFAULT_HANDOFF_TTL_SECS)),
            mobile_redirect_base: std::env::var("MOBILE_REDIRECT_BASE")
                .unwrap_or_else(|_| DEFAULT_MOBILE_REDIRECT_BASE.into()),
            secure_cookies: std::env::var("SECURE_COOKIES")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(false),
        }
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn clamp_ttl(secs: i64) -> i64 {
    secs.clamp(1, MAX_TTL_SECS)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_accept_common_spellings() {
        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag(" ON "), Some(true));
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("no"), Some(false));
        assert_eq!(parse_flag(""), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn ttls_are_clamped_to_a_sane_range() {
        assert_eq!(clamp_ttl(300), 300);
        assert_eq!(clamp_ttl(0), 1);
        assert_eq!(clamp_ttl(-60), 1);
        assert_eq!(clamp_ttl(i64::MAX), MAX_TTL_SECS);
    }
}
