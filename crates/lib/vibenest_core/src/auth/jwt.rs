//! Session JWT generation and verification.

use std::path::PathBuf;

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use tracing::info;

use super::AuthError;
use crate::models::auth::TokenClaims;
use crate::models::user::UserIdentity;

/// Default session lifetime: 7 days.
pub const DEFAULT_SESSION_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Sign a session token (HS256) carrying `identity`.
pub fn generate_access_token(
    identity: &UserIdentity,
    ttl_secs: i64,
    secret: &[u8],
) -> Result<String, AuthError> {
    let now = Utc::now();
    let exp = Duration::try_seconds(ttl_secs)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| AuthError::TokenError(format!("session ttl out of range: {ttl_secs}")))?;
    let claims = TokenClaims {
        sub: identity.id.clone(),
        email: identity.email.clone(),
        first_name: identity.first_name.clone(),
        last_name: identity.last_name.clone(),
        profile_image_url: identity.profile_image_url.clone(),
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret))
        .map_err(|e| AuthError::TokenError(format!("jwt encode: {e}")))
}

/// Verify a session token, returning the claims on success.
pub fn verify_access_token(token: &str, secret: &[u8]) -> Option<TokenClaims> {
    let key = DecodingKey::from_secret(secret);
    let mut validation = Validation::default();
    validation.validate_exp = true;
    decode::<TokenClaims>(token, &key, &validation)
        .ok()
        .map(|data| data.claims)
        .filter(|claims| !claims.sub.is_empty())
}

/// Resolve the JWT secret: env var `JWT_SECRET` → `AUTH_SECRET` → persisted file.
pub fn resolve_jwt_secret() -> String {
    if let Ok(secret) = std::env::var("JWT_SECRET")
        && !secret.is_empty()
    {
        return secret;
    }
    if let Ok(secret) = std::env::var("AUTH_SECRET")
        && !secret.is_empty()
    {
        return secret;
    }
    let secret_path = jwt_secret_path();
    if let Ok(existing) = std::fs::read_to_string(&secret_path) {
        let trimmed = existing.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    let secret: String = rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect();
    if let Some(parent) = secret_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let _ = std::fs::write(&secret_path, &secret);
    info!(path = %secret_path.display(), "generated new JWT secret");
    secret
}

/// Path to the persisted JWT secret file.
fn jwt_secret_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vibenest")
        .join("jwt-secret")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret";

    fn identity() -> UserIdentity {
        UserIdentity {
            id: "user-1".into(),
            email: Some("ada@example.com".into()),
            first_name: Some("Ada".into()),
            last_name: None,
            profile_image_url: None,
        }
    }

    #[test]
    fn issued_token_verifies_with_same_secret() {
        let token = generate_access_token(&identity(), 60, SECRET).unwrap();
        let claims = verify_access_token(&token, SECRET).expect("valid token");
        assert_eq!(claims.identity(), identity());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn out_of_range_ttl_is_an_error() {
        let err = generate_access_token(&identity(), i64::MAX, SECRET).unwrap_err();
        assert!(matches!(err, AuthError::TokenError(_)));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = generate_access_token(&identity(), 60, SECRET).unwrap();
        assert!(verify_access_token(&token, b"other-secret").is_none());
    }

    #[test]
    fn expired_token_is_rejected() {
        // Past the default 60s leeway.
        let token = generate_access_token(&identity(), -3600, SECRET).unwrap();
        assert!(verify_access_token(&token, SECRET).is_none());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(verify_access_token("not.a.jwt", SECRET).is_none());
    }
}
