//! Mobile auth handoff tokens.
//!
//! A handoff token is a short-lived capability: created once when the mobile
//! OAuth callback completes, redeemed once by the app. Only its SHA-256
//! digest is stored. Redemption deletes the row in the same statement that
//! reads it, so two concurrent exchanges cannot both succeed.

use chrono::{DateTime, Duration, Utc};
use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use tracing::{info, warn};

use super::AuthError;
use crate::models::auth::{HandoffGrant, MobileAuthTokenRecord};
use crate::models::user::UserIdentity;

/// Default handoff lifetime: 5 minutes.
pub const DEFAULT_HANDOFF_TTL_SECS: i64 = 5 * 60;

/// Length of the plaintext token.
const TOKEN_LEN: usize = 64;

/// Generate a random token (64 alphanumeric chars).
fn generate_token() -> String {
    rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// SHA-256 hash a token for storage.
fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn expiry(now: DateTime<Utc>, ttl_secs: i64) -> Result<DateTime<Utc>, AuthError> {
    Duration::try_seconds(ttl_secs)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| AuthError::Internal(format!("handoff ttl out of range: {ttl_secs}")))
}

/// Credentials handed to the app on redemption.
#[derive(Debug, Clone)]
pub struct HandoffCredentials {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

/// Store a handoff for `identity`, returning the plaintext token.
pub async fn create_handoff(
    pool: &PgPool,
    identity: &UserIdentity,
    credentials: &HandoffCredentials,
    ttl_secs: i64,
) -> Result<(String, DateTime<Utc>), AuthError> {
    let token = generate_token();
    let expires_at = expiry(Utc::now(), ttl_secs)?;
    let claims =
        serde_json::to_value(identity).map_err(|e| AuthError::Internal(format!("claims: {e}")))?;

    sqlx::query(
        "INSERT INTO mobile_auth_tokens \
             (token_hash, user_id, claims, access_token, refresh_token, expires_at) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(hash_token(&token))
    .bind(&identity.id)
    .bind(&claims)
    .bind(&credentials.access_token)
    .bind(&credentials.refresh_token)
    .bind(expires_at)
    .execute(pool)
    .await?;

    info!(user_id = %identity.id, %expires_at, "mobile handoff created");
    Ok((token, expires_at))
}

/// Redeem a handoff token. The row is gone afterwards whether or not it had
/// expired.
pub async fn consume_handoff(pool: &PgPool, token: &str) -> Result<HandoffGrant, AuthError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::ValidationError("Token is required".into()));
    }

    let record = sqlx::query_as::<_, MobileAuthTokenRecord>(
        "DELETE FROM mobile_auth_tokens WHERE token_hash = $1 \
         RETURNING user_id, claims, access_token, refresh_token, expires_at",
    )
    .bind(hash_token(token))
    .fetch_optional(pool)
    .await?
    .ok_or(AuthError::InvalidHandoff)?;

    redeem(record, Utc::now())
}

/// Turn a consumed row into a grant, enforcing expiry as of `now`.
fn redeem(record: MobileAuthTokenRecord, now: DateTime<Utc>) -> Result<HandoffGrant, AuthError> {
    if record.expires_at <= now {
        warn!(user_id = %record.user_id, "expired mobile handoff presented");
        return Err(AuthError::InvalidHandoff);
    }

    let mut identity: UserIdentity = serde_json::from_value(record.claims)
        .map_err(|e| AuthError::Internal(format!("stored claims: {e}")))?;
    // The row's user id is authoritative over whatever the blob says.
    identity.id = record.user_id.clone();

    info!(user_id = %record.user_id, "mobile handoff redeemed");
    Ok(HandoffGrant {
        user_id: record.user_id,
        identity,
        access_token: record.access_token,
        refresh_token: record.refresh_token,
    })
}

/// Delete handoff rows past their expiry. Returns how many were removed.
pub async fn purge_expired(pool: &PgPool) -> Result<u64, AuthError> {
    let result = sqlx::query("DELETE FROM mobile_auth_tokens WHERE expires_at <= now()")
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(expires_in_secs: i64) -> MobileAuthTokenRecord {
        MobileAuthTokenRecord {
            user_id: "user-1".into(),
            claims: serde_json::json!({
                "id": "someone-else",
                "email": "ada@example.com",
                "firstName": "Ada",
            }),
            access_token: "access".into(),
            refresh_token: None,
            expires_at: Utc::now() + Duration::seconds(expires_in_secs),
        }
    }

    #[test]
    fn tokens_are_long_and_distinct() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), TOKEN_LEN);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[test]
    fn hash_is_stable_hex_sha256() {
        let h = hash_token("abc");
        assert_eq!(
            h,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(h, hash_token("abc"));
    }

    #[test]
    fn live_record_redeems_with_row_user_id() {
        let grant = redeem(record(60), Utc::now()).unwrap();
        assert_eq!(grant.user_id, "user-1");
        assert_eq!(grant.identity.id, "user-1");
        assert_eq!(grant.identity.first_name.as_deref(), Some("Ada"));
        assert_eq!(grant.access_token, "access");
    }

    #[test]
    fn expiry_rejects_out_of_range_ttl() {
        let now = Utc::now();
        assert_eq!(expiry(now, 300).unwrap(), now + Duration::seconds(300));
        assert!(matches!(expiry(now, i64::MAX), Err(AuthError::Internal(_))));
    }

    #[test]
    fn expired_record_is_invalid() {
        let err = redeem(record(-1), Utc::now()).unwrap_err();
        assert!(matches!(err, AuthError::InvalidHandoff));
    }
}
