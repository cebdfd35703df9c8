//! Authentication domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserIdentity;

/// JWT claims issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    /// Subject: the user id (standard JWT `sub` claim).
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
    /// Expiry (unix timestamp).
    pub exp: i64,
    /// Issued at (unix timestamp).
    pub iat: i64,
}

impl TokenClaims {
    /// The identity portion of the claims, as upserted into `users`.
    pub fn identity(&self) -> UserIdentity {
        UserIdentity {
            id: self.sub.clone(),
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            profile_image_url: self.profile_image_url.clone(),
        }
    }
}

/// Row of `mobile_auth_tokens`. The plaintext token is never stored.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MobileAuthTokenRecord {
    pub user_id: String,
    pub claims: serde_json::Value,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
}

/// What a successful handoff exchange yields.
#[derive(Debug, Clone, PartialEq)]
pub struct HandoffGrant {
    pub user_id: String,
    pub identity: UserIdentity,
    pub access_token: String,
    pub refresh_token: Option<String>,
}
