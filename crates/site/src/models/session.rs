//! Session-related types for member authentication.
//!
//! Types stored in the session for authentication state. The session never
//! holds credentials - only the identity the provider vouched for and the
//! tokens it issued.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use harborview_core::{AccountId, Email, MemberId};

/// How close to expiry the access token may get before the gate refreshes it.
const REFRESH_LEEWAY_SECONDS: i64 = 60;

/// Session-stored member identity.
///
/// Minimal data stored in the session to identify the logged-in member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentMember {
    /// Member's local database ID.
    pub member_id: MemberId,
    /// Account ID at the identity provider.
    pub account_id: AccountId,
    /// Member's email address.
    pub email: Email,
    /// Member's display name.
    pub name: String,
}

/// Provider-issued tokens stored alongside the member identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTokens {
    /// Short-lived access token.
    pub access_token: String,
    /// Refresh token used to obtain a new access token.
    pub refresh_token: String,
    /// When the access token expires.
    pub expires_at: DateTime<Utc>,
}

impl AuthTokens {
    /// Whether the access token is expired or within the refresh leeway.
    #[must_use]
    pub fn needs_refresh(&self) -> bool {
        self.expires_at - Utc::now() < Duration::seconds(REFRESH_LEEWAY_SECONDS)
    }
}

/// Session keys for member authentication data.
pub mod keys {
    /// Key for storing the current logged-in member.
    pub const CURRENT_MEMBER: &str = "current_member";

    /// Key for the identity provider's token set.
    pub const AUTH_TOKENS: &str = "auth_tokens";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens_expiring_in(seconds: i64) -> AuthTokens {
        AuthTokens {
            access_token: "access".to_owned(),
            refresh_token: "refresh".to_owned(),
            expires_at: Utc::now() + Duration::seconds(seconds),
        }
    }

    #[test]
    fn test_fresh_token_does_not_need_refresh() {
        assert!(!tokens_expiring_in(3600).needs_refresh());
    }

    #[test]
    fn test_near_expiry_token_needs_refresh() {
        assert!(tokens_expiring_in(30).needs_refresh());
    }

    #[test]
    fn test_expired_token_needs_refresh() {
        assert!(tokens_expiring_in(-10).needs_refresh());
    }
}
