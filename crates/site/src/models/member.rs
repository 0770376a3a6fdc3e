//! Member domain types.

use chrono::{DateTime, Utc};

use harborview_core::{AccountId, Email, MemberId};

/// A museum member (domain type).
#[derive(Debug, Clone)]
pub struct Member {
    /// Local database ID.
    pub id: MemberId,
    /// Account ID at the external identity provider.
    pub account_id: AccountId,
    /// Member's email address.
    pub email: Email,
    /// Member's display name.
    pub name: String,
    /// When the member joined.
    pub joined_at: DateTime<Utc>,
}
