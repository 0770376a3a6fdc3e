//! Admin authorization check.
//!
//! Given a resolved session, decide whether the member holds an admin role
//! and which tier. The role is re-queried from the database on every call;
//! nothing is cached across requests.
//!
//! Unlike the session adapter (which fails open to anonymous), a database
//! error during the role lookup is mapped to [`AdminAccess::Denied`] - the
//! check fails closed. Callers must reject rather than grant on error.
//! The asymmetry is deliberate: losing a session only removes access,
//! while defaulting a role grant would add it.

use sqlx::PgPool;

use harborview_core::{AdminRole, MemberId};

use crate::db::MemberRepository;
use crate::models::CurrentMember;

/// Outcome of the admin authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAccess {
    /// No session, no role, or the lookup failed.
    Denied,
    /// The member holds an admin role.
    Granted {
        /// The acting member.
        member_id: MemberId,
        /// The member's role tier.
        role: AdminRole,
    },
}

impl AdminAccess {
    /// Derive the tri-state outcome from an optional role row.
    #[must_use]
    pub const fn from_role(member_id: MemberId, role: Option<AdminRole>) -> Self {
        match role {
            Some(role) => Self::Granted { member_id, role },
            None => Self::Denied,
        }
    }

    /// The granted role, if any.
    #[must_use]
    pub const fn role(&self) -> Option<AdminRole> {
        match self {
            Self::Granted { role, .. } => Some(*role),
            Self::Denied => None,
        }
    }
}

/// Check whether the current member holds an admin role.
///
/// - no session -> `Denied`
/// - session but no role row -> `Denied`
/// - session with a role row -> `Granted` with the role value
/// - database error -> `Denied` (fail closed), with the error logged
pub async fn authorize_admin(pool: &PgPool, member: Option<&CurrentMember>) -> AdminAccess {
    let Some(member) = member else {
        return AdminAccess::Denied;
    };

    match MemberRepository::new(pool)
        .role_for_member(member.member_id)
        .await
    {
        Ok(role) => AdminAccess::from_role(member.member_id, role),
        Err(e) => {
            tracing::warn!(
                member_id = %member.member_id,
                error = %e,
                "role lookup failed, denying admin access"
            );
            AdminAccess::Denied
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_role_row_is_denied() {
        let access = AdminAccess::from_role(MemberId::new(1), None);
        assert_eq!(access, AdminAccess::Denied);
        assert!(access.role().is_none());
    }

    #[test]
    fn test_role_row_is_granted() {
        let access = AdminAccess::from_role(MemberId::new(1), Some(AdminRole::Editor));
        assert_eq!(
            access,
            AdminAccess::Granted {
                member_id: MemberId::new(1),
                role: AdminRole::Editor,
            }
        );
        assert_eq!(access.role(), Some(AdminRole::Editor));
    }

    #[tokio::test]
    async fn test_no_session_is_denied_without_touching_the_database() {
        // A lazy pool pointing at an unroutable port: if the check queried
        // the database here the call would error, not deny cleanly.
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://postgres@127.0.0.1:1/harborview")
            .expect("lazy pool");

        assert_eq!(authorize_admin(&pool, None).await, AdminAccess::Denied);
    }

    #[tokio::test]
    async fn test_lookup_error_fails_closed() {
        use harborview_core::{AccountId, Email};
        use uuid::Uuid;

        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://postgres@127.0.0.1:1/harborview")
            .expect("lazy pool");

        let member = CurrentMember {
            member_id: MemberId::new(1),
            account_id: AccountId::new(Uuid::new_v4()),
            email: Email::parse("member@example.com").expect("valid email"),
            name: "Test Member".to_owned(),
        };

        // The pool cannot reach a database, so the lookup errors; the check
        // must deny rather than grant.
        assert_eq!(
            authorize_admin(&pool, Some(&member)).await,
            AdminAccess::Denied
        );
    }
}
