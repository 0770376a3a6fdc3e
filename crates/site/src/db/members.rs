//! Member repository for database operations.
//!
//! Members are created on first login/signup against the identity provider
//! and are otherwise read-only from the website. Roles live in a separate
//! table written only by the CLI.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use harborview_core::{AccountId, AdminRole, Email, MemberId};

use super::RepositoryError;
use crate::models::member::Member;

/// Row shape for `site.member`.
#[derive(sqlx::FromRow)]
struct MemberRow {
    id: i64,
    account_id: Uuid,
    email: String,
    name: String,
    joined_at: DateTime<Utc>,
}

impl MemberRow {
    fn into_domain(self) -> Result<Member, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Member {
            id: MemberId::new(self.id),
            account_id: AccountId::new(self.account_id),
            email,
            name: self.name,
            joined_at: self.joined_at,
        })
    }
}

/// Repository for member database operations.
pub struct MemberRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MemberRepository<'a> {
    /// Create a new member repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a member by the identity provider's account id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn get_by_account(
        &self,
        account_id: AccountId,
    ) -> Result<Option<Member>, RepositoryError> {
        let row = sqlx::query_as::<_, MemberRow>(
            "SELECT id, account_id, email, name, joined_at
             FROM site.member
             WHERE account_id = $1",
        )
        .bind(account_id.as_uuid())
        .fetch_optional(self.pool)
        .await?;

        row.map(MemberRow::into_domain).transpose()
    }

    /// Get a member by email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<Member>, RepositoryError> {
        let row = sqlx::query_as::<_, MemberRow>(
            "SELECT id, account_id, email, name, joined_at
             FROM site.member
             WHERE email = $1",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(MemberRow::into_domain).transpose()
    }

    /// Get an existing member for an account, or create one.
    ///
    /// Called after a successful sign-in/sign-up against the identity
    /// provider so the local row always mirrors the provider account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either query fails.
    pub async fn get_or_create(
        &self,
        account_id: AccountId,
        email: &Email,
        name: &str,
    ) -> Result<Member, RepositoryError> {
        if let Some(member) = self.get_by_account(account_id).await? {
            return Ok(member);
        }

        let row = sqlx::query_as::<_, MemberRow>(
            "INSERT INTO site.member (account_id, email, name)
             VALUES ($1, $2, $3)
             ON CONFLICT (account_id) DO UPDATE SET email = EXCLUDED.email
             RETURNING id, account_id, email, name, joined_at",
        )
        .bind(account_id.as_uuid())
        .bind(email.as_str())
        .bind(name)
        .fetch_one(self.pool)
        .await?;

        row.into_domain()
    }

    /// Look up the admin role for a member, if any.
    ///
    /// Absence of a row means the member has no elevated access.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored role text is
    /// not a known role.
    pub async fn role_for_member(
        &self,
        member_id: MemberId,
    ) -> Result<Option<AdminRole>, RepositoryError> {
        let role: Option<(String,)> =
            sqlx::query_as("SELECT role FROM site.member_role WHERE member_id = $1")
                .bind(member_id.as_i64())
                .fetch_optional(self.pool)
                .await?;

        role.map(|(text,)| {
            text.parse::<AdminRole>().map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid role in database: {e}"))
            })
        })
        .transpose()
    }

    /// Grant or replace a member's admin role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn set_role(
        &self,
        member_id: MemberId,
        role: AdminRole,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO site.member_role (member_id, role)
             VALUES ($1, $2)
             ON CONFLICT (member_id) DO UPDATE SET role = EXCLUDED.role, granted_at = now()",
        )
        .bind(member_id.as_i64())
        .bind(role.as_str())
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Revoke a member's admin role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn clear_role(&self, member_id: MemberId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM site.member_role WHERE member_id = $1")
            .bind(member_id.as_i64())
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
