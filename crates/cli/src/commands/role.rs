//! Member admin role management commands.
//!
//! # Usage
//!
//! ```bash
//! # Grant a role
//! hv-cli role set -e curator@harborviewmuseum.org -r editor
//!
//! # Revoke a role
//! hv-cli role clear -e curator@harborviewmuseum.org
//! ```
//!
//! The member must already exist: members are created by signing in on the
//! website, this command only attaches a role to one.

use sqlx::PgPool;
use thiserror::Error;

use harborview_core::{AdminRole, Email};
use harborview_site::db::{MemberRepository, RepositoryError};

/// Errors that can occur during role operations.
#[derive(Debug, Error)]
pub enum RoleError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Repository error.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Invalid role.
    #[error("Invalid role: {0}. Valid roles: editor, super_admin")]
    InvalidRole(String),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// No member with this email.
    #[error("No member found with email: {0}. Members are created by signing in on the site.")]
    MemberNotFound(String),
}

/// Grant or replace a member's admin role.
///
/// # Errors
///
/// Returns an error if the role or email is invalid, the member does not
/// exist, or the database is unreachable.
pub async fn set(email: &str, role: &str) -> Result<(), RoleError> {
    let role: AdminRole = role
        .parse()
        .map_err(|_| RoleError::InvalidRole(role.to_owned()))?;

    let (pool, member_email) = connect(email).await?;
    let repo = MemberRepository::new(&pool);

    let member = repo
        .get_by_email(&member_email)
        .await?
        .ok_or_else(|| RoleError::MemberNotFound(email.to_owned()))?;

    repo.set_role(member.id, role).await?;

    tracing::info!("Granted role {} to {} (member {})", role, email, member.id);
    Ok(())
}

/// Revoke a member's admin role.
///
/// # Errors
///
/// Returns an error if the email is invalid, the member does not exist, or
/// the database is unreachable.
pub async fn clear(email: &str) -> Result<(), RoleError> {
    let (pool, member_email) = connect(email).await?;
    let repo = MemberRepository::new(&pool);

    let member = repo
        .get_by_email(&member_email)
        .await?
        .ok_or_else(|| RoleError::MemberNotFound(email.to_owned()))?;

    repo.clear_role(member.id).await?;

    tracing::info!("Cleared role for {} (member {})", email, member.id);
    Ok(())
}

async fn connect(email: &str) -> Result<(PgPool, Email), RoleError> {
    dotenvy::dotenv().ok();

    let email =
        Email::parse(email).map_err(|_| RoleError::InvalidEmail(email.to_owned()))?;

    let database_url = std::env::var("SITE_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| RoleError::MissingEnvVar("SITE_DATABASE_URL"))?;

    tracing::info!("Connecting to site database...");
    let pool = PgPool::connect(&database_url).await?;

    Ok((pool, email))
}
