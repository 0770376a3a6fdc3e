//! Database operations for the site `PostgreSQL` database.
//!
//! # Schema: `site`
//!
//! Stores local membership data only; content lives in the headless content
//! API and credentials live with the identity provider.
//!
//! ## Tables
//!
//! - `member` - Local member rows, keyed by the provider's account id
//! - `member_role` - Admin role per member; absence means no elevated access
//! - `payment` - Membership payment records (inserted by admin action)
//! - `contact_message` - Contact form submissions
//! - `session` - Tower-sessions storage
//!
//! # Migrations
//!
//! Migrations are stored in `crates/site/migrations/` and run via:
//! ```bash
//! cargo run -p harborview-cli -- migrate
//! ```
//!
//! Queries use runtime-checked `sqlx::query`/`query_as` with row structs
//! converted into domain types; role and email text is validated on read
//! and surfaces as `RepositoryError::DataCorruption` when invalid.

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub mod contact;
pub mod members;
pub mod payments;

pub use contact::ContactRepository;
pub use members::MemberRepository;
pub use payments::PaymentRepository;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
