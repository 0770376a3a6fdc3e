//! Contact message repository.

use sqlx::PgPool;

use harborview_core::{Email, MessageId};

use super::RepositoryError;

/// Repository for contact form submissions.
pub struct ContactRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ContactRepository<'a> {
    /// Create a new contact repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a contact form submission and return its id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(
        &self,
        name: &str,
        email: &Email,
        message: &str,
    ) -> Result<MessageId, RepositoryError> {
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO site.contact_message (name, email, message)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(name)
        .bind(email.as_str())
        .bind(message)
        .fetch_one(self.pool)
        .await?;

        Ok(MessageId::new(id))
    }
}
