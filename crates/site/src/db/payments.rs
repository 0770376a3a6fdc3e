//! Payment repository for database operations.
//!
//! Payment rows are inserted by the protected admin API and read back on
//! the member's account page. Rows are never updated or deleted here.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use harborview_core::{MemberId, NewPayment, Payment, PaymentId};

use super::RepositoryError;

/// Row shape for `site.payment`.
#[derive(sqlx::FromRow)]
struct PaymentRow {
    id: i64,
    member_id: i64,
    amount: Decimal,
    method: String,
    paid_on: NaiveDate,
    note: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<PaymentRow> for Payment {
    fn from(row: PaymentRow) -> Self {
        Self {
            id: PaymentId::new(row.id),
            member_id: MemberId::new(row.member_id),
            amount: row.amount,
            method: row.method,
            paid_on: row.paid_on,
            note: row.note,
            created_at: row.created_at,
        }
    }
}

/// Repository for payment database operations.
pub struct PaymentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PaymentRepository<'a> {
    /// Create a new payment repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a payment record and return the stored row.
    ///
    /// A single atomic INSERT; validation beyond the request body shape is
    /// left to the database schema (foreign key, positive amount check).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(&self, payment: &NewPayment) -> Result<Payment, RepositoryError> {
        let row = sqlx::query_as::<_, PaymentRow>(
            "INSERT INTO site.payment (member_id, amount, method, paid_on, note)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, member_id, amount, method, paid_on, note, created_at",
        )
        .bind(payment.member_id.as_i64())
        .bind(payment.amount)
        .bind(&payment.method)
        .bind(payment.paid_on)
        .bind(&payment.note)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// List a member's payments, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_member(
        &self,
        member_id: MemberId,
    ) -> Result<Vec<Payment>, RepositoryError> {
        let rows = sqlx::query_as::<_, PaymentRow>(
            "SELECT id, member_id, amount, method, paid_on, note, created_at
             FROM site.payment
             WHERE member_id = $1
             ORDER BY paid_on DESC, id DESC",
        )
        .bind(member_id.as_i64())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Payment::from).collect())
    }
}
