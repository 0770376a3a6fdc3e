//! Membership payment record types.
//!
//! Payment rows are created by admin action through the protected API and
//! are immutable afterwards. Amounts use `rust_decimal::Decimal` and are
//! serialized as strings to avoid float rounding on the wire.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{MemberId, PaymentId};

/// A recorded membership payment (domain type).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Unique payment ID.
    pub id: PaymentId,
    /// The member this payment belongs to.
    pub member_id: MemberId,
    /// Payment amount, as a decimal string on the wire (e.g. `"45.00"`).
    pub amount: Decimal,
    /// Payment method (e.g. "card", "check", "cash").
    pub method: String,
    /// The date the payment was made.
    pub paid_on: NaiveDate,
    /// Optional free-form note from the recording admin.
    pub note: Option<String>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

/// Request body for recording a new membership payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPayment {
    /// The member the payment belongs to.
    pub member_id: MemberId,
    /// Payment amount as a decimal string (e.g. `"45.00"`).
    pub amount: Decimal,
    /// Payment method.
    pub method: String,
    /// The date the payment was made.
    pub paid_on: NaiveDate,
    /// Optional free-form note.
    #[serde(default)]
    pub note: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_payment_from_json() {
        let body = r#"{
            "member_id": 12,
            "amount": "45.00",
            "method": "card",
            "paid_on": "2026-08-01"
        }"#;
        let payment: NewPayment = serde_json::from_str(body).unwrap();
        assert_eq!(payment.member_id, MemberId::new(12));
        assert_eq!(payment.amount.to_string(), "45.00");
        assert_eq!(payment.method, "card");
        assert!(payment.note.is_none());
    }

    #[test]
    fn test_new_payment_rejects_missing_amount() {
        let body = r#"{"member_id": 12, "method": "card", "paid_on": "2026-08-01"}"#;
        assert!(serde_json::from_str::<NewPayment>(body).is_err());
    }

    #[test]
    fn test_payment_serializes_amount_as_string() {
        let payment = Payment {
            id: PaymentId::new(1),
            member_id: MemberId::new(12),
            amount: Decimal::new(4500, 2),
            method: "card".to_owned(),
            paid_on: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            note: None,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&payment).unwrap();
        assert_eq!(json["amount"], "45.00");
    }
}
