//! Member area route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use harborview_core::Payment;

use crate::db::PaymentRepository;
use crate::filters;
use crate::middleware::RequireMember;
use crate::models::CurrentMember;
use crate::state::AppState;

/// Payment display data for templates.
pub struct PaymentView {
    pub amount: String,
    pub method: String,
    pub paid_on: String,
    pub note: Option<String>,
}

impl From<Payment> for PaymentView {
    fn from(payment: Payment) -> Self {
        Self {
            amount: format!("${}", payment.amount.round_dp(2)),
            method: payment.method,
            paid_on: payment.paid_on.to_string(),
            note: payment.note,
        }
    }
}

/// Account overview template.
#[derive(Template, WebTemplate)]
#[template(path = "account/index.html")]
pub struct AccountTemplate {
    pub member: CurrentMember,
    pub payments: Vec<PaymentView>,
}

/// Display the membership overview with payment history.
///
/// A database failure degrades to an empty payment list; the page itself
/// only needs the session.
#[instrument(skip(state, member), fields(member_id = %member.member_id))]
pub async fn index(
    State(state): State<AppState>,
    RequireMember(member): RequireMember,
) -> impl IntoResponse {
    let payments = PaymentRepository::new(state.pool())
        .list_for_member(member.member_id)
        .await
        .map_or_else(
            |e| {
                tracing::error!(error = %e, "failed to load payment history");
                Vec::new()
            },
            |payments| payments.into_iter().map(PaymentView::from).collect(),
        );

    AccountTemplate { member, payments }
}
