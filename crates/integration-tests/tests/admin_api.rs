//! Tests for the admin API's per-request authorization.
//!
//! The test database pool cannot reach a server, so every role lookup
//! errors. That is the point: the check must deny on error, never grant.

use axum::http::StatusCode;

use harborview_integration_tests::{app, body_json, login, send};

fn payment_body() -> serde_json::Value {
    serde_json::json!({
        "member_id": 12,
        "amount": "45.00",
        "method": "card",
        "paid_on": "2026-08-01",
    })
}

#[tokio::test]
async fn test_anonymous_payment_post_is_forbidden() {
    let app = app();
    let response = send(&app, "POST", "/api/admin/payments", None, Some(payment_body())).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["error"], "forbidden");
}

#[tokio::test]
async fn test_anonymous_role_lookup_is_forbidden() {
    let app = app();
    let response = send(&app, "GET", "/api/admin/role", None, None).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["error"], "forbidden");
}

#[tokio::test]
async fn test_role_lookup_failure_fails_closed() {
    // A valid session is not enough: the role must be confirmed by the
    // database on this request, and the database is unreachable
    let app = app();
    let cookie = login(&app, 12, 3600).await;

    let response = send(&app, "GET", "/api/admin/role", Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_payment_post_with_session_still_fails_closed() {
    let app = app();
    let cookie = login(&app, 12, 3600).await;

    let response = send(
        &app,
        "POST",
        "/api/admin/payments",
        Some(&cookie),
        Some(payment_body()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["error"], "forbidden");
}
