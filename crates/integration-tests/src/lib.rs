//! Integration test harness for the Harborview Museum site.
//!
//! Builds the real router in-process with a memory-backed session store and
//! a database pool pointing at an unroutable address. Requests are driven
//! with `tower::ServiceExt::oneshot`, so no server, database, content API,
//! or identity provider needs to be running:
//!
//! - content/identity calls fail fast (connection refused), exercising the
//!   degrade and fail-open paths
//! - database queries error at call time, exercising the fail-closed paths
//!
//! A test-only `POST /__test/login` route writes a member identity and
//! token set straight into the session, standing in for a successful
//! provider sign-in.

use axum::{
    Json, Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
    routing::post,
};
use chrono::{Duration, Utc};
use secrecy::SecretString;
use serde::Deserialize;
use tower::ServiceExt;
use tower_sessions::{MemoryStore, Session, SessionManagerLayer};
use uuid::Uuid;

use harborview_core::{AccountId, Email, MemberId};
use harborview_site::config::{ContentConfig, IdentityConfig, SiteConfig};
use harborview_site::middleware::{
    member_gate, request_id_middleware, security_headers_middleware, set_current_member,
};
use harborview_site::models::{AuthTokens, CurrentMember};
use harborview_site::state::AppState;

/// Base URL the test configuration claims to serve.
pub const TEST_BASE_URL: &str = "http://harborview.test";

/// Configuration pointing every external dependency at an unroutable
/// address.
#[must_use]
pub fn test_config() -> SiteConfig {
    SiteConfig {
        database_url: SecretString::from("postgres://postgres@127.0.0.1:1/harborview"),
        host: "127.0.0.1".parse().expect("valid test host"),
        port: 0,
        base_url: TEST_BASE_URL.to_string(),
        content: ContentConfig {
            api_url: "http://127.0.0.1:9".to_string(),
            dataset: "production".to_string(),
            api_version: "2025-06-01".to_string(),
            token: None,
        },
        identity: IdentityConfig {
            api_url: "http://127.0.0.1:9".to_string(),
            publishable_key: "pk_test".to_string(),
        },
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// Application state over a lazy pool that errors on first use.
#[must_use]
pub fn test_state() -> AppState {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .connect_lazy("postgres://postgres@127.0.0.1:1/harborview")
        .expect("lazy pool construction is infallible");

    AppState::new(test_config(), pool).expect("test state should build")
}

/// Body for the test-only login route.
#[derive(Debug, Deserialize)]
struct TestLogin {
    member_id: i64,
    email: String,
    name: String,
    /// Seconds until the access token expires; negative means already
    /// expired.
    expires_in_seconds: i64,
}

async fn test_login(session: Session, Json(body): Json<TestLogin>) -> StatusCode {
    let Ok(email) = Email::parse(&body.email) else {
        return StatusCode::BAD_REQUEST;
    };

    let member = CurrentMember {
        member_id: MemberId::new(body.member_id),
        account_id: AccountId::new(Uuid::new_v4()),
        email,
        name: body.name,
    };
    let tokens = AuthTokens {
        access_token: "test-access-token".to_string(),
        refresh_token: "test-refresh-token".to_string(),
        expires_at: Utc::now() + Duration::seconds(body.expires_in_seconds),
    };

    match set_current_member(&session, &member, &tokens).await {
        Ok(()) => StatusCode::NO_CONTENT,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Build the application exactly as production assembles it, plus the
/// test-only login route inside the session layer.
#[must_use]
pub fn app() -> Router {
    let state = test_state();
    let session_layer = SessionManagerLayer::new(MemoryStore::default());

    Router::new()
        .merge(harborview_site::routes::routes())
        .route("/__test/login", post(test_login))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            member_gate,
        ))
        .layer(session_layer)
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// Send a single request to the app.
///
/// # Panics
///
/// Panics if the request cannot be built or the service fails; both mean
/// the harness itself is broken.
pub async fn send(
    app: &Router,
    method: &str,
    path: &str,
    cookie: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");

    app.clone()
        .oneshot(request)
        .await
        .expect("router is infallible")
}

/// The session cookie pair (`name=value`) from a response, if one was set.
#[must_use]
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    let set_cookie = response.headers().get(header::SET_COOKIE)?;
    let value = set_cookie.to_str().ok()?;
    Some(value.split(';').next()?.trim().to_string())
}

/// Read a response body as JSON.
///
/// # Panics
///
/// Panics if the body is not valid JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

/// Read a response body as a string.
///
/// # Panics
///
/// Panics if the body is not valid UTF-8.
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    String::from_utf8(bytes.to_vec()).expect("body should be UTF-8")
}

/// Log in through the test route and return the session cookie.
///
/// # Panics
///
/// Panics if the login route does not succeed.
pub async fn login(app: &Router, member_id: i64, expires_in_seconds: i64) -> String {
    let response = send(
        app,
        "POST",
        "/__test/login",
        None,
        Some(serde_json::json!({
            "member_id": member_id,
            "email": "member@example.com",
            "name": "Test Member",
            "expires_in_seconds": expires_in_seconds,
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    session_cookie(&response).expect("login should set a session cookie")
}
