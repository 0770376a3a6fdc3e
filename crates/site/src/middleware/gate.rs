//! Request gate: per-request session check ahead of page rendering.
//!
//! Runs once per matched request. Static assets, the content studio, and
//! API routes are exempt - API handlers do their own authorization and the
//! others need none. For everything else the gate resolves the session
//! (refreshing provider tokens via [`resolve_member`]) and redirects
//! anonymous requests away from member-only routes.
//!
//! This is a single linear decision, not a state machine:
//! {has valid session} x {route requires session} -> {allow | redirect}.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use super::auth::resolve_member;
use crate::error::set_sentry_user;
use crate::state::AppState;

/// Path prefixes that never receive session handling.
const EXEMPT_PREFIXES: &[&str] = &["/api/", "/studio/", "/static/", "/health"];

/// Static image extensions excluded from gating.
const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".webp", ".svg", ".ico"];

/// Whether the gate should skip this path entirely.
#[must_use]
pub fn is_gate_exempt(path: &str) -> bool {
    if path == "/favicon.ico" || path == "/api" || path == "/studio" {
        return true;
    }

    if EXEMPT_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) {
        return true;
    }

    IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// Whether the path is member-only.
#[must_use]
pub fn requires_session(path: &str) -> bool {
    path == "/account" || path.starts_with("/account/")
}

/// The request gate middleware.
///
/// Resolves the session once per request, inserts the member into request
/// extensions for downstream extractors, and redirects anonymous requests
/// hitting member-only routes to the login page. An expired session the
/// provider cannot refresh is indistinguishable from no session here: it
/// redirects, it never errors.
pub async fn member_gate(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();

    if is_gate_exempt(path) {
        return next.run(request).await;
    }

    let member = resolve_member(&state, &session).await;

    match member {
        Some(member) => {
            set_sentry_user(&member.member_id, Some(member.email.as_str()));
            request.extensions_mut().insert(member);
        }
        None => {
            if requires_session(path) {
                return Redirect::to("/auth/login").into_response();
            }
        }
    }

    next.run(request).await
}
