//! HTTP route handlers for the museum site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (verifies database)
//!
//! # Content pages
//! GET  /exhibits               - Exhibit listing
//! GET  /exhibits/{slug}        - Exhibit detail
//! GET  /donate                 - Donate page (content-managed)
//! GET  /volunteer              - Volunteer page (content-managed)
//! GET  /contact                - Contact form
//! POST /contact                - Contact form submission
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action (rate limited)
//! GET  /auth/signup            - Signup page
//! POST /auth/signup            - Signup action (rate limited)
//! POST /auth/logout            - Logout action
//!
//! # Member area (requires session)
//! GET  /account                - Membership overview and payment history
//!
//! # Admin API (requires admin role, checked per request)
//! POST /api/admin/payments     - Record a membership payment
//! GET  /api/admin/role         - Look up the caller's admin role
//!
//! # Crawlers
//! GET  /robots.txt
//! GET  /sitemap.xml
//! ```

pub mod account;
pub mod api;
pub mod auth;
pub mod contact;
pub mod exhibits;
pub mod home;
pub mod meta;
pub mod pages;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::middleware::{
    api_rate_limiter, auth_rate_limiter, member_gate, request_id_middleware,
    security_headers_middleware,
};
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    // Rate limit only the credential-bearing actions, not the pages
    let actions = Router::new()
        .route("/login", post(auth::login))
        .route("/signup", post(auth::signup))
        .route_layer(auth_rate_limiter());

    Router::new()
        .route("/login", get(auth::login_page))
        .route("/signup", get(auth::signup_page))
        .route("/logout", post(auth::logout))
        .merge(actions)
}

/// Create the exhibit routes router.
pub fn exhibit_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(exhibits::index))
        .route("/{slug}", get(exhibits::show))
}

/// Create the admin API routes router.
///
/// Authorization happens inside the handlers (role re-check per request);
/// only rate limiting is layered here.
pub fn admin_api_routes() -> Router<AppState> {
    Router::new()
        .route("/payments", post(api::admin::create_payment))
        .route("/role", get(api::admin::role))
        .route_layer(api_rate_limiter())
}

/// Create all routes for the site.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/exhibits", exhibit_routes())
        .route("/donate", get(pages::donate))
        .route("/volunteer", get(pages::volunteer))
        .route("/contact", get(contact::contact_page).post(contact::submit))
        .nest("/auth", auth_routes())
        .route("/account", get(account::index))
        .nest("/api/admin", admin_api_routes())
        .route("/robots.txt", get(meta::robots_txt))
        .route("/sitemap.xml", get(meta::sitemap_xml))
}

/// Assemble the full application: routes, static files, and the middleware
/// stack in its required order. The session layer must sit outside the gate
/// so the gate sees a live session.
pub fn app<Store>(state: AppState, session_layer: SessionManagerLayer<Store>) -> Router
where
    Store: SessionStore + Clone,
{
    Router::new()
        .merge(routes())
        .nest_service("/static", ServeDir::new("crates/site/static"))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            member_gate,
        ))
        .layer(session_layer)
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
