//! Authentication route handlers.
//!
//! Login, signup, and logout against the external identity provider. The
//! provider owns credentials; on success the site mirrors the account into
//! a local member row and stores the identity plus token set in the session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use harborview_core::Email;

use crate::db::MemberRepository;
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{clear_current_member, set_current_member};
use crate::models::{AuthTokens, CurrentMember, session_keys};
use crate::services::identity::{AuthError, SignIn};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Signup form data.
#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/signup.html")]
pub struct SignupTemplate {
    pub error: Option<String>,
}

/// Map an error code from the redirect query to a display message.
fn error_message(code: &str) -> String {
    match code {
        "credentials" => "Invalid email or password.".to_string(),
        "email" => "Please enter a valid email address.".to_string(),
        "email_taken" => "An account with this email already exists.".to_string(),
        "password_mismatch" => "Passwords do not match.".to_string(),
        "password_too_short" => "Password must be at least 8 characters.".to_string(),
        "session" => "Could not start your session. Please try again.".to_string(),
        _ => "Something went wrong. Please try again.".to_string(),
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    LoginTemplate {
        error: query.error.as_deref().map(error_message),
        success: query.success,
    }
}

/// Handle login form submission.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let Ok(email) = Email::parse(&form.email) else {
        return Redirect::to("/auth/login?error=email").into_response();
    };

    match state.identity().sign_in(&email, &form.password).await {
        Ok(sign_in) => start_session(&state, &session, sign_in, "/auth/login").await,
        Err(AuthError::InvalidCredentials) => {
            tracing::debug!(email = %email, "login rejected by provider");
            Redirect::to("/auth/login?error=credentials").into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "login failed");
            Redirect::to("/auth/login?error=provider").into_response()
        }
    }
}

// =============================================================================
// Signup Routes
// =============================================================================

/// Display the signup page.
pub async fn signup_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    SignupTemplate {
        error: query.error.as_deref().map(error_message),
    }
}

/// Handle signup form submission.
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SignupForm>,
) -> Response {
    if form.password != form.password_confirm {
        return Redirect::to("/auth/signup?error=password_mismatch").into_response();
    }

    if form.password.len() < 8 {
        return Redirect::to("/auth/signup?error=password_too_short").into_response();
    }

    let Ok(email) = Email::parse(&form.email) else {
        return Redirect::to("/auth/signup?error=email").into_response();
    };

    let name = form.name.trim();
    if name.is_empty() {
        return Redirect::to("/auth/signup?error=name").into_response();
    }

    match state.identity().sign_up(&email, &form.password, name).await {
        Ok(sign_in) => start_session(&state, &session, sign_in, "/auth/signup").await,
        Err(AuthError::EmailTaken) => {
            Redirect::to("/auth/signup?error=email_taken").into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "signup failed");
            Redirect::to("/auth/signup?error=provider").into_response()
        }
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Handle logout.
///
/// Revokes the provider session on a best-effort basis; the local session
/// is cleared regardless.
pub async fn logout(State(state): State<AppState>, session: Session) -> Response {
    if let Ok(Some(tokens)) = session.get::<AuthTokens>(session_keys::AUTH_TOKENS).await {
        if let Err(e) = state.identity().sign_out(&tokens.access_token).await {
            tracing::debug!(error = %e, "provider logout failed, clearing local session anyway");
        }
    }

    if let Err(e) = clear_current_member(&session).await {
        tracing::error!(error = %e, "failed to clear session on logout");
    }
    clear_sentry_user();

    Redirect::to("/").into_response()
}

// =============================================================================
// Shared
// =============================================================================

/// Mirror the provider account into a local member row and open the session.
///
/// `error_path` is where to send the browser if session setup fails after a
/// provider success (so the error lands on the page the user came from).
async fn start_session(
    state: &AppState,
    session: &Session,
    sign_in: SignIn,
    error_path: &str,
) -> Response {
    let fallback_name = sign_in.email.as_str().to_string();
    let name = sign_in.name.unwrap_or(fallback_name);

    let member = match MemberRepository::new(state.pool())
        .get_or_create(sign_in.account_id, &sign_in.email, &name)
        .await
    {
        Ok(member) => member,
        Err(e) => {
            tracing::error!(error = %e, "failed to mirror member after sign-in");
            return Redirect::to(&format!("{error_path}?error=session")).into_response();
        }
    };

    let current = CurrentMember {
        member_id: member.id,
        account_id: member.account_id,
        email: member.email,
        name: member.name,
    };

    if let Err(e) = set_current_member(session, &current, &sign_in.tokens).await {
        tracing::error!(error = %e, "failed to set session");
        return Redirect::to(&format!("{error_path}?error=session")).into_response();
    }

    set_sentry_user(&current.member_id, Some(current.email.as_str()));
    tracing::info!(member_id = %current.member_id, "member signed in");

    Redirect::to("/account").into_response()
}
