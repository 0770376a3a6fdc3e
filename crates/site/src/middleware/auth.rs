//! Session resolution and authentication extractors.
//!
//! [`resolve_member`] is the session adapter used by the request gate: it
//! turns the raw session into either a valid member identity or `None`,
//! transparently refreshing a near-expiry provider token. Any provider or
//! session-store error is treated identically to "no session" - the adapter
//! fails open to anonymous, never to authenticated.
//!
//! The extractors mirror the gate's decision for individual handlers.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{AuthTokens, CurrentMember, session_keys};
use crate::state::AppState;

/// Resolve the current member from the session, refreshing tokens if needed.
///
/// Returns `None` when there is no session, the token set is missing, or the
/// provider refuses/fails to refresh an expired token. In those cases the
/// member keys are cleared so later reads see a clean session.
pub async fn resolve_member(state: &AppState, session: &Session) -> Option<CurrentMember> {
    let member: CurrentMember = session
        .get(session_keys::CURRENT_MEMBER)
        .await
        .ok()
        .flatten()?;

    let Some(tokens) = session
        .get::<AuthTokens>(session_keys::AUTH_TOKENS)
        .await
        .ok()
        .flatten()
    else {
        let _ = clear_current_member(session).await;
        return None;
    };

    if tokens.needs_refresh() {
        match state.identity().refresh(&tokens.refresh_token).await {
            Ok(fresh) => {
                // tower-sessions re-sets the cookie when the record changes
                if session
                    .insert(session_keys::AUTH_TOKENS, &fresh)
                    .await
                    .is_err()
                {
                    let _ = clear_current_member(session).await;
                    return None;
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "token refresh failed, treating session as anonymous");
                let _ = clear_current_member(session).await;
                return None;
            }
        }
    }

    Some(member)
}

/// Extractor that requires member authentication.
///
/// If the member is not logged in, returns a redirect to the login page
/// for HTML requests, or 401 Unauthorized for API requests.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireMember(member): RequireMember,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", member.name)
/// }
/// ```
pub struct RequireMember(pub CurrentMember);

/// Error returned when member authentication is required but missing.
pub enum MemberAuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (for API requests).
    Unauthorized,
}

impl IntoResponse for MemberAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireMember
where
    S: Send + Sync,
{
    type Rejection = MemberAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // The gate inserts the resolved member for gated routes
        if let Some(member) = parts.extensions.get::<CurrentMember>() {
            return Ok(Self(member.clone()));
        }

        // Fall back to the raw session (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(MemberAuthRejection::Unauthorized)?;

        let member: CurrentMember = session
            .get(session_keys::CURRENT_MEMBER)
            .await
            .ok()
            .flatten()
            .ok_or_else(|| {
                let is_api = parts.uri.path().starts_with("/api/");
                if is_api {
                    MemberAuthRejection::Unauthorized
                } else {
                    MemberAuthRejection::RedirectToLogin
                }
            })?;

        Ok(Self(member))
    }
}

/// Extractor that optionally gets the current member.
///
/// Unlike `RequireMember`, this does not reject the request if the member
/// is not logged in.
pub struct OptionalMember(pub Option<CurrentMember>);

impl<S> FromRequestParts<S> for OptionalMember
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(member) = parts.extensions.get::<CurrentMember>() {
            return Ok(Self(Some(member.clone())));
        }

        let member = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentMember>(session_keys::CURRENT_MEMBER)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(member))
    }
}

/// Helper to set the current member and token set in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_member(
    session: &Session,
    member: &CurrentMember,
    tokens: &AuthTokens,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_MEMBER, member).await?;
    session.insert(session_keys::AUTH_TOKENS, tokens).await
}

/// Helper to clear the current member from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_member(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentMember>(session_keys::CURRENT_MEMBER)
        .await?;
    session
        .remove::<AuthTokens>(session_keys::AUTH_TOKENS)
        .await?;
    Ok(())
}
