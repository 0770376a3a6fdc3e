//! Client for the external identity provider.
//!
//! The provider owns credentials; the site never sees a password hash. Each
//! call carries the publishable API key, and password-grant or refresh-grant
//! token requests come back as an access/refresh token pair plus the account
//! the provider authenticated.
//!
//! Error mapping is by provider status code: 400/401 on a password grant is
//! an invalid-credential rejection, 422 on signup means the email is already
//! registered, anything else 4xx/5xx surfaces as a provider error.

use chrono::{Duration, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use harborview_core::{AccountId, Email};

use crate::config::IdentityConfig;
use crate::models::AuthTokens;

const API_KEY_HEADER: &str = "apikey";
const REQUEST_TIMEOUT_SECONDS: u64 = 10;

/// Errors from identity provider operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Network or transport failure.
    #[error("identity request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider rejected the email/password pair.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Signup for an email the provider already knows.
    #[error("email is already registered")]
    EmailTaken,

    /// Any other provider-side rejection.
    #[error("identity provider error ({status}): {message}")]
    Provider {
        status: StatusCode,
        message: String,
    },

    /// The provider responded with a body we could not interpret.
    #[error("unexpected identity response: {0}")]
    Parse(String),
}

/// A successful authentication: who the provider says this is, plus tokens.
#[derive(Debug, Clone)]
pub struct SignIn {
    /// Account ID at the provider.
    pub account_id: AccountId,
    /// Verified email address.
    pub email: Email,
    /// Display name from account metadata, if set.
    pub name: Option<String>,
    /// Token pair for the session.
    pub tokens: AuthTokens,
}

/// Client for the identity provider's auth API.
#[derive(Clone)]
pub struct IdentityClient {
    client: reqwest::Client,
    api_url: String,
    publishable_key: String,
}

/// Wire shape of a token grant response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
    user: AccountResponse,
}

#[derive(Debug, Deserialize)]
struct AccountResponse {
    id: AccountId,
    email: String,
    #[serde(default)]
    user_metadata: AccountMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct AccountMetadata {
    #[serde(default)]
    name: Option<String>,
}

/// Wire shape of a provider error body. Providers are inconsistent about
/// the field name, so accept the common variants.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(alias = "msg", alias = "error_description", alias = "message")]
    error: Option<String>,
}

impl IdentityClient {
    /// Create a new identity client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &IdentityConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_owned(),
            publishable_key: config.publishable_key.clone(),
        })
    }

    /// Register a new account and sign it in.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::EmailTaken`] if the provider already has this
    /// email, or a transport/provider error otherwise.
    pub async fn sign_up(
        &self,
        email: &Email,
        password: &str,
        name: &str,
    ) -> Result<SignIn, AuthError> {
        let body = serde_json::json!({
            "email": email.as_str(),
            "password": password,
            "data": { "name": name },
        });

        let response = self
            .client
            .post(format!("{}/signup", self.api_url))
            .header(API_KEY_HEADER, &self.publishable_key)
            .json(&body)
            .send()
            .await?;

        Self::into_sign_in(response, Operation::SignUp).await
    }

    /// Exchange an email/password pair for a token set.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] on a 400/401 rejection, or
    /// a transport/provider error otherwise.
    pub async fn sign_in(&self, email: &Email, password: &str) -> Result<SignIn, AuthError> {
        let body = serde_json::json!({
            "email": email.as_str(),
            "password": password,
        });

        let response = self
            .client
            .post(format!("{}/token?grant_type=password", self.api_url))
            .header(API_KEY_HEADER, &self.publishable_key)
            .json(&body)
            .send()
            .await?;

        Self::into_sign_in(response, Operation::SignIn).await
    }

    /// Exchange a refresh token for a fresh token set.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider rejects the refresh token or is
    /// unreachable. Callers treat any error as "session over".
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthTokens, AuthError> {
        let body = serde_json::json!({ "refresh_token": refresh_token });

        let response = self
            .client
            .post(format!("{}/token?grant_type=refresh_token", self.api_url))
            .header(API_KEY_HEADER, &self.publishable_key)
            .json(&body)
            .send()
            .await?;

        let sign_in = Self::into_sign_in(response, Operation::Refresh).await?;
        Ok(sign_in.tokens)
    }

    /// Revoke the session at the provider.
    ///
    /// # Errors
    ///
    /// Returns a transport error; a provider-side rejection is ignored since
    /// the local session is cleared regardless.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        self.client
            .post(format!("{}/logout", self.api_url))
            .header(API_KEY_HEADER, &self.publishable_key)
            .bearer_auth(access_token)
            .send()
            .await?;
        Ok(())
    }

    async fn into_sign_in(
        response: reqwest::Response,
        operation: Operation,
    ) -> Result<SignIn, AuthError> {
        let status = response.status();

        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .ok()
                .and_then(|e| e.error)
                .unwrap_or_else(|| "no error detail".to_owned());
            return Err(map_provider_error(operation, status, message));
        }

        let token: TokenResponse = response.json().await?;

        let email = Email::parse(&token.user.email)
            .map_err(|e| AuthError::Parse(format!("account email: {e}")))?;

        Ok(SignIn {
            account_id: token.user.id,
            email,
            name: token.user.user_metadata.name,
            tokens: AuthTokens {
                access_token: token.access_token,
                refresh_token: token.refresh_token,
                expires_at: Utc::now() + Duration::seconds(token.expires_in),
            },
        })
    }
}

/// Which provider call an error status came from. Status codes alone are
/// ambiguous: 422 means "email taken" only on signup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    SignUp,
    SignIn,
    Refresh,
}

fn map_provider_error(operation: Operation, status: StatusCode, message: String) -> AuthError {
    match (operation, status) {
        (Operation::SignIn, StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED) => {
            AuthError::InvalidCredentials
        }
        (Operation::SignUp, StatusCode::UNPROCESSABLE_ENTITY) => AuthError::EmailTaken,
        // Some providers report a duplicate signup as 400 with a message
        (Operation::SignUp, StatusCode::BAD_REQUEST)
            if message.to_lowercase().contains("already registered") =>
        {
            AuthError::EmailTaken
        }
        _ => AuthError::Provider { status, message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_rejection_maps_to_invalid_credentials() {
        let err = map_provider_error(
            Operation::SignIn,
            StatusCode::BAD_REQUEST,
            "invalid grant".to_owned(),
        );
        assert!(matches!(err, AuthError::InvalidCredentials));

        let err = map_provider_error(
            Operation::SignIn,
            StatusCode::UNAUTHORIZED,
            "invalid grant".to_owned(),
        );
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[test]
    fn test_duplicate_signup_maps_to_email_taken() {
        let err = map_provider_error(
            Operation::SignUp,
            StatusCode::UNPROCESSABLE_ENTITY,
            "duplicate".to_owned(),
        );
        assert!(matches!(err, AuthError::EmailTaken));

        let err = map_provider_error(
            Operation::SignUp,
            StatusCode::BAD_REQUEST,
            "User already registered".to_owned(),
        );
        assert!(matches!(err, AuthError::EmailTaken));
    }

    #[test]
    fn test_other_statuses_stay_provider_errors() {
        let err = map_provider_error(
            Operation::Refresh,
            StatusCode::BAD_REQUEST,
            "refresh token revoked".to_owned(),
        );
        assert!(matches!(err, AuthError::Provider { .. }));

        let err = map_provider_error(
            Operation::SignIn,
            StatusCode::INTERNAL_SERVER_ERROR,
            "boom".to_owned(),
        );
        assert!(matches!(
            err,
            AuthError::Provider {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                ..
            }
        ));
    }

    #[test]
    fn test_token_response_parses_provider_shape() {
        let json = serde_json::json!({
            "access_token": "at",
            "refresh_token": "rt",
            "expires_in": 3600,
            "token_type": "bearer",
            "user": {
                "id": "7b9f4a70-9c1e-4a93-b6c2-0d6f0e3f6a11",
                "email": "member@example.com",
                "user_metadata": { "name": "Alex Rivera" }
            }
        });

        let parsed: TokenResponse =
            serde_json::from_value(json).expect("token response should parse");
        assert_eq!(parsed.expires_in, 3600);
        assert_eq!(parsed.user.email, "member@example.com");
        assert_eq!(parsed.user.user_metadata.name.as_deref(), Some("Alex Rivera"));
    }

    #[test]
    fn test_token_response_without_metadata() {
        let json = serde_json::json!({
            "access_token": "at",
            "refresh_token": "rt",
            "expires_in": 3600,
            "user": {
                "id": "7b9f4a70-9c1e-4a93-b6c2-0d6f0e3f6a11",
                "email": "member@example.com"
            }
        });

        let parsed: TokenResponse =
            serde_json::from_value(json).expect("token response should parse");
        assert!(parsed.user.user_metadata.name.is_none());
    }

    #[test]
    fn test_error_response_field_aliases() {
        for body in [
            r#"{"error": "bad"}"#,
            r#"{"msg": "bad"}"#,
            r#"{"error_description": "bad"}"#,
            r#"{"message": "bad"}"#,
        ] {
            let parsed: ErrorResponse = serde_json::from_str(body).expect("should parse");
            assert_eq!(parsed.error.as_deref(), Some("bad"), "body: {body}");
        }
    }
}
