//! Clients for external services.
//!
//! The site talks to two upstream systems over HTTP: the headless content
//! API that editors publish to (`cms`), and the identity provider that owns
//! member credentials (`identity`). Both clients are constructed once in
//! [`crate::state::AppState`] and shared across handlers.

pub mod cms;
pub mod identity;

pub use cms::{CmsClient, CmsError};
pub use identity::{AuthError, IdentityClient, SignIn};
