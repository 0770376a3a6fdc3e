//! Domain models for the site.

pub mod member;
pub mod session;

pub use member::Member;
pub use session::{AuthTokens, CurrentMember, keys as session_keys};
