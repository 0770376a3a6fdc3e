//! Core types for the Harborview Museum website.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod payment;
pub mod role;

pub use email::{Email, EmailError};
pub use id::*;
pub use payment::{NewPayment, Payment};
pub use role::{AdminRole, RoleParseError};
