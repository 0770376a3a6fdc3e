//! Harborview Core - Shared types library.
//!
//! This crate provides common types used across all Harborview components:
//! - `site` - The public museum website and member area
//! - `cli` - Command-line tools for migrations and role management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, roles, and
//!   payment records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
