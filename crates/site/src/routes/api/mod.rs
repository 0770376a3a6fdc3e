//! JSON API route handlers.

pub mod admin;
