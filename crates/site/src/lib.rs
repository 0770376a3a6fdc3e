//! Harborview Museum website library.
//!
//! This crate provides the website as a library so the router and its
//! middleware can be exercised from the integration-tests crate.
//!
//! # Architecture
//!
//! - Axum web framework with askama templates for server-side rendering
//! - Content (exhibits, donation/volunteer pages) fetched from a headless
//!   content API
//! - Authentication delegated to an external identity provider; the site
//!   stores the issued tokens in `PostgreSQL`-backed sessions
//! - Admin surface is a small JSON API gated by a database role lookup

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod authz;
pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
