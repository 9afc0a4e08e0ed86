//! # LaundryDesk Shared Library
//!
//! This crate contains shared types, utilities, and business logic used by
//! the LaundryDesk API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `auth`: Authentication and authorization utilities
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the LaundryDesk shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
