/// Database models for LaundryDesk
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts, roles, and sanitized views
/// - `task`: Work items with an optional assignee
/// - `password_reset`: Single-use expiring password reset tokens

pub mod password_reset;
pub mod task;
pub mod user;
