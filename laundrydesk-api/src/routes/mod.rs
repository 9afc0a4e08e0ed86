/// API route handlers
///
/// Organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login, and password reset
/// - `users`: Profile self-service and admin user management
/// - `tasks`: Task listing with assignee expansion

pub mod auth;
pub mod health;
pub mod tasks;
pub mod users;
