/// Authentication and authorization utilities
///
/// This module provides the secure primitives behind LaundryDesk's auth flow:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and strength validation
/// - [`jwt`]: Bearer token generation and validation
/// - [`reset`]: Password reset token generation and hashing
/// - [`middleware`]: Axum `protect` / `authorize` request gates
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **Tokens**: HS256-signed JWTs with fixed expiration; sessions are
///   entirely client-held and the server is stateless per request
/// - **Reset Tokens**: Secure random generation; only the SHA-256 hash is
///   ever stored or looked up

pub mod jwt;
pub mod middleware;
pub mod password;
pub mod reset;
