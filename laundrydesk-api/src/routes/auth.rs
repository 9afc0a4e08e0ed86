/// Authentication endpoints
///
/// - `POST /v1/auth/register` - Register a new user
/// - `POST /v1/auth/login` - Login and get a bearer token
/// - `POST /v1/auth/forgot-password` - Request a password reset token
/// - `GET /v1/auth/verify-reset-token/:token` - Check a reset token
/// - `POST /v1/auth/reset-password` - Set a new password with a reset token
///
/// Login failures are deliberately indistinguishable: a missing account and
/// a wrong password produce the same 401 body, so the endpoint cannot be
/// used for account enumeration. The forgot-password endpoint is
/// enumeration-safe the same way (always 200 with a generic message).

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    response::Envelope,
};
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Duration;
use laundrydesk_shared::{
    auth::{jwt, password, reset},
    models::{
        password_reset::PasswordReset,
        user::{CreateUser, Role, User, UserView},
    },
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Generic message for failed logins; never reveals which part was wrong
const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    /// Email address, used as the login key
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password (strength-checked separately)
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub password: String,
}

/// Token plus sanitized user, returned by register and login
#[derive(Debug, Serialize)]
pub struct AuthData {
    /// Bearer token proving identity on protected routes
    pub token: String,

    /// Sanitized user view (no password field)
    pub user: UserView,
}

/// Forgot-password request
#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Reset-password request
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    /// Plaintext reset token received out of band
    pub token: String,

    pub new_password: String,
}

/// Generic message payload
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}

/// Reset token verification payload
#[derive(Debug, Serialize)]
pub struct TokenValidity {
    pub valid: bool,
}

fn issue_token(state: &AppState, user: &User) -> ApiResult<String> {
    let claims = jwt::Claims::with_expiration(
        user.id,
        user.role,
        Duration::hours(state.config.auth.token_ttl_hours),
    );
    Ok(jwt::create_token(&claims, state.jwt_secret())?)
}

/// Register a new user
///
/// Hashes the password, creates the user with the default `customer` role,
/// and issues a bearer token. Duplicate emails are detected by the database
/// unique constraint, not an application-level existence check.
///
/// # Errors
///
/// - `400 Bad Request`: validation failed or weak password
/// - `409 Conflict`: email already registered
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<Envelope<AuthData>>> {
    req.validate()?;

    password::validate_password_strength(&req.password)
        .map_err(|e| ApiError::Validation(vec![crate::error::FieldError {
            field: "password".to_string(),
            message: e,
        }]))?;

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            name: req.name,
            email: req.email,
            password_hash,
            role: Role::Customer,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "Registered new user");

    let token = issue_token(&state, &user)?;

    Ok(Json(Envelope::new(AuthData {
        token,
        user: user.into(),
    })))
}

/// Login
///
/// Looks the user up by email and verifies the password hash. Both failure
/// modes return the same generic 401.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<Envelope<AuthData>>> {
    req.validate()?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthenticated(INVALID_CREDENTIALS.to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthenticated(INVALID_CREDENTIALS.to_string()));
    }

    let token = issue_token(&state, &user)?;

    Ok(Json(Envelope::new(AuthData {
        token,
        user: user.into(),
    })))
}

/// Request a password reset token
///
/// Always answers 200 with a generic message. When the email exists, a
/// single-use token is generated and its hash stored with an expiry;
/// delivery is the job of an external mailer.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> ApiResult<Json<Envelope<Message>>> {
    req.validate()?;

    if let Some(user) = User::find_by_email(&state.db, &req.email).await? {
        let (token, token_hash) = reset::generate_reset_token();

        PasswordReset::create(
            &state.db,
            user.id,
            &token_hash,
            Duration::minutes(state.config.auth.reset_token_ttl_minutes),
        )
        .await?;

        tracing::info!(user_id = %user.id, "Issued password reset token");
        // TODO: hand the token to a mailer; until then it is only visible
        // at debug log level for local testing
        tracing::debug!(user_id = %user.id, %token, "Reset token");
    }

    Ok(Json(Envelope::new(Message {
        message: "If that email is registered, a reset link has been sent".to_string(),
    })))
}

/// Check whether a reset token is valid and unexpired
pub async fn verify_reset_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> ApiResult<Json<Envelope<TokenValidity>>> {
    if !reset::validate_reset_token_format(&token) {
        return Err(ApiError::BadRequest(
            "Invalid or expired reset token".to_string(),
        ));
    }

    let token_hash = reset::hash_reset_token(&token);
    let found = PasswordReset::find_valid_by_hash(&state.db, &token_hash).await?;

    match found {
        Some(_) => Ok(Json(Envelope::new(TokenValidity { valid: true }))),
        None => Err(ApiError::BadRequest(
            "Invalid or expired reset token".to_string(),
        )),
    }
}

/// Set a new password using a reset token
///
/// The token is single-use: it is consumed as soon as the new hash is
/// stored.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> ApiResult<Json<Envelope<Message>>> {
    if !reset::validate_reset_token_format(&req.token) {
        return Err(ApiError::BadRequest(
            "Invalid or expired reset token".to_string(),
        ));
    }

    password::validate_password_strength(&req.new_password)
        .map_err(|e| ApiError::Validation(vec![crate::error::FieldError {
            field: "new_password".to_string(),
            message: e,
        }]))?;

    let token_hash = reset::hash_reset_token(&req.token);
    let record = PasswordReset::find_valid_by_hash(&state.db, &token_hash)
        .await?
        .ok_or_else(|| ApiError::BadRequest("Invalid or expired reset token".to_string()))?;

    let password_hash = password::hash_password(&req.new_password)?;
    let updated = User::update_password_hash(&state.db, record.user_id, &password_hash).await?;
    if !updated {
        return Err(ApiError::BadRequest(
            "Invalid or expired reset token".to_string(),
        ));
    }

    PasswordReset::consume(&state.db, record.user_id).await?;

    tracing::info!(user_id = %record.user_id, "Password reset completed");

    Ok(Json(Envelope::new(Message {
        message: "Password has been reset".to_string(),
    })))
}
