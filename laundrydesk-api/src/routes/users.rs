/// User endpoints
///
/// Self-service (protected):
///
/// - `GET /v1/users/me` - Caller's sanitized profile
/// - `PUT /v1/users/me` - Update own name/email
/// - `PUT /v1/users/me/password` - Change own password
/// - `GET /v1/users/:id/tasks` - Tasks assigned to a user (self or admin)
///
/// Admin-only (protected + authorize(admin)):
///
/// - `GET /v1/users` - List all users (passwords stripped)
/// - `GET /v1/users/:id` - Single user lookup
/// - `PUT /v1/users/:id/role` - Change a user's role
///
/// All of these sit behind the no-store cache layer; responses carry
/// identity-bearing data and must not be cached by clients or
/// intermediaries.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    response::Envelope,
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use laundrydesk_shared::{
    auth::{middleware::AuthUser, password},
    models::{
        task::{Task, TaskWithAssignee},
        user::{Role, User, UserView},
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Profile update request; omitted fields keep their current value
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

/// Password change request
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Role change request
///
/// The role arrives as a raw string so an unknown value (e.g. "superuser")
/// is rejected with the envelope's validation error rather than a
/// deserialization failure.
#[derive(Debug, Deserialize)]
pub struct ChangeRoleRequest {
    pub role: String,
}

/// Generic message payload
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}

/// Caller's sanitized profile
///
/// The protect gate already resolved the user; no further database round
/// trip is made.
pub async fn me(Extension(view): Extension<UserView>) -> ApiResult<Json<Envelope<UserView>>> {
    Ok(Json(Envelope::new(view)))
}

/// Update the caller's own name and/or email
///
/// A changed email is re-validated for uniqueness by the database
/// constraint (409 on conflict).
pub async fn update_me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<Envelope<UserView>>> {
    req.validate()?;

    if req.name.is_none() && req.email.is_none() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }

    let updated = User::update_profile(&state.db, user.id, req.name, req.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(Envelope::new(updated.into())))
}

/// Change the caller's password
///
/// The old password must verify against the stored hash; a mismatch is an
/// authentication failure, not a validation one.
pub async fn change_password(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<Json<Envelope<Message>>> {
    // AuthUser carries no hash; fetch the record for verification
    let user = User::find_by_id(&state.db, auth.id)
        .await?
        .ok_or_else(|| ApiError::Unauthenticated("Invalid token".to_string()))?;

    let valid = password::verify_password(&req.old_password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthenticated(
            "Incorrect current password".to_string(),
        ));
    }

    password::validate_password_strength(&req.new_password)
        .map_err(|e| ApiError::Validation(vec![crate::error::FieldError {
            field: "new_password".to_string(),
            message: e,
        }]))?;

    let password_hash = password::hash_password(&req.new_password)?;
    User::update_password_hash(&state.db, user.id, &password_hash).await?;

    tracing::info!(user_id = %user.id, "Password changed");

    Ok(Json(Envelope::new(Message {
        message: "Password updated".to_string(),
    })))
}

/// All users, passwords stripped (admin only)
pub async fn list_users(
    State(state): State<AppState>,
) -> ApiResult<Json<Envelope<Vec<UserView>>>> {
    let users = User::list(&state.db).await?;
    let views: Vec<UserView> = users.into_iter().map(UserView::from).collect();

    Ok(Json(Envelope::list(views)))
}

/// Single user lookup (admin only)
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Envelope<UserView>>> {
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(Envelope::new(user.into())))
}

/// Change a user's role (admin only)
///
/// The role string must parse into the {customer, employee, admin}
/// enumeration before anything is persisted.
pub async fn update_role(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ChangeRoleRequest>,
) -> ApiResult<Json<Envelope<UserView>>> {
    let role: Role = req
        .role
        .parse()
        .map_err(|e: laundrydesk_shared::models::user::InvalidRole| {
            ApiError::BadRequest(e.to_string())
        })?;

    let user = User::update_role(&state.db, id, role)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    tracing::info!(user_id = %user.id, role = %role, "Role changed");

    Ok(Json(Envelope::new(user.into())))
}

/// Tasks assigned to a user, assignee expanded
///
/// Callers may list their own tasks; admins may list anyone's.
pub async fn user_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Envelope<Vec<TaskWithAssignee>>>> {
    if auth.id != id && !auth.is_admin() {
        return Err(ApiError::Forbidden(
            "You may only list your own tasks".to_string(),
        ));
    }

    let tasks = Task::list_for_assignee(&state.db, id).await?;

    Ok(Json(Envelope::list(tasks)))
}
