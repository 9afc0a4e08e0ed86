/// Access control middleware for Axum
///
/// Two gates protect routes:
///
/// - [`protect`]: validates the bearer token, resolves the encoded user ID
///   against the database, and attaches the identity to the request. Missing,
///   malformed, expired, or tampered tokens are rejected with 401 before any
///   handler runs, as are tokens for users that no longer exist.
/// - [`authorize`]: checks the attached identity's role against an allowed
///   set, rejecting with 403 otherwise.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Router};
/// use laundrydesk_shared::auth::middleware::{authorize, protect, AuthUser};
/// use laundrydesk_shared::models::user::Role;
/// # use sqlx::PgPool;
///
/// async fn me(axum::Extension(user): axum::Extension<AuthUser>) -> String {
///     format!("Hello, {}", user.name)
/// }
///
/// # fn example(pool: PgPool) {
/// let admin_only = Router::<()>::new()
///     .route("/users", get(|| async { "all users" }))
///     .layer(middleware::from_fn(authorize(&[Role::Admin])))
///     .layer(middleware::from_fn(protect(pool, "secret".to_string())));
/// # }
/// ```

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use super::jwt::{validate_token, JwtError};
use crate::models::user::{Role, User, UserView};

/// Authenticated identity attached to request extensions by [`protect`]
///
/// Handlers extract it with Axum's `Extension` extractor. The fields come
/// from the user's current database record, not the token, so a stale role
/// claim cannot outlive a role change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    /// Authenticated user ID
    pub id: Uuid,

    /// Current display name
    pub name: String,

    /// Current email address
    pub email: String,

    /// Current role (read from the database at request time)
    pub role: Role,
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

impl AuthUser {
    /// True when the identity carries the admin role
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Checks whether a role is in an allowed set
pub fn role_allowed(role: Role, allowed: &[Role]) -> bool {
    allowed.contains(&role)
}

/// Error type for access control failures
#[derive(Debug)]
pub enum AuthError {
    /// No Authorization header present (401)
    MissingToken,

    /// Authorization header is not a Bearer token (401)
    InvalidFormat(String),

    /// Token failed validation: expired, tampered, bad issuer (401)
    InvalidToken(String),

    /// Token was valid but the user no longer exists (401)
    UserGone,

    /// Identity's role is not in the allowed set (403)
    Forbidden,

    /// Database failure while resolving the identity (500)
    DatabaseError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AuthError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "unauthenticated",
                "Missing bearer token".to_string(),
            ),
            AuthError::InvalidFormat(msg) => (StatusCode::UNAUTHORIZED, "unauthenticated", msg),
            AuthError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, "unauthenticated", msg),
            AuthError::UserGone => (
                StatusCode::UNAUTHORIZED,
                "unauthenticated",
                "Invalid token".to_string(),
            ),
            AuthError::Forbidden => (
                StatusCode::FORBIDDEN,
                "forbidden",
                "You do not have permission to access this resource".to_string(),
            ),
            AuthError::DatabaseError(msg) => {
                tracing::error!("Auth middleware database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "success": false,
            "error": code,
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// Core of the protect gate
///
/// Extracts `Authorization: Bearer <token>`, validates the token, and loads
/// the user it names. On success both an [`AuthUser`] and a [`UserView`] are
/// inserted into request extensions.
pub async fn protect_middleware(
    pool: PgPool,
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    let claims = validate_token(token, &secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        JwtError::InvalidIssuer => AuthError::InvalidToken("Invalid token issuer".to_string()),
        _ => AuthError::InvalidToken("Invalid token".to_string()),
    })?;

    // The token only proves who the caller was at issuance. Resolve the user
    // so deleted accounts are rejected and role changes take effect
    // immediately.
    let user = User::find_by_id(&pool, claims.sub)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?
        .ok_or(AuthError::UserGone)?;

    let view = UserView::from(&user);
    req.extensions_mut().insert(AuthUser::from(user));
    req.extensions_mut().insert(view);

    Ok(next.run(req).await)
}

/// Creates the protect middleware closure
///
/// Captures the pool and JWT secret for use with
/// `axum::middleware::from_fn`.
pub fn protect(
    pool: PgPool,
    secret: String,
) -> impl Fn(Request, Next) -> BoxFuture<'static, Result<Response, AuthError>> + Clone {
    move |req, next| {
        let pool = pool.clone();
        let secret = secret.clone();
        Box::pin(protect_middleware(pool, secret, req, next))
    }
}

/// Creates an authorization middleware closure for a set of allowed roles
///
/// Must run after [`protect`]; a request reaching it without an attached
/// identity is a wiring error and is rejected as internal.
pub fn authorize(
    allowed: &'static [Role],
) -> impl Fn(Request, Next) -> BoxFuture<'static, Result<Response, AuthError>> + Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<AuthUser>()
                .cloned()
                .ok_or_else(|| {
                    AuthError::DatabaseError("authorize ran without protect".to_string())
                })?;

            if !role_allowed(user.role, allowed) {
                return Err(AuthError::Forbidden);
            }

            Ok(next.run(req).await)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_auth_user(role: Role) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn test_auth_user_from_user() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$x".to_string(),
            role: Role::Admin,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let auth: AuthUser = user.clone().into();
        assert_eq!(auth.id, user.id);
        assert_eq!(auth.role, Role::Admin);
        assert!(auth.is_admin());
    }

    #[test]
    fn test_role_allowed() {
        assert!(role_allowed(Role::Admin, &[Role::Admin]));
        assert!(!role_allowed(Role::Customer, &[Role::Admin]));
        assert!(role_allowed(
            Role::Employee,
            &[Role::Employee, Role::Admin]
        ));
        assert!(!role_allowed(Role::Customer, &[]));
    }

    #[test]
    fn test_auth_error_status_codes() {
        assert_eq!(
            AuthError::MissingToken.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::InvalidToken("expired".to_string())
                .into_response()
                .status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::UserGone.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::Forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AuthError::DatabaseError("x".to_string())
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_auth_error_envelope_body() {
        let response = AuthError::Forbidden.into_response();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "forbidden");
        assert!(json["message"].is_string());
    }

    #[test]
    fn test_customer_not_admin() {
        assert!(!sample_auth_user(Role::Customer).is_admin());
        assert!(!sample_auth_user(Role::Employee).is_admin());
    }
}
