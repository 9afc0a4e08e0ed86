/// Application state and router builder
///
/// Defines the shared application state and builds the Axum router with all
/// routes and middleware.
///
/// # Example
///
/// ```no_run
/// use laundrydesk_api::{app::{build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::cache::NoCacheLayer, routes};
use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use laundrydesk_shared::{
    auth::middleware::{authorize, protect},
    models::user::Role,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor; the config
/// sits behind an Arc so clones stay cheap. The pool is the single database
/// client for the whole process, established once at startup.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.auth.jwt_secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                           # Health check (public)
/// └── /v1/
///     ├── /auth/                        # Public
///     │   ├── POST /register
///     │   ├── POST /login
///     │   ├── POST /forgot-password
///     │   ├── GET  /verify-reset-token/:token
///     │   └── POST /reset-password
///     ├── /users/                       # protect (+ authorize where noted)
///     │   ├── GET  /me
///     │   ├── PUT  /me
///     │   ├── PUT  /me/password
///     │   ├── GET  /:id/tasks           # self or admin
///     │   ├── GET  /                    # admin
///     │   ├── GET  /:id                 # admin
///     │   └── PUT  /:id/role            # admin
///     └── /tasks/
///         └── GET  /                    # admin
/// ```
///
/// # Middleware Stack
///
/// Requests traverse, outermost first: TraceLayer and CORS, then per-group
/// `protect` (401 on bad/absent tokens), then `authorize` (403 on role
/// mismatch); the no-store cache layer shapes every authenticated response
/// on the way out.
pub fn build_router(state: AppState) -> Router {
    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/forgot-password", post(routes::auth::forgot_password))
        .route(
            "/verify-reset-token/:token",
            get(routes::auth::verify_reset_token),
        )
        .route("/reset-password", post(routes::auth::reset_password));

    let protect_layer = middleware::from_fn(protect(
        state.db.clone(),
        state.jwt_secret().to_string(),
    ));
    let admin_layer = middleware::from_fn(authorize(&[Role::Admin]));

    // Self-service user routes (any authenticated role)
    let self_routes = Router::new()
        .route(
            "/me",
            get(routes::users::me).put(routes::users::update_me),
        )
        .route("/me/password", put(routes::users::change_password))
        .route("/:id/tasks", get(routes::users::user_tasks))
        .layer(protect_layer.clone());

    // Admin-only user management
    let admin_user_routes = Router::new()
        .route("/", get(routes::users::list_users))
        .route("/:id", get(routes::users::get_user))
        .route("/:id/role", put(routes::users::update_role))
        .layer(admin_layer.clone())
        .layer(protect_layer.clone());

    // Static /me wins over /:id captures, so the merge is conflict-free
    let user_routes = self_routes.merge(admin_user_routes).layer(NoCacheLayer);

    // Task listing (admin only)
    let task_routes = Router::new()
        .route("/", get(routes::tasks::list_tasks))
        .layer(admin_layer)
        .layer(protect_layer)
        .layer(NoCacheLayer);

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .nest("/tasks", task_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}
