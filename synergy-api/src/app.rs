/// Application state and router builder
///
/// Defines the shared state cloned into every handler and assembles the
/// Axum router with all routes and middleware.
///
/// # Router layout
///
/// ```text
/// /
/// ├── /health                                 # public
/// └── /api/
///     ├── /auth/register        POST          # public
///     ├── /auth/login           POST          # public
///     ├── /users/me             GET           # bearer
///     ├── /users?email=substr   GET           # bearer
///     ├── /projects             POST, GET     # bearer
///     ├── /projects/:id         GET, PUT      # bearer
///     ├── /projects/:id/members POST          # bearer
///     ├── /projects/:id/tasks   POST, GET     # bearer
///     └── /projects/:id/tasks/:task_id  PUT   # bearer
/// ```
///
/// Protected routes run the authentication chain as a middleware layer;
/// handlers extract the resulting `CurrentUser` from request extensions.

use crate::config::Config;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use synergy_shared::auth::middleware::{authenticate, CurrentUser};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request via Axum's `State` extractor; `Arc` keeps the
/// clone cheap.
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

    /// JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    /// Configured access token lifetime in seconds
    pub fn token_ttl(&self) -> i64 {
        self.config.jwt.ttl_seconds
    }
}

/// Builds the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    // Everything else requires an authenticated, active user.
    let protected_routes = Router::new()
        .route("/users/me", get(routes::users::read_me))
        .route("/users", get(routes::users::search_users))
        .route(
            "/projects",
            post(routes::projects::create_project).get(routes::projects::list_my_projects),
        )
        .route(
            "/projects/:project_id",
            get(routes::projects::get_project_detail).put(routes::projects::update_project),
        )
        .route(
            "/projects/:project_id/members",
            post(routes::projects::add_member),
        )
        .route(
            "/projects/:project_id/tasks",
            post(routes::tasks::create_task).get(routes::tasks::list_project_tasks),
        )
        .route(
            "/projects/:project_id/tasks/:task_id",
            put(routes::tasks::update_task),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_layer,
        ));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .merge(protected_routes);

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // CORS is deployment glue; allowed origins belong to the reverse
        // proxy in production.
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Authentication middleware layer
///
/// Runs the stateless chain (bearer → decode → user lookup → active gate)
/// and injects [`CurrentUser`] into request extensions.
async fn auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let user = authenticate(&state.db, state.jwt_secret(), req.headers()).await?;

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}
