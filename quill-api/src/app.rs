/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use quill_api::{app::{build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let app = build_router(AppState::new(pool, config));
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::{from_fn_with_state, Next},
    response::Response,
    routing::{delete, get, post, put},
    Router,
};
use quill_shared::{
    auth::middleware::jwt_auth_middleware,
    services::{AuthService, PostService},
    store::{MemoryStore, PgStore, PostStore, UserStore},
};
use sqlx::PgPool;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{config::Config, error::ApiError, middleware::security::SecurityHeadersLayer, routes};

/// Shared application state
///
/// Cloned into every handler; all fields are cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub posts: PostService,
    pub config: Arc<Config>,

    /// Set when backed by PostgreSQL; used by the health check
    pub db: Option<PgPool>,
}

impl AppState {
    /// State backed by PostgreSQL
    pub fn new(db: PgPool, config: Config) -> Self {
        let store = Arc::new(PgStore::new(db.clone()));
        Self {
            db: Some(db),
            ..Self::with_stores(store.clone(), store, config)
        }
    }

    /// State backed by a fresh in-memory store
    pub fn in_memory(config: Config) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::with_stores(store.clone(), store, config)
    }

    /// State over arbitrary store adapters
    pub fn with_stores(
        users: Arc<dyn UserStore>,
        posts: Arc<dyn PostStore>,
        config: Config,
    ) -> Self {
        Self {
            auth: AuthService::new(users, config.jwt.secret.as_str()),
            posts: PostService::new(posts),
            config: Arc::new(config),
            db: None,
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// ```text
/// /
/// ├── GET  /                          # Welcome text
/// ├── GET  /health                    # Health check
/// └── /api
///     ├── /auth
///     │   ├── POST /register
///     │   └── POST /login
///     └── /posts
///         ├── GET    /                # Published posts, paginated
///         ├── POST   /                # Create draft          (bearer)
///         ├── GET    /:slug           # Published post by slug
///         ├── PUT    /:id             # Update                (bearer)
///         ├── DELETE /:id             # Soft delete           (bearer)
///         └── POST   /:id/publish     # Publish               (bearer)
/// ```
///
/// `GET /:slug` and `PUT|DELETE /:id` share one path segment; the handler
/// decides how to interpret it.
pub fn build_router(state: AppState) -> Router {
    let require_auth = from_fn_with_state(state.clone(), jwt_auth_layer);

    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    let post_routes = Router::new()
        .route(
            "/",
            get(routes::posts::list_posts)
                .merge(post(routes::posts::create_post).route_layer(require_auth.clone())),
        )
        .route(
            "/:key",
            get(routes::posts::get_post).merge(
                put(routes::posts::update_post)
                    .merge(delete(routes::posts::delete_post))
                    .route_layer(require_auth.clone()),
            ),
        )
        .route(
            "/:key/publish",
            post(routes::posts::publish_post).route_layer(require_auth),
        );

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/posts", post_routes);

    Router::new()
        .route("/", get(routes::health::welcome))
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600))
}

/// Bearer-token guard for the mutating post routes
async fn jwt_auth_layer(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    jwt_auth_middleware(state.auth.jwt_secret(), req, next)
        .await
        .map_err(ApiError::from)
}
