/// Application state and router builder
///
/// This module defines the shared application state and builds the Axum
/// router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use bookportal_api::{app::AppState, config::Config};
/// use bookportal_shared::mail::LogMailer;
/// use bookportal_shared::redis::MemoryTokenBlocklist;
/// use sqlx::PgPool;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(
///     pool,
///     config,
///     Arc::new(MemoryTokenBlocklist::new()),
///     Arc::new(LogMailer),
/// );
/// let app = bookportal_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    error::{register_all_errors, ApiError},
    middleware::register_middleware,
    routes,
};
use axum::{
    extract::{Request, State},
    middleware::{from_fn_with_state, Next},
    response::Response,
    routing::{get, post, put},
    Router,
};
use bookportal_shared::{
    auth::{
        jwt::TokenType,
        middleware::{authenticate, bearer_token, missing_token_error, AuthContext},
    },
    error::AppError,
    mail::Mailer,
    redis::TokenBlocklist,
    services::{
        BookServiceArc, PgBookService, PgReviewService, PgTagService, PgUserService,
        ReviewServiceArc, TagServiceArc, UserServiceArc,
    },
};
use sqlx::PgPool;
use std::sync::Arc;
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;

/// Service objects the handlers call into
#[derive(Clone)]
pub struct Services {
    pub users: UserServiceArc,
    pub books: BookServiceArc,
    pub reviews: ReviewServiceArc,
    pub tags: TagServiceArc,
    pub blocklist: Arc<dyn TokenBlocklist>,
    pub mailer: Arc<dyn Mailer>,
}

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor; everything
/// inside is reference counted.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (health checks)
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    pub users: UserServiceArc,

    pub books: BookServiceArc,

    pub reviews: ReviewServiceArc,

    pub tags: TagServiceArc,

    /// Revoked access tokens
    pub blocklist: Arc<dyn TokenBlocklist>,

    /// Outgoing email
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    /// Creates state backed by the PostgreSQL services
    pub fn new(
        db: PgPool,
        config: Config,
        blocklist: Arc<dyn TokenBlocklist>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let services = Services {
            users: Arc::new(PgUserService::new(db.clone())),
            books: Arc::new(PgBookService::new(db.clone())),
            reviews: Arc::new(PgReviewService::new(db.clone())),
            tags: Arc::new(PgTagService::new(db.clone())),
            blocklist,
            mailer,
        };

        Self::with_services(db, config, services)
    }

    /// Creates state around caller-provided services
    pub fn with_services(db: PgPool, config: Config, services: Services) -> Self {
        Self {
            db,
            config: Arc::new(config),
            users: services.users,
            books: services.books,
            reviews: services.reviews,
            tags: services.tags,
            blocklist: services.blocklist,
            mailer: services.mailer,
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET /                          # Liveness message
/// ├── GET /health                    # Health check with database status
/// └── /api/v1/
///     ├── /auth/                     # Signup, login, tokens, password reset
///     ├── /books/                    # Book CRUD (access token)
///     ├── /reviews/                  # Reviews (access token)
///     └── /tags/                     # Tags (access token)
/// ```
///
/// Protected routes use `route_layer`, so unknown paths still reach the JSON
/// 404 fallback instead of failing authentication. Handler panics answer with
/// the same envelope. A trailing slash is trimmed before routing, so
/// `/api/v1/books/` and `/api/v1/books` are the same route.
pub fn build_router(state: AppState) -> Router {
    // Health routes (public)
    let health_routes = Router::new()
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health_check));

    // Auth routes; only /me and /logout need an access token
    let auth_routes = Router::new()
        .route("/me", get(routes::auth::me))
        .route("/logout", get(routes::auth::logout))
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_layer))
        .route("/signup", post(routes::auth::signup))
        .route("/verify/:token", get(routes::auth::verify_account))
        .route("/login", post(routes::auth::login))
        .route("/refresh_token", get(routes::auth::refresh_token))
        .route(
            "/password-reset-request",
            post(routes::auth::password_reset_request),
        )
        .route(
            "/password-reset-confirm/:token",
            post(routes::auth::password_reset_confirm),
        )
        .route("/send_mail", post(routes::auth::send_mail));

    let book_routes = Router::new()
        .route(
            "/",
            get(routes::books::get_all_books).post(routes::books::create_book),
        )
        .route("/user/:user_uid", get(routes::books::get_user_books))
        .route(
            "/:book_uid",
            get(routes::books::get_book)
                .patch(routes::books::update_book)
                .delete(routes::books::delete_book),
        )
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_layer));

    let review_routes = Router::new()
        .route("/", get(routes::reviews::get_all_reviews))
        .route(
            "/:review_uid",
            get(routes::reviews::get_review).delete(routes::reviews::delete_review),
        )
        .route("/book/:book_uid", post(routes::reviews::add_review))
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_layer));

    let tag_routes = Router::new()
        .route(
            "/",
            get(routes::tags::get_all_tags).post(routes::tags::add_tag),
        )
        .route("/book/:book_uid/tags", post(routes::tags::add_tags_to_book))
        .route(
            "/:tag_uid",
            put(routes::tags::update_tag).delete(routes::tags::delete_tag),
        )
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_layer));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/books", book_routes)
        .nest("/reviews", review_routes)
        .nest("/tags", tag_routes);

    let router = Router::new()
        .merge(health_routes)
        .nest("/api/v1", v1_routes);

    let router = register_all_errors(router);
    let router = register_middleware(router, &state.config.api).with_state(state);

    // Router layers run after matching; normalizing has to wrap the whole router
    Router::new().fallback_service(NormalizePathLayer::trim_trailing_slash().layer(router))
}

/// Access token authentication layer
///
/// Validates the bearer access token (signature, expiry, type, blocklist),
/// loads the user it was issued to and injects an [`AuthContext`] into the
/// request extensions.
pub async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(req.headers()).ok_or_else(|| missing_token_error(TokenType::Access))?;

    let claims = authenticate(
        token,
        state.jwt_secret(),
        TokenType::Access,
        state.blocklist.as_ref(),
    )
    .await?;

    let user = state
        .users
        .get_user_by_email(&claims.email)
        .await?
        .ok_or(AppError::InvalidToken)?;

    tracing::debug!(user_id = %user.uid, "Authenticated request");
    req.extensions_mut().insert(AuthContext::new(claims, user));

    Ok(next.run(req).await)
}
