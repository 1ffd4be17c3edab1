/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use parcelview_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = parcelview_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, patch, post},
    Router,
};
use parcelview_shared::auth::{jwt, middleware::AuthContext};
use parcelview_shared::email::EmailClient;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Email provider client (None when delivery is not configured)
    pub email: Option<EmailClient>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        let email = config.email.as_ref().map(|email_config| {
            EmailClient::new(parcelview_shared::email::EmailConfig {
                api_url: email_config.api_url.clone(),
                api_key: email_config.api_key.clone(),
                from_address: email_config.from_address.clone(),
                signup_base_url: email_config.signup_base_url.clone(),
            })
        });

        Self {
            db,
            config: Arc::new(config),
            email,
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
/// ├── /health                          # Health check (public)
/// └── /v1/
///     ├── /auth/                       # Session endpoints (public)
///     │   ├── POST /login
///     │   └── POST /refresh
///     ├── /invitations/
///     │   ├── POST   /                 # Create (admin)
///     │   ├── GET    /validate         # Token validation (public)
///     │   ├── POST   /accept           # Accept (public)
///     │   └── POST   /complete         # Complete signup (public)
///     ├── /properties/
///     │   ├── GET    /locations        # Search for the map
///     │   ├── GET    /states           # Filter dropdown data
///     │   ├── GET    /cities?state=    # Filter dropdown data
///     │   ├── GET    /:id              # Detail
///     │   └── GET|POST|DELETE /save    # Saved properties
///     ├── /team/                       # Admin, company-scoped
///     │   ├── GET    /members
///     │   ├── PATCH  /members/:id/permissions
///     │   ├── GET    /stats
///     │   └── GET    /activity-logs
///     ├── /user/
///     │   └── POST   /check-permission
///     └── /dashboard/
///         └── GET    /stats
/// ```
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Session endpoints (public, no auth required)
    let auth_routes = Router::new()
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    // Invitation lifecycle: creation is admin-only (behind the JWT layer);
    // the token endpoints are public because the invitee has no session yet.
    let invitation_routes = Router::new()
        .route("/", post(routes::invitations::create_invitation))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ))
        .route("/validate", get(routes::invitations::validate_invitation))
        .route("/accept", post(routes::invitations::accept_invitation))
        .route("/complete", post(routes::invitations::complete_signup));

    let property_routes = Router::new()
        .route("/locations", get(routes::properties::search_locations))
        .route("/states", get(routes::properties::list_states))
        .route("/cities", get(routes::properties::list_cities))
        .route(
            "/save",
            get(routes::saved::list_saved)
                .post(routes::saved::save_property)
                .delete(routes::saved::unsave_property),
        )
        .route("/:id", get(routes::properties::get_property))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let team_routes = Router::new()
        .route("/members", get(routes::team::list_members))
        .route(
            "/members/:id/permissions",
            patch(routes::team::update_member_permissions),
        )
        .route("/stats", get(routes::team::team_stats))
        .route("/activity-logs", get(routes::team::activity_logs))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let user_routes = Router::new()
        .route("/check-permission", post(routes::user::check_permission))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let dashboard_routes = Router::new()
        .route("/stats", get(routes::dashboard::dashboard_stats))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/invitations", invitation_routes)
        .nest("/properties", property_routes)
        .nest("/team", team_routes)
        .nest("/user", user_routes)
        .nest("/dashboard", dashboard_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
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
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
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
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Extracts and validates the bearer token, then injects an [`AuthContext`]
/// carrying only the user's identity into request extensions. Everything
/// else (role, company, feature flags) is loaded fresh from the store by
/// the handlers.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            crate::error::ApiError::Unauthorized("Missing authorization header".to_string())
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        crate::error::ApiError::BadRequest("Expected Bearer token".to_string())
    })?;

    let claims = jwt::validate_access_token(token, state.jwt_secret())?;

    let auth_context = AuthContext::from_jwt(claims.sub);
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
