//! Application state and router builder.
//!
//! # Route map
//!
//! ```text
//! /
//! ├── GET /                         # dashboard summary (authenticated)
//! ├── GET /health                   # health check (public)
//! └── /v1/
//!     ├── /auth/                    # register / login / refresh (public)
//!     ├── /ingredients/             # template data CRUD
//!     ├── /recipes/                 # template data CRUD + ingredient lines
//!     ├── /inventory_items/         # purchases CRUD
//!     ├── /batches/                 # production log: create/read/delete only
//!     └── /dashboard                # counts + recent activity
//! ```
//!
//! Everything below `/v1` except `/v1/auth` sits behind the bearer-token
//! layer, which injects the request-scoped `AuthContext`.

use crate::{config::Config, middleware::security::SecurityHeadersLayer, routes};
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, post},
    Router,
};
use craftlog_shared::auth::middleware::bearer_auth_middleware;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state, cloned per request via the `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Public: no token yet.
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    let ingredient_routes = Router::new()
        .route(
            "/",
            get(routes::ingredients::list_ingredients).post(routes::ingredients::create_ingredient),
        )
        .route(
            "/:id",
            get(routes::ingredients::get_ingredient)
                .patch(routes::ingredients::update_ingredient)
                .delete(routes::ingredients::delete_ingredient),
        );

    let recipe_routes = Router::new()
        .route(
            "/",
            get(routes::recipes::list_recipes).post(routes::recipes::create_recipe),
        )
        .route(
            "/:id",
            get(routes::recipes::get_recipe)
                .patch(routes::recipes::update_recipe)
                .delete(routes::recipes::delete_recipe),
        )
        .route("/:id/ingredients", post(routes::recipes::add_ingredient_line))
        .route(
            "/:id/ingredients/:line_id",
            delete(routes::recipes::remove_ingredient_line),
        );

    let inventory_routes = Router::new()
        .route(
            "/",
            get(routes::inventory_items::list_inventory_items)
                .post(routes::inventory_items::create_inventory_item),
        )
        .route(
            "/:id",
            get(routes::inventory_items::get_inventory_item)
                .patch(routes::inventory_items::update_inventory_item)
                .delete(routes::inventory_items::delete_inventory_item),
        );

    // Batches are an append-only log: no update route exists.
    let batch_routes = Router::new()
        .route(
            "/",
            get(routes::batches::list_batches).post(routes::batches::create_batch),
        )
        .route(
            "/:id",
            get(routes::batches::get_batch).delete(routes::batches::delete_batch),
        );

    let dashboard_routes = Router::new().route("/dashboard", get(routes::dashboard::summary));

    // Everything owner-scoped goes behind the bearer-token layer.
    let protected = Router::new()
        .nest("/ingredients", ingredient_routes)
        .nest("/recipes", recipe_routes)
        .nest("/inventory_items", inventory_routes)
        .nest("/batches", batch_routes)
        .merge(dashboard_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            bearer_auth_layer,
        ));

    let v1_routes = Router::new().nest("/auth", auth_routes).merge(protected);

    // The landing page is the dashboard.
    let root_routes = Router::new()
        .route("/", get(routes::dashboard::summary))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            bearer_auth_layer,
        ));

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
        .merge(root_routes)
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

/// Bearer-token layer: validates the access token and injects `AuthContext`.
///
/// Thin adapter over the shared middleware so failures surface in the API's
/// error format.
async fn bearer_auth_layer(
    state: axum::extract::State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    bearer_auth_middleware(state.jwt_secret().to_string(), req, next)
        .await
        .map_err(crate::error::ApiError::from)
}
