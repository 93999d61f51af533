//! Shared infrastructure for integration tests:
//! - database setup with migrations
//! - a fresh user with a valid access token per context
//! - request/response helpers for exercising the router

use axum::body::Body;
use axum::http::{Request, StatusCode};
use craftlog_api::app::{build_router, AppState};
use craftlog_api::config::Config;
use craftlog_shared::auth::jwt::{create_token, Claims, TokenType};
use craftlog_shared::models::user::{CreateUser, User};
use sqlx::PgPool;
use tower::Service as _;
use uuid::Uuid;

/// Test context: a live database, a fresh user, and the app router.
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    pub user: User,
    pub jwt_token: String,
}

impl TestContext {
    /// Creates a context with a migrated database and a fresh user.
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;

        // Path relative to this crate's Cargo.toml.
        sqlx::migrate!("../migrations").run(&db).await?;

        let user = User::create(
            &db,
            CreateUser {
                email: format!("test-{}@example.com", Uuid::new_v4()),
                password_hash: "test_hash".to_string(), // never verified in tests
                name: Some("Test Maker".to_string()),
            },
        )
        .await?;

        let claims = Claims::new(user.id, TokenType::Access);
        let jwt_token = create_token(&claims, &config.jwt.secret)?;

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            config,
            user,
            jwt_token,
        })
    }

    /// Adds a second, independent user to the same database and app.
    pub async fn other_user(&self) -> anyhow::Result<(User, String)> {
        let user = User::create(
            &self.db,
            CreateUser {
                email: format!("other-{}@example.com", Uuid::new_v4()),
                password_hash: "test_hash".to_string(),
                name: Some("Other Maker".to_string()),
            },
        )
        .await?;

        let claims = Claims::new(user.id, TokenType::Access);
        let token = create_token(&claims, &self.config.jwt.secret)?;

        Ok((user, token))
    }

    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.jwt_token)
    }

    /// Deletes the context's user; ownership cascades clean up the rest.
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        User::delete(&self.db, self.user.id).await?;
        Ok(())
    }
}

/// Sends a request with the given bearer token and returns (status, body).
pub async fn request_with_token(
    ctx: &TestContext,
    method: &str,
    uri: &str,
    token: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token));

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = ctx.app.clone().call(request).await.unwrap();
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, json)
}

/// Sends a request as the context's own user.
pub async fn request(
    ctx: &TestContext,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    request_with_token(ctx, method, uri, &ctx.jwt_token, body).await
}

/// Creates an ingredient via the API and returns its id.
pub async fn create_ingredient(ctx: &TestContext, name: &str) -> anyhow::Result<Uuid> {
    let (status, body) = request(
        ctx,
        "POST",
        "/v1/ingredients",
        Some(serde_json::json!({ "name": name })),
    )
    .await;

    anyhow::ensure!(status == StatusCode::OK, "create ingredient failed: {}", body);
    Ok(body["id"].as_str().unwrap().parse()?)
}

/// Creates a recipe via the API and returns its id.
pub async fn create_recipe(ctx: &TestContext, title: &str) -> anyhow::Result<Uuid> {
    let (status, body) = request(
        ctx,
        "POST",
        "/v1/recipes",
        Some(serde_json::json!({ "title": title })),
    )
    .await;

    anyhow::ensure!(status == StatusCode::OK, "create recipe failed: {}", body);
    Ok(body["id"].as_str().unwrap().parse()?)
}

/// Creates an inventory item via the API and returns its id.
pub async fn create_inventory_item(
    ctx: &TestContext,
    ingredient_id: Uuid,
    purchase_date: &str,
) -> anyhow::Result<Uuid> {
    let (status, body) = request(
        ctx,
        "POST",
        "/v1/inventory_items",
        Some(serde_json::json!({
            "ingredient_id": ingredient_id,
            "purchase_date": purchase_date
        })),
    )
    .await;

    anyhow::ensure!(status == StatusCode::OK, "create inventory item failed: {}", body);
    Ok(body["id"].as_str().unwrap().parse()?)
}

/// Logs a batch via the API and returns its id.
pub async fn create_batch(
    ctx: &TestContext,
    recipe_id: Uuid,
    made_on: &str,
) -> anyhow::Result<Uuid> {
    let (status, body) = request(
        ctx,
        "POST",
        "/v1/batches",
        Some(serde_json::json!({
            "recipe_id": recipe_id,
            "made_on": made_on
        })),
    )
    .await;

    anyhow::ensure!(status == StatusCode::OK, "create batch failed: {}", body);
    Ok(body["id"].as_str().unwrap().parse()?)
}
