//! Integration tests for the Craftlog API.
//!
//! These exercise the full request path against a live database:
//! - authentication requirements
//! - owner scoping on every resource
//! - required-field validation for purchases and batches
//! - the write-once batch contract
//! - dashboard counts and recent activity

mod common;

use axum::http::StatusCode;
use common::TestContext;
use serde_json::json;

/// Requests without a token are rejected before any handler runs.
#[tokio::test]
async fn test_authentication_required() {
    let ctx = TestContext::new().await.unwrap();

    let (status, _) = common::request_with_token(&ctx, "GET", "/v1/inventory_items", "", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = common::request_with_token(&ctx, "GET", "/v1/dashboard", "", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    ctx.cleanup().await.unwrap();
}

/// Inventory listing is owner-scoped, carries ingredient names, and is
/// ordered by purchase date descending.
#[tokio::test]
async fn test_inventory_listing() {
    let ctx = TestContext::new().await.unwrap();

    let shea = common::create_ingredient(&ctx, "Shea Butter").await.unwrap();
    let older = common::create_inventory_item(&ctx, shea, "2026-01-10").await.unwrap();
    let newer = common::create_inventory_item(&ctx, shea, "2026-01-26").await.unwrap();

    let (status, body) = common::request(&ctx, "GET", "/v1/inventory_items", None).await;
    assert_eq!(status, StatusCode::OK);

    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 2);

    // Newest purchase first, ingredient name resolved.
    assert_eq!(items[0]["id"], newer.to_string());
    assert_eq!(items[1]["id"], older.to_string());
    assert_eq!(items[0]["ingredient_name"], "Shea Butter");

    ctx.cleanup().await.unwrap();
}

/// An inventory item without a purchase date fails validation and persists
/// nothing.
#[tokio::test]
async fn test_inventory_item_requires_purchase_date() {
    let ctx = TestContext::new().await.unwrap();

    let shea = common::create_ingredient(&ctx, "Shea Butter").await.unwrap();

    let (status, _) = common::request(
        &ctx,
        "POST",
        "/v1/inventory_items",
        Some(json!({ "ingredient_id": shea })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Nothing was persisted.
    let (_, body) = common::request(&ctx, "GET", "/v1/inventory_items", None).await;
    assert!(body.as_array().unwrap().is_empty());

    ctx.cleanup().await.unwrap();
}

/// A batch without a made_on date fails validation and persists nothing.
#[tokio::test]
async fn test_batch_requires_made_on() {
    let ctx = TestContext::new().await.unwrap();

    let recipe = common::create_recipe(&ctx, "Simple Body Butter").await.unwrap();

    let (status, _) = common::request(
        &ctx,
        "POST",
        "/v1/batches",
        Some(json!({ "recipe_id": recipe })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, body) = common::request(&ctx, "GET", "/v1/batches", None).await;
    assert!(body.as_array().unwrap().is_empty());

    ctx.cleanup().await.unwrap();
}

/// Records are invisible across users: another user's id is a 404, and
/// listings never mix owners.
#[tokio::test]
async fn test_cross_user_access_denied() {
    let ctx = TestContext::new().await.unwrap();
    let (other, other_token) = ctx.other_user().await.unwrap();

    let shea = common::create_ingredient(&ctx, "Shea Butter").await.unwrap();
    let item = common::create_inventory_item(&ctx, shea, "2026-01-26").await.unwrap();

    // The other user cannot fetch the item by id.
    let (status, _) = common::request_with_token(
        &ctx,
        "GET",
        &format!("/v1/inventory_items/{}", item),
        &other_token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Nor delete it.
    let (status, _) = common::request_with_token(
        &ctx,
        "DELETE",
        &format!("/v1/inventory_items/{}", item),
        &other_token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Their listing is empty.
    let (_, body) =
        common::request_with_token(&ctx, "GET", "/v1/inventory_items", &other_token, None).await;
    assert!(body.as_array().unwrap().is_empty());

    // The owner still sees the item.
    let (status, _) = common::request(
        &ctx,
        "GET",
        &format!("/v1/inventory_items/{}", item),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    craftlog_shared::models::user::User::delete(&ctx.db, other.id)
        .await
        .unwrap();
    ctx.cleanup().await.unwrap();
}

/// Logging a batch against someone else's recipe is rejected, not silently
/// accepted.
#[tokio::test]
async fn test_batch_for_foreign_recipe_rejected() {
    let ctx = TestContext::new().await.unwrap();
    let (other, other_token) = ctx.other_user().await.unwrap();

    let recipe = common::create_recipe(&ctx, "Simple Body Butter").await.unwrap();

    let (status, _) = common::request_with_token(
        &ctx,
        "POST",
        "/v1/batches",
        &other_token,
        Some(json!({
            "recipe_id": recipe,
            "made_on": "2026-01-27"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Nothing was logged for either user.
    let (_, body) =
        common::request_with_token(&ctx, "GET", "/v1/batches", &other_token, None).await;
    assert!(body.as_array().unwrap().is_empty());

    let (_, body) = common::request(&ctx, "GET", "/v1/batches", None).await;
    assert!(body.as_array().unwrap().is_empty());

    craftlog_shared::models::user::User::delete(&ctx.db, other.id)
        .await
        .unwrap();
    ctx.cleanup().await.unwrap();
}

/// Batches have no update surface: the log is create/delete only.
#[tokio::test]
async fn test_batches_cannot_be_edited() {
    let ctx = TestContext::new().await.unwrap();

    let recipe = common::create_recipe(&ctx, "Simple Body Butter").await.unwrap();
    let batch = common::create_batch(&ctx, recipe, "2026-01-27").await.unwrap();

    let (status, _) = common::request(
        &ctx,
        "PATCH",
        &format!("/v1/batches/{}", batch),
        Some(json!({ "made_on": "2026-01-28" })),
    )
    .await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let (status, _) = common::request(
        &ctx,
        "PUT",
        &format!("/v1/batches/{}", batch),
        Some(json!({ "made_on": "2026-01-28" })),
    )
    .await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    // The entry is unchanged.
    let (status, body) =
        common::request(&ctx, "GET", &format!("/v1/batches/{}", batch), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["made_on"], "2026-01-27");

    ctx.cleanup().await.unwrap();
}

/// Deleting a batch removes it from the listing and from dashboard
/// recent-batches.
#[tokio::test]
async fn test_delete_batch_removes_everywhere() {
    let ctx = TestContext::new().await.unwrap();

    let recipe = common::create_recipe(&ctx, "Simple Body Butter").await.unwrap();
    let batch = common::create_batch(&ctx, recipe, "2026-01-27").await.unwrap();

    let (status, _) =
        common::request(&ctx, "DELETE", &format!("/v1/batches/{}", batch), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = common::request(&ctx, "GET", "/v1/batches", None).await;
    assert!(body.as_array().unwrap().is_empty());

    let (_, dashboard) = common::request(&ctx, "GET", "/v1/dashboard", None).await;
    assert_eq!(dashboard["stats"]["batches"], 0);
    assert!(dashboard["recent_batches"].as_array().unwrap().is_empty());

    // Deleting again is a 404.
    let (status, _) =
        common::request(&ctx, "DELETE", &format!("/v1/batches/{}", batch), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    ctx.cleanup().await.unwrap();
}

/// Dashboard counts equal the scoped count of each resource type.
#[tokio::test]
async fn test_dashboard_counts() {
    let ctx = TestContext::new().await.unwrap();

    let shea = common::create_ingredient(&ctx, "Shea Butter").await.unwrap();
    common::create_ingredient(&ctx, "Coconut Oil").await.unwrap();
    common::create_ingredient(&ctx, "Lavender EO").await.unwrap();

    let recipe = common::create_recipe(&ctx, "Simple Body Butter").await.unwrap();

    common::create_inventory_item(&ctx, shea, "2026-01-10").await.unwrap();
    common::create_inventory_item(&ctx, shea, "2026-01-26").await.unwrap();

    common::create_batch(&ctx, recipe, "2026-01-27").await.unwrap();

    let (status, dashboard) = common::request(&ctx, "GET", "/v1/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(dashboard["stats"]["ingredients"], 3);
    assert_eq!(dashboard["stats"]["recipes"], 1);
    assert_eq!(dashboard["stats"]["inventory_items"], 2);
    assert_eq!(dashboard["stats"]["batches"], 1);

    ctx.cleanup().await.unwrap();
}

/// The full maker flow: define an ingredient, record a purchase of it,
/// build a recipe on it, log a batch, and see it all on the dashboard.
#[tokio::test]
async fn test_end_to_end_shea_butter_flow() {
    let ctx = TestContext::new().await.unwrap();

    // Create ingredient "Shea Butter".
    let shea = common::create_ingredient(&ctx, "Shea Butter").await.unwrap();

    // Create an inventory item referencing it.
    common::create_inventory_item(&ctx, shea, "2026-01-26").await.unwrap();

    // Create recipe "Simple Body Butter" referencing the ingredient.
    let recipe = common::create_recipe(&ctx, "Simple Body Butter").await.unwrap();
    let (status, _) = common::request(
        &ctx,
        "POST",
        &format!("/v1/recipes/{}/ingredients", recipe),
        Some(json!({ "ingredient_id": shea, "quantity": "200 g" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Log a batch for that recipe.
    let batch = common::create_batch(&ctx, recipe, "2026-01-27").await.unwrap();

    // Batch detail shows the recipe's current ingredient list.
    let (status, detail) =
        common::request(&ctx, "GET", &format!("/v1/batches/{}", batch), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["recipe_title"], "Simple Body Butter");
    assert_eq!(detail["ingredients"][0]["ingredient_name"], "Shea Butter");

    // Dashboard shows the batch in recent activity with title and label.
    let (status, dashboard) = common::request(&ctx, "GET", "/v1/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["stats"]["batches"], 1);

    let recent = &dashboard["recent_batches"][0];
    assert_eq!(recent["recipe_title"], "Simple Body Butter");
    assert_eq!(recent["made_on"], "2026-01-27");
    assert_eq!(recent["made_on_label"], "Jan 27");

    // The root path serves the same summary.
    let (status, root) = common::request(&ctx, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(root["stats"]["batches"], 1);

    ctx.cleanup().await.unwrap();
}

/// Recipe detail resolves ingredient lines; removing a line updates it.
#[tokio::test]
async fn test_recipe_ingredient_lines() {
    let ctx = TestContext::new().await.unwrap();

    let shea = common::create_ingredient(&ctx, "Shea Butter").await.unwrap();
    let coconut = common::create_ingredient(&ctx, "Coconut Oil").await.unwrap();
    let recipe = common::create_recipe(&ctx, "Simple Body Butter").await.unwrap();

    let (_, line) = common::request(
        &ctx,
        "POST",
        &format!("/v1/recipes/{}/ingredients", recipe),
        Some(json!({ "ingredient_id": shea, "quantity": "200 g" })),
    )
    .await;
    common::request(
        &ctx,
        "POST",
        &format!("/v1/recipes/{}/ingredients", recipe),
        Some(json!({ "ingredient_id": coconut, "quantity": "100 g" })),
    )
    .await;

    let (_, detail) = common::request(&ctx, "GET", &format!("/v1/recipes/{}", recipe), None).await;
    assert_eq!(detail["ingredients"].as_array().unwrap().len(), 2);

    // An ingredient belonging to no one (random id) cannot be added.
    let (status, _) = common::request(
        &ctx,
        "POST",
        &format!("/v1/recipes/{}/ingredients", recipe),
        Some(json!({ "ingredient_id": uuid::Uuid::new_v4() })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Remove one line.
    let line_id = line["id"].as_str().unwrap();
    let (status, _) = common::request(
        &ctx,
        "DELETE",
        &format!("/v1/recipes/{}/ingredients/{}", recipe, line_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, detail) = common::request(&ctx, "GET", &format!("/v1/recipes/{}", recipe), None).await;
    assert_eq!(detail["ingredients"].as_array().unwrap().len(), 1);
    assert_eq!(detail["ingredients"][0]["ingredient_name"], "Coconut Oil");

    ctx.cleanup().await.unwrap();
}

/// Ingredient update and owner-scoped deletion behavior.
#[tokio::test]
async fn test_ingredient_lifecycle() {
    let ctx = TestContext::new().await.unwrap();

    let shea = common::create_ingredient(&ctx, "Shea Butter").await.unwrap();

    let (status, updated) = common::request(
        &ctx,
        "PATCH",
        &format!("/v1/ingredients/{}", shea),
        Some(json!({ "category": "butters" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["category"], "butters");
    assert_eq!(updated["name"], "Shea Butter");

    // Referenced template data cannot be deleted.
    common::create_inventory_item(&ctx, shea, "2026-01-26").await.unwrap();
    let (status, _) =
        common::request(&ctx, "DELETE", &format!("/v1/ingredients/{}", shea), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    ctx.cleanup().await.unwrap();
}

/// Health probe reports database connectivity without authentication.
#[tokio::test]
async fn test_health_endpoint() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = common::request_with_token(&ctx, "GET", "/health", "", None).await;
    // Public route: the empty token is never inspected.
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");

    ctx.cleanup().await.unwrap();
}

/// Register → login → refresh round trip through the auth endpoints.
#[tokio::test]
async fn test_auth_flow() {
    let ctx = TestContext::new().await.unwrap();

    let email = format!("flow-{}@example.com", uuid::Uuid::new_v4());

    let (status, registered) = common::request_with_token(
        &ctx,
        "POST",
        "/v1/auth/register",
        "",
        Some(json!({
            "email": email,
            "password": "SheaButter26",
            "name": "Flow Tester"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(registered["access_token"].is_string());

    // The fresh access token works against a protected route.
    let token = registered["access_token"].as_str().unwrap();
    let (status, _) =
        common::request_with_token(&ctx, "GET", "/v1/dashboard", token, None).await;
    assert_eq!(status, StatusCode::OK);

    // Wrong password is rejected.
    let (status, _) = common::request_with_token(
        &ctx,
        "POST",
        "/v1/auth/login",
        "",
        Some(json!({ "email": email, "password": "WrongPassword1" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Correct password logs in; refresh yields a new access token.
    let (status, logged_in) = common::request_with_token(
        &ctx,
        "POST",
        "/v1/auth/login",
        "",
        Some(json!({ "email": email, "password": "SheaButter26" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, refreshed) = common::request_with_token(
        &ctx,
        "POST",
        "/v1/auth/refresh",
        "",
        Some(json!({ "refresh_token": logged_in["refresh_token"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(refreshed["access_token"].is_string());

    // Clean up the registered account.
    let user_id: uuid::Uuid = registered["user_id"].as_str().unwrap().parse().unwrap();
    craftlog_shared::models::user::User::delete(&ctx.db, user_id)
        .await
        .unwrap();
    ctx.cleanup().await.unwrap();
}
