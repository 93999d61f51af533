//! Ingredient endpoints (template data).
//!
//! # Endpoints
//!
//! - `GET /v1/ingredients` - list, owner-scoped, ordered by name
//! - `POST /v1/ingredients` - create
//! - `GET /v1/ingredients/:id` - detail
//! - `PATCH /v1/ingredients/:id` - update
//! - `DELETE /v1/ingredients/:id` - delete (409 while referenced)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use craftlog_shared::auth::middleware::AuthContext;
use craftlog_shared::models::ingredient::{CreateIngredient, Ingredient, UpdateIngredient};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateIngredientRequest {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,

    #[validate(length(max = 100, message = "Category must be at most 100 characters"))]
    pub category: Option<String>,

    pub description: Option<String>,
}

/// Update request; only provided fields change.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateIngredientRequest {
    #[validate(length(min = 1, max = 255, message = "Name must not be empty"))]
    pub name: Option<String>,

    #[validate(length(max = 100, message = "Category must be at most 100 characters"))]
    pub category: Option<String>,

    pub description: Option<String>,
}

/// Lists the owner's ingredients.
pub async fn list_ingredients(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Ingredient>>> {
    let ingredients = Ingredient::list_for_owner(&state.db, auth.user_id).await?;

    Ok(Json(ingredients))
}

/// Creates an ingredient.
pub async fn create_ingredient(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateIngredientRequest>,
) -> ApiResult<Json<Ingredient>> {
    req.validate()?;

    let ingredient = Ingredient::create(
        &state.db,
        auth.user_id,
        CreateIngredient {
            name: req.name,
            category: req.category,
            description: req.description,
        },
    )
    .await?;

    tracing::info!(user_id = %auth.user_id, ingredient_id = %ingredient.id, "Ingredient created");

    Ok(Json(ingredient))
}

/// Fetches one owned ingredient; cross-user ids are a 404.
pub async fn get_ingredient(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Ingredient>> {
    let ingredient = Ingredient::find_by_id_and_owner(&state.db, id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Ingredient not found".to_string()))?;

    Ok(Json(ingredient))
}

/// Updates an owned ingredient.
pub async fn update_ingredient(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateIngredientRequest>,
) -> ApiResult<Json<Ingredient>> {
    req.validate()?;

    let ingredient = Ingredient::update(
        &state.db,
        id,
        auth.user_id,
        UpdateIngredient {
            name: req.name,
            category: req.category.map(Some),
            description: req.description.map(Some),
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Ingredient not found".to_string()))?;

    Ok(Json(ingredient))
}

/// Deletes an owned ingredient.
///
/// A 409 is returned while inventory items or recipe lines still reference
/// it.
pub async fn delete_ingredient(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let deleted = Ingredient::delete(&state.db, id, auth.user_id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Ingredient not found".to_string()));
    }

    tracing::info!(user_id = %auth.user_id, ingredient_id = %id, "Ingredient deleted");

    Ok(Json(serde_json::json!({ "deleted": true })))
}
