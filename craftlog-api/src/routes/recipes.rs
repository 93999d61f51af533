//! Recipe endpoints (template data), including ingredient-line management.
//!
//! # Endpoints
//!
//! - `GET /v1/recipes` - list, owner-scoped, newest first
//! - `POST /v1/recipes` - create
//! - `GET /v1/recipes/:id` - detail with resolved ingredient lines
//! - `PATCH /v1/recipes/:id` - update
//! - `DELETE /v1/recipes/:id` - delete (409 while batches reference it)
//! - `POST /v1/recipes/:id/ingredients` - add a line
//! - `DELETE /v1/recipes/:id/ingredients/:line_id` - remove a line

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use craftlog_shared::auth::middleware::AuthContext;
use craftlog_shared::models::ingredient::Ingredient;
use craftlog_shared::models::recipe::{
    CreateRecipe, IngredientLine, Recipe, UpdateRecipe,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Create request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRecipeRequest {
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,

    pub description: Option<String>,
}

/// Update request; only provided fields change.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateRecipeRequest {
    #[validate(length(min = 1, max = 255, message = "Title must not be empty"))]
    pub title: Option<String>,

    pub description: Option<String>,
}

/// Add-ingredient-line request
#[derive(Debug, Deserialize, Validate)]
pub struct AddIngredientLineRequest {
    pub ingredient_id: Uuid,

    #[validate(length(max = 100, message = "Quantity must be at most 100 characters"))]
    pub quantity: Option<String>,
}

/// Recipe detail: the recipe plus its resolved ingredient lines.
#[derive(Debug, Serialize)]
pub struct RecipeDetailResponse {
    #[serde(flatten)]
    pub recipe: Recipe,

    pub ingredients: Vec<IngredientLine>,
}

/// Lists the owner's recipes.
pub async fn list_recipes(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Recipe>>> {
    let recipes = Recipe::list_for_owner(&state.db, auth.user_id).await?;

    Ok(Json(recipes))
}

/// Creates a recipe.
pub async fn create_recipe(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateRecipeRequest>,
) -> ApiResult<Json<Recipe>> {
    req.validate()?;

    let recipe = Recipe::create(
        &state.db,
        auth.user_id,
        CreateRecipe {
            title: req.title,
            description: req.description,
        },
    )
    .await?;

    tracing::info!(user_id = %auth.user_id, recipe_id = %recipe.id, "Recipe created");

    Ok(Json(recipe))
}

/// Fetches one owned recipe with its ingredient lines.
pub async fn get_recipe(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<RecipeDetailResponse>> {
    let recipe = Recipe::find_by_id_and_owner(&state.db, id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))?;

    let ingredients = Recipe::ingredient_lines(&state.db, recipe.id).await?;

    Ok(Json(RecipeDetailResponse {
        recipe,
        ingredients,
    }))
}

/// Updates an owned recipe.
pub async fn update_recipe(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateRecipeRequest>,
) -> ApiResult<Json<Recipe>> {
    req.validate()?;

    let recipe = Recipe::update(
        &state.db,
        id,
        auth.user_id,
        UpdateRecipe {
            title: req.title,
            description: req.description.map(Some),
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))?;

    Ok(Json(recipe))
}

/// Deletes an owned recipe and its ingredient lines.
pub async fn delete_recipe(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let deleted = Recipe::delete(&state.db, id, auth.user_id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Recipe not found".to_string()));
    }

    tracing::info!(user_id = %auth.user_id, recipe_id = %id, "Recipe deleted");

    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// Adds an ingredient line to an owned recipe.
///
/// Both the recipe and the referenced ingredient must belong to the
/// requesting owner; either failing the scoped lookup is a 404.
pub async fn add_ingredient_line(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddIngredientLineRequest>,
) -> ApiResult<Json<IngredientLine>> {
    req.validate()?;

    let recipe = Recipe::find_by_id_and_owner(&state.db, id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))?;

    Ingredient::find_by_id_and_owner(&state.db, req.ingredient_id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Ingredient not found".to_string()))?;

    let line =
        Recipe::add_ingredient_line(&state.db, recipe.id, req.ingredient_id, req.quantity).await?;

    Ok(Json(line))
}

/// Removes one ingredient line from an owned recipe.
pub async fn remove_ingredient_line(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((id, line_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<serde_json::Value>> {
    let recipe = Recipe::find_by_id_and_owner(&state.db, id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))?;

    let removed = Recipe::remove_ingredient_line(&state.db, recipe.id, line_id).await?;

    if !removed {
        return Err(ApiError::NotFound("Ingredient line not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "deleted": true })))
}
