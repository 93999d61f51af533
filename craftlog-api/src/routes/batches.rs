//! Batch endpoints: the append-only production log.
//!
//! # Endpoints
//!
//! - `GET /v1/batches` - list, owner-scoped, newest made_on first, recipe
//!   titles resolved in the same query
//! - `POST /v1/batches` - log a batch
//! - `GET /v1/batches/:id` - detail, with the recipe's ingredient list as
//!   of viewing time (not snapshotted)
//! - `DELETE /v1/batches/:id` - delete
//!
//! There is no update endpoint. A batch records a real-world event;
//! correcting a mistake means deleting the entry and logging a new one.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::NaiveDate;
use craftlog_shared::auth::middleware::AuthContext;
use craftlog_shared::models::batch::{Batch, BatchRow, CreateBatch};
use craftlog_shared::models::recipe::{IngredientLine, Recipe};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Create request. `recipe_id` and `made_on` are required.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBatchRequest {
    pub recipe_id: Uuid,

    pub made_on: NaiveDate,

    pub notes: Option<String>,
}

/// Batch detail: the log entry, the recipe title, and the recipe's current
/// ingredient list.
#[derive(Debug, Serialize)]
pub struct BatchDetailResponse {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub recipe_title: String,
    pub made_on: NaiveDate,
    pub notes: Option<String>,

    /// The recipe's ingredient lines as they are now, not as they were when
    /// the batch was made.
    pub ingredients: Vec<IngredientLine>,
}

/// Lists the owner's batches.
pub async fn list_batches(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<BatchRow>>> {
    let batches = Batch::list_for_owner(&state.db, auth.user_id).await?;

    Ok(Json(batches))
}

/// Logs a batch.
///
/// The recipe must belong to the requesting owner: logging production
/// against someone else's recipe is rejected with a 404, never silently
/// accepted.
pub async fn create_batch(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateBatchRequest>,
) -> ApiResult<Json<Batch>> {
    req.validate()?;

    let recipe = Recipe::find_by_id_and_owner(&state.db, req.recipe_id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))?;

    let batch = Batch::create(
        &state.db,
        auth.user_id,
        CreateBatch {
            recipe_id: recipe.id,
            made_on: req.made_on,
            notes: req.notes,
        },
    )
    .await?;

    tracing::info!(
        user_id = %auth.user_id,
        batch_id = %batch.id,
        recipe_id = %batch.recipe_id,
        made_on = %batch.made_on,
        "Batch logged"
    );

    Ok(Json(batch))
}

/// Fetches one owned batch with the recipe's current ingredient list.
pub async fn get_batch(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<BatchDetailResponse>> {
    let batch = Batch::find_by_id_and_owner(&state.db, id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Batch not found".to_string()))?;

    let recipe = Recipe::find_by_id_and_owner(&state.db, batch.recipe_id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))?;

    let ingredients = Recipe::ingredient_lines(&state.db, recipe.id).await?;

    Ok(Json(BatchDetailResponse {
        id: batch.id,
        recipe_id: batch.recipe_id,
        recipe_title: recipe.title,
        made_on: batch.made_on,
        notes: batch.notes,
        ingredients,
    }))
}

/// Deletes an owned batch; the only way to amend the log.
pub async fn delete_batch(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let deleted = Batch::delete(&state.db, id, auth.user_id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Batch not found".to_string()));
    }

    tracing::info!(user_id = %auth.user_id, batch_id = %id, "Batch deleted");

    Ok(Json(serde_json::json!({ "deleted": true })))
}
