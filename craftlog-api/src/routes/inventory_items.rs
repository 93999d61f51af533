//! Inventory item endpoints (transactional data).
//!
//! # Endpoints
//!
//! - `GET /v1/inventory_items` - list, owner-scoped, newest purchase first,
//!   ingredient names resolved in the same query
//! - `POST /v1/inventory_items` - record a purchase
//! - `GET /v1/inventory_items/:id` - detail
//! - `PATCH /v1/inventory_items/:id` - update
//! - `DELETE /v1/inventory_items/:id` - delete
//!
//! The `purchase_date` field is required: a request without one does not
//! deserialize and nothing is persisted.

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
use craftlog_shared::models::ingredient::Ingredient;
use craftlog_shared::models::inventory_item::{
    CreateInventoryItem, InventoryItem, InventoryItemRow, UpdateInventoryItem,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create request. `ingredient_id` and `purchase_date` are required.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateInventoryItemRequest {
    pub ingredient_id: Uuid,

    #[validate(length(max = 255, message = "Brand must be at most 255 characters"))]
    pub brand: Option<String>,

    #[validate(length(max = 100, message = "Size must be at most 100 characters"))]
    pub size: Option<String>,

    #[validate(length(max = 255, message = "Location must be at most 255 characters"))]
    pub location: Option<String>,

    pub purchase_date: NaiveDate,

    pub notes: Option<String>,

    #[validate(url(message = "Photo must be a valid URL"))]
    pub photo_url: Option<String>,
}

/// Update request; only provided fields change.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateInventoryItemRequest {
    pub ingredient_id: Option<Uuid>,

    #[validate(length(max = 255, message = "Brand must be at most 255 characters"))]
    pub brand: Option<String>,

    #[validate(length(max = 100, message = "Size must be at most 100 characters"))]
    pub size: Option<String>,

    #[validate(length(max = 255, message = "Location must be at most 255 characters"))]
    pub location: Option<String>,

    pub purchase_date: Option<NaiveDate>,

    pub notes: Option<String>,

    #[validate(url(message = "Photo must be a valid URL"))]
    pub photo_url: Option<String>,
}

/// Lists the owner's inventory, ingredient names included.
pub async fn list_inventory_items(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<InventoryItemRow>>> {
    let items = InventoryItem::list_for_owner(&state.db, auth.user_id).await?;

    Ok(Json(items))
}

/// Records a purchase.
///
/// The referenced ingredient must belong to the requesting owner; a
/// cross-user or unknown ingredient id is a 404.
pub async fn create_inventory_item(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateInventoryItemRequest>,
) -> ApiResult<Json<InventoryItem>> {
    req.validate()?;

    Ingredient::find_by_id_and_owner(&state.db, req.ingredient_id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Ingredient not found".to_string()))?;

    let item = InventoryItem::create(
        &state.db,
        auth.user_id,
        CreateInventoryItem {
            ingredient_id: req.ingredient_id,
            brand: req.brand,
            size: req.size,
            location: req.location,
            purchase_date: req.purchase_date,
            notes: req.notes,
            photo_url: req.photo_url,
        },
    )
    .await?;

    tracing::info!(
        user_id = %auth.user_id,
        item_id = %item.id,
        ingredient_id = %item.ingredient_id,
        "Inventory item created"
    );

    Ok(Json(item))
}

/// Fetches one owned item; cross-user ids are a 404.
pub async fn get_inventory_item(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<InventoryItem>> {
    let item = InventoryItem::find_by_id_and_owner(&state.db, id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Inventory item not found".to_string()))?;

    Ok(Json(item))
}

/// Updates an owned item. A changed ingredient reference is re-checked
/// against the owner's ingredients.
pub async fn update_inventory_item(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateInventoryItemRequest>,
) -> ApiResult<Json<InventoryItem>> {
    req.validate()?;

    if let Some(ingredient_id) = req.ingredient_id {
        Ingredient::find_by_id_and_owner(&state.db, ingredient_id, auth.user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Ingredient not found".to_string()))?;
    }

    let item = InventoryItem::update(
        &state.db,
        id,
        auth.user_id,
        UpdateInventoryItem {
            ingredient_id: req.ingredient_id,
            brand: req.brand.map(Some),
            size: req.size.map(Some),
            location: req.location.map(Some),
            purchase_date: req.purchase_date,
            notes: req.notes.map(Some),
            photo_url: req.photo_url.map(Some),
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Inventory item not found".to_string()))?;

    Ok(Json(item))
}

/// Deletes an owned item.
pub async fn delete_inventory_item(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let deleted = InventoryItem::delete(&state.db, id, auth.user_id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Inventory item not found".to_string()));
    }

    tracing::info!(user_id = %auth.user_id, item_id = %id, "Inventory item deleted");

    Ok(Json(serde_json::json!({ "deleted": true })))
}
