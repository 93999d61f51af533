//! Inventory items: concrete purchases of an ingredient (transactional
//! data).
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE inventory_items (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
//!     ingredient_id UUID NOT NULL REFERENCES ingredients(id),
//!     brand VARCHAR(255),
//!     size VARCHAR(100),
//!     location VARCHAR(255),
//!     purchase_date DATE NOT NULL,
//!     notes TEXT,
//!     photo_url VARCHAR(512),
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```
//!
//! The listing query joins the ingredients table so a page of items carries
//! every ingredient name it needs in one round trip.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// An inventory item: a specific tub/bottle/bag the user bought.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct InventoryItem {
    pub id: Uuid,

    /// Owner
    pub user_id: Uuid,

    /// The ingredient definition this purchase is an instance of
    pub ingredient_id: Uuid,

    /// Manufacturer or supplier brand
    pub brand: Option<String>,

    /// Package size as bought, e.g. "500 g"
    pub size: Option<String>,

    /// Where it is stored, e.g. "pantry shelf 2"
    pub location: Option<String>,

    /// When it was bought; required
    pub purchase_date: NaiveDate,

    pub notes: Option<String>,

    /// Optional photo of the physical item
    pub photo_url: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// An inventory item as listed, with its ingredient's name joined in.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct InventoryItemRow {
    pub id: Uuid,
    pub ingredient_id: Uuid,
    pub ingredient_name: String,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub location: Option<String>,
    pub purchase_date: NaiveDate,
    pub notes: Option<String>,
    pub photo_url: Option<String>,
}

/// Input for creating an inventory item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInventoryItem {
    pub ingredient_id: Uuid,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub location: Option<String>,
    pub purchase_date: NaiveDate,
    pub notes: Option<String>,
    pub photo_url: Option<String>,
}

/// Input for updating an inventory item; only provided fields change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateInventoryItem {
    pub ingredient_id: Option<Uuid>,
    pub brand: Option<Option<String>>,
    pub size: Option<Option<String>>,
    pub location: Option<Option<String>>,
    pub purchase_date: Option<NaiveDate>,
    pub notes: Option<Option<String>>,
    pub photo_url: Option<Option<String>>,
}

impl InventoryItem {
    /// Records a purchase.
    ///
    /// Callers must have verified the ingredient belongs to `owner_id`
    /// first; the insert itself only enforces referential integrity.
    pub async fn create(
        pool: &PgPool,
        owner_id: Uuid,
        data: CreateInventoryItem,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, InventoryItem>(
            r#"
            INSERT INTO inventory_items
                (user_id, ingredient_id, brand, size, location, purchase_date, notes, photo_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, user_id, ingredient_id, brand, size, location, purchase_date,
                      notes, photo_url, created_at, updated_at
            "#,
        )
        .bind(owner_id)
        .bind(data.ingredient_id)
        .bind(data.brand)
        .bind(data.size)
        .bind(data.location)
        .bind(data.purchase_date)
        .bind(data.notes)
        .bind(data.photo_url)
        .fetch_one(pool)
        .await
    }

    /// Finds an item owned by `owner_id`; cross-owner ids come back `None`.
    pub async fn find_by_id_and_owner(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, InventoryItem>(
            r#"
            SELECT id, user_id, ingredient_id, brand, size, location, purchase_date,
                   notes, photo_url, created_at, updated_at
            FROM inventory_items
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await
    }

    /// Lists an owner's inventory, most recent purchase first, with each
    /// row's ingredient name resolved in the same query.
    pub async fn list_for_owner(
        pool: &PgPool,
        owner_id: Uuid,
    ) -> Result<Vec<InventoryItemRow>, sqlx::Error> {
        sqlx::query_as::<_, InventoryItemRow>(
            r#"
            SELECT it.id, it.ingredient_id, i.name AS ingredient_name, it.brand, it.size,
                   it.location, it.purchase_date, it.notes, it.photo_url
            FROM inventory_items it
            JOIN ingredients i ON i.id = it.ingredient_id
            WHERE it.user_id = $1
            ORDER BY it.purchase_date DESC, it.created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await
    }

    /// Applies the non-`None` fields of `data` to an owned item.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
        data: UpdateInventoryItem,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE inventory_items SET updated_at = NOW()");
        let mut bind_count = 2;

        if data.ingredient_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(", ingredient_id = ${}", bind_count));
        }
        if data.brand.is_some() {
            bind_count += 1;
            query.push_str(&format!(", brand = ${}", bind_count));
        }
        if data.size.is_some() {
            bind_count += 1;
            query.push_str(&format!(", size = ${}", bind_count));
        }
        if data.location.is_some() {
            bind_count += 1;
            query.push_str(&format!(", location = ${}", bind_count));
        }
        if data.purchase_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", purchase_date = ${}", bind_count));
        }
        if data.notes.is_some() {
            bind_count += 1;
            query.push_str(&format!(", notes = ${}", bind_count));
        }
        if data.photo_url.is_some() {
            bind_count += 1;
            query.push_str(&format!(", photo_url = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 AND user_id = $2 \
             RETURNING id, user_id, ingredient_id, brand, size, location, purchase_date, \
             notes, photo_url, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, InventoryItem>(&query)
            .bind(id)
            .bind(owner_id);

        if let Some(ingredient_id) = data.ingredient_id {
            q = q.bind(ingredient_id);
        }
        if let Some(brand) = data.brand {
            q = q.bind(brand);
        }
        if let Some(size) = data.size {
            q = q.bind(size);
        }
        if let Some(location) = data.location {
            q = q.bind(location);
        }
        if let Some(purchase_date) = data.purchase_date {
            q = q.bind(purchase_date);
        }
        if let Some(notes) = data.notes {
            q = q.bind(notes);
        }
        if let Some(photo_url) = data.photo_url {
            q = q.bind(photo_url);
        }

        q.fetch_optional(pool).await
    }

    /// Deletes an owned item.
    pub async fn delete(pool: &PgPool, id: Uuid, owner_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM inventory_items WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts an owner's inventory items (dashboard stat).
    pub async fn count_for_owner(pool: &PgPool, owner_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM inventory_items WHERE user_id = $1")
                .bind(owner_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_inventory_item_default_changes_nothing() {
        let update = UpdateInventoryItem::default();
        assert!(update.ingredient_id.is_none());
        assert!(update.brand.is_none());
        assert!(update.purchase_date.is_none());
        assert!(update.photo_url.is_none());
    }

    #[test]
    fn test_listing_row_serializes_join_fields() {
        let row = InventoryItemRow {
            id: Uuid::new_v4(),
            ingredient_id: Uuid::new_v4(),
            ingredient_name: "Shea Butter".to_string(),
            brand: Some("Naissance".to_string()),
            size: Some("500 g".to_string()),
            location: Some("pantry".to_string()),
            purchase_date: NaiveDate::from_ymd_opt(2026, 1, 26).unwrap(),
            notes: None,
            photo_url: None,
        };

        let json = serde_json::to_string(&row).unwrap();
        assert!(json.contains("ingredient_name"));
        assert!(json.contains("2026-01-26"));
    }
}
