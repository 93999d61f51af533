//! Ingredient definitions (template data).
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE ingredients (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
//!     name VARCHAR(255) NOT NULL,
//!     category VARCHAR(100),
//!     description TEXT,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```
//!
//! Inventory items and recipe lines reference an ingredient without a
//! cascade, so deleting one that is still referenced fails with a
//! foreign-key violation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// An ingredient definition, e.g. "Shea Butter" in category "butters".
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Ingredient {
    pub id: Uuid,

    /// Owner
    pub user_id: Uuid,

    pub name: String,

    pub category: Option<String>,

    pub description: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Input for creating an ingredient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateIngredient {
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
}

/// Input for updating an ingredient; only provided fields change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateIngredient {
    pub name: Option<String>,
    pub category: Option<Option<String>>,
    pub description: Option<Option<String>>,
}

impl Ingredient {
    pub async fn create(
        pool: &PgPool,
        owner_id: Uuid,
        data: CreateIngredient,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Ingredient>(
            r#"
            INSERT INTO ingredients (user_id, name, category, description)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, name, category, description, created_at, updated_at
            "#,
        )
        .bind(owner_id)
        .bind(data.name)
        .bind(data.category)
        .bind(data.description)
        .fetch_one(pool)
        .await
    }

    /// Finds an ingredient owned by `owner_id`.
    ///
    /// A record owned by someone else comes back as `None`, the same as a
    /// missing one.
    pub async fn find_by_id_and_owner(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Ingredient>(
            r#"
            SELECT id, user_id, name, category, description, created_at, updated_at
            FROM ingredients
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await
    }

    /// Lists an owner's ingredients, ordered by name.
    pub async fn list_for_owner(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Ingredient>(
            r#"
            SELECT id, user_id, name, category, description, created_at, updated_at
            FROM ingredients
            WHERE user_id = $1
            ORDER BY name ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await
    }

    /// Applies the non-`None` fields of `data` to an owned ingredient.
    ///
    /// Returns `None` if the record is absent or owned by someone else.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
        data: UpdateIngredient,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE ingredients SET updated_at = NOW()");
        let mut bind_count = 2;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.category.is_some() {
            bind_count += 1;
            query.push_str(&format!(", category = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 AND user_id = $2 \
             RETURNING id, user_id, name, category, description, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Ingredient>(&query).bind(id).bind(owner_id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(category) = data.category {
            q = q.bind(category);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }

        q.fetch_optional(pool).await
    }

    /// Deletes an owned ingredient. Fails with a foreign-key violation if
    /// inventory items or recipe lines still reference it.
    pub async fn delete(pool: &PgPool, id: Uuid, owner_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM ingredients WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts an owner's ingredients (dashboard stat).
    pub async fn count_for_owner(pool: &PgPool, owner_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM ingredients WHERE user_id = $1")
                .bind(owner_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }
}
