//! Recipe definitions (template data) and their ingredient lines.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE recipes (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
//!     title VARCHAR(255) NOT NULL,
//!     description TEXT,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//!
//! CREATE TABLE recipe_ingredients (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     recipe_id UUID NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
//!     ingredient_id UUID NOT NULL REFERENCES ingredients(id),
//!     quantity VARCHAR(100),
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```
//!
//! Ingredient lines are resolved with their ingredient names in a single
//! joined query: one query per page of results, never a lookup per line.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A recipe definition, e.g. "Simple Body Butter".
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Recipe {
    pub id: Uuid,

    /// Owner
    pub user_id: Uuid,

    pub title: String,

    pub description: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Input for creating a recipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRecipe {
    pub title: String,
    pub description: Option<String>,
}

/// Input for updating a recipe; only provided fields change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRecipe {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
}

/// One ingredient line of a recipe, with the ingredient's name resolved.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct IngredientLine {
    /// Line id (recipe_ingredients.id)
    pub id: Uuid,

    pub ingredient_id: Uuid,

    /// Resolved from the ingredients table in the same query
    pub ingredient_name: String,

    /// Free-text amount, e.g. "200 g" or "2 tbsp"
    pub quantity: Option<String>,
}

impl Recipe {
    pub async fn create(
        pool: &PgPool,
        owner_id: Uuid,
        data: CreateRecipe,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Recipe>(
            r#"
            INSERT INTO recipes (user_id, title, description)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, title, description, created_at, updated_at
            "#,
        )
        .bind(owner_id)
        .bind(data.title)
        .bind(data.description)
        .fetch_one(pool)
        .await
    }

    /// Finds a recipe owned by `owner_id`; cross-owner ids come back `None`.
    pub async fn find_by_id_and_owner(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, user_id, title, description, created_at, updated_at
            FROM recipes
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await
    }

    /// Lists an owner's recipes, newest first.
    pub async fn list_for_owner(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, user_id, title, description, created_at, updated_at
            FROM recipes
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await
    }

    /// The owner's most recently created recipes (dashboard).
    pub async fn list_recent_for_owner(
        pool: &PgPool,
        owner_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, user_id, title, description, created_at, updated_at
            FROM recipes
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(owner_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Applies the non-`None` fields of `data` to an owned recipe.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
        data: UpdateRecipe,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE recipes SET updated_at = NOW()");
        let mut bind_count = 2;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 AND user_id = $2 \
             RETURNING id, user_id, title, description, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Recipe>(&query).bind(id).bind(owner_id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }

        q.fetch_optional(pool).await
    }

    /// Deletes an owned recipe and, via CASCADE, its ingredient lines.
    /// Fails with a foreign-key violation while batches reference it.
    pub async fn delete(pool: &PgPool, id: Uuid, owner_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts an owner's recipes (dashboard stat).
    pub async fn count_for_owner(pool: &PgPool, owner_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM recipes WHERE user_id = $1")
            .bind(owner_id)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Resolves a recipe's ingredient lines with ingredient names in one
    /// joined query.
    pub async fn ingredient_lines(
        pool: &PgPool,
        recipe_id: Uuid,
    ) -> Result<Vec<IngredientLine>, sqlx::Error> {
        sqlx::query_as::<_, IngredientLine>(
            r#"
            SELECT ri.id, ri.ingredient_id, i.name AS ingredient_name, ri.quantity
            FROM recipe_ingredients ri
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE ri.recipe_id = $1
            ORDER BY ri.created_at ASC
            "#,
        )
        .bind(recipe_id)
        .fetch_all(pool)
        .await
    }

    /// Adds an ingredient line to a recipe.
    ///
    /// Callers must have already verified that both the recipe and the
    /// ingredient belong to the requesting owner.
    pub async fn add_ingredient_line(
        pool: &PgPool,
        recipe_id: Uuid,
        ingredient_id: Uuid,
        quantity: Option<String>,
    ) -> Result<IngredientLine, sqlx::Error> {
        sqlx::query_as::<_, IngredientLine>(
            r#"
            WITH inserted AS (
                INSERT INTO recipe_ingredients (recipe_id, ingredient_id, quantity)
                VALUES ($1, $2, $3)
                RETURNING id, ingredient_id, quantity
            )
            SELECT inserted.id, inserted.ingredient_id, i.name AS ingredient_name,
                   inserted.quantity
            FROM inserted
            JOIN ingredients i ON i.id = inserted.ingredient_id
            "#,
        )
        .bind(recipe_id)
        .bind(ingredient_id)
        .bind(quantity)
        .fetch_one(pool)
        .await
    }

    /// Removes one ingredient line from a recipe.
    pub async fn remove_ingredient_line(
        pool: &PgPool,
        recipe_id: Uuid,
        line_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM recipe_ingredients WHERE id = $1 AND recipe_id = $2")
                .bind(line_id)
                .bind(recipe_id)
                .execute(pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
