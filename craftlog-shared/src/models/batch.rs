//! Batches: production-run log entries (transactional data).
//!
//! A batch records that a recipe was actually made on a given day. It is an
//! append-only log entry with exactly two transitions:
//!
//! ```text
//! (none) → recorded    (create)
//! recorded → (gone)    (delete)
//! ```
//!
//! There is deliberately no update: correcting a mistake means deleting the
//! entry and logging a new one. That is enforced structurally - no
//! `UpdateBatch` type, no update method, and no `updated_at` column.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE batches (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
//!     recipe_id UUID NOT NULL REFERENCES recipes(id),
//!     made_on DATE NOT NULL,
//!     notes TEXT,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A production-run log entry.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Batch {
    pub id: Uuid,

    /// Owner
    pub user_id: Uuid,

    /// The recipe that was made
    pub recipe_id: Uuid,

    /// The day the batch was made; required
    pub made_on: NaiveDate,

    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
}

/// A batch as listed, with its recipe's title joined in.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BatchRow {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub recipe_title: String,
    pub made_on: NaiveDate,
    pub notes: Option<String>,
}

/// Input for logging a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBatch {
    pub recipe_id: Uuid,
    pub made_on: NaiveDate,
    pub notes: Option<String>,
}

impl Batch {
    /// Logs a batch.
    ///
    /// Callers must have verified the recipe belongs to `owner_id` first;
    /// logging production against someone else's recipe is rejected at the
    /// handler layer with not-found.
    pub async fn create(
        pool: &PgPool,
        owner_id: Uuid,
        data: CreateBatch,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Batch>(
            r#"
            INSERT INTO batches (user_id, recipe_id, made_on, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, recipe_id, made_on, notes, created_at
            "#,
        )
        .bind(owner_id)
        .bind(data.recipe_id)
        .bind(data.made_on)
        .bind(data.notes)
        .fetch_one(pool)
        .await
    }

    /// Finds a batch owned by `owner_id`; cross-owner ids come back `None`.
    pub async fn find_by_id_and_owner(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Batch>(
            r#"
            SELECT id, user_id, recipe_id, made_on, notes, created_at
            FROM batches
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await
    }

    /// Lists an owner's batches, most recent made_on first, with each row's
    /// recipe title resolved in the same query.
    pub async fn list_for_owner(
        pool: &PgPool,
        owner_id: Uuid,
    ) -> Result<Vec<BatchRow>, sqlx::Error> {
        sqlx::query_as::<_, BatchRow>(
            r#"
            SELECT b.id, b.recipe_id, r.title AS recipe_title, b.made_on, b.notes
            FROM batches b
            JOIN recipes r ON r.id = b.recipe_id
            WHERE b.user_id = $1
            ORDER BY b.made_on DESC, b.created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await
    }

    /// The owner's most recent batches (dashboard), same joined shape as
    /// the listing.
    pub async fn list_recent_for_owner(
        pool: &PgPool,
        owner_id: Uuid,
        limit: i64,
    ) -> Result<Vec<BatchRow>, sqlx::Error> {
        sqlx::query_as::<_, BatchRow>(
            r#"
            SELECT b.id, b.recipe_id, r.title AS recipe_title, b.made_on, b.notes
            FROM batches b
            JOIN recipes r ON r.id = b.recipe_id
            WHERE b.user_id = $1
            ORDER BY b.made_on DESC, b.created_at DESC
            LIMIT $2
            "#,
        )
        .bind(owner_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Deletes an owned batch. The only way to change history.
    pub async fn delete(pool: &PgPool, id: Uuid, owner_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM batches WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts an owner's batches (dashboard stat).
    pub async fn count_for_owner(pool: &PgPool, owner_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM batches WHERE user_id = $1")
            .bind(owner_id)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
