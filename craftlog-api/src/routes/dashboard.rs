//! Dashboard summary endpoint.
//!
//! `GET /` and `GET /v1/dashboard` - read-only aggregation scoped to the
//! requesting owner: one count per resource type plus the five most recent
//! recipes and batches. No side effects; empty accounts get zeros and empty
//! lists.

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Extension, Json};
use chrono::NaiveDate;
use craftlog_shared::auth::middleware::AuthContext;
use craftlog_shared::models::{
    batch::Batch, ingredient::Ingredient, inventory_item::InventoryItem, recipe::Recipe,
};
use serde::Serialize;
use uuid::Uuid;

const RECENT_LIMIT: i64 = 5;

/// Dashboard summary response
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub stats: DashboardStats,
    pub recent_recipes: Vec<RecentRecipe>,
    pub recent_batches: Vec<RecentBatch>,
}

/// Owner-scoped counts, one per resource type
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub ingredients: i64,
    pub recipes: i64,
    pub inventory_items: i64,
    pub batches: i64,
}

/// A recently created recipe
#[derive(Debug, Serialize)]
pub struct RecentRecipe {
    pub id: Uuid,
    pub title: String,
}

/// A recently made batch, with its recipe title and a short date label
#[derive(Debug, Serialize)]
pub struct RecentBatch {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub recipe_title: String,
    pub made_on: NaiveDate,

    /// Display label, e.g. "Jan 27"
    pub made_on_label: String,
}

/// Formats a date the way the dashboard displays it: "Jan 27".
fn short_date_label(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

/// Builds the owner's summary: counts plus recent activity.
pub async fn summary(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<DashboardResponse>> {
    let owner = auth.user_id;

    let stats = DashboardStats {
        ingredients: Ingredient::count_for_owner(&state.db, owner).await?,
        recipes: Recipe::count_for_owner(&state.db, owner).await?,
        inventory_items: InventoryItem::count_for_owner(&state.db, owner).await?,
        batches: Batch::count_for_owner(&state.db, owner).await?,
    };

    let recent_recipes = Recipe::list_recent_for_owner(&state.db, owner, RECENT_LIMIT)
        .await?
        .into_iter()
        .map(|r| RecentRecipe {
            id: r.id,
            title: r.title,
        })
        .collect();

    let recent_batches = Batch::list_recent_for_owner(&state.db, owner, RECENT_LIMIT)
        .await?
        .into_iter()
        .map(|b| RecentBatch {
            id: b.id,
            recipe_id: b.recipe_id,
            recipe_title: b.recipe_title,
            made_on: b.made_on,
            made_on_label: short_date_label(b.made_on),
        })
        .collect();

    Ok(Json(DashboardResponse {
        stats,
        recent_recipes,
        recent_batches,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_date_label() {
        assert_eq!(
            short_date_label(NaiveDate::from_ymd_opt(2026, 1, 27).unwrap()),
            "Jan 27"
        );
        assert_eq!(
            short_date_label(NaiveDate::from_ymd_opt(2026, 12, 3).unwrap()),
            "Dec 3"
        );
    }

    #[test]
    fn test_empty_dashboard_serializes_zeros() {
        let response = DashboardResponse {
            stats: DashboardStats {
                ingredients: 0,
                recipes: 0,
                inventory_items: 0,
                batches: 0,
            },
            recent_recipes: vec![],
            recent_batches: vec![],
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["stats"]["ingredients"], 0);
        assert_eq!(json["stats"]["batches"], 0);
        assert!(json["recent_batches"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_recent_batch_carries_label() {
        let batch = RecentBatch {
            id: Uuid::new_v4(),
            recipe_id: Uuid::new_v4(),
            recipe_title: "Simple Body Butter".to_string(),
            made_on: NaiveDate::from_ymd_opt(2026, 1, 27).unwrap(),
            made_on_label: short_date_label(NaiveDate::from_ymd_opt(2026, 1, 27).unwrap()),
        };

        let json = serde_json::to_value(&batch).unwrap();
        assert_eq!(json["made_on_label"], "Jan 27");
        assert_eq!(json["recipe_title"], "Simple Body Butter");
    }
}
