use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// One meal plan per (user, date).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MealPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_date: Date,
    pub created_at: OffsetDateTime,
}

/// A recipe planned for a meal. `serving_size` is the planned number of the
/// recipe's canonical servings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PlannedRecipe {
    pub meal_plan_id: Uuid,
    pub recipe_id: Uuid,
    pub meal_type: String,
    pub serving_size: f64,
}

/// A planned recipe with its title attached, for the weekly view.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PlannedRecipeView {
    pub recipe_id: Uuid,
    pub title: String,
    pub meal_type: String,
    pub serving_size: f64,
}

impl MealPlan {
    pub async fn find_for_user_and_date(
        db: &PgPool,
        user_id: Uuid,
        date: Date,
    ) -> anyhow::Result<Option<MealPlan>> {
        let row = sqlx::query_as::<_, MealPlan>(
            r#"
            SELECT id, user_id, plan_date, created_at
            FROM meal_plans
            WHERE user_id = $1 AND plan_date = $2
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    /// Find-or-insert on the (user, date) uniqueness constraint; a conflict
    /// means another request created the plan first, so re-read it.
    pub async fn get_or_create(db: &PgPool, user_id: Uuid, date: Date) -> anyhow::Result<MealPlan> {
        let inserted = sqlx::query_as::<_, MealPlan>(
            r#"
            INSERT INTO meal_plans (user_id, plan_date)
            VALUES ($1, $2)
            ON CONFLICT (user_id, plan_date) DO NOTHING
            RETURNING id, user_id, plan_date, created_at
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_optional(db)
        .await?;

        match inserted {
            Some(plan) => Ok(plan),
            None => {
                let row = sqlx::query_as::<_, MealPlan>(
                    r#"
                    SELECT id, user_id, plan_date, created_at
                    FROM meal_plans
                    WHERE user_id = $1 AND plan_date = $2
                    "#,
                )
                .bind(user_id)
                .bind(date)
                .fetch_one(db)
                .await?;
                Ok(row)
            }
        }
    }
}

impl PlannedRecipe {
    pub async fn list_for_plan(db: &PgPool, plan_id: Uuid) -> anyhow::Result<Vec<PlannedRecipe>> {
        let rows = sqlx::query_as::<_, PlannedRecipe>(
            r#"
            SELECT meal_plan_id, recipe_id, meal_type, serving_size
            FROM meal_plan_recipes
            WHERE meal_plan_id = $1
            "#,
        )
        .bind(plan_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn list_with_titles(
        db: &PgPool,
        plan_id: Uuid,
    ) -> anyhow::Result<Vec<PlannedRecipeView>> {
        let rows = sqlx::query_as::<_, PlannedRecipeView>(
            r#"
            SELECT mpr.recipe_id, r.title, mpr.meal_type, mpr.serving_size
            FROM meal_plan_recipes mpr
            JOIN recipes r ON r.id = mpr.recipe_id
            WHERE mpr.meal_plan_id = $1
            ORDER BY mpr.meal_type, r.title
            "#,
        )
        .bind(plan_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Planning the same recipe for the same meal again replaces its portion.
    pub async fn upsert(
        db: &PgPool,
        plan_id: Uuid,
        recipe_id: Uuid,
        meal_type: &str,
        serving_size: f64,
    ) -> anyhow::Result<PlannedRecipe> {
        let row = sqlx::query_as::<_, PlannedRecipe>(
            r#"
            INSERT INTO meal_plan_recipes (meal_plan_id, recipe_id, meal_type, serving_size)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (meal_plan_id, recipe_id, meal_type)
            DO UPDATE SET serving_size = EXCLUDED.serving_size
            RETURNING meal_plan_id, recipe_id, meal_type, serving_size
            "#,
        )
        .bind(plan_id)
        .bind(recipe_id)
        .bind(meal_type)
        .bind(serving_size)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn delete(
        db: &PgPool,
        plan_id: Uuid,
        recipe_id: Uuid,
        meal_type: &str,
    ) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM meal_plan_recipes
            WHERE meal_plan_id = $1 AND recipe_id = $2 AND meal_type = $3
            "#,
        )
        .bind(plan_id)
        .bind(recipe_id)
        .bind(meal_type)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
