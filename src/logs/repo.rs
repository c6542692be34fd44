use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// One eating event: a user, a date and a meal type.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MealLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub log_date: Date,
    pub meal_type: String,
    pub created_at: OffsetDateTime,
}

/// A recipe eaten within a meal log. `serving_size` is the number of the
/// recipe's canonical servings actually eaten, which may differ from the
/// recipe's declared serving count.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LoggedPortion {
    pub meal_log_id: Uuid,
    pub recipe_id: Uuid,
    pub serving_size: f64,
}

impl MealLog {
    pub async fn list_for_user_and_date(
        db: &PgPool,
        user_id: Uuid,
        date: Date,
    ) -> anyhow::Result<Vec<MealLog>> {
        let rows = sqlx::query_as::<_, MealLog>(
            r#"
            SELECT id, user_id, log_date, meal_type, created_at
            FROM meal_logs
            WHERE user_id = $1 AND log_date = $2
            ORDER BY created_at
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn create(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        date: Date,
        meal_type: &str,
    ) -> anyhow::Result<MealLog> {
        let row = sqlx::query_as::<_, MealLog>(
            r#"
            INSERT INTO meal_logs (user_id, log_date, meal_type)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, log_date, meal_type, created_at
            "#,
        )
        .bind(user_id)
        .bind(date)
        .bind(meal_type)
        .fetch_one(&mut **tx)
        .await?;
        Ok(row)
    }
}

impl LoggedPortion {
    pub async fn list_for_log(db: &PgPool, meal_log_id: Uuid) -> anyhow::Result<Vec<LoggedPortion>> {
        let rows = sqlx::query_as::<_, LoggedPortion>(
            r#"
            SELECT meal_log_id, recipe_id, serving_size
            FROM meal_log_recipes
            WHERE meal_log_id = $1
            "#,
        )
        .bind(meal_log_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn insert(
        tx: &mut Transaction<'_, Postgres>,
        meal_log_id: Uuid,
        recipe_id: Uuid,
        serving_size: f64,
    ) -> anyhow::Result<LoggedPortion> {
        let row = sqlx::query_as::<_, LoggedPortion>(
            r#"
            INSERT INTO meal_log_recipes (meal_log_id, recipe_id, serving_size)
            VALUES ($1, $2, $3)
            RETURNING meal_log_id, recipe_id, serving_size
            "#,
        )
        .bind(meal_log_id)
        .bind(recipe_id)
        .bind(serving_size)
        .fetch_one(&mut **tx)
        .await?;
        Ok(row)
    }
}
