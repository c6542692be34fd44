use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Allergy {
    pub id: Uuid,
    pub user_id: Uuid,
    pub allergen: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DietRestriction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub restriction: String,
}

/// A food the user likes or dislikes; `preference` is "like" or "dislike".
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FoodPreference {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub preference: String,
}

impl Allergy {
    pub async fn list_for_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Allergy>> {
        let rows = sqlx::query_as::<_, Allergy>(
            r#"SELECT id, user_id, allergen FROM allergies WHERE user_id = $1 ORDER BY allergen"#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn create(db: &PgPool, user_id: Uuid, allergen: &str) -> anyhow::Result<Allergy> {
        let row = sqlx::query_as::<_, Allergy>(
            r#"
            INSERT INTO allergies (user_id, allergen)
            VALUES ($1, $2)
            RETURNING id, user_id, allergen
            "#,
        )
        .bind(user_id)
        .bind(allergen)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(r#"DELETE FROM allergies WHERE id = $1 AND user_id = $2"#)
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

impl DietRestriction {
    pub async fn list_for_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<DietRestriction>> {
        let rows = sqlx::query_as::<_, DietRestriction>(
            r#"
            SELECT id, user_id, restriction
            FROM diet_restrictions
            WHERE user_id = $1
            ORDER BY restriction
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        restriction: &str,
    ) -> anyhow::Result<DietRestriction> {
        let row = sqlx::query_as::<_, DietRestriction>(
            r#"
            INSERT INTO diet_restrictions (user_id, restriction)
            VALUES ($1, $2)
            RETURNING id, user_id, restriction
            "#,
        )
        .bind(user_id)
        .bind(restriction)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(r#"DELETE FROM diet_restrictions WHERE id = $1 AND user_id = $2"#)
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

impl FoodPreference {
    pub async fn list_for_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<FoodPreference>> {
        let rows = sqlx::query_as::<_, FoodPreference>(
            r#"
            SELECT id, user_id, name, preference
            FROM food_preferences
            WHERE user_id = $1
            ORDER BY name
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn list_by_preference(
        db: &PgPool,
        user_id: Uuid,
        preference: &str,
    ) -> anyhow::Result<Vec<FoodPreference>> {
        let rows = sqlx::query_as::<_, FoodPreference>(
            r#"
            SELECT id, user_id, name, preference
            FROM food_preferences
            WHERE user_id = $1 AND preference = $2
            ORDER BY name
            "#,
        )
        .bind(user_id)
        .bind(preference)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        name: &str,
        preference: &str,
    ) -> anyhow::Result<FoodPreference> {
        let row = sqlx::query_as::<_, FoodPreference>(
            r#"
            INSERT INTO food_preferences (user_id, name, preference)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, name, preference
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(preference)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(r#"DELETE FROM food_preferences WHERE id = $1 AND user_id = $2"#)
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
