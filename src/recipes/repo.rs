use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::recipes::ingest::RecipeDraft;

/// A locally cached recipe. `external_id` is the provider's identifier and
/// the idempotency key: one row per distinct external id, ever.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Recipe {
    pub id: Uuid,
    pub external_id: i64,
    pub title: String,
    pub source: String,
    pub url: String,
    pub servings: f64,
    pub instructions: String,
    pub texture: Option<String>,
    pub diets: serde_json::Value,
    pub created_at: OffsetDateTime,
}

/// Quantity is denominated over the recipe's full serving count.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ingredient {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

/// Shared nutrient catalog entry, deduplicated by exact name.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Nutrient {
    pub id: Uuid,
    pub name: String,
    pub unit: String,
}

/// One nutrient fact of a recipe, flattened over the nutrients join.
/// Quantity covers the recipe's full serving count, not one serving.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NutrientFact {
    pub name: String,
    pub unit: String,
    pub quantity: f64,
}

const RECIPE_COLUMNS: &str =
    "id, external_id, title, source, url, servings, instructions, texture, diets, created_at";

impl Recipe {
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Recipe>> {
        let row = sqlx::query_as::<_, Recipe>(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn find_by_external_id(
        db: &PgPool,
        external_id: i64,
    ) -> anyhow::Result<Option<Recipe>> {
        let row = sqlx::query_as::<_, Recipe>(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes WHERE external_id = $1"
        ))
        .bind(external_id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    /// Insert a recipe unless its external id is already taken. Returns
    /// `None` on conflict, meaning a concurrent ingest (or an earlier one)
    /// already owns this external id and the caller must re-read.
    pub async fn insert_if_absent(
        tx: &mut Transaction<'_, Postgres>,
        draft: &RecipeDraft,
    ) -> anyhow::Result<Option<Recipe>> {
        let row = sqlx::query_as::<_, Recipe>(&format!(
            r#"
            INSERT INTO recipes (external_id, title, source, url, servings, instructions, texture, diets)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (external_id) DO NOTHING
            RETURNING {RECIPE_COLUMNS}
            "#
        ))
        .bind(draft.external_id)
        .bind(&draft.title)
        .bind(&draft.source)
        .bind(&draft.url)
        .bind(draft.servings)
        .bind(&draft.instructions)
        .bind(None::<String>)
        .bind(sqlx::types::Json(&draft.diets))
        .fetch_optional(&mut **tx)
        .await?;
        Ok(row)
    }
}

impl Ingredient {
    pub async fn insert(
        tx: &mut Transaction<'_, Postgres>,
        recipe_id: Uuid,
        name: &str,
        quantity: f64,
        unit: &str,
    ) -> anyhow::Result<Ingredient> {
        let row = sqlx::query_as::<_, Ingredient>(
            r#"
            INSERT INTO ingredients (recipe_id, name, quantity, unit)
            VALUES ($1, $2, $3, $4)
            RETURNING id, recipe_id, name, quantity, unit
            "#,
        )
        .bind(recipe_id)
        .bind(name)
        .bind(quantity)
        .bind(unit)
        .fetch_one(&mut **tx)
        .await?;
        Ok(row)
    }

    pub async fn list_for_recipe(db: &PgPool, recipe_id: Uuid) -> anyhow::Result<Vec<Ingredient>> {
        let rows = sqlx::query_as::<_, Ingredient>(
            r#"
            SELECT id, recipe_id, name, quantity, unit
            FROM ingredients
            WHERE recipe_id = $1
            ORDER BY id
            "#,
        )
        .bind(recipe_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}

impl Nutrient {
    /// Find-or-insert keyed on the unique name. The insert races with
    /// concurrent ingests, so a conflict falls back to re-reading the row the
    /// winner created. Name matching is exact (case-sensitive).
    pub async fn get_or_create(
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
        unit: &str,
    ) -> anyhow::Result<Nutrient> {
        if let Some(existing) = sqlx::query_as::<_, Nutrient>(
            r#"SELECT id, name, unit FROM nutrients WHERE name = $1"#,
        )
        .bind(name)
        .fetch_optional(&mut **tx)
        .await?
        {
            return Ok(existing);
        }

        let inserted = sqlx::query_as::<_, Nutrient>(
            r#"
            INSERT INTO nutrients (name, unit)
            VALUES ($1, $2)
            ON CONFLICT (name) DO NOTHING
            RETURNING id, name, unit
            "#,
        )
        .bind(name)
        .bind(unit)
        .fetch_optional(&mut **tx)
        .await?;

        match inserted {
            Some(nutrient) => Ok(nutrient),
            None => {
                // Lost the insert race; the winner's row is committed by now.
                let row = sqlx::query_as::<_, Nutrient>(
                    r#"SELECT id, name, unit FROM nutrients WHERE name = $1"#,
                )
                .bind(name)
                .fetch_one(&mut **tx)
                .await?;
                Ok(row)
            }
        }
    }
}

pub async fn link_recipe_nutrient(
    tx: &mut Transaction<'_, Postgres>,
    recipe_id: Uuid,
    nutrient_id: Uuid,
    quantity: f64,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO recipe_nutrients (recipe_id, nutrient_id, quantity)
        VALUES ($1, $2, $3)
        ON CONFLICT (recipe_id, nutrient_id) DO NOTHING
        "#,
    )
    .bind(recipe_id)
    .bind(nutrient_id)
    .bind(quantity)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// All nutrient facts of one recipe with catalog name and unit attached.
pub async fn nutrient_facts_for_recipe(
    db: &PgPool,
    recipe_id: Uuid,
) -> anyhow::Result<Vec<NutrientFact>> {
    let rows = sqlx::query_as::<_, NutrientFact>(
        r#"
        SELECT n.name, n.unit, rn.quantity
        FROM recipe_nutrients rn
        JOIN nutrients n ON n.id = rn.nutrient_id
        WHERE rn.recipe_id = $1
        ORDER BY n.name
        "#,
    )
    .bind(recipe_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}
