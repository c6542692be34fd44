use sqlx::PgPool;
use tracing::{info, warn};

use crate::provider::{ProviderRecipe, RecipeProvider, SearchRequest};
use crate::recipes::repo::{link_recipe_nutrient, Ingredient, Nutrient, Recipe};

/// A provider record validated and ready to be written. Field defaults were
/// already applied when the provider response was deserialized; the only
/// thing that can disqualify a record here is a missing external id.
#[derive(Debug, Clone)]
pub struct RecipeDraft {
    pub external_id: i64,
    pub title: String,
    pub source: String,
    pub url: String,
    pub servings: f64,
    pub instructions: String,
    pub diets: Vec<String>,
    pub ingredients: Vec<IngredientDraft>,
    pub nutrients: Vec<NutrientDraft>,
}

#[derive(Debug, Clone)]
pub struct IngredientDraft {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

#[derive(Debug, Clone)]
pub struct NutrientDraft {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

impl RecipeDraft {
    /// Returns `None` when the record has no external id, which makes it
    /// uncacheable. Nutrient entries without a name are dropped for the same
    /// reason: the catalog is keyed by name.
    pub fn from_provider(record: ProviderRecipe) -> Option<Self> {
        let external_id = record.id?;
        let ingredients = record
            .extended_ingredients
            .into_iter()
            .map(|i| IngredientDraft {
                name: i.name,
                quantity: i.amount,
                unit: i.unit,
            })
            .collect();
        let nutrients = record
            .nutrition
            .nutrients
            .into_iter()
            .filter(|n| {
                if n.name.is_empty() {
                    warn!(external_id, "nutrient entry without name dropped");
                    false
                } else {
                    true
                }
            })
            .map(|n| NutrientDraft {
                name: n.name,
                quantity: n.amount,
                unit: n.unit,
            })
            .collect();
        Some(Self {
            external_id,
            title: record.title,
            source: record.source_name,
            url: record.source_url,
            servings: record.servings,
            instructions: record.instructions,
            diets: record.diets,
            ingredients,
            nutrients,
        })
    }
}

/// Search the provider and cache every returned recipe that is not already
/// cached. Returns the cached rows in provider order — one snapshot of the
/// provider's current ranking.
///
/// Per-item failures (missing id, storage error for one recipe) are logged
/// and skipped; they never abort the batch.
pub async fn ingest_search_results(
    db: &PgPool,
    provider: &dyn RecipeProvider,
    req: &SearchRequest,
) -> anyhow::Result<Vec<Recipe>> {
    let records = provider.search(req).await?;
    let mut cached = Vec::with_capacity(records.len());

    for record in records {
        let Some(draft) = RecipeDraft::from_provider(record) else {
            warn!("provider record without id skipped");
            continue;
        };
        match cache_recipe(db, &draft).await {
            Ok(recipe) => cached.push(recipe),
            Err(e) => {
                warn!(external_id = draft.external_id, error = %e, "caching recipe failed, skipping");
            }
        }
    }

    Ok(cached)
}

/// Resolve a draft to its cached row, writing it first if absent.
///
/// Already-cached recipes produce no writes: the provider's current
/// representation is not a resync source, only the first fetch populates
/// local data. A fresh recipe and all its child rows are written in one
/// transaction committed here, so a failed ingest leaves nothing behind.
pub async fn cache_recipe(db: &PgPool, draft: &RecipeDraft) -> anyhow::Result<Recipe> {
    if let Some(existing) = Recipe::find_by_external_id(db, draft.external_id).await? {
        return Ok(existing);
    }

    let mut tx = db.begin().await?;

    let Some(recipe) = Recipe::insert_if_absent(&mut tx, draft).await? else {
        // A concurrent ingest inserted this external id between our read and
        // our insert. Reuse the winner's row; its child rows are theirs to
        // write.
        tx.rollback().await?;
        return Recipe::find_by_external_id(db, draft.external_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("recipe {} vanished after conflict", draft.external_id));
    };

    for ingredient in &draft.ingredients {
        Ingredient::insert(
            &mut tx,
            recipe.id,
            &ingredient.name,
            ingredient.quantity,
            &ingredient.unit,
        )
        .await?;
    }

    for nutrient in &draft.nutrients {
        let catalog_entry = Nutrient::get_or_create(&mut tx, &nutrient.name, &nutrient.unit).await?;
        link_recipe_nutrient(&mut tx, recipe.id, catalog_entry.id, nutrient.quantity).await?;
    }

    tx.commit().await?;
    info!(external_id = draft.external_id, recipe_id = %recipe.id, "recipe cached");
    Ok(recipe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderRecipe;

    fn record(json: serde_json::Value) -> ProviderRecipe {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn draft_maps_provider_fields() {
        let draft = RecipeDraft::from_provider(record(serde_json::json!({
            "id": 42,
            "title": "Soup",
            "sourceName": "A Blog",
            "sourceUrl": "https://example.com/soup",
            "servings": 4.0,
            "instructions": "Simmer.",
            "diets": ["vegan"],
            "extendedIngredients": [
                {"name": "carrot", "amount": 3.0, "unit": "whole"}
            ],
            "nutrition": {"nutrients": [
                {"name": "Sugar", "amount": 40.0, "unit": "g"}
            ]}
        })))
        .expect("record with id");

        assert_eq!(draft.external_id, 42);
        assert_eq!(draft.title, "Soup");
        assert_eq!(draft.servings, 4.0);
        assert_eq!(draft.diets, vec!["vegan".to_string()]);
        assert_eq!(draft.ingredients.len(), 1);
        assert_eq!(draft.ingredients[0].quantity, 3.0);
        assert_eq!(draft.nutrients[0].name, "Sugar");
    }

    #[test]
    fn draft_rejects_record_without_id() {
        let draft = RecipeDraft::from_provider(record(serde_json::json!({
            "title": "Anonymous"
        })));
        assert!(draft.is_none());
    }

    #[test]
    fn draft_applies_sentinel_defaults() {
        let draft = RecipeDraft::from_provider(record(serde_json::json!({"id": 7}))).unwrap();
        assert_eq!(draft.title, "No title");
        assert_eq!(draft.source, "N/A");
        assert_eq!(draft.url, "N/A");
        assert_eq!(draft.servings, 1.0);
        assert_eq!(draft.instructions, "No instructions provided");
        assert!(draft.ingredients.is_empty());
        assert!(draft.nutrients.is_empty());
    }

    #[test]
    fn draft_drops_unnamed_nutrients() {
        let draft = RecipeDraft::from_provider(record(serde_json::json!({
            "id": 7,
            "nutrition": {"nutrients": [
                {"amount": 1.0, "unit": "g"},
                {"name": "Protein", "amount": 12.0, "unit": "g"}
            ]}
        })))
        .unwrap();
        assert_eq!(draft.nutrients.len(), 1);
        assert_eq!(draft.nutrients[0].name, "Protein");
    }
}

#[cfg(test)]
mod db_tests {
    use super::*;
    use sqlx::PgPool;

    fn soup_draft(external_id: i64) -> RecipeDraft {
        RecipeDraft {
            external_id,
            title: "Soup".into(),
            source: "A Blog".into(),
            url: "https://example.com/soup".into(),
            servings: 4.0,
            instructions: "Simmer.".into(),
            diets: vec!["vegan".into()],
            ingredients: vec![IngredientDraft {
                name: "carrot".into(),
                quantity: 3.0,
                unit: "whole".into(),
            }],
            nutrients: vec![NutrientDraft {
                name: "Sugar".into(),
                quantity: 40.0,
                unit: "g".into(),
            }],
        }
    }

    #[sqlx::test]
    async fn caching_same_external_id_twice_returns_original_row(
        pool: PgPool,
    ) -> anyhow::Result<()> {
        let first = cache_recipe(&pool, &soup_draft(42)).await?;
        let second = cache_recipe(&pool, &soup_draft(42)).await?;
        assert_eq!(second.id, first.id);

        let recipes: i64 =
            sqlx::query_scalar(r#"SELECT COUNT(*) FROM recipes WHERE external_id = 42"#)
                .fetch_one(&pool)
                .await?;
        assert_eq!(recipes, 1);

        // Child rows were written by the first fetch only.
        let ingredients: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM ingredients"#)
            .fetch_one(&pool)
            .await?;
        assert_eq!(ingredients, 1);
        let links: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM recipe_nutrients"#)
            .fetch_one(&pool)
            .await?;
        assert_eq!(links, 1);
        Ok(())
    }

    #[sqlx::test]
    async fn second_fetch_does_not_resync_recipe_data(pool: PgPool) -> anyhow::Result<()> {
        let first = cache_recipe(&pool, &soup_draft(42)).await?;

        let mut changed = soup_draft(42);
        changed.title = "Renamed Soup".into();
        changed.servings = 8.0;
        let second = cache_recipe(&pool, &changed).await?;

        assert_eq!(second.id, first.id);
        assert_eq!(second.title, "Soup");
        assert_eq!(second.servings, 4.0);
        Ok(())
    }

    #[sqlx::test]
    async fn get_or_create_nutrient_is_idempotent_on_name(pool: PgPool) -> anyhow::Result<()> {
        let mut tx = pool.begin().await?;
        let first = Nutrient::get_or_create(&mut tx, "Protein", "g").await?;
        tx.commit().await?;

        let mut tx = pool.begin().await?;
        let second = Nutrient::get_or_create(&mut tx, "Protein", "g").await?;
        tx.commit().await?;

        assert_eq!(second.id, first.id);
        let count: i64 =
            sqlx::query_scalar(r#"SELECT COUNT(*) FROM nutrients WHERE name = 'Protein'"#)
                .fetch_one(&pool)
                .await?;
        assert_eq!(count, 1);
        Ok(())
    }

    #[sqlx::test]
    async fn recipes_sharing_a_nutrient_share_one_catalog_row(
        pool: PgPool,
    ) -> anyhow::Result<()> {
        cache_recipe(&pool, &soup_draft(1)).await?;
        cache_recipe(&pool, &soup_draft(2)).await?;

        let nutrients: i64 =
            sqlx::query_scalar(r#"SELECT COUNT(*) FROM nutrients WHERE name = 'Sugar'"#)
                .fetch_one(&pool)
                .await?;
        assert_eq!(nutrients, 1);
        let links: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM recipe_nutrients"#)
            .fetch_one(&pool)
            .await?;
        assert_eq!(links, 2);
        Ok(())
    }
}
