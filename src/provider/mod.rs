use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

pub mod spoonacular;

pub use spoonacular::SpoonacularClient;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("provider returned status {0}")]
    Status(reqwest::StatusCode),
}

/// Search parameters forwarded to the recipe provider. Filter lists are
/// optional; empty means "no constraint".
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    pub limit: u32,
    pub instructions_required: bool,
    pub nutrition_required: bool,
    pub intolerances: Vec<String>,
    pub diets: Vec<String>,
    pub include_ingredients: Vec<String>,
    pub exclude_ingredients: Vec<String>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, limit: u32) -> Self {
        Self {
            query: query.into(),
            limit,
            instructions_required: true,
            nutrition_required: true,
            intolerances: Vec::new(),
            diets: Vec::new(),
            include_ingredients: Vec::new(),
            exclude_ingredients: Vec::new(),
        }
    }
}

/// One recipe record as returned by the provider. Optional fields get their
/// sentinel defaults here, at the deserialization boundary, so the ingest
/// logic never has to re-check them. Only `id` stays optional: a record
/// without identity cannot be cached and is skipped upstream.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRecipe {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_na")]
    pub source_name: String,
    #[serde(default = "default_na")]
    pub source_url: String,
    #[serde(default = "default_servings")]
    pub servings: f64,
    #[serde(default = "default_instructions")]
    pub instructions: String,
    #[serde(default)]
    pub diets: Vec<String>,
    #[serde(default)]
    pub extended_ingredients: Vec<ProviderIngredient>,
    #[serde(default)]
    pub nutrition: ProviderNutrition,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderIngredient {
    #[serde(default = "default_na")]
    pub name: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default = "default_unit")]
    pub unit: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderNutrition {
    #[serde(default)]
    pub nutrients: Vec<ProviderNutrient>,
}

/// Nutrient quantities are declared over the recipe's full serving count,
/// not per serving.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderNutrient {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default = "default_unit")]
    pub unit: String,
}

fn default_title() -> String {
    "No title".into()
}

fn default_na() -> String {
    "N/A".into()
}

fn default_unit() -> String {
    "unit".into()
}

fn default_servings() -> f64 {
    1.0
}

fn default_instructions() -> String {
    "No instructions provided".into()
}

#[async_trait]
pub trait RecipeProvider: Send + Sync {
    /// Run one bounded recipe search against the provider.
    async fn search(&self, req: &SearchRequest) -> Result<Vec<ProviderRecipe>, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_record_deserializes() {
        let json = serde_json::json!({
            "id": 716429,
            "title": "Pasta with Garlic",
            "sourceName": "Full Belly Sisters",
            "sourceUrl": "https://example.com/pasta",
            "servings": 2.0,
            "instructions": "Boil pasta.",
            "diets": ["lacto ovo vegetarian"],
            "extendedIngredients": [
                {"name": "pasta", "amount": 200.0, "unit": "g"}
            ],
            "nutrition": {
                "nutrients": [
                    {"name": "Calories", "amount": 584.0, "unit": "kcal"}
                ]
            }
        });
        let recipe: ProviderRecipe = serde_json::from_value(json).unwrap();
        assert_eq!(recipe.id, Some(716429));
        assert_eq!(recipe.servings, 2.0);
        assert_eq!(recipe.extended_ingredients[0].unit, "g");
        assert_eq!(recipe.nutrition.nutrients[0].name, "Calories");
    }

    #[test]
    fn sparse_record_gets_sentinel_defaults() {
        let recipe: ProviderRecipe = serde_json::from_value(serde_json::json!({
            "id": 1
        }))
        .unwrap();
        assert_eq!(recipe.title, "No title");
        assert_eq!(recipe.source_name, "N/A");
        assert_eq!(recipe.source_url, "N/A");
        assert_eq!(recipe.servings, 1.0);
        assert_eq!(recipe.instructions, "No instructions provided");
        assert!(recipe.diets.is_empty());
        assert!(recipe.extended_ingredients.is_empty());
        assert!(recipe.nutrition.nutrients.is_empty());
    }

    #[test]
    fn record_without_id_is_representable() {
        let recipe: ProviderRecipe =
            serde_json::from_value(serde_json::json!({"title": "anonymous"})).unwrap();
        assert_eq!(recipe.id, None);
    }

    #[test]
    fn ingredient_defaults() {
        let ing: ProviderIngredient = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(ing.name, "N/A");
        assert_eq!(ing.amount, 0.0);
        assert_eq!(ing.unit, "unit");
    }
}
