use serde::{Deserialize, Serialize};

use crate::recipes::repo::{Ingredient, NutrientFact, Recipe};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    10
}

/// A recipe with its ingredients and nutrient facts attached.
#[derive(Debug, Serialize)]
pub struct RecipeDetails {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub ingredients: Vec<Ingredient>,
    pub nutrients: Vec<NutrientFact>,
}
