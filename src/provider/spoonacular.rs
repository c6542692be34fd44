use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde::Deserialize;
use tracing::debug;

use crate::config::ProviderConfig;
use crate::provider::{ProviderError, ProviderRecipe, RecipeProvider, SearchRequest};

/// Client for the Spoonacular complexSearch endpoint. Requests are bounded by
/// the configured request and connect timeouts; the api key travels in the
/// `x-api-key` header.
pub struct SpoonacularClient {
    http: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<ProviderRecipe>,
}

impl SpoonacularClient {
    pub fn new(config: &ProviderConfig) -> anyhow::Result<Self> {
        let http = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl RecipeProvider for SpoonacularClient {
    async fn search(&self, req: &SearchRequest) -> Result<Vec<ProviderRecipe>, ProviderError> {
        let mut params: Vec<(&str, String)> = vec![
            ("query", req.query.clone()),
            ("number", req.limit.to_string()),
            ("instructionsRequired", req.instructions_required.to_string()),
            ("addRecipeInformation", "true".into()),
            ("addRecipeNutrition", req.nutrition_required.to_string()),
        ];
        if !req.intolerances.is_empty() {
            params.push(("intolerances", req.intolerances.join(", ")));
        }
        if !req.diets.is_empty() {
            params.push(("diet", req.diets.join(", ")));
        }
        if !req.include_ingredients.is_empty() {
            params.push(("includeIngredients", req.include_ingredients.join(", ")));
        }
        if !req.exclude_ingredients.is_empty() {
            params.push(("excludeIngredients", req.exclude_ingredients.join(", ")));
        }

        let response = self
            .http
            .get(format!("{}/recipes/complexSearch", self.base_url))
            .header("x-api-key", &self.api_key)
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status));
        }

        let body: SearchResponse = response.json().await?;
        debug!(query = %req.query, results = body.results.len(), "spoonacular search");
        Ok(body.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_without_results_is_empty() {
        let body: SearchResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(body.results.is_empty());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = SpoonacularClient::new(&ProviderConfig {
            api_key: "k".into(),
            base_url: "https://api.spoonacular.com/".into(),
            timeout_secs: 5,
            connect_timeout_secs: 2,
        })
        .unwrap();
        assert_eq!(client.base_url, "https://api.spoonacular.com");
    }
}
