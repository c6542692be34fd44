use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::extractors::AuthUser,
    errors::internal,
    profile::repo::{Allergy, DietRestriction, FoodPreference},
    provider::SearchRequest,
    recipes::{
        dto::{RecipeDetails, SearchQuery},
        ingest::ingest_search_results,
        repo::{nutrient_facts_for_recipe, Ingredient, Recipe},
    },
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/recipes/search", get(search_recipes))
        .route("/recipes/:id", get(get_recipe))
}

/// Build the provider search from the user's stored dietary profile:
/// allergens become intolerances, restrictions become diets, liked foods are
/// required ingredients and disliked ones excluded.
async fn search_request_for_user(
    state: &AppState,
    user_id: Uuid,
    query: &str,
    limit: u32,
) -> anyhow::Result<SearchRequest> {
    let mut req = SearchRequest::new(query, limit);
    req.intolerances = Allergy::list_for_user(&state.db, user_id)
        .await?
        .into_iter()
        .map(|a| a.allergen)
        .collect();
    req.diets = DietRestriction::list_for_user(&state.db, user_id)
        .await?
        .into_iter()
        .map(|r| r.restriction)
        .collect();
    req.include_ingredients = FoodPreference::list_by_preference(&state.db, user_id, "like")
        .await?
        .into_iter()
        .map(|p| p.name)
        .collect();
    req.exclude_ingredients = FoodPreference::list_by_preference(&state.db, user_id, "dislike")
        .await?
        .into_iter()
        .map(|p| p.name)
        .collect();
    Ok(req)
}

#[instrument(skip(state))]
async fn search_recipes(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<Recipe>>, (StatusCode, String)> {
    if params.query.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "query must be non-empty".into()));
    }

    let req = search_request_for_user(&state, user_id, params.query.trim(), params.limit)
        .await
        .map_err(internal)?;

    let recipes = ingest_search_results(&state.db, state.provider.as_ref(), &req)
        .await
        .map_err(internal)?;

    Ok(Json(recipes))
}

#[instrument(skip(state))]
async fn get_recipe(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<RecipeDetails>, (StatusCode, String)> {
    let recipe = Recipe::find_by_id(&state.db, id)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, "recipe not found".into()))?;

    let ingredients = Ingredient::list_for_recipe(&state.db, recipe.id)
        .await
        .map_err(internal)?;
    let nutrients = nutrient_facts_for_recipe(&state.db, recipe.id)
        .await
        .map_err(internal)?;

    Ok(Json(RecipeDetails {
        recipe,
        ingredients,
        nutrients,
    }))
}
