use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::extractors::AuthUser,
    errors::internal,
    logs::{
        dto::{CreateLogRequest, DateQuery, MealLogDetails},
        nutrition::{daily_nutrient_totals, NutrientTotals},
        repo::{LoggedPortion, MealLog},
    },
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/logs", get(list_logs).post(create_log))
        .route("/nutrition/daily", get(daily_nutrition))
}

#[instrument(skip(state, body))]
async fn create_log(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateLogRequest>,
) -> Result<(StatusCode, Json<MealLogDetails>), (StatusCode, String)> {
    if body.meal_type.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "meal_type must be non-empty".into()));
    }
    if body.recipes.iter().any(|r| r.serving_size <= 0.0) {
        return Err((
            StatusCode::BAD_REQUEST,
            "serving_size must be positive".into(),
        ));
    }

    // The log and its portions land together or not at all.
    let mut tx = state.db.begin().await.map_err(internal)?;
    let log = MealLog::create(&mut tx, user_id, body.log_date, body.meal_type.trim())
        .await
        .map_err(internal)?;

    let mut recipes = Vec::with_capacity(body.recipes.len());
    for entry in &body.recipes {
        let portion = LoggedPortion::insert(&mut tx, log.id, entry.recipe_id, entry.serving_size)
            .await
            .map_err(internal)?;
        recipes.push(portion);
    }
    tx.commit().await.map_err(internal)?;

    info!(user_id = %user_id, meal_log_id = %log.id, recipes = recipes.len(), "meal logged");
    Ok((StatusCode::CREATED, Json(MealLogDetails { log, recipes })))
}

#[instrument(skip(state))]
async fn list_logs(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(params): Query<DateQuery>,
) -> Result<Json<Vec<MealLogDetails>>, (StatusCode, String)> {
    let logs = MealLog::list_for_user_and_date(&state.db, user_id, params.date)
        .await
        .map_err(internal)?;

    let mut details = Vec::with_capacity(logs.len());
    for log in logs {
        let recipes = LoggedPortion::list_for_log(&state.db, log.id)
            .await
            .map_err(internal)?;
        details.push(MealLogDetails { log, recipes });
    }
    Ok(Json(details))
}

#[instrument(skip(state))]
async fn daily_nutrition(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(params): Query<DateQuery>,
) -> Result<Json<NutrientTotals>, (StatusCode, String)> {
    let totals = daily_nutrient_totals(&state.db, user_id, params.date)
        .await
        .map_err(internal)?;
    Ok(Json(totals))
}
