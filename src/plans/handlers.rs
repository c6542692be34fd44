use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use time::Date;
use tracing::{info, instrument};

use crate::{
    auth::extractors::AuthUser,
    errors::internal,
    plans::{
        dto::{
            DayPlan, PlanRecipeRequest, RangeQuery, RemovePlannedRecipeRequest, WeekQuery,
            MEAL_TYPES,
        },
        grocery::{weekly_grocery_list, GroceryItem},
        repo::{MealPlan, PlannedRecipe},
    },
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/plans/recipes",
            post(plan_recipe).delete(remove_planned_recipe),
        )
        .route("/plans/week", get(week_view))
        .route("/plans/grocery-list", get(grocery_list))
}

#[instrument(skip(state, body))]
async fn plan_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<PlanRecipeRequest>,
) -> Result<(StatusCode, Json<PlannedRecipe>), (StatusCode, String)> {
    if !MEAL_TYPES.contains(&body.meal_type.as_str()) {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("meal_type must be one of {:?}", MEAL_TYPES),
        ));
    }
    if body.serving_size <= 0.0 {
        return Err((
            StatusCode::BAD_REQUEST,
            "serving_size must be positive".into(),
        ));
    }

    let plan = MealPlan::get_or_create(&state.db, user_id, body.plan_date)
        .await
        .map_err(internal)?;

    let planned = PlannedRecipe::upsert(
        &state.db,
        plan.id,
        body.recipe_id,
        &body.meal_type,
        body.serving_size,
    )
    .await
    .map_err(internal)?;

    info!(user_id = %user_id, plan_id = %plan.id, recipe_id = %body.recipe_id, "recipe planned");
    Ok((StatusCode::CREATED, Json(planned)))
}

#[instrument(skip(state, body))]
async fn remove_planned_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<RemovePlannedRecipeRequest>,
) -> Result<StatusCode, (StatusCode, String)> {
    let Some(plan) = MealPlan::find_for_user_and_date(&state.db, user_id, body.plan_date)
        .await
        .map_err(internal)?
    else {
        return Err((StatusCode::NOT_FOUND, "no plan for that date".into()));
    };

    let removed = PlannedRecipe::delete(&state.db, plan.id, body.recipe_id, &body.meal_type)
        .await
        .map_err(internal)?;
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "recipe not in plan".into()))
    }
}

/// The seven days starting at `start`, truncated where the calendar ends.
fn week_dates(start: Date) -> Vec<Date> {
    let mut dates = Vec::with_capacity(7);
    let mut day = start;
    for _ in 0..7 {
        dates.push(day);
        match day.next_day() {
            Some(next) => day = next,
            None => break,
        }
    }
    dates
}

/// Seven days starting at `start`, each with its planned recipes bucketed by
/// meal type. Days without a plan come back as empty buckets.
#[instrument(skip(state))]
async fn week_view(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(params): Query<WeekQuery>,
) -> Result<Json<Vec<DayPlan>>, (StatusCode, String)> {
    let mut week = Vec::with_capacity(7);

    for date in week_dates(params.start) {
        let mut day = DayPlan::empty(date);

        if let Some(plan) = MealPlan::find_for_user_and_date(&state.db, user_id, date)
            .await
            .map_err(internal)?
        {
            for entry in PlannedRecipe::list_with_titles(&state.db, plan.id)
                .await
                .map_err(internal)?
            {
                day.bucket(entry);
            }
        }
        week.push(day);
    }

    Ok(Json(week))
}

#[instrument(skip(state))]
async fn grocery_list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(params): Query<RangeQuery>,
) -> Result<Json<Vec<GroceryItem>>, (StatusCode, String)> {
    if params.end < params.start {
        return Err((
            StatusCode::BAD_REQUEST,
            "end must not be before start".into(),
        ));
    }

    let items = weekly_grocery_list(&state.db, user_id, params.start, params.end)
        .await
        .map_err(internal)?;
    Ok(Json(items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn week_is_seven_consecutive_days() {
        let days = week_dates(date!(2026 - 08 - 24));
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], date!(2026 - 08 - 24));
        assert_eq!(days[6], date!(2026 - 08 - 30));
    }

    #[test]
    fn week_truncates_at_calendar_end() {
        let days = week_dates(Date::MAX);
        assert_eq!(days, vec![Date::MAX]);
    }

    #[test]
    fn week_near_calendar_end_is_partial() {
        let days = week_dates(date!(9999 - 12 - 29));
        assert_eq!(days.len(), 3);
        assert_eq!(days[2], Date::MAX);
    }
}
