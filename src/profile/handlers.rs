use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::extractors::AuthUser,
    errors::internal,
    profile::{
        dto::{AddAllergyRequest, AddPreferenceRequest, AddRestrictionRequest},
        repo::{Allergy, DietRestriction, FoodPreference},
    },
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/profile/allergies", get(list_allergies).post(add_allergy))
        .route("/profile/allergies/:id", delete(remove_allergy))
        .route(
            "/profile/restrictions",
            get(list_restrictions).post(add_restriction),
        )
        .route("/profile/restrictions/:id", delete(remove_restriction))
        .route(
            "/profile/preferences",
            get(list_preferences).post(add_preference),
        )
        .route("/profile/preferences/:id", delete(remove_preference))
}

#[instrument(skip(state))]
async fn list_allergies(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Allergy>>, (StatusCode, String)> {
    let rows = Allergy::list_for_user(&state.db, user_id)
        .await
        .map_err(internal)?;
    Ok(Json(rows))
}

#[instrument(skip(state, body))]
async fn add_allergy(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<AddAllergyRequest>,
) -> Result<(StatusCode, Json<Allergy>), (StatusCode, String)> {
    let allergen = body.allergen.trim();
    if allergen.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "allergen must be non-empty".into()));
    }
    let row = Allergy::create(&state.db, user_id, allergen)
        .await
        .map_err(internal)?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[instrument(skip(state))]
async fn remove_allergy(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    let removed = Allergy::delete(&state.db, user_id, id)
        .await
        .map_err(internal)?;
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "allergy not found".into()))
    }
}

#[instrument(skip(state))]
async fn list_restrictions(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<DietRestriction>>, (StatusCode, String)> {
    let rows = DietRestriction::list_for_user(&state.db, user_id)
        .await
        .map_err(internal)?;
    Ok(Json(rows))
}

#[instrument(skip(state, body))]
async fn add_restriction(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<AddRestrictionRequest>,
) -> Result<(StatusCode, Json<DietRestriction>), (StatusCode, String)> {
    let restriction = body.restriction.trim();
    if restriction.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "restriction must be non-empty".into(),
        ));
    }
    let row = DietRestriction::create(&state.db, user_id, restriction)
        .await
        .map_err(internal)?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[instrument(skip(state))]
async fn remove_restriction(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    let removed = DietRestriction::delete(&state.db, user_id, id)
        .await
        .map_err(internal)?;
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "restriction not found".into()))
    }
}

#[instrument(skip(state))]
async fn list_preferences(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<FoodPreference>>, (StatusCode, String)> {
    let rows = FoodPreference::list_for_user(&state.db, user_id)
        .await
        .map_err(internal)?;
    Ok(Json(rows))
}

#[instrument(skip(state, body))]
async fn add_preference(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<AddPreferenceRequest>,
) -> Result<(StatusCode, Json<FoodPreference>), (StatusCode, String)> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "name must be non-empty".into()));
    }
    if body.preference != "like" && body.preference != "dislike" {
        return Err((
            StatusCode::BAD_REQUEST,
            "preference must be like or dislike".into(),
        ));
    }
    let row = FoodPreference::create(&state.db, user_id, name, &body.preference)
        .await
        .map_err(internal)?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[instrument(skip(state))]
async fn remove_preference(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    let removed = FoodPreference::delete(&state.db, user_id, id)
        .await
        .map_err(internal)?;
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "preference not found".into()))
    }
}
