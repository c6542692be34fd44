use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use crate::logs::repo::{LoggedPortion, MealLog};

#[derive(Debug, Deserialize)]
pub struct CreateLogRequest {
    pub log_date: Date,
    pub meal_type: String,
    pub recipes: Vec<LoggedRecipeRequest>,
}

#[derive(Debug, Deserialize)]
pub struct LoggedRecipeRequest {
    pub recipe_id: Uuid,
    pub serving_size: f64,
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: Date,
}

#[derive(Debug, Serialize)]
pub struct MealLogDetails {
    #[serde(flatten)]
    pub log: MealLog,
    pub recipes: Vec<LoggedPortion>,
}
