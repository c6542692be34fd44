use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use crate::plans::repo::PlannedRecipeView;

pub const MEAL_TYPES: [&str; 4] = ["breakfast", "lunch", "dinner", "snack"];

#[derive(Debug, Deserialize)]
pub struct PlanRecipeRequest {
    pub plan_date: Date,
    pub recipe_id: Uuid,
    pub meal_type: String,
    pub serving_size: f64,
}

#[derive(Debug, Deserialize)]
pub struct RemovePlannedRecipeRequest {
    pub plan_date: Date,
    pub recipe_id: Uuid,
    pub meal_type: String,
}

#[derive(Debug, Deserialize)]
pub struct WeekQuery {
    pub start: Date,
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start: Date,
    pub end: Date,
}

/// One day of the weekly view, recipes bucketed by meal type.
#[derive(Debug, Serialize)]
pub struct DayPlan {
    pub date: Date,
    pub breakfast: Vec<PlannedRecipeView>,
    pub lunch: Vec<PlannedRecipeView>,
    pub dinner: Vec<PlannedRecipeView>,
    pub snack: Vec<PlannedRecipeView>,
}

impl DayPlan {
    pub fn empty(date: Date) -> Self {
        Self {
            date,
            breakfast: Vec::new(),
            lunch: Vec::new(),
            dinner: Vec::new(),
            snack: Vec::new(),
        }
    }

    /// Entries with a meal type outside the known buckets are ignored.
    pub fn bucket(&mut self, entry: PlannedRecipeView) {
        let target = match entry.meal_type.as_str() {
            "breakfast" => &mut self.breakfast,
            "lunch" => &mut self.lunch,
            "dinner" => &mut self.dinner,
            "snack" => &mut self.snack,
            _ => return,
        };
        target.push(entry);
    }
}
