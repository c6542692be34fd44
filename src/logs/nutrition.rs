//! Nutrient aggregation: total intake for one user on one day.

use std::collections::HashMap;

use serde::Serialize;
use sqlx::PgPool;
use time::Date;
use tracing::warn;
use uuid::Uuid;

use crate::logs::repo::{LoggedPortion, MealLog};
use crate::portions::scaled_quantity;
use crate::recipes::repo::{nutrient_facts_for_recipe, Recipe};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutrientAmount {
    pub quantity: f64,
    pub unit: String,
}

/// Total intake keyed by nutrient name.
pub type NutrientTotals = HashMap<String, NutrientAmount>;

/// Fold one contribution into the totals. The unit of a nutrient is fixed by
/// its first contribution; later contributions with a different unit are
/// summed as-is (units for a given nutrient name are the same by convention).
pub(crate) fn add_contribution(totals: &mut NutrientTotals, name: &str, unit: &str, amount: f64) {
    match totals.get_mut(name) {
        Some(entry) => entry.quantity += amount,
        None => {
            totals.insert(
                name.to_string(),
                NutrientAmount {
                    quantity: amount,
                    unit: unit.to_string(),
                },
            );
        }
    }
}

/// Compute the user's total nutrient intake for `date` from their logged
/// meals. Each nutrient fact is rescaled from the recipe's declared serving
/// count to the serving size actually eaten.
///
/// Pure aggregation over the storage snapshot: no writes, and a day without
/// logs (or an unknown user) yields an empty map. A logged recipe that no
/// longer exists is skipped with a warning.
pub async fn daily_nutrient_totals(
    db: &PgPool,
    user_id: Uuid,
    date: Date,
) -> anyhow::Result<NutrientTotals> {
    let mut totals = NutrientTotals::new();

    for log in MealLog::list_for_user_and_date(db, user_id, date).await? {
        for portion in LoggedPortion::list_for_log(db, log.id).await? {
            let Some(recipe) = Recipe::find_by_id(db, portion.recipe_id).await? else {
                warn!(recipe_id = %portion.recipe_id, meal_log_id = %log.id, "logged recipe missing, skipped");
                continue;
            };
            if recipe.servings <= 0.0 {
                warn!(recipe_id = %recipe.id, servings = recipe.servings, "recipe has no usable serving count, intake contributions zeroed");
            }

            for fact in nutrient_facts_for_recipe(db, recipe.id).await? {
                let eaten = scaled_quantity(fact.quantity, recipe.servings, portion.serving_size);
                add_contribution(&mut totals, &fact.name, &fact.unit, eaten);
            }
        }
    }

    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contributions_accumulate_per_name() {
        let mut totals = NutrientTotals::new();
        add_contribution(&mut totals, "Sugar", "g", 20.0);
        add_contribution(&mut totals, "Sugar", "g", 5.0);
        add_contribution(&mut totals, "Calories", "kcal", 300.0);

        assert_eq!(totals.len(), 2);
        assert_eq!(totals["Sugar"].quantity, 25.0);
        assert_eq!(totals["Calories"].quantity, 300.0);
    }

    #[test]
    fn first_contribution_fixes_the_unit() {
        let mut totals = NutrientTotals::new();
        add_contribution(&mut totals, "Sodium", "mg", 100.0);
        add_contribution(&mut totals, "Sodium", "g", 1.0);
        assert_eq!(totals["Sodium"].unit, "mg");
        assert_eq!(totals["Sodium"].quantity, 101.0);
    }

    #[test]
    fn nutrient_names_are_case_sensitive() {
        let mut totals = NutrientTotals::new();
        add_contribution(&mut totals, "Protein", "g", 10.0);
        add_contribution(&mut totals, "protein", "g", 10.0);
        assert_eq!(totals.len(), 2);
    }

    #[test]
    fn scaled_intake_matches_logged_serving_size() {
        // Recipe declares 40g sugar over 4 servings; the user ate 2.
        let mut totals = NutrientTotals::new();
        let eaten = scaled_quantity(40.0, 4.0, 2.0);
        add_contribution(&mut totals, "Sugar", "g", eaten);
        assert_eq!(totals["Sugar"].quantity, 20.0);
    }

    #[test]
    fn zero_serving_recipe_contributes_zero() {
        let mut totals = NutrientTotals::new();
        add_contribution(&mut totals, "Sugar", "g", scaled_quantity(40.0, 0.0, 2.0));
        assert_eq!(totals["Sugar"].quantity, 0.0);
    }
}
