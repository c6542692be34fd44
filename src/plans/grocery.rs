//! Grocery list derivation: what to buy for a span of planned days.

use std::collections::HashMap;

use serde::Serialize;
use sqlx::PgPool;
use time::Date;
use tracing::warn;
use uuid::Uuid;

use crate::plans::repo::{MealPlan, PlannedRecipe};
use crate::portions::scaled_quantity;
use crate::recipes::repo::{Ingredient, Recipe};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroceryItem {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

/// Accumulator deduplicating ingredients case-insensitively on
/// (name, unit). The first occurrence fixes the display name and unit;
/// quantities sum across all recipes and days. Output keeps
/// first-insertion order.
#[derive(Debug, Default)]
pub struct GroceryList {
    index: HashMap<(String, String), usize>,
    items: Vec<GroceryItem>,
}

impl GroceryList {
    pub fn add(&mut self, name: &str, unit: &str, quantity: f64) {
        let key = (name.to_lowercase(), unit.to_lowercase());
        match self.index.get(&key) {
            Some(&i) => self.items[i].quantity += quantity,
            None => {
                self.index.insert(key, self.items.len());
                self.items.push(GroceryItem {
                    name: name.to_string(),
                    quantity,
                    unit: unit.to_string(),
                });
            }
        }
    }

    pub fn into_items(self) -> Vec<GroceryItem> {
        self.items
    }
}

/// Derive the shopping list for all of the user's meal plans between `start`
/// and `end` inclusive. Ingredient quantities are rescaled from each recipe's
/// declared serving count to the planned serving size, then summed per
/// (name, unit) pair.
///
/// Days without a plan contribute nothing; a planned recipe that no longer
/// exists is skipped with a warning. No writes.
pub async fn weekly_grocery_list(
    db: &PgPool,
    user_id: Uuid,
    start: Date,
    end: Date,
) -> anyhow::Result<Vec<GroceryItem>> {
    let mut list = GroceryList::default();

    let mut day = start;
    while day <= end {
        if let Some(plan) = MealPlan::find_for_user_and_date(db, user_id, day).await? {
            for planned in PlannedRecipe::list_for_plan(db, plan.id).await? {
                let Some(recipe) = Recipe::find_by_id(db, planned.recipe_id).await? else {
                    warn!(recipe_id = %planned.recipe_id, plan_id = %plan.id, "planned recipe missing, skipped");
                    continue;
                };
                if recipe.servings <= 0.0 {
                    warn!(recipe_id = %recipe.id, servings = recipe.servings, "recipe has no usable serving count, grocery quantities zeroed");
                }

                for ingredient in Ingredient::list_for_recipe(db, recipe.id).await? {
                    let needed = scaled_quantity(
                        ingredient.quantity,
                        recipe.servings,
                        planned.serving_size,
                    );
                    list.add(&ingredient.name, &ingredient.unit, needed);
                }
            }
        }

        match day.next_day() {
            Some(next) => day = next,
            None => break,
        }
    }

    Ok(list.into_items())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_case_insensitively_on_name_and_unit() {
        let mut list = GroceryList::default();
        list.add("Milk", "cups", 1.0);
        list.add("milk", "Cups", 2.0);

        let items = list.into_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Milk");
        assert_eq!(items[0].unit, "cups");
        assert_eq!(items[0].quantity, 3.0);
    }

    #[test]
    fn same_name_different_unit_stays_separate() {
        let mut list = GroceryList::default();
        list.add("Milk", "cups", 1.0);
        list.add("Milk", "ml", 250.0);
        assert_eq!(list.into_items().len(), 2);
    }

    #[test]
    fn keeps_first_insertion_order() {
        let mut list = GroceryList::default();
        list.add("Flour", "g", 200.0);
        list.add("Milk", "cups", 1.0);
        list.add("Eggs", "whole", 2.0);
        list.add("flour", "g", 100.0);

        let names: Vec<_> = list.into_items().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["Flour", "Milk", "Eggs"]);
    }

    #[test]
    fn flour_across_two_recipes_sums_after_rescaling() {
        // Recipe A: 200g flour over 2 servings, planned at 1.0 servings.
        // Recipe B: 50g flour over 1 serving, planned at 2.0 servings.
        let mut list = GroceryList::default();
        list.add("Flour", "g", scaled_quantity(200.0, 2.0, 1.0));
        list.add("Flour", "g", scaled_quantity(50.0, 1.0, 2.0));

        let items = list.into_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 200.0);
    }

    #[test]
    fn zero_serving_recipe_adds_zero_quantity() {
        let mut list = GroceryList::default();
        list.add("Flour", "g", scaled_quantity(200.0, 0.0, 1.0));
        assert_eq!(list.into_items()[0].quantity, 0.0);
    }

    #[test]
    fn empty_list_stays_empty() {
        let list = GroceryList::default();
        assert!(list.into_items().is_empty());
    }
}
