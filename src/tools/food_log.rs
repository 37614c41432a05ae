//! Food Log Tools
//!
//! Logging, listing and deleting food entries, with day totals computed by the
//! aggregator on every read.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::context::AppContext;
use crate::metrics::{
    aggregate, calories_by_meal, macro_percentages, parse_variant, validate_positive,
    CaloriesByMeal, FoodItem, MacroPercentages, MealFoodItem, MealType, NutritionSummary,
};
use crate::models::{FoodLogEntry, FoodLogEntryCreate};

use super::{normalize_date, DeleteResponse, ToolError, ToolResult};

// ============================================================================
// Request / Response Structs
// ============================================================================

/// A food item as described by the caller
#[derive(Debug, Clone, Deserialize)]
pub struct FoodEntryInput {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: Option<f64>,
    pub sugar: Option<f64>,
    pub raw_input: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LogFoodResponse {
    pub entry: FoodLogEntry,
    /// Totals for the entry's date after logging it
    pub day_totals: NutritionSummary,
}

/// Entries for one meal slot
#[derive(Debug, Serialize)]
pub struct MealGroup {
    pub meal_type: MealType,
    pub entries: Vec<FoodLogEntry>,
    pub totals: NutritionSummary,
}

#[derive(Debug, Serialize)]
pub struct FoodLogResponse {
    pub date: String,
    pub meals: Vec<MealGroup>,
    pub totals: NutritionSummary,
    pub calories_by_meal: CaloriesByMeal,
    pub macro_percentages: MacroPercentages,
    pub entry_count: usize,
}

// ============================================================================
// Food Log Tool Functions
// ============================================================================

fn day_totals(entries: &[FoodLogEntry]) -> NutritionSummary {
    let items: Vec<FoodItem> = entries.iter().map(FoodLogEntry::food_item).collect();
    aggregate(&items)
}

/// Log a food item against a date and meal
pub fn log_food(
    ctx: &AppContext,
    date: &str,
    meal_type: &str,
    input: FoodEntryInput,
) -> ToolResult<LogFoodResponse> {
    let date = normalize_date(date)?;
    let meal_type = parse_variant("meal type", meal_type, MealType::from_str).map_err(|e| {
        ToolError::Invalid(format!("{}. Valid meal types: breakfast, lunch, dinner, snack", e))
    })?;

    if input.name.trim().is_empty() {
        return Err(ToolError::Invalid("Food name must not be empty".to_string()));
    }
    let quantity = validate_positive("quantity", input.quantity)?;

    let item = FoodItem {
        calories: input.calories,
        protein_g: input.protein,
        carbs_g: input.carbs,
        fat_g: input.fat,
        fiber_g: input.fiber,
        sugar_g: input.sugar,
    };
    item.validate()?;

    let data = FoodLogEntryCreate {
        date: date.clone(),
        meal_type,
        name: input.name.trim().to_string(),
        quantity,
        unit: input.unit,
        item,
        raw_input: input.raw_input,
    };

    let (entry, entries) = ctx
        .database
        .with_conn(|conn| {
            let entry = FoodLogEntry::create(conn, &data)?;
            let entries = FoodLogEntry::list_for_date(conn, &date)?;
            Ok((entry, entries))
        })
        .map_err(|e| ToolError::storage("Failed to log food", e))?;

    info!(
        date = %entry.date,
        meal = entry.meal_type.as_str(),
        calories = entry.calories,
        "food logged"
    );

    Ok(LogFoodResponse {
        entry,
        day_totals: day_totals(&entries),
    })
}

/// All entries for a date grouped by meal, with totals
pub fn get_food_log(ctx: &AppContext, date: &str) -> ToolResult<FoodLogResponse> {
    let date = normalize_date(date)?;
    let entries = ctx
        .database
        .with_conn(|conn| FoodLogEntry::list_for_date(conn, &date))
        .map_err(|e| ToolError::storage("Failed to get food log", e))?;

    let tagged: Vec<MealFoodItem> = entries.iter().map(FoodLogEntry::meal_food_item).collect();
    let totals = day_totals(&entries);
    let entry_count = entries.len();

    let meals = MealType::ALL
        .iter()
        .map(|&meal_type| {
            let in_meal: Vec<FoodLogEntry> = entries
                .iter()
                .filter(|e| e.meal_type == meal_type)
                .cloned()
                .collect();
            MealGroup {
                meal_type,
                totals: day_totals(&in_meal),
                entries: in_meal,
            }
        })
        .collect();

    Ok(FoodLogResponse {
        date,
        meals,
        calories_by_meal: calories_by_meal(&tagged),
        macro_percentages: macro_percentages(&totals),
        totals,
        entry_count,
    })
}

pub fn delete_food_entry(ctx: &AppContext, id: i64) -> ToolResult<DeleteResponse> {
    let deleted = ctx
        .database
        .with_conn(|conn| FoodLogEntry::delete(conn, id))
        .map_err(|e| ToolError::storage("Failed to delete food entry", e))?;

    if !deleted {
        return Err(ToolError::Invalid(format!("Food log entry not found: {}", id)));
    }

    info!(id, "food entry deleted");
    Ok(DeleteResponse {
        success: true,
        deleted_id: id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::context;

    fn food(name: &str, calories: f64, protein: f64, carbs: f64, fat: f64) -> FoodEntryInput {
        FoodEntryInput {
            name: name.to_string(),
            quantity: 1.0,
            unit: "serving".to_string(),
            calories,
            protein,
            carbs,
            fat,
            fiber: None,
            sugar: None,
            raw_input: None,
        }
    }

    #[test]
    fn test_log_food_returns_day_totals() {
        let (_dir, ctx) = context();
        log_food(&ctx, "2026-01-09", "breakfast", food("Oats", 300.0, 10.0, 50.0, 5.0)).unwrap();
        let response = log_food(&ctx, "2026-01-09", "Lunch", food("Chicken", 200.0, 20.0, 0.0, 10.0)).unwrap();

        assert_eq!(response.entry.meal_type, MealType::Lunch);
        assert_eq!(response.day_totals.calories, 500.0);
        assert_eq!(response.day_totals.protein, 30.0);
        assert_eq!(response.day_totals.carbs, 50.0);
        assert_eq!(response.day_totals.fat, 15.0);
    }

    #[test]
    fn test_get_food_log_groups_by_meal() {
        let (_dir, ctx) = context();
        log_food(&ctx, "2026-01-09", "breakfast", food("Oats", 300.0, 10.0, 50.0, 5.0)).unwrap();
        log_food(&ctx, "2026-01-09", "snack", food("Apple", 95.0, 0.5, 25.0, 0.3)).unwrap();
        log_food(&ctx, "2026-01-10", "dinner", food("Pasta", 700.0, 25.0, 110.0, 15.0)).unwrap();

        let log = get_food_log(&ctx, "2026-01-09").unwrap();
        assert_eq!(log.entry_count, 2);
        assert_eq!(log.meals.len(), 4);
        assert_eq!(log.meals[0].entries.len(), 1);
        assert!(log.meals[2].entries.is_empty());
        assert_eq!(log.calories_by_meal.breakfast, 300.0);
        assert_eq!(log.calories_by_meal.snack, 95.0);
        assert_eq!(log.calories_by_meal.dinner, 0.0);
    }

    #[test]
    fn test_empty_day() {
        let (_dir, ctx) = context();
        let log = get_food_log(&ctx, "2026-01-09").unwrap();
        assert_eq!(log.totals, NutritionSummary::zero());
        assert_eq!(log.macro_percentages, MacroPercentages::default());
    }

    #[test]
    fn test_log_food_validation() {
        let (_dir, ctx) = context();
        assert!(log_food(&ctx, "09/01/2026", "lunch", food("Soup", 100.0, 1.0, 1.0, 1.0)).is_err());
        let err = log_food(&ctx, "2026-01-09", "brunch", food("Soup", 100.0, 1.0, 1.0, 1.0)).unwrap_err();
        assert!(err.is_invalid());
        assert!(err.to_string().contains("Valid meal types"));
        assert!(log_food(&ctx, "2026-01-09", "lunch", food("Soup", -1.0, 1.0, 1.0, 1.0)).is_err());
        assert!(log_food(&ctx, "2026-01-09", "lunch", food(" ", 100.0, 1.0, 1.0, 1.0)).is_err());
    }

    #[test]
    fn test_delete_food_entry() {
        let (_dir, ctx) = context();
        let logged = log_food(&ctx, "2026-01-09", "dinner", food("Steak", 600.0, 50.0, 0.0, 40.0)).unwrap();
        assert!(delete_food_entry(&ctx, logged.entry.id).unwrap().success);
        assert!(delete_food_entry(&ctx, logged.entry.id).unwrap_err().is_invalid());
        assert_eq!(get_food_log(&ctx, "2026-01-09").unwrap().entry_count, 0);
    }
}
