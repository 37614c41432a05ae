//! Dashboard Tool
//!
//! One-call rollup of a day: intake against targets, hydration, streak,
//! training frequency and weight trend, with display strings alongside the
//! raw numbers.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::context::AppContext;
use crate::format::{
    format_calories, format_macro, format_percent, format_streak, format_weight,
    format_weight_trend,
};
use crate::metrics::{
    aggregate, calories_by_meal, daily_progress, macro_percentages, remaining, water_target_ml,
    CaloriesByMeal, DailyProgress, DailyTargets, FoodItem, MacroPercentages, MacroTargets,
    MealFoodItem, NutritionSummary, RemainingMacros,
};
use crate::models::{weight_trend_kg_per_week, FoodLogEntry, WeightEntry, Workout};

use super::{load_session, parse_date, ToolError, ToolResult};

/// Longest streak the dashboard will count back
const MAX_STREAK_DAYS: i64 = 366;
/// Window used for the weight trend
const TREND_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Serialize)]
pub struct DashboardText {
    pub calories_consumed: String,
    pub calories_remaining: String,
    pub calories_target: String,
    pub calories_progress: String,
    pub protein: String,
    pub carbs: String,
    pub fat: String,
    pub water: String,
    pub streak: String,
    pub latest_weight: Option<String>,
    pub weight_trend: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub date: String,
    pub name: String,
    pub goal: &'static str,
    pub targets: DailyTargets,
    pub macro_targets: MacroTargets,
    pub consumed: NutritionSummary,
    pub remaining: RemainingMacros,
    pub progress: DailyProgress,
    pub macro_percentages: MacroPercentages,
    pub calories_by_meal: CaloriesByMeal,
    pub water_target_ml: u32,
    pub streak_days: u32,
    pub workouts_last_7_days: i64,
    pub latest_weight_kg: Option<f64>,
    pub weight_trend_kg_per_week: Option<f64>,
    pub formatted: DashboardText,
}

/// Consecutive days ending at `date` that appear in `dates_desc` (newest first)
pub fn logging_streak(date: NaiveDate, dates_desc: &[String]) -> u32 {
    let mut expected = date;
    let mut streak = 0;

    for raw in dates_desc {
        let Ok(logged) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") else {
            break;
        };
        if logged > expected {
            continue;
        }
        if logged != expected {
            break;
        }
        streak += 1;
        match expected.pred_opt() {
            Some(prev) => expected = prev,
            None => break,
        }
    }

    streak
}

/// Build the dashboard for a date; requires a stored profile
pub fn get_dashboard(ctx: &AppContext, date: &str) -> ToolResult<Dashboard> {
    let day = parse_date(date)?;
    let day_str = day.format("%Y-%m-%d").to_string();
    let week_start = (day - Duration::days(6)).format("%Y-%m-%d").to_string();
    let trend_start = (day - Duration::days(TREND_WINDOW_DAYS - 1))
        .format("%Y-%m-%d")
        .to_string();

    let session = load_session(ctx)?;
    let profile = session.require_profile().map_err(ToolError::Invalid)?;

    let (entries, logged_dates, workouts_last_7_days, weights) = ctx
        .database
        .with_conn(|conn| {
            let entries = FoodLogEntry::list_for_date(conn, &day_str)?;
            let logged_dates = FoodLogEntry::dates_with_entries(conn, &day_str, MAX_STREAK_DAYS)?;
            let workouts = Workout::count_between(conn, &week_start, &day_str)?;
            let weights = WeightEntry::list_between(conn, &trend_start, &day_str)?;
            Ok((entries, logged_dates, workouts, weights))
        })
        .map_err(|e| ToolError::storage("Failed to build dashboard", e))?;

    let items: Vec<FoodItem> = entries.iter().map(FoodLogEntry::food_item).collect();
    let tagged: Vec<MealFoodItem> = entries.iter().map(FoodLogEntry::meal_food_item).collect();

    let targets = profile.daily_targets();
    let consumed = aggregate(&items);
    let left = remaining(&consumed, &targets);
    let progress = daily_progress(&consumed, &targets);
    let water = water_target_ml(profile.weight_kg, profile.activity_level);
    let streak_days = logging_streak(day, &logged_dates);

    let latest_weight_kg = weights.last().map(|w| w.weight_kg);
    let weight_trend = weight_trend_kg_per_week(&weights);

    let formatted = DashboardText {
        calories_consumed: format_calories(consumed.calories),
        calories_remaining: format_calories(left.calories),
        calories_target: format_calories(targets.calories),
        calories_progress: format_percent(f64::from(progress.calories.progress_pct)),
        protein: format!(
            "{} / {}",
            format_macro(consumed.protein, "protein"),
            format_macro(targets.protein, "protein")
        ),
        carbs: format!(
            "{} / {}",
            format_macro(consumed.carbs, "carbs"),
            format_macro(targets.carbs, "carbs")
        ),
        fat: format!(
            "{} / {}",
            format_macro(consumed.fat, "fat"),
            format_macro(targets.fat, "fat")
        ),
        water: format!("{} ml", water),
        streak: format_streak(streak_days),
        latest_weight: latest_weight_kg.map(|kg| format_weight(kg, profile.weight_unit)),
        weight_trend: weight_trend.map(format_weight_trend),
    };

    Ok(Dashboard {
        date: day_str,
        name: profile.name.clone(),
        goal: profile.goal.display_name(),
        targets,
        macro_targets: profile.macro_targets(),
        macro_percentages: macro_percentages(&consumed),
        calories_by_meal: calories_by_meal(&tagged),
        consumed,
        remaining: left,
        progress,
        water_target_ml: water,
        streak_days,
        workouts_last_7_days,
        latest_weight_kg,
        weight_trend_kg_per_week: weight_trend,
        formatted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WorkoutSetCreate;
    use crate::tools::food_log::{log_food, FoodEntryInput};
    use crate::tools::profile::set_profile;
    use crate::tools::test_support::{context, sample_profile};
    use crate::tools::weight::log_weight;
    use crate::tools::workouts::log_workout;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn dates(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn food(calories: f64, protein: f64, carbs: f64, fat: f64) -> FoodEntryInput {
        FoodEntryInput {
            name: "Meal".to_string(),
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
    fn test_streak_counts_back_from_date() {
        let logged = dates(&["2026-01-10", "2026-01-09", "2026-01-08", "2026-01-06"]);
        assert_eq!(logging_streak(day("2026-01-10"), &logged), 3);
        assert_eq!(logging_streak(day("2026-01-06"), &logged), 1);
    }

    #[test]
    fn test_streak_zero_without_entry_today() {
        let logged = dates(&["2026-01-09", "2026-01-08"]);
        assert_eq!(logging_streak(day("2026-01-10"), &logged), 0);
        assert_eq!(logging_streak(day("2026-01-10"), &[]), 0);
    }

    #[test]
    fn test_streak_ignores_later_dates() {
        let logged = dates(&["2026-01-12", "2026-01-10", "2026-01-09"]);
        assert_eq!(logging_streak(day("2026-01-10"), &logged), 2);
    }

    #[test]
    fn test_dashboard_requires_profile() {
        let (_dir, ctx) = context();
        let err = get_dashboard(&ctx, "2026-01-10").unwrap_err();
        assert!(err.is_invalid());
        assert!(err.to_string().contains("onboarding"));
    }

    #[test]
    fn test_dashboard_rollup() {
        let (_dir, ctx) = context();
        set_profile(&ctx, sample_profile()).unwrap();

        log_food(&ctx, "2026-01-09", "dinner", food(600.0, 40.0, 60.0, 20.0)).unwrap();
        log_food(&ctx, "2026-01-10", "breakfast", food(300.0, 10.0, 50.0, 5.0)).unwrap();
        log_food(&ctx, "2026-01-10", "lunch", food(200.0, 20.0, 0.0, 10.0)).unwrap();

        log_weight(&ctx, "2026-01-03", 70.5, None).unwrap();
        log_weight(&ctx, "2026-01-10", 70.0, None).unwrap();

        let sets = vec![WorkoutSetCreate {
            exercise: "Squat".to_string(),
            weight_kg: 100.0,
            reps: 5,
            rpe: None,
        }];
        log_workout(&ctx, "2026-01-04", "Legs", 45, None, sets.clone()).unwrap();
        log_workout(&ctx, "2026-01-02", "Legs", 45, None, sets).unwrap();

        let dashboard = get_dashboard(&ctx, "2026-01-10").unwrap();
        assert_eq!(dashboard.targets.calories, 2045.0);
        assert_eq!(dashboard.consumed.calories, 500.0);
        assert_eq!(dashboard.remaining.calories, 1545.0);
        assert_eq!(dashboard.progress.calories.progress_pct, 24);
        assert_eq!(dashboard.calories_by_meal.breakfast, 300.0);
        assert_eq!(dashboard.calories_by_meal.dinner, 0.0);
        assert_eq!(dashboard.water_target_ml, 2800);
        assert_eq!(dashboard.streak_days, 2);
        assert_eq!(dashboard.workouts_last_7_days, 1);
        assert_eq!(dashboard.latest_weight_kg, Some(70.0));
        assert_eq!(dashboard.formatted.weight_trend.as_deref(), Some("0.5 kg/week loss"));
        assert_eq!(dashboard.formatted.calories_consumed, "500 kcal");
        assert_eq!(dashboard.formatted.streak, "2 day streak");
        assert_eq!(dashboard.formatted.water, "2800 ml");
    }

    #[test]
    fn test_weight_trend_window_is_thirty_days_inclusive() {
        let (_dir, ctx) = context();
        set_profile(&ctx, sample_profile()).unwrap();

        // 2026-01-11 is 30 days before the dashboard date and falls outside
        log_weight(&ctx, "2026-01-11", 90.0, None).unwrap();
        log_weight(&ctx, "2026-01-12", 71.0, None).unwrap();
        log_weight(&ctx, "2026-02-10", 70.0, None).unwrap();

        let dashboard = get_dashboard(&ctx, "2026-02-10").unwrap();
        let trend = dashboard.weight_trend_kg_per_week.unwrap();
        assert!((trend + 7.0 / 29.0).abs() < 1e-9);
        assert_eq!(dashboard.formatted.weight_trend.as_deref(), Some("0.2 kg/week loss"));
    }
}
