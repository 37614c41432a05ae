//! Fitness and nutrition metrics engine
//!
//! Pure, stateless computations: energy expenditure, macro planning,
//! nutrition aggregation and body/strength metrics. Nothing in here touches
//! the database or reads ambient state; every input arrives as a parameter.

pub mod aggregate;
pub mod biometrics;
pub mod body;
pub mod energy;
pub mod macros;
pub mod validate;

pub use aggregate::{
    aggregate, calories_by_meal, daily_progress, macro_percentages, progress, remaining,
    CaloriesByMeal, DailyProgress, DailyTargets, FoodItem, MacroPercentages, MacroProgress,
    MealFoodItem, MealType, NutritionSummary, RemainingMacros,
};
pub use biometrics::{ActivityLevel, BiometricInput, Goal, Sex};
pub use body::{
    bmi, bmi_category, cm_to_feet_inches, ideal_weight_range, kg_to_lbs, lbs_to_kg, one_rep_max,
    water_target_ml, BmiCategory, FeetInches, WeightRange,
};
pub use energy::{
    compute_bmr, compute_energy_targets, compute_target_calories, compute_tdee, EnergyTargets,
};
pub use macros::{compute_macros, MacroTargets};
pub use validate::{
    parse_variant, validate_non_negative, validate_positive, validate_reps, MetricsError,
};

/// Round half up (towards positive infinity), so -2.5 becomes -2
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}
