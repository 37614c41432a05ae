//! Calculator Tools
//!
//! Stateless engine calls for "what if" questions. Nothing here reads or
//! writes the database, and no calorie bounds are applied.

use serde::Serialize;

use crate::format::{format_calories, format_height, format_weight};
use crate::metrics::{
    bmi, bmi_category, cm_to_feet_inches, compute_energy_targets, compute_macros,
    ideal_weight_range, kg_to_lbs, lbs_to_kg, one_rep_max, parse_variant, round_half_up,
    validate_non_negative, validate_positive, validate_reps, water_target_ml, ActivityLevel,
    BiometricInput, FeetInches, Goal, MacroTargets, Sex, WeightRange,
};
use crate::models::{HeightUnit, WeightUnit};

use super::{ToolError, ToolResult};

// ============================================================================
// Response Structs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct TargetsResponse {
    pub bmr: f64,
    pub tdee: i32,
    pub target_calories: i32,
    pub macros: MacroTargets,
    /// Protein and fat alone exceed the calorie target
    pub macros_degenerate: bool,
    pub goal_display: &'static str,
    pub activity_display: &'static str,
    pub formatted_calories: String,
}

#[derive(Debug, Serialize)]
pub struct BodyMetricsResponse {
    pub bmi: f64,
    pub bmi_category: &'static str,
    pub ideal_weight: WeightRange,
    pub water_target_ml: u32,
    pub height: FeetInches,
    pub formatted_height: String,
    pub formatted_weight_lbs: String,
}

/// Estimated max plus the common rep-range loads derived from it
#[derive(Debug, Serialize)]
pub struct OneRepMaxResponse {
    pub weight: f64,
    pub reps: u32,
    pub estimated_1rm: f64,
    pub percentages: Vec<PercentLoad>,
}

#[derive(Debug, Serialize)]
pub struct PercentLoad {
    pub percent: u32,
    pub weight: f64,
}

#[derive(Debug, Serialize)]
pub struct ConversionResponse {
    pub value: f64,
    pub from: String,
    pub to: String,
    pub result: f64,
    pub formatted: String,
}

// ============================================================================
// Calculator Tool Functions
// ============================================================================

fn parse_sex(sex: &str) -> ToolResult<Sex> {
    Ok(parse_variant("sex", sex, Sex::from_str)?)
}

fn parse_activity(level: &str) -> ToolResult<ActivityLevel> {
    parse_variant("activity level", level, ActivityLevel::from_str).map_err(|e| {
        let valid: Vec<_> = ActivityLevel::ALL.iter().map(|l| l.as_str()).collect();
        ToolError::Invalid(format!("{}. Valid levels: {}", e, valid.join(", ")))
    })
}

fn parse_goal(goal: &str) -> ToolResult<Goal> {
    parse_variant("goal", goal, Goal::from_str).map_err(|e| {
        let valid: Vec<_> = Goal::ALL.iter().map(|g| g.as_str()).collect();
        ToolError::Invalid(format!("{}. Valid goals: {}", e, valid.join(", ")))
    })
}

/// BMR, TDEE, calorie target and macros for arbitrary inputs
pub fn calculate_targets(
    weight_kg: f64,
    height_cm: f64,
    age_years: u32,
    sex: &str,
    activity_level: &str,
    goal: &str,
) -> ToolResult<TargetsResponse> {
    let sex = parse_sex(sex)?;
    let activity_level = parse_activity(activity_level)?;
    let goal = parse_goal(goal)?;
    let input = BiometricInput::new(weight_kg, height_cm, age_years, sex)?;

    let energy = compute_energy_targets(&input, activity_level, goal);
    let macros = compute_macros(energy.target_calories, weight_kg, goal);

    Ok(TargetsResponse {
        bmr: energy.bmr,
        tdee: energy.tdee,
        target_calories: energy.target_calories,
        macros,
        macros_degenerate: macros.is_degenerate(),
        goal_display: goal.display_name(),
        activity_display: activity_level.display_name(),
        formatted_calories: format_calories(f64::from(energy.target_calories)),
    })
}

/// BMI, ideal weight band, hydration target and height conversions
pub fn calculate_body_metrics(
    weight_kg: f64,
    height_cm: f64,
    sex: &str,
    activity_level: &str,
) -> ToolResult<BodyMetricsResponse> {
    let weight_kg = validate_positive("weight_kg", weight_kg)?;
    let height_cm = validate_positive("height_cm", height_cm)?;
    let sex = parse_sex(sex)?;
    let activity_level = parse_activity(activity_level)?;

    let body_mass_index = bmi(weight_kg, height_cm);
    Ok(BodyMetricsResponse {
        bmi: body_mass_index,
        bmi_category: bmi_category(body_mass_index).display_name(),
        ideal_weight: ideal_weight_range(height_cm, sex),
        water_target_ml: water_target_ml(weight_kg, activity_level),
        height: cm_to_feet_inches(height_cm),
        formatted_height: format_height(height_cm, HeightUnit::Ft),
        formatted_weight_lbs: format_weight(weight_kg, WeightUnit::Lbs),
    })
}

/// Epley estimate for a set, with loads at common training percentages
pub fn estimate_one_rep_max(weight: f64, reps: u32) -> ToolResult<OneRepMaxResponse> {
    let weight = validate_non_negative("weight", weight)?;
    let reps = validate_reps(reps)?;

    let estimated_1rm = one_rep_max(weight, reps);
    let percentages = [95, 90, 85, 80, 75, 70, 65, 60]
        .into_iter()
        .map(|percent| PercentLoad {
            percent,
            weight: round_half_up(estimated_1rm * f64::from(percent) / 100.0 * 2.0) / 2.0,
        })
        .collect();

    Ok(OneRepMaxResponse {
        weight,
        reps,
        estimated_1rm,
        percentages,
    })
}

/// Convert between kg/lbs or from cm to feet and inches
pub fn convert_units(value: f64, from: &str, to: &str) -> ToolResult<ConversionResponse> {
    let value = validate_non_negative("value", value)?;
    let from_unit = from.trim().to_lowercase();
    let to_unit = to.trim().to_lowercase();

    let (result, formatted) = match (from_unit.as_str(), to_unit.as_str()) {
        ("kg", "lbs") | ("kg", "lb") => {
            let lbs = kg_to_lbs(value);
            (lbs, format!("{:.1} lbs", lbs))
        }
        ("lbs", "kg") | ("lb", "kg") => {
            let kg = lbs_to_kg(value);
            (kg, format!("{:.1} kg", kg))
        }
        ("cm", "ft") | ("cm", "ft_in") => {
            let height = cm_to_feet_inches(value);
            (f64::from(height.feet * 12 + height.inches), height.to_string())
        }
        _ => {
            return Err(ToolError::Invalid(format!(
                "Unsupported conversion: {} -> {}. Supported: kg -> lbs, lbs -> kg, cm -> ft",
                from, to
            )))
        }
    };

    Ok(ConversionResponse {
        value,
        from: from_unit,
        to: to_unit,
        result,
        formatted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_targets_scenario() {
        let result = calculate_targets(70.0, 175.0, 30, "male", "moderately_active", "fat_loss").unwrap();
        assert_eq!(result.bmr, 1648.75);
        assert_eq!(result.tdee, 2556);
        assert_eq!(result.target_calories, 2045);
        assert!(!result.macros_degenerate);
        assert_eq!(result.formatted_calories, "2045 kcal");
    }

    #[test]
    fn test_calculate_targets_is_unclamped() {
        let result = calculate_targets(40.0, 150.0, 80, "female", "sedentary", "fat_loss").unwrap();
        assert!(result.target_calories < 1200);
    }

    #[test]
    fn test_calculate_targets_rejects_unknown_goal() {
        let err = calculate_targets(70.0, 175.0, 30, "male", "sedentary", "shred")
            .unwrap_err()
            .to_string();
        assert!(err.contains("unknown goal: 'shred'"));
        assert!(err.contains("muscle_gain"));
    }

    #[test]
    fn test_body_metrics() {
        let result = calculate_body_metrics(70.0, 180.0, "male", "very_active").unwrap();
        assert_eq!(result.bmi_category, "Normal weight");
        assert_eq!(result.ideal_weight.min_kg, 67.0);
        assert_eq!(result.ideal_weight.max_kg, 82.0);
        assert_eq!(result.water_target_ml, 3000);
        assert_eq!(result.formatted_height, "5'11\"");
    }

    #[test]
    fn test_one_rep_max() {
        let result = estimate_one_rep_max(100.0, 5).unwrap();
        assert_eq!(result.estimated_1rm, 117.0);
        assert_eq!(result.percentages[0].percent, 95);
        assert_eq!(result.percentages[3].weight, 93.5);
        assert!(estimate_one_rep_max(100.0, 0).is_err());
    }

    #[test]
    fn test_convert_units() {
        assert_eq!(convert_units(150.0, "lbs", "kg").unwrap().result, 68.0);
        assert_eq!(convert_units(70.0, "KG", "lbs").unwrap().formatted, "154.3 lbs");
        assert_eq!(convert_units(182.5, "cm", "ft").unwrap().formatted, "6'0\"");
        assert!(convert_units(1.0, "stone", "kg").is_err());
    }
}
