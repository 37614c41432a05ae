//! Profile Tools
//!
//! Onboarding, profile edits and target recalculation. Every write recomputes
//! the targets wholesale, applies the calorie bounds from config and stores
//! inputs and targets together.

use serde::Serialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::context::AppContext;
use crate::format::{format_calories, format_height, format_macro, format_weight};
use crate::metrics::{
    bmi, bmi_category, compute_energy_targets, compute_macros, ideal_weight_range,
    validate_positive, water_target_ml, EnergyTargets, MacroTargets, WeightRange,
};
use crate::models::{Profile, ProfileInput, WeightEntry, WeightEntryCreate};

use super::{load_session, normalize_date, ToolError, ToolResult};

// ============================================================================
// Response Structs
// ============================================================================

/// Targets after the calorie-bound policy has been applied
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PlannedTargets {
    pub energy: EnergyTargets,
    pub macros: MacroTargets,
    /// Engine target before clamping
    pub unclamped_calories: i32,
    pub calories_clamped: bool,
}

/// Display strings for the profile
#[derive(Debug, Serialize)]
pub struct ProfileText {
    pub weight: String,
    pub height: String,
    pub target_calories: String,
    pub protein: String,
    pub carbs: String,
    pub fat: String,
}

/// Stored profile plus derived body metrics
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub profile: Profile,
    pub goal_display: &'static str,
    pub activity_display: &'static str,
    pub bmi: f64,
    pub bmi_category: &'static str,
    pub ideal_weight: WeightRange,
    pub water_target_ml: u32,
    pub formatted: ProfileText,
}

/// Response for set_profile / recalculate_targets / update_weight
#[derive(Debug, Serialize)]
pub struct SaveProfileResponse {
    #[serde(flatten)]
    pub profile: ProfileResponse,
    pub calories_clamped: bool,
    pub unclamped_calories: i32,
}

// ============================================================================
// Target Planning
// ============================================================================

/// Run the engine for a profile input and apply the calorie bounds.
///
/// Macros are derived from the clamped calories so they stay consistent with
/// the stored target.
pub fn plan_targets(config: &Config, input: &ProfileInput) -> ToolResult<PlannedTargets> {
    let biometrics = input
        .biometrics()
        .map_err(|e| ToolError::Invalid(format!("Invalid profile: {}", e)))?;

    let mut energy = compute_energy_targets(&biometrics, input.activity_level, input.goal);
    let unclamped_calories = energy.target_calories;
    energy.target_calories = config.clamp_calories(unclamped_calories);
    let calories_clamped = energy.target_calories != unclamped_calories;
    if calories_clamped {
        info!(
            from = unclamped_calories,
            to = energy.target_calories,
            "target calories clamped to configured bounds"
        );
    }

    let macros = compute_macros(energy.target_calories, input.weight_kg, input.goal);
    if macros.is_degenerate() {
        warn!(
            carbs_g = macros.carbs_g,
            "protein and fat exceed the calorie target; carbs are negative"
        );
    }

    Ok(PlannedTargets {
        energy,
        macros,
        unclamped_calories,
        calories_clamped,
    })
}

fn describe(profile: Profile) -> ProfileResponse {
    let body_mass_index = bmi(profile.weight_kg, profile.height_cm);
    let floored = profile.macro_targets().floored();

    ProfileResponse {
        goal_display: profile.goal.display_name(),
        activity_display: profile.activity_level.display_name(),
        bmi: body_mass_index,
        bmi_category: bmi_category(body_mass_index).display_name(),
        ideal_weight: ideal_weight_range(profile.height_cm, profile.sex),
        water_target_ml: water_target_ml(profile.weight_kg, profile.activity_level),
        formatted: ProfileText {
            weight: format_weight(profile.weight_kg, profile.weight_unit),
            height: format_height(profile.height_cm, profile.height_unit),
            target_calories: format_calories(f64::from(profile.target_calories)),
            protein: format_macro(f64::from(floored.protein_g), "protein"),
            carbs: format_macro(f64::from(floored.carbs_g), "carbs"),
            fat: format_macro(f64::from(floored.fat_g), "fat"),
        },
        profile,
    }
}

/// Plan targets and store the profile, together with a weight reading when
/// one is given. Both writes commit or neither does.
fn save(
    ctx: &AppContext,
    input: &ProfileInput,
    weight: Option<&WeightEntryCreate>,
) -> ToolResult<SaveProfileResponse> {
    let planned = plan_targets(&ctx.config, input)?;

    let profile = ctx
        .database
        .with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            if let Some(entry) = weight {
                WeightEntry::create(&tx, entry)?;
            }
            Profile::upsert(&tx, input, &planned.energy, &planned.macros)?;
            Profile::set_onboarding_completed(&tx, true)?;
            let profile = Profile::get(&tx)?;
            tx.commit()?;
            Ok(profile)
        })
        .map_err(|e| ToolError::storage("Failed to save profile", e))?
        .ok_or_else(|| ToolError::Storage("Profile missing after save".to_string()))?;

    info!(
        goal = profile.goal.as_str(),
        target_calories = profile.target_calories,
        "profile saved"
    );

    Ok(SaveProfileResponse {
        profile: describe(profile),
        calories_clamped: planned.calories_clamped,
        unclamped_calories: planned.unclamped_calories,
    })
}

// ============================================================================
// Profile Tool Functions
// ============================================================================

/// Create or replace the profile, completing onboarding
pub fn set_profile(ctx: &AppContext, input: ProfileInput) -> ToolResult<SaveProfileResponse> {
    if input.name.trim().is_empty() {
        return Err(ToolError::Invalid("Profile name must not be empty".to_string()));
    }
    save(ctx, &input, None)
}

pub fn get_profile(ctx: &AppContext) -> ToolResult<Option<ProfileResponse>> {
    Ok(load_session(ctx)?.profile.map(describe))
}

/// Recompute every target from the stored biometrics
pub fn recalculate_targets(ctx: &AppContext) -> ToolResult<SaveProfileResponse> {
    let session = load_session(ctx)?;
    let input = ProfileInput::from(session.require_profile().map_err(ToolError::Invalid)?);
    save(ctx, &input, None)
}

/// Record a new body weight: append it to the weight log and recompute targets
pub fn update_weight(
    ctx: &AppContext,
    date: &str,
    weight_kg: f64,
) -> ToolResult<SaveProfileResponse> {
    let weight_kg = validate_positive("weight_kg", weight_kg)?;
    let date = normalize_date(date)?;

    let session = load_session(ctx)?;
    let mut input = ProfileInput::from(session.require_profile().map_err(ToolError::Invalid)?);
    input.weight_kg = weight_kg;

    let entry = WeightEntryCreate {
        date,
        weight_kg,
        notes: None,
    };
    save(ctx, &input, Some(&entry))
}
