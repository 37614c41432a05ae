//! NutriFit MCP Server Implementation
//!
//! Implements the MCP server with all NutriFit tools.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::context::AppContext;
use crate::metrics::{parse_variant, ActivityLevel, Goal, Sex};
use crate::models::{HeightUnit, ProfileInput, WeightUnit, WorkoutSetCreate};
use crate::tools::food_log::FoodEntryInput;
use crate::tools::status::StatusTracker;
use crate::tools::{calculators, dashboard, food_log, profile, weight, workouts, ToolError};

/// NutriFit MCP Service
#[derive(Clone)]
pub struct NutriFitService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    ctx: AppContext,
    tool_router: ToolRouter<NutriFitService>,
}

impl NutriFitService {
    pub fn new(ctx: AppContext) -> Self {
        let database_path = ctx.database.path().to_path_buf();
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            ctx,
            tool_router: Self::tool_router(),
        }
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn invalid(message: String) -> McpError {
    McpError::invalid_params(message, None)
}

/// Caller mistakes become invalid params, store failures internal errors
fn tool_error(err: ToolError) -> McpError {
    match err {
        ToolError::Invalid(message) => McpError::invalid_params(message, None),
        ToolError::Storage(message) => McpError::internal_error(message, None),
    }
}

// ============================================================================
// Calculator Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CalculateTargetsParams {
    /// Body weight in kilograms
    pub weight_kg: f64,
    /// Height in centimetres
    pub height_cm: f64,
    /// Age in whole years
    pub age: u32,
    /// male, female or other
    pub sex: String,
    /// sedentary, lightly_active, moderately_active, very_active, extremely_active
    pub activity_level: String,
    /// fat_loss, muscle_gain, recomposition, endurance, maintenance
    pub goal: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CalculateBodyMetricsParams {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub sex: String,
    #[serde(default = "default_activity_level")]
    pub activity_level: String,
}

fn default_activity_level() -> String {
    "sedentary".to_string()
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct EstimateOneRepMaxParams {
    /// Weight lifted (any unit; the estimate uses the same unit)
    pub weight: f64,
    /// Reps performed, at least 1
    pub reps: u32,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConvertUnitsParams {
    pub value: f64,
    /// kg, lbs or cm
    pub from: String,
    /// kg, lbs or ft
    pub to: String,
}

// ============================================================================
// Profile Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetProfileParams {
    pub name: String,
    pub age: u32,
    /// male, female or other
    pub sex: String,
    pub height_cm: f64,
    pub weight_kg: f64,
    /// fat_loss, muscle_gain, recomposition, endurance, maintenance
    pub goal: String,
    /// sedentary, lightly_active, moderately_active, very_active, extremely_active
    pub activity_level: String,
    /// Display unit for weight: kg (default) or lbs
    pub weight_unit: Option<String>,
    /// Display unit for height: cm (default) or ft
    pub height_unit: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RecalculateTargetsParams {
    /// New body weight in kg; also appended to the weight log
    pub weight_kg: Option<f64>,
    /// Date of the new weight (YYYY-MM-DD), defaults to today
    pub date: Option<String>,
}

// ============================================================================
// Log Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogFoodParams {
    /// Date (YYYY-MM-DD)
    pub date: String,
    /// breakfast, lunch, dinner or snack
    pub meal_type: String,
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    #[serde(default = "default_unit")]
    pub unit: String,
    /// Calories for the portion eaten
    pub calories: f64,
    /// Grams of protein
    pub protein: f64,
    /// Grams of carbohydrate
    pub carbs: f64,
    /// Grams of fat
    pub fat: f64,
    pub fiber: Option<f64>,
    pub sugar: Option<f64>,
    /// Original free-text description
    pub raw_input: Option<String>,
}

fn default_quantity() -> f64 {
    1.0
}

fn default_unit() -> String {
    "serving".to_string()
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DateParams {
    /// Date (YYYY-MM-DD)
    pub date: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IdParams {
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogWeightParams {
    /// Date (YYYY-MM-DD)
    pub date: String,
    pub weight_kg: f64,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct WeightHistoryParams {
    /// Number of most recent entries (default 30)
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct WorkoutSetParams {
    pub exercise: String,
    pub weight_kg: f64,
    pub reps: u32,
    /// Rate of perceived exertion, 1-10
    pub rpe: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogWorkoutParams {
    /// Date (YYYY-MM-DD)
    pub date: String,
    pub name: String,
    #[serde(default)]
    pub duration_minutes: u32,
    pub notes: Option<String>,
    /// Sets in the order performed
    pub sets: Vec<WorkoutSetParams>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListWorkoutsParams {
    /// Start date inclusive (YYYY-MM-DD)
    pub start_date: String,
    /// End date inclusive (YYYY-MM-DD)
    pub end_date: String,
}

impl SetProfileParams {
    fn into_input(self) -> Result<ProfileInput, McpError> {
        let sex = parse_variant("sex", &self.sex, Sex::from_str).map_err(|e| invalid(e.to_string()))?;
        let goal = parse_variant("goal", &self.goal, Goal::from_str).map_err(|e| invalid(e.to_string()))?;
        let activity_level = parse_variant("activity level", &self.activity_level, ActivityLevel::from_str)
            .map_err(|e| invalid(e.to_string()))?;
        let weight_unit = match self.weight_unit.as_deref() {
            Some(unit) => parse_variant("weight unit", unit, WeightUnit::from_str)
                .map_err(|e| invalid(e.to_string()))?,
            None => WeightUnit::default(),
        };
        let height_unit = match self.height_unit.as_deref() {
            Some(unit) => parse_variant("height unit", unit, HeightUnit::from_str)
                .map_err(|e| invalid(e.to_string()))?,
            None => HeightUnit::default(),
        };

        Ok(ProfileInput {
            name: self.name,
            age: self.age,
            sex,
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
            weight_unit,
            height_unit,
            goal,
            activity_level,
        })
    }
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl NutriFitService {
    // --- Status ---

    #[tool(description = "Get the current status of the NutriFit service including build info, database status, calorie bounds and process information")]
    async fn nutrifit_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status(&self.ctx);
        json_result(&status)
    }

    #[tool(description = "Get instructions for onboarding, logging food, weight and workouts. Call this when starting a session or when unsure how to use the tools.")]
    fn usage_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::USAGE_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(USAGE_INSTRUCTIONS)]))
    }

    // --- Calculators ---

    #[tool(description = "Calculate BMR (Mifflin-St Jeor), TDEE, goal calorie target and macro grams for arbitrary inputs. Does not read or change the stored profile.")]
    fn calculate_targets(&self, Parameters(p): Parameters<CalculateTargetsParams>) -> Result<CallToolResult, McpError> {
        let result = calculators::calculate_targets(p.weight_kg, p.height_cm, p.age, &p.sex, &p.activity_level, &p.goal)
            .map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Calculate BMI and category, ideal weight range, daily water target and height in feet/inches")]
    fn calculate_body_metrics(&self, Parameters(p): Parameters<CalculateBodyMetricsParams>) -> Result<CallToolResult, McpError> {
        let result = calculators::calculate_body_metrics(p.weight_kg, p.height_cm, &p.sex, &p.activity_level)
            .map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Estimate a one-rep max from weight and reps (Epley), with loads at common training percentages")]
    fn estimate_one_rep_max(&self, Parameters(p): Parameters<EstimateOneRepMaxParams>) -> Result<CallToolResult, McpError> {
        let result = calculators::estimate_one_rep_max(p.weight, p.reps).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Convert kg to lbs, lbs to kg, or cm to feet and inches")]
    fn convert_units(&self, Parameters(p): Parameters<ConvertUnitsParams>) -> Result<CallToolResult, McpError> {
        let result = calculators::convert_units(p.value, &p.from, &p.to).map_err(tool_error)?;
        json_result(&result)
    }

    // --- Profile ---

    #[tool(description = "Create or replace the user profile (onboarding). Computes and stores BMR, TDEE, calorie target (kept within the configured bounds) and macro targets.")]
    fn set_profile(&self, Parameters(p): Parameters<SetProfileParams>) -> Result<CallToolResult, McpError> {
        let input = p.into_input()?;
        let result = profile::set_profile(&self.ctx, input).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Get the stored profile with targets, BMI, ideal weight range and water target")]
    fn get_profile(&self) -> Result<CallToolResult, McpError> {
        let result = profile::get_profile(&self.ctx).map_err(tool_error)?;
        match result {
            Some(p) => json_result(&p),
            None => Ok(CallToolResult::success(vec![Content::text(
                r#"{"error": "No profile found. Call set_profile to complete onboarding."}"#,
            )])),
        }
    }

    #[tool(description = "Recalculate all stored targets from the profile. Pass weight_kg to record a new body weight first (also logged to weight history).")]
    fn recalculate_targets(&self, Parameters(p): Parameters<RecalculateTargetsParams>) -> Result<CallToolResult, McpError> {
        let result = match p.weight_kg {
            Some(weight_kg) => {
                let date = p
                    .date
                    .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string());
                profile::update_weight(&self.ctx, &date, weight_kg)
            }
            None => profile::recalculate_targets(&self.ctx),
        }
        .map_err(tool_error)?;
        json_result(&result)
    }

    // --- Food Log ---

    #[tool(description = "Log a food item for a date and meal. Nutrient values are for the portion eaten. Returns the entry and the day's new totals.")]
    fn log_food(&self, Parameters(p): Parameters<LogFoodParams>) -> Result<CallToolResult, McpError> {
        let input = FoodEntryInput {
            name: p.name, quantity: p.quantity, unit: p.unit,
            calories: p.calories, protein: p.protein, carbs: p.carbs, fat: p.fat,
            fiber: p.fiber, sugar: p.sugar, raw_input: p.raw_input,
        };
        let result = food_log::log_food(&self.ctx, &p.date, &p.meal_type, input)
            .map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Get all food entries for a date grouped by meal, with totals, calories by meal and macro split")]
    fn get_food_log(&self, Parameters(p): Parameters<DateParams>) -> Result<CallToolResult, McpError> {
        let result = food_log::get_food_log(&self.ctx, &p.date).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Delete a food log entry by ID")]
    fn delete_food_entry(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        let result = food_log::delete_food_entry(&self.ctx, p.id).map_err(tool_error)?;
        json_result(&result)
    }

    // --- Weight ---

    #[tool(description = "Log a body weight reading in kg. Does not change profile targets; use recalculate_targets with weight_kg for that.")]
    fn log_weight(&self, Parameters(p): Parameters<LogWeightParams>) -> Result<CallToolResult, McpError> {
        let result = weight::log_weight(&self.ctx, &p.date, p.weight_kg, p.notes)
            .map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Get recent weight readings (oldest first) with total change and weekly trend")]
    fn get_weight_history(&self, Parameters(p): Parameters<WeightHistoryParams>) -> Result<CallToolResult, McpError> {
        let result = weight::weight_history(&self.ctx, p.limit).map_err(tool_error)?;
        json_result(&result)
    }

    // --- Workouts ---

    #[tool(description = "Log a strength workout with its sets. Computes estimated 1RM per set, flags personal records and total volume.")]
    fn log_workout(&self, Parameters(p): Parameters<LogWorkoutParams>) -> Result<CallToolResult, McpError> {
        let sets = p
            .sets
            .into_iter()
            .map(|s| WorkoutSetCreate { exercise: s.exercise, weight_kg: s.weight_kg, reps: s.reps, rpe: s.rpe })
            .collect();
        let result = workouts::log_workout(&self.ctx, &p.date, &p.name, p.duration_minutes, p.notes, sets)
            .map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Get a workout by ID with all sets and personal records")]
    fn get_workout(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        let result = workouts::get_workout(&self.ctx, p.id).map_err(tool_error)?;
        match result {
            Some(w) => json_result(&w),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                r#"{{"error": "Workout not found", "id": {}}}"#,
                p.id
            ))])),
        }
    }

    #[tool(description = "List workouts between two dates (inclusive), newest first, with total volume and duration")]
    fn list_workouts(&self, Parameters(p): Parameters<ListWorkoutsParams>) -> Result<CallToolResult, McpError> {
        let result = workouts::list_workouts(&self.ctx, &p.start_date, &p.end_date)
            .map_err(tool_error)?;
        json_result(&result)
    }

    // --- Dashboard ---

    #[tool(description = "Get the dashboard for a date: calories and macros vs targets, remaining, progress, macro split, calories by meal, water target, logging streak, workouts in the last 7 days and weight trend. Requires a profile.")]
    fn get_dashboard(&self, Parameters(p): Parameters<DateParams>) -> Result<CallToolResult, McpError> {
        let result = dashboard::get_dashboard(&self.ctx, &p.date).map_err(tool_error)?;
        json_result(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for NutriFitService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "nutrifit".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("NutriFit".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "NutriFit - Fitness and nutrition tracking with calorie, macro and strength metrics. \
                 IMPORTANT: Call usage_instructions first. Onboard with set_profile before using the dashboard. \
                 Profile: set_profile, get_profile, recalculate_targets. \
                 Food: log_food, get_food_log, delete_food_entry. \
                 Weight: log_weight, get_weight_history. \
                 Workouts: log_workout, get_workout, list_workouts. \
                 Dashboard: get_dashboard. \
                 Calculators (no stored data): calculate_targets, calculate_body_metrics, estimate_one_rep_max, convert_units. \
                 Status: nutrifit_status."
                    .into(),
            ),
        }
    }
}
