//! NutriFit Status Tool
//!
//! Provides runtime status information about the NutriFit service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::context::AppContext;
use crate::db::migrations;

/// Usage guide for AI assistants driving the tools
pub const USAGE_INSTRUCTIONS: &str = r#"
# NutriFit Usage Instructions

## Onboarding

Call `set_profile` once with name, age, sex (male/female/other), height_cm,
weight_kg, goal and activity_level. All stored values are metric;
`weight_unit` (kg/lbs) and `height_unit` (cm/ft) only change how numbers are
displayed. Convert imperial input with `convert_units` first.

Goals: fat_loss, muscle_gain, recomposition, endurance, maintenance
Activity levels: sedentary, lightly_active, moderately_active, very_active,
extremely_active

Target calories are kept between the configured minimum and maximum (1200 and
6000 kcal by default). When the formula lands outside that range the response
has `calories_clamped: true` and macros are planned from the clamped value.

## Daily logging

- Dates are ISO format: YYYY-MM-DD. Never guess "today"; ask or use a clock tool.
- `log_food` takes a meal_type (breakfast, lunch, dinner, snack) and the
  nutrients of the portion actually eaten, not per 100 g.
- `log_weight` records a reading only. Use `recalculate_targets` with
  `weight_kg` to also move the profile weight and targets.
- `log_workout` takes a list of sets (exercise, weight_kg, reps, optional rpe).
  Personal records are detected automatically per exercise, ignoring case.

## Reading back

- `get_dashboard` for a date: totals vs targets, remaining, progress, macro
  split, calories by meal, water target, logging streak, workouts in the last
  7 days and the weight trend.
- `get_food_log`, `get_weight_history`, `list_workouts`, `get_workout` for detail.

## Calculators

`calculate_targets`, `calculate_body_metrics`, `estimate_one_rep_max` and
`convert_units` never touch stored data and never clamp.
"#;

/// Runtime status of the NutriFit service
#[derive(Debug, Clone, Serialize)]
pub struct NutriFitStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub schema_version: Option<i32>,
    pub onboarding_completed: bool,

    /// Calorie bounds in effect
    pub min_calorie_target: i32,
    pub max_calorie_target: i32,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self, ctx: &AppContext) -> NutriFitStatus {
        let build_info = BuildInfo::current();

        // Get database size if it exists
        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let schema_version = ctx.database.with_conn(migrations::get_schema_version).ok();
        let onboarding_completed = ctx.session().map(|s| s.onboarded).unwrap_or(false);

        // Get process info
        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        NutriFitStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            schema_version,
            onboarding_completed,
            min_calorie_target: ctx.config.min_calorie_target,
            max_calorie_target: ctx.config.max_calorie_target,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
