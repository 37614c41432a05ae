//! Workout Tools
//!
//! Logging strength workouts set by set. Each set gets an Epley 1RM estimate
//! and is flagged as a personal record when it beats every earlier set of the
//! same exercise.

use serde::Serialize;
use tracing::info;

use crate::context::AppContext;
use crate::format::{format_duration, format_volume};
use crate::metrics::{validate_non_negative, validate_reps};
use crate::models::{Workout, WorkoutCreate, WorkoutDetail, WorkoutSetCreate};

use super::{normalize_date, parse_date, ToolError, ToolResult};

// ============================================================================
// Response Structs
// ============================================================================

/// A personal record set in a logged workout
#[derive(Debug, Serialize)]
pub struct PersonalRecord {
    pub exercise: String,
    pub weight_kg: f64,
    pub reps: u32,
    pub estimated_1rm: f64,
}

/// Response for log_workout / get_workout
#[derive(Debug, Serialize)]
pub struct WorkoutResponse {
    #[serde(flatten)]
    pub detail: WorkoutDetail,
    pub personal_records: Vec<PersonalRecord>,
    pub formatted_duration: String,
    pub formatted_volume: String,
}

/// Summary for listing
#[derive(Debug, Serialize)]
pub struct WorkoutSummary {
    pub id: i64,
    pub date: String,
    pub name: String,
    pub duration_minutes: u32,
    pub total_volume_kg: f64,
    pub formatted_volume: String,
}

/// Response for list_workouts
#[derive(Debug, Serialize)]
pub struct ListWorkoutsResponse {
    pub workouts: Vec<WorkoutSummary>,
    pub total: usize,
    pub total_volume_kg: f64,
    pub total_duration_minutes: u32,
}

impl From<WorkoutDetail> for WorkoutResponse {
    fn from(detail: WorkoutDetail) -> Self {
        let personal_records = detail
            .personal_records()
            .map(|s| PersonalRecord {
                exercise: s.exercise.clone(),
                weight_kg: s.weight_kg,
                reps: s.reps,
                estimated_1rm: s.estimated_1rm,
            })
            .collect();

        Self {
            personal_records,
            formatted_duration: format_duration(detail.workout.duration_minutes),
            formatted_volume: format_volume(detail.workout.total_volume_kg),
            detail,
        }
    }
}

// ============================================================================
// Workout Tool Functions
// ============================================================================

/// Log a workout and its sets
pub fn log_workout(
    ctx: &AppContext,
    date: &str,
    name: &str,
    duration_minutes: u32,
    notes: Option<String>,
    sets: Vec<WorkoutSetCreate>,
) -> ToolResult<WorkoutResponse> {
    let date = normalize_date(date)?;
    if name.trim().is_empty() {
        return Err(ToolError::Invalid("Workout name must not be empty".to_string()));
    }
    if sets.is_empty() {
        return Err(ToolError::Invalid("A workout needs at least one set".to_string()));
    }

    for (idx, set) in sets.iter().enumerate() {
        let in_set = |msg: String| ToolError::Invalid(format!("Set {}: {}", idx + 1, msg));
        if set.exercise.trim().is_empty() {
            return Err(in_set("exercise name must not be empty".to_string()));
        }
        validate_non_negative("weight_kg", set.weight_kg).map_err(|e| in_set(e.to_string()))?;
        validate_reps(set.reps).map_err(|e| in_set(e.to_string()))?;
        if let Some(rpe) = set.rpe {
            if !(1.0..=10.0).contains(&rpe) {
                return Err(in_set(format!("rpe must be between 1 and 10, got {}", rpe)));
            }
        }
    }

    let data = WorkoutCreate {
        date,
        name: name.trim().to_string(),
        duration_minutes,
        notes,
        sets,
    };

    let detail = ctx
        .database
        .with_conn_mut(|conn| Workout::create(conn, &data))
        .map_err(|e| ToolError::storage("Failed to log workout", e))?;

    let response = WorkoutResponse::from(detail);
    info!(
        id = response.detail.workout.id,
        sets = response.detail.sets.len(),
        prs = response.personal_records.len(),
        "workout logged"
    );

    Ok(response)
}

pub fn get_workout(ctx: &AppContext, id: i64) -> ToolResult<Option<WorkoutResponse>> {
    let detail = ctx
        .database
        .with_conn(|conn| Workout::get_detail(conn, id))
        .map_err(|e| ToolError::storage("Failed to get workout", e))?;

    Ok(detail.map(WorkoutResponse::from))
}

/// Workouts between two dates inclusive, newest first
pub fn list_workouts(
    ctx: &AppContext,
    start_date: &str,
    end_date: &str,
) -> ToolResult<ListWorkoutsResponse> {
    let start = parse_date(start_date)?;
    let end = parse_date(end_date)?;
    if start > end {
        return Err(ToolError::Invalid(format!(
            "Start date {} is after end date {}",
            start_date, end_date
        )));
    }

    let workouts = ctx
        .database
        .with_conn(|conn| {
            Workout::list_between(
                conn,
                &start.format("%Y-%m-%d").to_string(),
                &end.format("%Y-%m-%d").to_string(),
            )
        })
        .map_err(|e| ToolError::storage("Failed to list workouts", e))?;

    let summaries: Vec<WorkoutSummary> = workouts
        .into_iter()
        .map(|w| WorkoutSummary {
            formatted_volume: format_volume(w.total_volume_kg),
            id: w.id,
            date: w.date,
            name: w.name,
            duration_minutes: w.duration_minutes,
            total_volume_kg: w.total_volume_kg,
        })
        .collect();

    Ok(ListWorkoutsResponse {
        total: summaries.len(),
        total_volume_kg: summaries.iter().map(|w| w.total_volume_kg).sum(),
        total_duration_minutes: summaries.iter().map(|w| w.duration_minutes).sum(),
        workouts: summaries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::context;

    fn set(exercise: &str, weight_kg: f64, reps: u32) -> WorkoutSetCreate {
        WorkoutSetCreate {
            exercise: exercise.to_string(),
            weight_kg,
            reps,
            rpe: None,
        }
    }

    #[test]
    fn test_log_workout_reports_prs_and_volume() {
        let (_dir, ctx) = context();
        let response = log_workout(
            &ctx,
            "2026-01-05",
            "Push Day",
            90,
            None,
            vec![set("Bench Press", 100.0, 5), set("Bench Press", 80.0, 10), set("Dips", 0.0, 12)],
        )
        .unwrap();

        assert_eq!(response.detail.workout.total_volume_kg, 1300.0);
        assert_eq!(response.formatted_volume, "1.3t");
        assert_eq!(response.formatted_duration, "1h 30m");
        let pr_exercises: Vec<_> = response.personal_records.iter().map(|p| p.exercise.as_str()).collect();
        assert_eq!(pr_exercises, vec!["Bench Press", "Dips"]);
    }

    #[test]
    fn test_pr_against_earlier_workouts() {
        let (_dir, ctx) = context();
        log_workout(&ctx, "2026-01-05", "A", 45, None, vec![set("Squat", 120.0, 5)]).unwrap();

        let lighter = log_workout(&ctx, "2026-01-08", "B", 45, None, vec![set("squat", 110.0, 5)]).unwrap();
        assert!(lighter.personal_records.is_empty());

        let heavier = log_workout(&ctx, "2026-01-12", "C", 45, None, vec![set("SQUAT", 125.0, 5)]).unwrap();
        assert_eq!(heavier.personal_records.len(), 1);
        assert_eq!(heavier.personal_records[0].estimated_1rm, 146.0);
    }

    #[test]
    fn test_log_workout_validation() {
        let (_dir, ctx) = context();
        let err = log_workout(&ctx, "2026-01-05", "A", 30, None, vec![set("Row", 60.0, 0)]).unwrap_err();
        assert!(err.is_invalid());
        assert!(err.to_string().starts_with("Set 1: reps must be at least 1"));
        assert!(log_workout(&ctx, "2026-01-05", "A", 30, None, vec![]).is_err());
        assert!(log_workout(&ctx, "2026-01-05", "A", 30, None, vec![set("Row", -5.0, 5)]).is_err());

        let mut heavy = set("Row", 60.0, 5);
        heavy.rpe = Some(11.0);
        assert!(log_workout(&ctx, "2026-01-05", "A", 30, None, vec![heavy]).is_err());
    }

    #[test]
    fn test_get_and_list_workouts() {
        let (_dir, ctx) = context();
        let logged = log_workout(&ctx, "2026-01-05", "Pull", 50, None, vec![set("Row", 60.0, 8)]).unwrap();
        log_workout(&ctx, "2026-01-07", "Legs", 40, None, vec![set("Squat", 100.0, 5)]).unwrap();

        let fetched = get_workout(&ctx, logged.detail.workout.id).unwrap().unwrap();
        assert_eq!(fetched.detail.sets.len(), 1);
        assert!(get_workout(&ctx, 999).unwrap().is_none());

        let listed = list_workouts(&ctx, "2026-01-01", "2026-01-31").unwrap();
        assert_eq!(listed.total, 2);
        assert_eq!(listed.workouts[0].name, "Legs");
        assert_eq!(listed.total_volume_kg, 980.0);
        assert_eq!(listed.total_duration_minutes, 90);

        assert!(list_workouts(&ctx, "2026-02-01", "2026-01-01").is_err());
    }
}
