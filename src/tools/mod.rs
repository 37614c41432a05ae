//! NutriFit Tools module
//!
//! Tool implementations behind the MCP server and the CLI binaries. Every
//! function takes the `AppContext` explicitly and returns a serializable
//! response or a `ToolError` saying whether the caller or the store is at fault.

pub mod calculators;
pub mod dashboard;
pub mod food_log;
pub mod profile;
pub mod status;
pub mod weight;
pub mod workouts;

use std::fmt::Display;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::context::{AppContext, Session};
use crate::metrics::MetricsError;

/// Failure of a tool call
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ToolError {
    /// Input the caller can correct: bad dates, unknown variants, out-of-range
    /// numbers, missing profile, unknown ids
    #[error("{0}")]
    Invalid(String),

    #[error("{0}")]
    Storage(String),
}

pub type ToolResult<T> = Result<T, ToolError>;

impl ToolError {
    pub(crate) fn storage(action: &str, err: impl Display) -> Self {
        ToolError::Storage(format!("{}: {}", action, err))
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, ToolError::Invalid(_))
    }
}

impl From<MetricsError> for ToolError {
    fn from(err: MetricsError) -> Self {
        ToolError::Invalid(err.to_string())
    }
}

/// Snapshot the stored profile for a tool call
pub(crate) fn load_session(ctx: &AppContext) -> ToolResult<Session> {
    ctx.session()
        .map_err(|e| ToolError::storage("Failed to load profile", e))
}

/// Response for delete operations
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted_id: i64,
}

/// Parse an ISO `YYYY-MM-DD` date
pub fn parse_date(date: &str) -> ToolResult<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| ToolError::Invalid(format!("Invalid date: '{}'. Expected YYYY-MM-DD", date)))
}

/// Canonical ISO form of a caller-supplied date
pub(crate) fn normalize_date(date: &str) -> ToolResult<String> {
    Ok(parse_date(date)?.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::config::Config;
    use crate::context::AppContext;
    use crate::metrics::{ActivityLevel, Goal, Sex};
    use crate::models::{HeightUnit, ProfileInput, WeightUnit};

    /// Context over a fresh database file; keep the guard alive for the test
    pub fn context() -> (tempfile::TempDir, AppContext) {
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::open(Config::new(dir.path().join("nutrifit.db"))).unwrap();
        (dir, ctx)
    }

    pub fn sample_profile() -> ProfileInput {
        ProfileInput {
            name: "Sam".to_string(),
            age: 30,
            sex: Sex::Male,
            height_cm: 175.0,
            weight_kg: 70.0,
            weight_unit: WeightUnit::Kg,
            height_unit: HeightUnit::Cm,
            goal: Goal::FatLoss,
            activity_level: ActivityLevel::ModeratelyActive,
        }
    }
}
