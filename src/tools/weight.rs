//! Weight Tools

use serde::Serialize;
use tracing::info;

use crate::context::AppContext;
use crate::format::{format_weight, format_weight_trend};
use crate::metrics::validate_positive;
use crate::models::{weight_trend_kg_per_week, WeightEntry, WeightEntryCreate, WeightUnit};

use super::{load_session, normalize_date, ToolError, ToolResult};

/// Entries looked at when reporting a trend
pub const DEFAULT_HISTORY_LIMIT: i64 = 30;

#[derive(Debug, Serialize)]
pub struct LogWeightResponse {
    pub entry: WeightEntry,
    pub formatted: String,
}

#[derive(Debug, Serialize)]
pub struct WeightHistoryResponse {
    /// Oldest first
    pub entries: Vec<WeightEntry>,
    pub latest_kg: Option<f64>,
    /// Change from the first to the last entry shown
    pub change_kg: Option<f64>,
    pub trend_kg_per_week: Option<f64>,
    pub formatted_latest: Option<String>,
    pub formatted_trend: Option<String>,
}

/// Display unit from the profile, kg when there is none
fn preferred_unit(ctx: &AppContext) -> ToolResult<WeightUnit> {
    let session = load_session(ctx)?;
    Ok(session.profile.map(|p| p.weight_unit).unwrap_or_default())
}

/// Append a weight reading without touching the profile targets
pub fn log_weight(
    ctx: &AppContext,
    date: &str,
    weight_kg: f64,
    notes: Option<String>,
) -> ToolResult<LogWeightResponse> {
    let weight_kg = validate_positive("weight_kg", weight_kg)?;
    let date = normalize_date(date)?;

    let entry = ctx
        .database
        .with_conn(|conn| {
            WeightEntry::create(
                conn,
                &WeightEntryCreate {
                    date,
                    weight_kg,
                    notes,
                },
            )
        })
        .map_err(|e| ToolError::storage("Failed to log weight", e))?;

    info!(date = %entry.date, weight_kg, "weight logged");

    let unit = preferred_unit(ctx)?;
    Ok(LogWeightResponse {
        formatted: format_weight(entry.weight_kg, unit),
        entry,
    })
}

/// The most recent readings with the weekly trend across them
pub fn weight_history(ctx: &AppContext, limit: Option<i64>) -> ToolResult<WeightHistoryResponse> {
    let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT).max(1);
    let entries = ctx
        .database
        .with_conn(|conn| WeightEntry::list_recent(conn, limit))
        .map_err(|e| ToolError::storage("Failed to get weight history", e))?;

    let unit = preferred_unit(ctx)?;
    let latest_kg = entries.last().map(|e| e.weight_kg);
    let change_kg = match (entries.first(), entries.last()) {
        (Some(first), Some(last)) if entries.len() > 1 => Some(last.weight_kg - first.weight_kg),
        _ => None,
    };
    let trend_kg_per_week = weight_trend_kg_per_week(&entries);

    Ok(WeightHistoryResponse {
        latest_kg,
        change_kg,
        trend_kg_per_week,
        formatted_latest: latest_kg.map(|kg| format_weight(kg, unit)),
        formatted_trend: trend_kg_per_week.map(format_weight_trend),
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::profile::set_profile;
    use crate::tools::test_support::{context, sample_profile};

    #[test]
    fn test_log_weight_uses_profile_unit() {
        let (_dir, ctx) = context();
        let response = log_weight(&ctx, "2026-01-01", 70.0, None).unwrap();
        assert_eq!(response.formatted, "70.0 kg");

        let mut input = sample_profile();
        input.weight_unit = WeightUnit::Lbs;
        set_profile(&ctx, input).unwrap();

        let response = log_weight(&ctx, "2026-01-02", 70.0, Some("after run".to_string())).unwrap();
        assert_eq!(response.formatted, "154.3 lbs");
        assert_eq!(response.entry.notes.as_deref(), Some("after run"));
    }

    #[test]
    fn test_log_weight_rejects_bad_input() {
        let (_dir, ctx) = context();
        assert!(log_weight(&ctx, "2026-01-01", 0.0, None).unwrap_err().is_invalid());
        assert!(log_weight(&ctx, "not a date", 70.0, None).unwrap_err().is_invalid());
    }

    #[test]
    fn test_weight_history_trend() {
        let (_dir, ctx) = context();
        log_weight(&ctx, "2026-01-01", 82.0, None).unwrap();
        log_weight(&ctx, "2026-01-08", 81.6, None).unwrap();
        log_weight(&ctx, "2026-01-15", 81.0, None).unwrap();

        let history = weight_history(&ctx, None).unwrap();
        assert_eq!(history.entries.len(), 3);
        assert_eq!(history.latest_kg, Some(81.0));
        assert_eq!(history.change_kg, Some(-1.0));
        assert_eq!(history.formatted_trend.as_deref(), Some("0.5 kg/week loss"));
    }

    #[test]
    fn test_weight_history_single_entry_has_no_trend() {
        let (_dir, ctx) = context();
        log_weight(&ctx, "2026-01-01", 82.0, None).unwrap();

        let history = weight_history(&ctx, Some(10)).unwrap();
        assert_eq!(history.change_kg, None);
        assert_eq!(history.trend_kg_per_week, None);
        assert_eq!(history.formatted_trend, None);
    }
}
