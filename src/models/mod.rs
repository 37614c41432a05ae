//! Data models
//!
//! Rust structs representing database entities.

mod food_log;
mod profile;
mod weight_entry;
mod workout;

use rusqlite::types::Type;
use rusqlite::Row;

use crate::metrics::MetricsError;

pub use food_log::{FoodLogEntry, FoodLogEntryCreate};
pub use profile::{HeightUnit, Profile, ProfileInput, WeightUnit};
pub use weight_entry::{weight_trend_kg_per_week, WeightEntry, WeightEntryCreate};
pub use workout::{Workout, WorkoutCreate, WorkoutDetail, WorkoutSet, WorkoutSetCreate};

/// Read a text column into one of the closed enums; unknown text is a conversion error
pub(crate) fn enum_column<T>(
    row: &Row,
    column: &'static str,
    parse: fn(&str) -> Option<T>,
) -> rusqlite::Result<T> {
    let value: String = row.get(column)?;
    parse(&value).ok_or_else(|| {
        let idx = row.as_ref().column_index(column).unwrap_or_default();
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            Box::new(MetricsError::UnknownVariant {
                kind: column,
                value,
            }),
        )
    })
}
