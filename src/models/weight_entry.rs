//! Weight log model

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

/// A dated body-weight measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub id: i64,
    pub date: String,
    pub weight_kg: f64,
    pub notes: Option<String>,
    pub created_at: String,
}

/// Data for logging a weight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightEntryCreate {
    pub date: String,
    pub weight_kg: f64,
    pub notes: Option<String>,
}

impl WeightEntry {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            date: row.get("date")?,
            weight_kg: row.get("weight_kg")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
        })
    }

    pub fn create(conn: &Connection, data: &WeightEntryCreate) -> DbResult<Self> {
        conn.execute(
            "INSERT INTO weight_entries (date, weight_kg, notes) VALUES (?1, ?2, ?3)",
            params![data.date, data.weight_kg, data.notes],
        )?;

        let id = conn.last_insert_rowid();
        let mut stmt = conn.prepare("SELECT * FROM weight_entries WHERE id = ?1")?;
        match stmt.query_row([id], Self::from_row) {
            Ok(entry) => Ok(entry),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                Err(DbError::NotFound(format!("Weight entry {}", id)))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// The most recent `limit` entries, returned oldest first
    pub fn list_recent(conn: &Connection, limit: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM weight_entries ORDER BY date DESC, id DESC LIMIT ?1",
        )?;

        let mut entries = stmt
            .query_map([limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        entries.reverse();

        Ok(entries)
    }

    /// Entries with `start <= date <= end`, oldest first
    pub fn list_between(conn: &Connection, start: &str, end: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM weight_entries WHERE date BETWEEN ?1 AND ?2 ORDER BY date, id",
        )?;

        let entries = stmt
            .query_map(params![start, end], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    pub fn latest(conn: &Connection) -> DbResult<Option<Self>> {
        Ok(Self::list_recent(conn, 1)?.pop())
    }
}

/// Average change in kg per week between the first and last entry.
///
/// Expects entries oldest first. None with fewer than two entries, when the
/// dates don't parse, or when first and last fall on the same day.
pub fn weight_trend_kg_per_week(entries: &[WeightEntry]) -> Option<f64> {
    let (first, last) = match entries {
        [first, .., last] => (first, last),
        _ => return None,
    };

    let start = NaiveDate::parse_from_str(&first.date, "%Y-%m-%d").ok()?;
    let end = NaiveDate::parse_from_str(&last.date, "%Y-%m-%d").ok()?;
    let days = (end - start).num_days();
    if days == 0 {
        return None;
    }

    Some((last.weight_kg - first.weight_kg) / days as f64 * 7.0)
}
