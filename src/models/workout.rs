//! Workout model
//!
//! A workout owns an ordered list of sets. Each set stores its Epley 1RM
//! estimate and whether that estimate was a personal record when it was
//! logged; the workout caches its total training volume.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::metrics::one_rep_max;

/// A training session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    pub id: i64,
    pub date: String,
    pub name: String,
    pub duration_minutes: u32,
    /// Cached: sum of weight * reps over the sets
    pub total_volume_kg: f64,
    pub notes: Option<String>,
    pub created_at: String,
}

/// One set inside a workout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutSet {
    pub id: i64,
    pub workout_id: i64,
    pub set_order: u32,
    pub exercise: String,
    pub weight_kg: f64,
    pub reps: u32,
    pub rpe: Option<f64>,
    pub estimated_1rm: f64,
    pub is_personal_record: bool,
    pub created_at: String,
}

/// Set data as supplied by the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutSetCreate {
    pub exercise: String,
    pub weight_kg: f64,
    pub reps: u32,
    pub rpe: Option<f64>,
}

/// Data for logging a workout with its sets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutCreate {
    pub date: String,
    pub name: String,
    pub duration_minutes: u32,
    pub notes: Option<String>,
    pub sets: Vec<WorkoutSetCreate>,
}

/// Workout plus its sets in order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutDetail {
    #[serde(flatten)]
    pub workout: Workout,
    pub sets: Vec<WorkoutSet>,
}

impl WorkoutDetail {
    pub fn personal_records(&self) -> impl Iterator<Item = &WorkoutSet> {
        self.sets.iter().filter(|s| s.is_personal_record)
    }
}

impl Workout {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            date: row.get("date")?,
            name: row.get("name")?,
            duration_minutes: row.get("duration_minutes")?,
            total_volume_kg: row.get("total_volume_kg")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Insert the workout and all of its sets in one transaction.
    ///
    /// Sets are compared against every earlier set of the same exercise,
    /// including earlier sets of this workout, when deciding PRs.
    pub fn create(conn: &mut Connection, data: &WorkoutCreate) -> DbResult<WorkoutDetail> {
        let tx = conn.transaction()?;

        let total_volume_kg: f64 = data
            .sets
            .iter()
            .map(|s| s.weight_kg * f64::from(s.reps))
            .sum();

        tx.execute(
            r#"
            INSERT INTO workouts (date, name, duration_minutes, total_volume_kg, notes)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                data.date,
                data.name,
                data.duration_minutes,
                total_volume_kg,
                data.notes,
            ],
        )?;
        let workout_id = tx.last_insert_rowid();

        for (idx, set) in data.sets.iter().enumerate() {
            WorkoutSet::create(&tx, workout_id, idx as u32 + 1, set)?;
        }

        tx.commit()?;

        Self::get_detail(conn, workout_id)?
            .ok_or_else(|| DbError::NotFound(format!("Workout {}", workout_id)))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM workouts WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(workout) => Ok(Some(workout)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Workout with its sets
    pub fn get_detail(conn: &Connection, id: i64) -> DbResult<Option<WorkoutDetail>> {
        let workout = match Self::get_by_id(conn, id)? {
            Some(w) => w,
            None => return Ok(None),
        };
        let sets = WorkoutSet::list_for_workout(conn, id)?;
        Ok(Some(WorkoutDetail { workout, sets }))
    }

    /// Workouts with `start <= date <= end`, newest first
    pub fn list_between(conn: &Connection, start: &str, end: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM workouts WHERE date BETWEEN ?1 AND ?2 ORDER BY date DESC, id DESC",
        )?;

        let workouts = stmt
            .query_map(params![start, end], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(workouts)
    }

    pub fn count_between(conn: &Connection, start: &str, end: &str) -> DbResult<i64> {
        let count = conn.query_row(
            "SELECT COUNT(*) FROM workouts WHERE date BETWEEN ?1 AND ?2",
            params![start, end],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

impl WorkoutSet {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            workout_id: row.get("workout_id")?,
            set_order: row.get("set_order")?,
            exercise: row.get("exercise")?,
            weight_kg: row.get("weight_kg")?,
            reps: row.get("reps")?,
            rpe: row.get("rpe")?,
            estimated_1rm: row.get("estimated_1rm")?,
            is_personal_record: row.get("is_personal_record")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Insert one set, computing its 1RM estimate and PR flag
    pub fn create(
        conn: &Connection,
        workout_id: i64,
        set_order: u32,
        data: &WorkoutSetCreate,
    ) -> DbResult<Self> {
        let estimated_1rm = one_rep_max(data.weight_kg, data.reps);
        let is_personal_record = match Self::best_estimated_1rm(conn, &data.exercise)? {
            Some(best) => estimated_1rm > best,
            None => true,
        };

        conn.execute(
            r#"
            INSERT INTO workout_sets (
                workout_id, set_order, exercise, weight_kg, reps, rpe,
                estimated_1rm, is_personal_record
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                workout_id,
                set_order,
                data.exercise.trim(),
                data.weight_kg,
                data.reps,
                data.rpe,
                estimated_1rm,
                is_personal_record,
            ],
        )?;

        let id = conn.last_insert_rowid();
        let mut stmt = conn.prepare("SELECT * FROM workout_sets WHERE id = ?1")?;
        Ok(stmt.query_row([id], Self::from_row)?)
    }

    pub fn list_for_workout(conn: &Connection, workout_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM workout_sets WHERE workout_id = ?1 ORDER BY set_order",
        )?;

        let sets = stmt
            .query_map([workout_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(sets)
    }

    /// Best 1RM estimate ever logged for an exercise, matched case-insensitively
    pub fn best_estimated_1rm(conn: &Connection, exercise: &str) -> DbResult<Option<f64>> {
        let best = conn.query_row(
            "SELECT MAX(estimated_1rm) FROM workout_sets WHERE exercise = ?1 COLLATE NOCASE",
            [exercise.trim()],
            |row| row.get::<_, Option<f64>>(0),
        )?;
        Ok(best)
    }
}
