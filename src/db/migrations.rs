//! Database migrations
//!
//! Schema creation and versioning.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 2;

/// Bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
        tracing::info!("applied schema migration v1");
    }

    if current_version < 2 {
        migrate_v2(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (2)", [])?;
        tracing::info!("applied schema migration v2");
    }

    Ok(())
}

/// Highest applied migration, 0 for a fresh database
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Whether the database is at the version this build expects
pub fn is_current(conn: &Connection) -> DbResult<bool> {
    Ok(get_schema_version(conn)? == SCHEMA_VERSION)
}

/// Migration v1: profile and food log
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- PROFILE
        -- Single row (id = 1). Biometrics are metric; unit columns are
        -- display preferences only.
        -- ============================================
        CREATE TABLE profile (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            name TEXT NOT NULL,
            age INTEGER NOT NULL CHECK (age > 0),
            sex TEXT NOT NULL CHECK (sex IN ('male', 'female', 'other')),
            height_cm REAL NOT NULL CHECK (height_cm > 0),
            weight_kg REAL NOT NULL CHECK (weight_kg > 0),
            weight_unit TEXT NOT NULL DEFAULT 'kg' CHECK (weight_unit IN ('kg', 'lbs')),
            height_unit TEXT NOT NULL DEFAULT 'cm' CHECK (height_unit IN ('cm', 'ft')),
            goal TEXT NOT NULL,
            activity_level TEXT NOT NULL,

            -- Derived targets, rewritten together on every recalculation
            bmr REAL NOT NULL,
            tdee INTEGER NOT NULL,
            target_calories INTEGER NOT NULL,
            target_protein INTEGER NOT NULL,
            target_carbs INTEGER NOT NULL,
            target_fat INTEGER NOT NULL,

            onboarding_completed INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- FOOD LOG
        -- One row per logged item, tagged with its meal
        -- ============================================
        CREATE TABLE food_log_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,                  -- ISO date: "2026-01-09"
            meal_type TEXT NOT NULL CHECK (meal_type IN ('breakfast', 'lunch', 'dinner', 'snack')),
            name TEXT NOT NULL,
            quantity REAL NOT NULL DEFAULT 1,
            unit TEXT NOT NULL DEFAULT 'serving',
            calories REAL NOT NULL DEFAULT 0,
            protein REAL NOT NULL DEFAULT 0,     -- grams
            carbs REAL NOT NULL DEFAULT 0,       -- grams
            fat REAL NOT NULL DEFAULT 0,         -- grams
            fiber REAL,                          -- grams, optional
            sugar REAL,                          -- grams, optional
            raw_input TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_food_log_date ON food_log_entries(date);
        "#,
    )?;

    Ok(())
}

/// Migration v2: weight and workout logs
fn migrate_v2(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE weight_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            weight_kg REAL NOT NULL CHECK (weight_kg > 0),
            notes TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_weight_entries_date ON weight_entries(date);

        CREATE TABLE workouts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            name TEXT NOT NULL,
            duration_minutes INTEGER NOT NULL DEFAULT 0,
            total_volume_kg REAL NOT NULL DEFAULT 0,   -- sum of weight * reps
            notes TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_workouts_date ON workouts(date);

        CREATE TABLE workout_sets (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            workout_id INTEGER NOT NULL REFERENCES workouts(id) ON DELETE CASCADE,
            set_order INTEGER NOT NULL,
            exercise TEXT NOT NULL,
            weight_kg REAL NOT NULL CHECK (weight_kg >= 0),
            reps INTEGER NOT NULL CHECK (reps >= 1),
            rpe REAL,
            estimated_1rm REAL NOT NULL,
            is_personal_record INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_workout_sets_workout ON workout_sets(workout_id);
        CREATE INDEX idx_workout_sets_exercise ON workout_sets(exercise COLLATE NOCASE);
        "#,
    )?;

    Ok(())
}
