//! Food log model
//!
//! One row per logged food item, keyed by ISO date and meal.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use super::enum_column;
use crate::db::{DbError, DbResult};
use crate::metrics::{FoodItem, MealFoodItem, MealType};

/// A logged food item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodLogEntry {
    pub id: i64,
    pub date: String,
    pub meal_type: MealType,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: Option<f64>,
    pub sugar: Option<f64>,
    /// Free text the entry was parsed from, if any
    pub raw_input: Option<String>,
    pub created_at: String,
}

/// Data for logging a food item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodLogEntryCreate {
    pub date: String,
    pub meal_type: MealType,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub item: FoodItem,
    pub raw_input: Option<String>,
}

impl FoodLogEntry {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            date: row.get("date")?,
            meal_type: enum_column(row, "meal_type", MealType::from_str)?,
            name: row.get("name")?,
            quantity: row.get("quantity")?,
            unit: row.get("unit")?,
            calories: row.get("calories")?,
            protein: row.get("protein")?,
            carbs: row.get("carbs")?,
            fat: row.get("fat")?,
            fiber: row.get("fiber")?,
            sugar: row.get("sugar")?,
            raw_input: row.get("raw_input")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Nutrient values in the engine's shape
    pub fn food_item(&self) -> FoodItem {
        FoodItem {
            calories: self.calories,
            protein_g: self.protein,
            carbs_g: self.carbs,
            fat_g: self.fat,
            fiber_g: self.fiber,
            sugar_g: self.sugar,
        }
    }

    pub fn meal_food_item(&self) -> MealFoodItem {
        MealFoodItem {
            meal: self.meal_type,
            item: self.food_item(),
        }
    }

    /// Log a new item
    pub fn create(conn: &Connection, data: &FoodLogEntryCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO food_log_entries (
                date, meal_type, name, quantity, unit,
                calories, protein, carbs, fat, fiber, sugar, raw_input
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                data.date,
                data.meal_type.as_str(),
                data.name,
                data.quantity,
                data.unit,
                data.item.calories,
                data.item.protein_g,
                data.item.carbs_g,
                data.item.fat_g,
                data.item.fiber_g,
                data.item.sugar_g,
                data.raw_input,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| DbError::NotFound(format!("Food log entry {}", id)))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM food_log_entries WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All items for a date, in logging order
    pub fn list_for_date(conn: &Connection, date: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM food_log_entries WHERE date = ?1 ORDER BY created_at, id",
        )?;

        let entries = stmt
            .query_map([date], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM food_log_entries WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    /// Distinct dates with at least one entry, newest first, up to and including `up_to`
    pub fn dates_with_entries(conn: &Connection, up_to: &str, limit: i64) -> DbResult<Vec<String>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT DISTINCT date FROM food_log_entries
            WHERE date <= ?1
            ORDER BY date DESC
            LIMIT ?2
            "#,
        )?;

        let dates = stmt
            .query_map(params![up_to, limit], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(dates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn entry(date: &str, meal_type: MealType, calories: f64) -> FoodLogEntryCreate {
        FoodLogEntryCreate {
            date: date.to_string(),
            meal_type,
            name: "Greek yogurt".to_string(),
            quantity: 170.0,
            unit: "g".to_string(),
            item: FoodItem {
                calories,
                protein_g: 17.0,
                carbs_g: 6.0,
                fat_g: 0.7,
                fiber_g: None,
                sugar_g: Some(6.0),
            },
            raw_input: None,
        }
    }

    #[test]
    fn test_create_and_get() {
        let conn = setup();
        let created = FoodLogEntry::create(&conn, &entry("2026-01-09", MealType::Breakfast, 100.0)).unwrap();
        assert_eq!(created.meal_type, MealType::Breakfast);
        assert_eq!(created.fiber, None);
        assert_eq!(created.sugar, Some(6.0));

        let item = created.food_item();
        assert_eq!(item.protein_g, 17.0);
        assert_eq!(item.sugar_g, Some(6.0));
    }

    #[test]
    fn test_list_for_date_filters() {
        let conn = setup();
        FoodLogEntry::create(&conn, &entry("2026-01-09", MealType::Breakfast, 100.0)).unwrap();
        FoodLogEntry::create(&conn, &entry("2026-01-09", MealType::Dinner, 600.0)).unwrap();
        FoodLogEntry::create(&conn, &entry("2026-01-10", MealType::Lunch, 400.0)).unwrap();

        let entries = FoodLogEntry::list_for_date(&conn, "2026-01-09").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].meal_type, MealType::Dinner);
    }

    #[test]
    fn test_delete() {
        let conn = setup();
        let created = FoodLogEntry::create(&conn, &entry("2026-01-09", MealType::Snack, 90.0)).unwrap();
        assert!(FoodLogEntry::delete(&conn, created.id).unwrap());
        assert!(!FoodLogEntry::delete(&conn, created.id).unwrap());
        assert!(FoodLogEntry::get_by_id(&conn, created.id).unwrap().is_none());
    }

    #[test]
    fn test_dates_with_entries() {
        let conn = setup();
        for date in ["2026-01-07", "2026-01-08", "2026-01-08", "2026-01-10", "2026-01-12"] {
            FoodLogEntry::create(&conn, &entry(date, MealType::Lunch, 500.0)).unwrap();
        }
        let dates = FoodLogEntry::dates_with_entries(&conn, "2026-01-10", 10).unwrap();
        assert_eq!(dates, vec!["2026-01-10", "2026-01-08", "2026-01-07"]);
    }
}
