//! Profile model
//!
//! The single user's biometrics, display preferences and the targets derived
//! from them. Targets are always written together with the inputs they were
//! computed from.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use super::enum_column;
use crate::db::{DbError, DbResult};
use crate::metrics::{
    ActivityLevel, BiometricInput, DailyTargets, EnergyTargets, Goal, MacroTargets, MetricsError,
    Sex,
};

/// Preferred unit for displaying body weight
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lbs,
}

impl WeightUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Lbs => "lbs",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "kg" | "kgs" | "kilograms" => Some(WeightUnit::Kg),
            "lb" | "lbs" | "pounds" => Some(WeightUnit::Lbs),
            _ => None,
        }
    }
}

/// Preferred unit for displaying height
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeightUnit {
    #[default]
    Cm,
    Ft,
}

impl HeightUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeightUnit::Cm => "cm",
            HeightUnit::Ft => "ft",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "cm" => Some(HeightUnit::Cm),
            "ft" | "feet" | "in" => Some(HeightUnit::Ft),
            _ => None,
        }
    }
}

/// Stored profile row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub age: u32,
    pub sex: Sex,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub weight_unit: WeightUnit,
    pub height_unit: HeightUnit,
    pub goal: Goal,
    pub activity_level: ActivityLevel,
    pub bmr: f64,
    pub tdee: i32,
    pub target_calories: i32,
    pub target_protein: i32,
    pub target_carbs: i32,
    pub target_fat: i32,
    pub onboarding_completed: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields supplied at onboarding or profile edit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileInput {
    pub name: String,
    pub age: u32,
    pub sex: Sex,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub weight_unit: WeightUnit,
    pub height_unit: HeightUnit,
    pub goal: Goal,
    pub activity_level: ActivityLevel,
}

impl ProfileInput {
    /// Validated biometric snapshot for the engine
    pub fn biometrics(&self) -> Result<BiometricInput, MetricsError> {
        BiometricInput::new(self.weight_kg, self.height_cm, self.age, self.sex)
    }
}

impl From<&Profile> for ProfileInput {
    fn from(profile: &Profile) -> Self {
        Self {
            name: profile.name.clone(),
            age: profile.age,
            sex: profile.sex,
            height_cm: profile.height_cm,
            weight_kg: profile.weight_kg,
            weight_unit: profile.weight_unit,
            height_unit: profile.height_unit,
            goal: profile.goal,
            activity_level: profile.activity_level,
        }
    }
}

impl Profile {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            name: row.get("name")?,
            age: row.get("age")?,
            sex: enum_column(row, "sex", Sex::from_str)?,
            height_cm: row.get("height_cm")?,
            weight_kg: row.get("weight_kg")?,
            weight_unit: enum_column(row, "weight_unit", WeightUnit::from_str)?,
            height_unit: enum_column(row, "height_unit", HeightUnit::from_str)?,
            goal: enum_column(row, "goal", Goal::from_str)?,
            activity_level: enum_column(row, "activity_level", ActivityLevel::from_str)?,
            bmr: row.get("bmr")?,
            tdee: row.get("tdee")?,
            target_calories: row.get("target_calories")?,
            target_protein: row.get("target_protein")?,
            target_carbs: row.get("target_carbs")?,
            target_fat: row.get("target_fat")?,
            onboarding_completed: row.get("onboarding_completed")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Biometric snapshot as stored; already validated on the way in
    pub fn biometrics(&self) -> BiometricInput {
        BiometricInput {
            weight_kg: self.weight_kg,
            height_cm: self.height_cm,
            age_years: self.age,
            sex: self.sex,
        }
    }

    pub fn energy_targets(&self) -> EnergyTargets {
        EnergyTargets {
            bmr: self.bmr,
            tdee: self.tdee,
            target_calories: self.target_calories,
        }
    }

    pub fn macro_targets(&self) -> MacroTargets {
        MacroTargets {
            protein_g: self.target_protein,
            carbs_g: self.target_carbs,
            fat_g: self.target_fat,
        }
    }

    /// Targets in the shape the aggregator compares against; negative carbs floor at 0
    pub fn daily_targets(&self) -> DailyTargets {
        DailyTargets {
            calories: f64::from(self.target_calories),
            protein: f64::from(self.target_protein),
            carbs: f64::from(self.target_carbs.max(0)),
            fat: f64::from(self.target_fat),
        }
    }

    /// Get the profile, if onboarding has stored one
    pub fn get(conn: &Connection) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM profile WHERE id = 1")?;

        let result = stmt.query_row([], Self::from_row);
        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Insert or replace the profile together with its derived targets
    pub fn upsert(
        conn: &Connection,
        input: &ProfileInput,
        energy: &EnergyTargets,
        macros: &MacroTargets,
    ) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO profile (
                id, name, age, sex, height_cm, weight_kg, weight_unit, height_unit,
                goal, activity_level, bmr, tdee, target_calories,
                target_protein, target_carbs, target_fat
            )
            VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                age = excluded.age,
                sex = excluded.sex,
                height_cm = excluded.height_cm,
                weight_kg = excluded.weight_kg,
                weight_unit = excluded.weight_unit,
                height_unit = excluded.height_unit,
                goal = excluded.goal,
                activity_level = excluded.activity_level,
                bmr = excluded.bmr,
                tdee = excluded.tdee,
                target_calories = excluded.target_calories,
                target_protein = excluded.target_protein,
                target_carbs = excluded.target_carbs,
                target_fat = excluded.target_fat,
                updated_at = datetime('now')
            "#,
            params![
                input.name,
                input.age,
                input.sex.as_str(),
                input.height_cm,
                input.weight_kg,
                input.weight_unit.as_str(),
                input.height_unit.as_str(),
                input.goal.as_str(),
                input.activity_level.as_str(),
                energy.bmr,
                energy.tdee,
                energy.target_calories,
                macros.protein_g,
                macros.carbs_g,
                macros.fat_g,
            ],
        )?;

        Self::get(conn)?.ok_or_else(|| DbError::NotFound("Profile".to_string()))
    }

    /// Mark onboarding as done (or not); false if no profile exists yet
    pub fn set_onboarding_completed(conn: &Connection, completed: bool) -> DbResult<bool> {
        let rows = conn.execute(
            "UPDATE profile SET onboarding_completed = ?1, updated_at = datetime('now') WHERE id = 1",
            params![completed],
        )?;
        Ok(rows > 0)
    }
}
