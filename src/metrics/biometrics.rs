//! Biometric input types
//!
//! The closed enums that drive the energy formulas, plus the validated
//! biometric snapshot passed into them.

use serde::{Deserialize, Serialize};

use super::validate::{validate_positive, MetricsError};

/// Biological sex as used by the BMR and ideal-weight formulas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
    Other,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
            Sex::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Some(Sex::Male),
            "female" | "f" => Some(Sex::Female),
            "other" => Some(Sex::Other),
            _ => None,
        }
    }

    /// Formulas only special-case male; female and other share a branch
    pub fn is_male(&self) -> bool {
        matches!(self, Sex::Male)
    }
}

/// Habitual activity level, each bound to a fixed TDEE multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    LightlyActive,
    ModeratelyActive,
    VeryActive,
    ExtremelyActive,
}

impl ActivityLevel {
    /// All levels, least to most active
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::LightlyActive,
        ActivityLevel::ModeratelyActive,
        ActivityLevel::VeryActive,
        ActivityLevel::ExtremelyActive,
    ];

    /// TDEE multiplier applied to BMR
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtremelyActive => 1.9,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::LightlyActive => "lightly_active",
            ActivityLevel::ModeratelyActive => "moderately_active",
            ActivityLevel::VeryActive => "very_active",
            ActivityLevel::ExtremelyActive => "extremely_active",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "sedentary" => Some(ActivityLevel::Sedentary),
            "lightly_active" | "light" => Some(ActivityLevel::LightlyActive),
            "moderately_active" | "moderate" => Some(ActivityLevel::ModeratelyActive),
            "very_active" => Some(ActivityLevel::VeryActive),
            "extremely_active" | "extreme" => Some(ActivityLevel::ExtremelyActive),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Sedentary (desk job, no exercise)",
            ActivityLevel::LightlyActive => "Lightly Active (1-3 days/week)",
            ActivityLevel::ModeratelyActive => "Moderately Active (3-5 days/week)",
            ActivityLevel::VeryActive => "Very Active (6-7 days/week)",
            ActivityLevel::ExtremelyActive => "Extremely Active (athlete/physical job)",
        }
    }
}

/// Training goal, each bound to a calorie adjustment ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    FatLoss,
    MuscleGain,
    Recomposition,
    Endurance,
    Maintenance,
}

impl Goal {
    pub const ALL: [Goal; 5] = [
        Goal::FatLoss,
        Goal::MuscleGain,
        Goal::Recomposition,
        Goal::Endurance,
        Goal::Maintenance,
    ];

    /// Ratio applied to TDEE to get the calorie target
    pub fn calorie_ratio(&self) -> f64 {
        match self {
            Goal::FatLoss => 0.8,     // 20% deficit
            Goal::MuscleGain => 1.1,  // 10% surplus
            Goal::Recomposition => 1.0,
            Goal::Endurance => 1.05,
            Goal::Maintenance => 1.0,
        }
    }

    /// Grams of protein per kilogram of body weight
    pub fn protein_per_kg(&self) -> f64 {
        match self {
            Goal::MuscleGain => 2.2,
            Goal::FatLoss | Goal::Recomposition | Goal::Endurance | Goal::Maintenance => 1.8,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::FatLoss => "fat_loss",
            Goal::MuscleGain => "muscle_gain",
            Goal::Recomposition => "recomposition",
            Goal::Endurance => "endurance",
            Goal::Maintenance => "maintenance",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "fat_loss" | "cut" => Some(Goal::FatLoss),
            "muscle_gain" | "bulk" => Some(Goal::MuscleGain),
            "recomposition" | "recomp" => Some(Goal::Recomposition),
            "endurance" => Some(Goal::Endurance),
            "maintenance" | "maintain" => Some(Goal::Maintenance),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Goal::FatLoss => "Fat Loss",
            Goal::MuscleGain => "Muscle Gain",
            Goal::Recomposition => "Body Recomposition",
            Goal::Endurance => "Endurance",
            Goal::Maintenance => "Maintenance",
        }
    }
}

/// A consistent snapshot of the biometric fields the energy formulas need
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiometricInput {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: u32,
    pub sex: Sex,
}

impl BiometricInput {
    /// Build a snapshot, rejecting non-finite or non-positive measurements
    pub fn new(weight_kg: f64, height_cm: f64, age_years: u32, sex: Sex) -> Result<Self, MetricsError> {
        let input = Self {
            weight_kg,
            height_cm,
            age_years,
            sex,
        };
        input.validate()?;
        Ok(input)
    }

    /// Check the invariants of a snapshot that was built literally
    pub fn validate(&self) -> Result<(), MetricsError> {
        validate_positive("weight_kg", self.weight_kg)?;
        validate_positive("height_cm", self.height_cm)?;
        if self.age_years == 0 {
            return Err(MetricsError::NotPositive {
                field: "age_years",
                value: 0.0,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_multipliers_increase() {
        let multipliers: Vec<f64> = ActivityLevel::ALL.iter().map(|l| l.multiplier()).collect();
        assert_eq!(multipliers, vec![1.2, 1.375, 1.55, 1.725, 1.9]);
        assert!(multipliers.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_goal_ratios() {
        assert_eq!(Goal::FatLoss.calorie_ratio(), 0.8);
        assert_eq!(Goal::MuscleGain.calorie_ratio(), 1.1);
        assert_eq!(Goal::Recomposition.calorie_ratio(), 1.0);
        assert_eq!(Goal::Endurance.calorie_ratio(), 1.05);
        assert_eq!(Goal::Maintenance.calorie_ratio(), 1.0);
    }

    #[test]
    fn test_string_round_trip() {
        for level in ActivityLevel::ALL {
            assert_eq!(ActivityLevel::from_str(level.as_str()), Some(level));
        }
        for goal in Goal::ALL {
            assert_eq!(Goal::from_str(goal.as_str()), Some(goal));
        }
        assert_eq!(Sex::from_str("Female"), Some(Sex::Female));
        assert_eq!(ActivityLevel::from_str("Very-Active"), Some(ActivityLevel::VeryActive));
        assert_eq!(Goal::from_str("shred"), None);
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&ActivityLevel::ModeratelyActive).unwrap();
        assert_eq!(json, "\"moderately_active\"");
        let goal: Goal = serde_json::from_str("\"muscle_gain\"").unwrap();
        assert_eq!(goal, Goal::MuscleGain);
    }

    #[test]
    fn test_biometric_input_validation() {
        assert!(BiometricInput::new(70.0, 175.0, 30, Sex::Male).is_ok());
        assert!(BiometricInput::new(0.0, 175.0, 30, Sex::Male).is_err());
        assert!(BiometricInput::new(70.0, f64::NAN, 30, Sex::Male).is_err());
        assert!(BiometricInput::new(70.0, 175.0, 0, Sex::Female).is_err());
    }
}
