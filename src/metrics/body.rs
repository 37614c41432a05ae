//! Body and strength metrics
//!
//! BMI, Devine ideal-weight range, imperial/metric conversions, Epley 1RM and
//! a daily hydration target.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::biometrics::{ActivityLevel, Sex};
use super::round_half_up;

/// Kilograms per pound
pub const KG_PER_LB: f64 = 0.453592;
/// Pounds per kilogram
pub const LBS_PER_KG: f64 = 2.20462;
/// Centimetres per inch
pub const CM_PER_INCH: f64 = 2.54;

const DEVINE_BASE_INCHES: f64 = 60.0;
const DEVINE_KG_PER_INCH: f64 = 2.3;
const WATER_ML_PER_KG: f64 = 35.0;

fn round_to_tenth(value: f64) -> f64 {
    round_half_up(value * 10.0) / 10.0
}

/// WHO BMI bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

/// Height split into whole feet and inches, `inches` always below 12
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeetInches {
    pub feet: u32,
    pub inches: u32,
}

impl fmt::Display for FeetInches {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}'{}\"", self.feet, self.inches)
    }
}

/// Healthy weight band in whole kilograms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightRange {
    pub min_kg: f64,
    pub max_kg: f64,
}

/// Body mass index to one decimal place
pub fn bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    round_to_tenth(weight_kg / (height_m * height_m))
}

/// Band for a BMI value; each boundary belongs to the higher band
pub fn bmi_category(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::Normal
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

/// Estimated one-rep max (Epley)
///
/// A single rep is already a max. Zero reps is outside the formula's domain and
/// should be rejected with `validate_reps` first.
pub fn one_rep_max(weight: f64, reps: u32) -> f64 {
    if reps == 1 {
        return weight;
    }
    round_half_up(weight * (1.0 + f64::from(reps) / 30.0))
}

pub fn lbs_to_kg(lbs: f64) -> f64 {
    round_to_tenth(lbs * KG_PER_LB)
}

pub fn kg_to_lbs(kg: f64) -> f64 {
    round_to_tenth(kg * LBS_PER_KG)
}

/// Convert centimetres to feet and rounded inches
pub fn cm_to_feet_inches(cm: f64) -> FeetInches {
    let total_inches = (cm / CM_PER_INCH).max(0.0);
    let mut feet = (total_inches / 12.0).floor() as u32;
    let mut inches = round_half_up(total_inches % 12.0) as u32;

    // 5' 11.6" rounds to 5'12"; carry it into the next foot
    if inches >= 12 {
        feet += 1;
        inches -= 12;
    }

    FeetInches { feet, inches }
}

/// Devine-style ideal weight with a ±10% band
///
/// Male starts from 50 kg, female and other from 45.5 kg, plus 2.3 kg per inch
/// above five feet.
pub fn ideal_weight_range(height_cm: f64, sex: Sex) -> WeightRange {
    let base = if sex.is_male() { 50.0 } else { 45.5 };
    let height_inches = height_cm / CM_PER_INCH;
    let ideal = base + DEVINE_KG_PER_INCH * (height_inches - DEVINE_BASE_INCHES);

    WeightRange {
        min_kg: round_half_up(ideal * 0.9),
        max_kg: round_half_up(ideal * 1.1),
    }
}

/// Daily water target in millilitres, rounded to the nearest 100 ml
pub fn water_target_ml(weight_kg: f64, activity_level: ActivityLevel) -> u32 {
    let bonus = match activity_level {
        ActivityLevel::VeryActive | ActivityLevel::ExtremelyActive => 500.0,
        ActivityLevel::ModeratelyActive => 300.0,
        ActivityLevel::Sedentary | ActivityLevel::LightlyActive => 0.0,
    };
    let ml = weight_kg * WATER_ML_PER_KG + bonus;
    (round_half_up(ml / 100.0) * 100.0).max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_bmi() {
        assert_eq!(bmi(70.0, 175.0), 22.9);
        assert_eq!(bmi(50.0, 180.0), 15.4);
    }

    #[test]
    fn test_bmi_category_boundaries() {
        assert_eq!(bmi_category(18.4), BmiCategory::Underweight);
        assert_eq!(bmi_category(18.5), BmiCategory::Normal);
        assert_eq!(bmi_category(24.9), BmiCategory::Normal);
        assert_eq!(bmi_category(25.0), BmiCategory::Overweight);
        assert_eq!(bmi_category(30.0), BmiCategory::Obese);
        assert_eq!(BmiCategory::Normal.display_name(), "Normal weight");
    }

    #[test]
    fn test_one_rep_max() {
        assert_eq!(one_rep_max(100.0, 1), 100.0);
        assert_eq!(one_rep_max(100.0, 5), 117.0);
        assert_eq!(one_rep_max(225.0, 8), 285.0);
        assert_eq!(one_rep_max(60.0, 10), 80.0);
    }

    #[test]
    fn test_single_rep_keeps_fraction() {
        assert_eq!(one_rep_max(102.5, 1), 102.5);
    }

    #[test]
    fn test_weight_conversions() {
        assert_eq!(lbs_to_kg(150.0), 68.0);
        assert_eq!(kg_to_lbs(70.0), 154.3);
        assert_eq!(kg_to_lbs(68.0), 149.9);
    }

    #[test]
    fn test_cm_to_feet_inches() {
        assert_eq!(cm_to_feet_inches(180.0), FeetInches { feet: 5, inches: 11 });
        assert_eq!(cm_to_feet_inches(175.0), FeetInches { feet: 5, inches: 9 });
        assert_eq!(cm_to_feet_inches(152.4).to_string(), "5'0\"");
    }

    #[test]
    fn test_cm_to_feet_inches_carries_twelve() {
        // 182.5 cm is 71.85 in: 5 ft + 11.85 in, which rounds up to a full foot
        assert_eq!(cm_to_feet_inches(182.5), FeetInches { feet: 6, inches: 0 });
        assert_eq!(cm_to_feet_inches(182.5).to_string(), "6'0\"");
    }

    #[test]
    fn test_ideal_weight_range() {
        assert_eq!(
            ideal_weight_range(180.0, Sex::Male),
            WeightRange {
                min_kg: 67.0,
                max_kg: 82.0,
            }
        );
        assert_eq!(
            ideal_weight_range(165.0, Sex::Female),
            WeightRange {
                min_kg: 51.0,
                max_kg: 63.0,
            }
        );
        assert_eq!(
            ideal_weight_range(165.0, Sex::Other),
            ideal_weight_range(165.0, Sex::Female)
        );
    }

    #[test]
    fn test_water_target() {
        assert_eq!(water_target_ml(70.0, ActivityLevel::Sedentary), 2500);
        assert_eq!(water_target_ml(70.0, ActivityLevel::LightlyActive), 2500);
        assert_eq!(water_target_ml(70.0, ActivityLevel::ModeratelyActive), 2800);
        assert_eq!(water_target_ml(80.0, ActivityLevel::VeryActive), 3300);
        assert_eq!(water_target_ml(80.0, ActivityLevel::ExtremelyActive), 3300);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn test_lbs_kg_round_trip(lbs in 1.0f64..600.0) {
            let back = kg_to_lbs(lbs_to_kg(lbs));
            prop_assert!((back - lbs).abs() <= 0.2, "{} -> {}", lbs, back);
        }

        #[test]
        fn test_inches_never_twelve(cm in 50.0f64..250.0) {
            let height = cm_to_feet_inches(cm);
            prop_assert!(height.inches < 12, "{} cm gave {}", cm, height);
        }
    }
}
