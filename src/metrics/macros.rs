//! Macro planner
//!
//! Converts a calorie target into whole-gram protein, carbohydrate and fat
//! targets. Each macro is rounded on its own, so the calorie identity holds
//! only up to rounding.

use serde::{Deserialize, Serialize};

use super::biometrics::Goal;
use super::round_half_up;

/// kcal per gram of protein
pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
/// kcal per gram of carbohydrate
pub const KCAL_PER_G_CARBS: f64 = 4.0;
/// kcal per gram of fat
pub const KCAL_PER_G_FAT: f64 = 9.0;

/// Share of calories assigned to fat
pub const FAT_CALORIE_SHARE: f64 = 0.25;

/// Daily macro targets in whole grams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroTargets {
    pub protein_g: i32,
    /// Residual after protein and fat; negative for degenerate inputs
    pub carbs_g: i32,
    pub fat_g: i32,
}

impl MacroTargets {
    /// Calories implied by the gram targets
    pub fn calories(&self) -> i32 {
        self.protein_g * 4 + self.carbs_g * 4 + self.fat_g * 9
    }

    /// True when the calorie target was too low to leave room for carbs
    pub fn is_degenerate(&self) -> bool {
        self.carbs_g < 0
    }

    /// Same targets with carbs floored at zero, for display
    pub fn floored(&self) -> Self {
        Self {
            carbs_g: self.carbs_g.max(0),
            ..*self
        }
    }
}

/// Plan macro grams for a calorie target, body weight and goal
pub fn compute_macros(target_calories: i32, weight_kg: f64, goal: Goal) -> MacroTargets {
    let target = f64::from(target_calories);

    let protein_g = round_half_up(weight_kg * goal.protein_per_kg()) as i32;
    let fat_g = round_half_up(target * FAT_CALORIE_SHARE / KCAL_PER_G_FAT) as i32;

    // Carbs fill what is left after the already-rounded protein and fat
    let residual = target
        - f64::from(protein_g) * KCAL_PER_G_PROTEIN
        - f64::from(fat_g) * KCAL_PER_G_FAT;
    let carbs_g = round_half_up(residual / KCAL_PER_G_CARBS) as i32;

    MacroTargets {
        protein_g,
        carbs_g,
        fat_g,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fat_loss_plan() {
        let macros = compute_macros(2044, 70.0, Goal::FatLoss);
        assert_eq!(
            macros,
            MacroTargets {
                protein_g: 126,
                carbs_g: 257,
                fat_g: 57,
            }
        );
        // 504 + 1028 + 513 = 2045, one kcal of rounding drift
        assert!((macros.calories() - 2044).abs() <= 4);
    }

    #[test]
    fn test_muscle_gain_uses_higher_protein() {
        let macros = compute_macros(2800, 80.0, Goal::MuscleGain);
        assert_eq!(macros.protein_g, 176);
        let maintenance = compute_macros(2800, 80.0, Goal::Maintenance);
        assert_eq!(maintenance.protein_g, 144);
        assert_eq!(macros.fat_g, maintenance.fat_g);
    }

    #[test]
    fn test_low_target_gives_negative_carbs() {
        // 264g protein alone is 1056 kcal, more than the whole target
        let macros = compute_macros(800, 120.0, Goal::MuscleGain);
        assert_eq!(macros.protein_g, 264);
        assert_eq!(macros.fat_g, 22);
        assert_eq!(macros.carbs_g, -113);
        assert!(macros.is_degenerate());
        assert_eq!(macros.floored().carbs_g, 0);
        assert_eq!(macros.floored().protein_g, 264);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn test_calorie_identity_within_rounding(
            target in 1200i32..6000,
            weight in 40.0f64..150.0,
            goal_index in 0usize..5,
        ) {
            let macros = compute_macros(target, weight, Goal::ALL[goal_index]);
            prop_assert!(
                (macros.calories() - target).abs() <= 4,
                "{:?} gives {} kcal for target {}", macros, macros.calories(), target
            );
        }
    }
}
