//! Energy expenditure calculations
//!
//! BMR (Mifflin-St Jeor), TDEE from an activity multiplier, and the
//! goal-adjusted calorie target.

use serde::{Deserialize, Serialize};

use super::biometrics::{ActivityLevel, BiometricInput, Goal};
use super::round_half_up;

/// Derived energy figures, recomputed wholesale whenever an input changes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyTargets {
    pub bmr: f64,
    pub tdee: i32,
    pub target_calories: i32,
}

/// Basal metabolic rate in kcal/day (Mifflin-St Jeor)
///
/// Only `Sex::Male` gets the +5 offset; female and other both use -161.
pub fn compute_bmr(input: &BiometricInput) -> f64 {
    let base = 10.0 * input.weight_kg + 6.25 * input.height_cm - 5.0 * f64::from(input.age_years);
    if input.sex.is_male() {
        base + 5.0
    } else {
        base - 161.0
    }
}

/// Total daily energy expenditure, rounded to whole kcal
pub fn compute_tdee(bmr: f64, activity_level: ActivityLevel) -> i32 {
    round_half_up(bmr * activity_level.multiplier()) as i32
}

/// Daily calorie target for a goal. No min/max bounds are applied here.
pub fn compute_target_calories(tdee: i32, goal: Goal) -> i32 {
    round_half_up(f64::from(tdee) * goal.calorie_ratio()) as i32
}

/// Run BMR -> TDEE -> target in one go
pub fn compute_energy_targets(
    input: &BiometricInput,
    activity_level: ActivityLevel,
    goal: Goal,
) -> EnergyTargets {
    let bmr = compute_bmr(input);
    let tdee = compute_tdee(bmr, activity_level);
    EnergyTargets {
        bmr,
        tdee,
        target_calories: compute_target_calories(tdee, goal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Sex;
    use proptest::prelude::*;

    fn input(weight_kg: f64, height_cm: f64, age_years: u32, sex: Sex) -> BiometricInput {
        BiometricInput {
            weight_kg,
            height_cm,
            age_years,
            sex,
        }
    }

    #[test]
    fn test_bmr_male() {
        let bmr = compute_bmr(&input(70.0, 175.0, 30, Sex::Male));
        assert_eq!(bmr, 1648.75);
    }

    #[test]
    fn test_bmr_female_and_other_share_branch() {
        let female = compute_bmr(&input(70.0, 175.0, 30, Sex::Female));
        let other = compute_bmr(&input(70.0, 175.0, 30, Sex::Other));
        assert_eq!(female, 1482.75);
        assert_eq!(female, other);
    }

    #[test]
    fn test_tdee_rounds_product() {
        // 1648.75 * 1.55 = 2555.5625
        assert_eq!(compute_tdee(1648.75, ActivityLevel::ModeratelyActive), 2556);
        assert_eq!(compute_tdee(1500.0, ActivityLevel::Sedentary), 1800);
    }

    #[test]
    fn test_target_calories_per_goal() {
        assert_eq!(compute_target_calories(2555, Goal::FatLoss), 2044);
        assert_eq!(compute_target_calories(2000, Goal::MuscleGain), 2200);
        assert_eq!(compute_target_calories(2555, Goal::Recomposition), 2555);
        assert_eq!(compute_target_calories(2555, Goal::Endurance), 2683);
        assert_eq!(compute_target_calories(2555, Goal::Maintenance), 2555);
    }

    #[test]
    fn test_energy_targets_chain() {
        let targets = compute_energy_targets(
            &input(70.0, 175.0, 30, Sex::Male),
            ActivityLevel::ModeratelyActive,
            Goal::FatLoss,
        );
        assert_eq!(targets.bmr, 1648.75);
        assert_eq!(targets.tdee, 2556);
        assert_eq!(targets.target_calories, 2045);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_bmr_monotone_in_weight(
            weight in 30.0f64..200.0,
            delta in 0.1f64..50.0,
            height in 120.0f64..220.0,
            age in 15u32..90,
        ) {
            let lighter = compute_bmr(&input(weight, height, age, Sex::Male));
            let heavier = compute_bmr(&input(weight + delta, height, age, Sex::Male));
            prop_assert!(heavier > lighter);
        }

        #[test]
        fn test_bmr_monotone_in_height(
            weight in 30.0f64..200.0,
            height in 120.0f64..220.0,
            delta in 0.1f64..30.0,
            age in 15u32..90,
        ) {
            let shorter = compute_bmr(&input(weight, height, age, Sex::Female));
            let taller = compute_bmr(&input(weight, height + delta, age, Sex::Female));
            prop_assert!(taller > shorter);
        }

        #[test]
        fn test_bmr_decreases_with_age(
            weight in 30.0f64..200.0,
            height in 120.0f64..220.0,
            age in 15u32..89,
            years in 1u32..10,
        ) {
            let younger = compute_bmr(&input(weight, height, age, Sex::Other));
            let older = compute_bmr(&input(weight, height, age + years, Sex::Other));
            prop_assert!(older < younger);
        }

        #[test]
        fn test_tdee_strictly_increases_with_activity(bmr in 800.0f64..3500.0) {
            let tdees: Vec<i32> = ActivityLevel::ALL
                .iter()
                .map(|level| compute_tdee(bmr, *level))
                .collect();
            prop_assert!(tdees.windows(2).all(|w| w[0] < w[1]), "{:?}", tdees);
        }
    }
}
