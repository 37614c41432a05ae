//! Nutrition aggregation
//!
//! Folds logged food items into day totals and compares them against stored
//! targets: macro split, remaining grams, progress percentages and a
//! per-meal calorie breakdown.

use serde::{Deserialize, Serialize};

use super::macros::{KCAL_PER_G_CARBS, KCAL_PER_G_FAT, KCAL_PER_G_PROTEIN};
use super::round_half_up;
use super::validate::{validate_non_negative, MetricsError};

/// A single logged food item
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub fiber_g: Option<f64>,
    pub sugar_g: Option<f64>,
}

impl FoodItem {
    /// Every nutrient must be finite and non-negative
    pub fn validate(&self) -> Result<(), MetricsError> {
        validate_non_negative("calories", self.calories)?;
        validate_non_negative("protein", self.protein_g)?;
        validate_non_negative("carbs", self.carbs_g)?;
        validate_non_negative("fat", self.fat_g)?;
        if let Some(fiber) = self.fiber_g {
            validate_non_negative("fiber", fiber)?;
        }
        if let Some(sugar) = self.sugar_g {
            validate_non_negative("sugar", sugar)?;
        }
        Ok(())
    }
}

/// Component-wise totals of zero or more food items
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionSummary {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
    pub sugar: f64,
}

impl NutritionSummary {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Calories contributed by protein, carbs and fat (4/4/9)
    pub fn macro_calories(&self) -> f64 {
        self.protein * KCAL_PER_G_PROTEIN + self.carbs * KCAL_PER_G_CARBS + self.fat * KCAL_PER_G_FAT
    }
}

impl From<&FoodItem> for NutritionSummary {
    fn from(item: &FoodItem) -> Self {
        Self {
            calories: item.calories,
            protein: item.protein_g,
            carbs: item.carbs_g,
            fat: item.fat_g,
            fiber: item.fiber_g.unwrap_or(0.0),
            sugar: item.sugar_g.unwrap_or(0.0),
        }
    }
}

impl std::ops::Add for NutritionSummary {
    type Output = NutritionSummary;

    fn add(self, other: NutritionSummary) -> NutritionSummary {
        NutritionSummary {
            calories: self.calories + other.calories,
            protein: self.protein + other.protein,
            carbs: self.carbs + other.carbs,
            fat: self.fat + other.fat,
            fiber: self.fiber + other.fiber,
            sugar: self.sugar + other.sugar,
        }
    }
}

impl std::iter::Sum for NutritionSummary {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(NutritionSummary::zero(), |acc, n| acc + n)
    }
}

/// Share of macro calories from each macro, in whole percent
///
/// Each share is rounded on its own, so the three need not sum to 100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroPercentages {
    pub protein_pct: u32,
    pub carbs_pct: u32,
    pub fat_pct: u32,
}

/// Stored daily targets as read back from the profile
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyTargets {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// What is left of the daily targets; never negative
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RemainingMacros {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Display record for one tracked quantity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroProgress {
    pub consumed: f64,
    pub target: f64,
    pub remaining: f64,
    pub progress_pct: u32,
}

impl MacroProgress {
    pub fn new(consumed: f64, target: f64) -> Self {
        Self {
            consumed,
            target,
            remaining: (target - consumed).max(0.0),
            progress_pct: progress(consumed, target),
        }
    }
}

/// Progress records for calories and each macro
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyProgress {
    pub calories: MacroProgress,
    pub protein: MacroProgress,
    pub carbs: MacroProgress,
    pub fat: MacroProgress,
}

/// Meal slots for the per-meal breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Some(MealType::Breakfast),
            "lunch" => Some(MealType::Lunch),
            "dinner" => Some(MealType::Dinner),
            "snack" | "snacks" => Some(MealType::Snack),
            _ => None,
        }
    }
}

/// A food item tagged with the meal it was eaten at
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MealFoodItem {
    pub meal: MealType,
    pub item: FoodItem,
}

/// Calories per meal; every meal is always present
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CaloriesByMeal {
    pub breakfast: f64,
    pub lunch: f64,
    pub dinner: f64,
    pub snack: f64,
}

impl CaloriesByMeal {
    pub fn get(&self, meal: MealType) -> f64 {
        match meal {
            MealType::Breakfast => self.breakfast,
            MealType::Lunch => self.lunch,
            MealType::Dinner => self.dinner,
            MealType::Snack => self.snack,
        }
    }

    fn slot_mut(&mut self, meal: MealType) -> &mut f64 {
        match meal {
            MealType::Breakfast => &mut self.breakfast,
            MealType::Lunch => &mut self.lunch,
            MealType::Dinner => &mut self.dinner,
            MealType::Snack => &mut self.snack,
        }
    }
}

/// Sum food items into a summary. Empty input gives all zeros.
pub fn aggregate(items: &[FoodItem]) -> NutritionSummary {
    items.iter().map(NutritionSummary::from).sum()
}

/// Macro calorie split in whole percent
pub fn macro_percentages(summary: &NutritionSummary) -> MacroPercentages {
    let total = summary.macro_calories();
    if total == 0.0 {
        return MacroPercentages::default();
    }

    let pct = |kcal: f64| round_half_up(kcal / total * 100.0) as u32;
    MacroPercentages {
        protein_pct: pct(summary.protein * KCAL_PER_G_PROTEIN),
        carbs_pct: pct(summary.carbs * KCAL_PER_G_CARBS),
        fat_pct: pct(summary.fat * KCAL_PER_G_FAT),
    }
}

/// Remaining calories and grams, floored at zero
pub fn remaining(consumed: &NutritionSummary, targets: &DailyTargets) -> RemainingMacros {
    RemainingMacros {
        calories: (targets.calories - consumed.calories).max(0.0),
        protein: (targets.protein - consumed.protein).max(0.0),
        carbs: (targets.carbs - consumed.carbs).max(0.0),
        fat: (targets.fat - consumed.fat).max(0.0),
    }
}

/// Percent of target reached, saturating at 100. A zero target reports 0.
pub fn progress(consumed: f64, target: f64) -> u32 {
    if target == 0.0 {
        return 0;
    }
    round_half_up(consumed / target * 100.0).clamp(0.0, 100.0) as u32
}

/// Progress records for calories, protein, carbs and fat
pub fn daily_progress(consumed: &NutritionSummary, targets: &DailyTargets) -> DailyProgress {
    DailyProgress {
        calories: MacroProgress::new(consumed.calories, targets.calories),
        protein: MacroProgress::new(consumed.protein, targets.protein),
        carbs: MacroProgress::new(consumed.carbs, targets.carbs),
        fat: MacroProgress::new(consumed.fat, targets.fat),
    }
}

/// Total calories per meal slot
pub fn calories_by_meal(items: &[MealFoodItem]) -> CaloriesByMeal {
    items.iter().fold(CaloriesByMeal::default(), |mut acc, entry| {
        *acc.slot_mut(entry.meal) += entry.item.calories;
        acc
    })
}
