//! Display formatting
//!
//! Turns raw engine numbers into the short strings shown on the dashboard.
//! The engine itself only ever returns numbers.

use crate::metrics::{cm_to_feet_inches, kg_to_lbs, round_half_up};
use crate::models::{HeightUnit, WeightUnit};

/// Format a weight stored in kilograms in the user's preferred unit
pub fn format_weight(weight_kg: f64, unit: WeightUnit) -> String {
    match unit {
        WeightUnit::Kg => format!("{:.1} kg", weight_kg),
        WeightUnit::Lbs => format!("{:.1} lbs", kg_to_lbs(weight_kg)),
    }
}

pub fn format_calories(calories: f64) -> String {
    format!("{} kcal", round_half_up(calories) as i64)
}

pub fn format_macro(grams: f64, label: &str) -> String {
    format!("{}g {}", round_half_up(grams) as i64, label)
}

/// "45m", "1h 30m" or "2h"
pub fn format_duration(minutes: u32) -> String {
    if minutes < 60 {
        return format!("{}m", minutes);
    }
    let hours = minutes / 60;
    let rest = minutes % 60;
    if rest > 0 {
        format!("{}h {}m", hours, rest)
    } else {
        format!("{}h", hours)
    }
}

/// Total lifted volume; tonnes from 1000 kg up
pub fn format_volume(kg: f64) -> String {
    if kg >= 1000.0 {
        format!("{:.1}t", kg / 1000.0)
    } else {
        format!("{}kg", round_half_up(kg) as i64)
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{}%", round_half_up(value) as i64)
}

/// Format a height stored in centimetres in the user's preferred unit
pub fn format_height(height_cm: f64, unit: HeightUnit) -> String {
    match unit {
        HeightUnit::Cm => format!("{} cm", height_cm),
        HeightUnit::Ft => cm_to_feet_inches(height_cm).to_string(),
    }
}

pub fn format_streak(days: u32) -> String {
    match days {
        0 => "No streak yet".to_string(),
        1 => "1 day streak".to_string(),
        n => format!("{} day streak", n),
    }
}

/// Weekly weight change; under 0.1 kg either way counts as stable
pub fn format_weight_trend(kg_per_week: f64) -> String {
    if kg_per_week.abs() < 0.1 {
        "Stable".to_string()
    } else if kg_per_week < 0.0 {
        format!("{:.1} kg/week loss", kg_per_week.abs())
    } else {
        format!("{:.1} kg/week gain", kg_per_week)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_weight() {
        assert_eq!(format_weight(70.0, WeightUnit::Kg), "70.0 kg");
        assert_eq!(format_weight(70.0, WeightUnit::Lbs), "154.3 lbs");
    }

    #[test]
    fn test_format_energy_and_macros() {
        assert_eq!(format_calories(2044.4), "2044 kcal");
        assert_eq!(format_macro(125.6, "protein"), "126g protein");
        assert_eq!(format_percent(74.5), "75%");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(45), "45m");
        assert_eq!(format_duration(90), "1h 30m");
        assert_eq!(format_duration(120), "2h");
    }

    #[test]
    fn test_format_volume() {
        assert_eq!(format_volume(850.0), "850kg");
        assert_eq!(format_volume(1340.0), "1.3t");
    }

    #[test]
    fn test_format_height() {
        assert_eq!(format_height(180.0, HeightUnit::Cm), "180 cm");
        assert_eq!(format_height(180.0, HeightUnit::Ft), "5'11\"");
        assert_eq!(format_height(182.5, HeightUnit::Ft), "6'0\"");
    }

    #[test]
    fn test_format_streak() {
        assert_eq!(format_streak(0), "No streak yet");
        assert_eq!(format_streak(1), "1 day streak");
        assert_eq!(format_streak(12), "12 day streak");
    }

    #[test]
    fn test_format_weight_trend() {
        assert_eq!(format_weight_trend(0.05), "Stable");
        assert_eq!(format_weight_trend(-0.5), "0.5 kg/week loss");
        assert_eq!(format_weight_trend(0.3), "0.3 kg/week gain");
    }
}
