//! Utility to seed or replace the profile from the command line
//! Usage: cargo run --bin set_profile -- --name Sam --age 30 --sex male \
//!        --height-cm 175 --weight-kg 70 --goal fat_loss --activity-level moderately_active

use std::path::PathBuf;

use clap::Parser;
use nutrifit::config::Config;
use nutrifit::context::AppContext;
use nutrifit::metrics::{parse_variant, ActivityLevel, Goal, Sex};
use nutrifit::models::{HeightUnit, ProfileInput, WeightUnit};
use nutrifit::tools::profile;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "set_profile",
    about = "Create or replace the NutriFit profile and compute its targets"
)]
struct Args {
    #[arg(long)]
    name: String,

    #[arg(long)]
    age: u32,

    /// male, female or other
    #[arg(long)]
    sex: String,

    #[arg(long)]
    height_cm: f64,

    #[arg(long)]
    weight_kg: f64,

    /// fat_loss, muscle_gain, recomposition, endurance, maintenance
    #[arg(long, default_value = "maintenance")]
    goal: String,

    /// sedentary, lightly_active, moderately_active, very_active, extremely_active
    #[arg(long, default_value = "sedentary")]
    activity_level: String,

    /// Display unit for weight: kg or lbs
    #[arg(long, default_value = "kg")]
    weight_unit: String,

    /// Display unit for height: cm or ft
    #[arg(long, default_value = "cm")]
    height_unit: String,

    /// Database file, overriding NUTRIFIT_DATABASE_PATH
    #[arg(long)]
    database_path: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("nutrifit=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = Config::from_env()?;
    if let Some(path) = args.database_path {
        config.database_path = path;
    }
    println!("Database path: {}", config.database_path.display());

    let input = ProfileInput {
        name: args.name,
        age: args.age,
        sex: parse_variant("sex", &args.sex, Sex::from_str)?,
        height_cm: args.height_cm,
        weight_kg: args.weight_kg,
        weight_unit: parse_variant("weight unit", &args.weight_unit, WeightUnit::from_str)?,
        height_unit: parse_variant("height unit", &args.height_unit, HeightUnit::from_str)?,
        goal: parse_variant("goal", &args.goal, Goal::from_str)?,
        activity_level: parse_variant("activity level", &args.activity_level, ActivityLevel::from_str)?,
    };

    let ctx = AppContext::open(config)?;
    let saved = profile::set_profile(&ctx, input)?;
    let stored = &saved.profile.profile;

    println!("Profile set:");
    println!("  Name: {}", stored.name);
    println!("  Goal: {}", saved.profile.goal_display);
    println!("  Activity: {}", saved.profile.activity_display);
    println!("  Weight: {}", saved.profile.formatted.weight);
    println!("  Height: {}", saved.profile.formatted.height);
    println!("  BMR: {:.2}", stored.bmr);
    println!("  TDEE: {}", stored.tdee);
    println!("  Target: {}", saved.profile.formatted.target_calories);
    if saved.calories_clamped {
        println!("  (clamped from {} kcal)", saved.unclamped_calories);
    }
    println!(
        "  Macros: {}, {}, {}",
        saved.profile.formatted.protein, saved.profile.formatted.carbs, saved.profile.formatted.fat
    );
    println!("  Water: {} ml", saved.profile.water_target_ml);

    Ok(())
}
