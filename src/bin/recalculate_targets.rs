//! Simple utility to recompute the stored targets from the stored profile
//! Usage: cargo run --bin recalculate_targets

use nutrifit::config::Config;
use nutrifit::context::AppContext;
use nutrifit::tools::profile;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    println!("Database: {}", config.database_path.display());

    let ctx = AppContext::open(config)?;

    let before = match ctx.session()?.profile {
        Some(p) => p,
        None => {
            println!("No profile found. Run set_profile first.");
            return Ok(());
        }
    };

    let saved = profile::recalculate_targets(&ctx)?;
    let after = &saved.profile.profile;

    println!("Profile: {}", after.name);
    println!("  TDEE: {} -> {}", before.tdee, after.tdee);
    println!("  Calories: {} -> {}", before.target_calories, after.target_calories);
    println!("  Protein: {}g -> {}g", before.target_protein, after.target_protein);
    println!("  Carbs: {}g -> {}g", before.target_carbs, after.target_carbs);
    println!("  Fat: {}g -> {}g", before.target_fat, after.target_fat);
    if saved.calories_clamped {
        println!("  Calories clamped from {} kcal", saved.unclamped_calories);
    }

    Ok(())
}
