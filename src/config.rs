//! Runtime configuration
//!
//! Everything is read from the environment; unset variables fall back to the
//! defaults below.

use std::path::{Path, PathBuf};

use thiserror::Error;

pub const DATABASE_PATH_VAR: &str = "NUTRIFIT_DATABASE_PATH";
pub const MIN_CALORIE_TARGET_VAR: &str = "NUTRIFIT_MIN_CALORIE_TARGET";
pub const MAX_CALORIE_TARGET_VAR: &str = "NUTRIFIT_MAX_CALORIE_TARGET";

pub const DEFAULT_MIN_CALORIE_TARGET: i32 = 1200;
pub const DEFAULT_MAX_CALORIE_TARGET: i32 = 6000;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var} must be a whole number of calories, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },

    #[error("calorie bounds are inverted: min {min} > max {max}")]
    InvertedBounds { min: i32, max: i32 },
}

/// Resolved settings shared by the server and the CLI tools
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_path: PathBuf,
    pub min_calorie_target: i32,
    pub max_calorie_target: i32,
}

impl Config {
    /// Defaults with an explicit database location
    pub fn new<P: AsRef<Path>>(database_path: P) -> Self {
        Self {
            database_path: database_path.as_ref().to_path_buf(),
            min_calorie_target: DEFAULT_MIN_CALORIE_TARGET,
            max_calorie_target: DEFAULT_MAX_CALORIE_TARGET,
        }
    }

    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_path = lookup(DATABASE_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(default_database_path);

        let min_calorie_target =
            parse_calories(MIN_CALORIE_TARGET_VAR, lookup(MIN_CALORIE_TARGET_VAR))?
                .unwrap_or(DEFAULT_MIN_CALORIE_TARGET);
        let max_calorie_target =
            parse_calories(MAX_CALORIE_TARGET_VAR, lookup(MAX_CALORIE_TARGET_VAR))?
                .unwrap_or(DEFAULT_MAX_CALORIE_TARGET);

        if min_calorie_target > max_calorie_target {
            return Err(ConfigError::InvertedBounds {
                min: min_calorie_target,
                max: max_calorie_target,
            });
        }

        Ok(Self {
            database_path,
            min_calorie_target,
            max_calorie_target,
        })
    }

    /// Apply the calorie-bound policy to an engine target
    pub fn clamp_calories(&self, target_calories: i32) -> i32 {
        target_calories.clamp(self.min_calorie_target, self.max_calorie_target)
    }
}

fn parse_calories(var: &'static str, value: Option<String>) -> Result<Option<i32>, ConfigError> {
    match value {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<i32>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { var, value: raw }),
    }
}

/// `data/nutrifit.db` under the project root when running from target/,
/// otherwise next to the executable
pub fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    // Go up from target/release or target/debug to project root
    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(parent) = path.parent() {
            if let Some(grandparent) = parent.parent() {
                path = grandparent.to_path_buf();
            }
        }
    }

    path.push("data");
    path.push("nutrifit.db");
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.min_calorie_target, 1200);
        assert_eq!(config.max_calorie_target, 6000);
        assert!(config.database_path.ends_with("data/nutrifit.db"));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            (DATABASE_PATH_VAR, "/tmp/nf.db"),
            (MIN_CALORIE_TARGET_VAR, " 1500 "),
            (MAX_CALORIE_TARGET_VAR, "4000"),
        ]))
        .unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/nf.db"));
        assert_eq!(config.min_calorie_target, 1500);
        assert_eq!(config.max_calorie_target, 4000);
    }

    #[test]
    fn test_bad_values() {
        let err = Config::from_lookup(lookup_from(&[(MIN_CALORIE_TARGET_VAR, "lots")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { var: MIN_CALORIE_TARGET_VAR, .. }));

        let err = Config::from_lookup(lookup_from(&[
            (MIN_CALORIE_TARGET_VAR, "3000"),
            (MAX_CALORIE_TARGET_VAR, "2000"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::InvertedBounds { min: 3000, max: 2000 });
    }

    #[test]
    fn test_clamp_calories() {
        let config = Config::new("/tmp/nf.db");
        assert_eq!(config.clamp_calories(900), 1200);
        assert_eq!(config.clamp_calories(2044), 2044);
        assert_eq!(config.clamp_calories(7000), 6000);
    }
}
