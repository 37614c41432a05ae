//! Application context
//!
//! The database handle and resolved configuration travel together through the
//! tool layer. A `Session` is a point-in-time read of the stored profile.

use crate::config::Config;
use crate::db::{migrations, Database, DbResult};
use crate::models::Profile;

#[derive(Clone)]
pub struct AppContext {
    pub database: Database,
    pub config: Config,
}

impl AppContext {
    pub fn new(database: Database, config: Config) -> Self {
        Self { database, config }
    }

    /// Create the data directory if needed, open the pool and migrate
    pub fn open(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        if let Some(parent) = config.database_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let database = Database::new(&config.database_path)?;
        database.with_conn(|conn| {
            migrations::run_migrations(conn)?;
            let version = migrations::get_schema_version(conn)?;
            tracing::info!(version, "database schema ready");
            Ok(())
        })?;

        Ok(Self::new(database, config))
    }

    /// Snapshot the stored profile
    pub fn session(&self) -> DbResult<Session> {
        let profile = self.database.with_conn(Profile::get)?;
        Ok(Session::from_profile(profile))
    }
}

/// Profile snapshot handed to anything that needs the current targets
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub profile: Option<Profile>,
    pub onboarded: bool,
}

impl Session {
    pub fn from_profile(profile: Option<Profile>) -> Self {
        let onboarded = profile.as_ref().is_some_and(|p| p.onboarding_completed);
        Self { profile, onboarded }
    }

    /// The profile, or a message telling the caller to onboard first
    pub fn require_profile(&self) -> Result<&Profile, String> {
        self.profile
            .as_ref()
            .ok_or_else(|| "No profile found. Call set_profile to complete onboarding first.".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_creates_and_migrates() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::new(dir.path().join("nested").join("nutrifit.db"));
        let ctx = AppContext::open(config).unwrap();

        let current = ctx.database.with_conn(migrations::is_current).unwrap();
        assert!(current);

        let session = ctx.session().unwrap();
        assert!(session.profile.is_none());
        assert!(!session.onboarded);
        assert!(session.require_profile().is_err());
    }
}
