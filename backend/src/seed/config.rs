//! Seed job configuration loaded via OrthoConfig.

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_COUNT: usize = 60;
const DEFAULT_DAYS_RANGE: u32 = 30;

/// Environment variable consulted when no seed-specific URL is set.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Configuration for the `seed-webhooks` job.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "WEBHOOK_SEED")]
pub struct SeedSettings {
    /// Number of records to generate.
    pub count: Option<usize>,
    /// Days between the oldest and newest record.
    pub days_range: Option<u32>,
    /// Seed for the fixture generator; drawn from entropy when absent.
    pub rng_seed: Option<u64>,
    /// Clear and insert in one transaction.
    #[ortho_config(default = false)]
    pub atomic_replace: bool,
    /// Target database; falls back to `DATABASE_URL`.
    pub database_url: Option<String>,
}

impl SeedSettings {
    /// Configured record count, defaulting to 60.
    pub fn count(&self) -> usize {
        self.count.unwrap_or(DEFAULT_COUNT)
    }

    /// Configured window in days, defaulting to 30.
    pub fn days_range(&self) -> u32 {
        self.days_range.unwrap_or(DEFAULT_DAYS_RANGE)
    }

    /// Database URL from the settings or the `DATABASE_URL` variable.
    pub fn database_url(&self) -> Option<String> {
        self.database_url
            .clone()
            .or_else(|| std::env::var(DATABASE_URL_ENV).ok())
            .filter(|url| !url.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    const VARS: [&str; 6] = [
        "WEBHOOK_SEED_COUNT",
        "WEBHOOK_SEED_DAYS_RANGE",
        "WEBHOOK_SEED_RNG_SEED",
        "WEBHOOK_SEED_ATOMIC_REPLACE",
        "WEBHOOK_SEED_DATABASE_URL",
        DATABASE_URL_ENV,
    ];

    fn load() -> SeedSettings {
        SeedSettings::load_from_iter([OsString::from("seed-webhooks")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load();

        assert_eq!(settings.count(), 60);
        assert_eq!(settings.days_range(), 30);
        assert_eq!(settings.rng_seed, None);
        assert!(!settings.atomic_replace);
        assert_eq!(settings.database_url(), None);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("WEBHOOK_SEED_COUNT", Some("12".to_owned())),
            ("WEBHOOK_SEED_DAYS_RANGE", Some("3".to_owned())),
            ("WEBHOOK_SEED_RNG_SEED", Some("99".to_owned())),
            ("WEBHOOK_SEED_ATOMIC_REPLACE", Some("true".to_owned())),
            (
                "WEBHOOK_SEED_DATABASE_URL",
                Some("postgres://seed@localhost/webhooks".to_owned()),
            ),
            (DATABASE_URL_ENV, Some("postgres://other@localhost/db".to_owned())),
        ]);

        let settings = load();

        assert_eq!(settings.count(), 12);
        assert_eq!(settings.days_range(), 3);
        assert_eq!(settings.rng_seed, Some(99));
        assert!(settings.atomic_replace);
        assert_eq!(
            settings.database_url().as_deref(),
            Some("postgres://seed@localhost/webhooks")
        );
    }

    #[rstest]
    fn database_url_falls_back_to_shared_variable() {
        let mut vars = VARS.map(|name| (name, None::<String>));
        if let Some(last) = vars.last_mut() {
            last.1 = Some("postgres://shared@localhost/webhooks".to_owned());
        }
        let _guard = lock_env(vars);

        assert_eq!(
            load().database_url().as_deref(),
            Some("postgres://shared@localhost/webhooks")
        );
    }
}
