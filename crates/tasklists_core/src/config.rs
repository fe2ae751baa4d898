//! Environment-driven core settings.
//!
//! # Responsibility
//! - Resolve where the store lives and how logging starts.
//!
//! # Invariants
//! - Blank environment values are treated as unset.
//! - Resolution never fails; unknown flag spellings fall back to defaults.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "TASKLISTS_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "TASKLISTS_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "TASKLISTS_LOG_DIR";
pub const ENV_SEED_EXAMPLES: &str = "TASKLISTS_SEED_EXAMPLES";

const DEFAULT_DB_FILE_NAME: &str = "tasklists.sqlite3";

/// Resolved runtime settings for one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite database file.
    pub db_path: PathBuf,
    /// Log level passed to `init_logging`.
    pub log_level: String,
    /// Absolute log directory. Logging stays off when `None`.
    pub log_dir: Option<String>,
    /// Seed example lists into an empty store at startup.
    pub seed_example_data: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
            seed_example_data: false,
        }
    }
}

impl CoreConfig {
    /// Builds settings from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|trimmed| !trimmed.is_empty())
        };

        Self {
            db_path: value(ENV_DB_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            log_level: value(ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
            log_dir: value(ENV_LOG_DIR),
            seed_example_data: value(ENV_SEED_EXAMPLES)
                .map(|raw| parse_flag(&raw))
                .unwrap_or(defaults.seed_example_data),
        }
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, ENV_DB_PATH, ENV_LOG_DIR, ENV_SEED_EXAMPLES};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn config_from(pairs: &[(&str, &str)]) -> CoreConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        CoreConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = config_from(&[]);
        assert_eq!(config, CoreConfig::default());
        assert!(config.db_path.ends_with("tasklists.sqlite3"));
    }

    #[test]
    fn values_are_trimmed_and_blank_values_ignored() {
        let config = config_from(&[
            (ENV_DB_PATH, "  /data/lists.db "),
            (ENV_LOG_DIR, "   "),
            (ENV_SEED_EXAMPLES, "Yes"),
        ]);
        assert_eq!(config.db_path, PathBuf::from("/data/lists.db"));
        assert_eq!(config.log_dir, None);
        assert!(config.seed_example_data);
    }

    #[test]
    fn unknown_flag_spelling_is_false() {
        let config = config_from(&[(ENV_SEED_EXAMPLES, "sure")]);
        assert!(!config.seed_example_data);
    }
}
