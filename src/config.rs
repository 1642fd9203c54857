//! Runtime configuration from environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `PORT` | 5000 |
//! | `CATEGORY_TABLE_PATH` | `data/ingredients.csv` |
//! | `CATALOG_BASE_URL` | `https://world.openfoodfacts.org` |
//! | `LOOKUP_TIMEOUT_SECS` | 8 |
//! | `LOOKUP_CACHE_CAPACITY` | 50 |
//! | `SNAPSHOT_PATH` | `ingredients_data.json` |
//!
//! Unparseable numbers fall back to their defaults.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_CATEGORY_TABLE_PATH: &str = "data/ingredients.csv";
pub const DEFAULT_CATALOG_BASE_URL: &str = "https://world.openfoodfacts.org";
pub const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 8;
pub const DEFAULT_LOOKUP_CACHE_CAPACITY: u64 = 50;
pub const DEFAULT_SNAPSHOT_PATH: &str = "ingredients_data.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub category_table_path: PathBuf,
    pub catalog_base_url: String,
    pub lookup_timeout: Duration,
    pub lookup_cache_capacity: u64,
    pub snapshot_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            category_table_path: PathBuf::from(DEFAULT_CATEGORY_TABLE_PATH),
            catalog_base_url: DEFAULT_CATALOG_BASE_URL.to_string(),
            lookup_timeout: Duration::from_secs(DEFAULT_LOOKUP_TIMEOUT_SECS),
            lookup_cache_capacity: DEFAULT_LOOKUP_CACHE_CAPACITY,
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key → value source (the environment in production).
    pub fn from_lookup<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let port = get("PORT")
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(defaults.port);

        let category_table_path = get("CATEGORY_TABLE_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.category_table_path);

        let catalog_base_url = get("CATALOG_BASE_URL")
            .filter(|u| !u.trim().is_empty())
            .unwrap_or(defaults.catalog_base_url);

        let lookup_timeout = get("LOOKUP_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.lookup_timeout);

        let lookup_cache_capacity = get("LOOKUP_CACHE_CAPACITY")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.lookup_cache_capacity);

        let snapshot_path = get("SNAPSHOT_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.snapshot_path);

        Self {
            port,
            category_table_path,
            catalog_base_url,
            lookup_timeout,
            lookup_cache_capacity,
            snapshot_path,
        }
    }

    pub fn log(&self) {
        tracing::info!("Configuration:");
        tracing::info!("  PORT: {}", self.port);
        tracing::info!("  CATEGORY_TABLE_PATH: {:?}", self.category_table_path);
        tracing::info!("  CATALOG_BASE_URL: {}", self.catalog_base_url);
        tracing::info!("  LOOKUP_TIMEOUT_SECS: {}", self.lookup_timeout.as_secs());
        tracing::info!("  LOOKUP_CACHE_CAPACITY: {}", self.lookup_cache_capacity);
        tracing::info!("  SNAPSHOT_PATH: {:?}", self.snapshot_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(Config::from_lookup(|_| None), Config::default());
    }

    #[test]
    fn test_overrides_and_bad_values() {
        let vars: HashMap<&str, &str> = [
            ("PORT", "8080"),
            ("CATEGORY_TABLE_PATH", "/etc/eco/ingredients.csv"),
            ("LOOKUP_TIMEOUT_SECS", "zero"),
            ("LOOKUP_CACHE_CAPACITY", "200"),
        ]
        .into_iter()
        .collect();
        let config = Config::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.port, 8080);
        assert_eq!(config.category_table_path, PathBuf::from("/etc/eco/ingredients.csv"));
        assert_eq!(config.lookup_timeout, Duration::from_secs(DEFAULT_LOOKUP_TIMEOUT_SECS));
        assert_eq!(config.lookup_cache_capacity, 200);
        assert_eq!(config.catalog_base_url, DEFAULT_CATALOG_BASE_URL);
    }
}
