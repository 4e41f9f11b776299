//! Runtime configuration loaded from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::directory::CacheConfig;
use crate::resolver::{PAGE_SIZE_LIMIT, SearchConfig};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// JSON file loaded into the store at startup.
    pub seed_file: Option<PathBuf>,
    pub search: SearchConfig,
    pub name_cache: CacheConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            seed_file: None,
            search: SearchConfig::default(),
            name_cache: CacheConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Construct configuration from process environment variables.
    ///
    /// - `BOOKING_BIND_ADDR`
    /// - `BOOKING_SEED_FILE`
    /// - `BOOKING_DEFAULT_PAGE_SIZE` / `BOOKING_MAX_PAGE_SIZE`
    /// - `BOOKING_NAME_CACHE_TTL_SECS` / `BOOKING_NAME_CACHE_CAPACITY`
    ///
    /// Unset or malformed values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Construct configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = read(&lookup, "BOOKING_BIND_ADDR") {
            config.bind_addr = addr;
        }

        config.seed_file = lookup("BOOKING_SEED_FILE")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        if let Some(size) = read::<u32>(&lookup, "BOOKING_MAX_PAGE_SIZE") {
            if size > PAGE_SIZE_LIMIT {
                warn!(size, limit = PAGE_SIZE_LIMIT, "max page size above limit, clamping");
            }
            config.search.max_page_size = size.clamp(1, PAGE_SIZE_LIMIT);
        }
        if let Some(size) = read::<u32>(&lookup, "BOOKING_DEFAULT_PAGE_SIZE") {
            config.search.default_page_size = size.max(1);
        }
        if config.search.default_page_size > config.search.max_page_size {
            warn!(
                default = config.search.default_page_size,
                max = config.search.max_page_size,
                "default page size above maximum, clamping"
            );
            config.search.default_page_size = config.search.max_page_size;
        }

        if let Some(secs) = read::<u64>(&lookup, "BOOKING_NAME_CACHE_TTL_SECS") {
            config.name_cache.ttl = Duration::from_secs(secs);
        }
        if let Some(capacity) = read::<u64>(&lookup, "BOOKING_NAME_CACHE_CAPACITY") {
            config.name_cache.max_capacity = capacity;
        }

        config
    }
}

fn read<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, value = %raw, error = %e, "ignoring malformed setting");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = from_pairs(&[]);

        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:3000");
        assert_eq!(config.seed_file, None);
        assert_eq!(config.search.default_page_size, 10);
        assert_eq!(config.search.max_page_size, 100);
        assert_eq!(config.name_cache.ttl, Duration::from_secs(300));
        assert_eq!(config.name_cache.max_capacity, 10_000);
    }

    #[test]
    fn reads_every_setting() {
        let config = from_pairs(&[
            ("BOOKING_BIND_ADDR", "0.0.0.0:8080"),
            ("BOOKING_SEED_FILE", "data/seed.json"),
            ("BOOKING_MAX_PAGE_SIZE", "50"),
            ("BOOKING_DEFAULT_PAGE_SIZE", "20"),
            ("BOOKING_NAME_CACHE_TTL_SECS", "60"),
            ("BOOKING_NAME_CACHE_CAPACITY", "500"),
        ]);

        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(config.seed_file, Some(PathBuf::from("data/seed.json")));
        assert_eq!(config.search.max_page_size, 50);
        assert_eq!(config.search.default_page_size, 20);
        assert_eq!(config.name_cache.ttl, Duration::from_secs(60));
        assert_eq!(config.name_cache.max_capacity, 500);
    }

    #[test]
    fn malformed_values_keep_defaults() {
        let config = from_pairs(&[
            ("BOOKING_BIND_ADDR", "localhost"),
            ("BOOKING_MAX_PAGE_SIZE", "lots"),
            ("BOOKING_NAME_CACHE_TTL_SECS", "-1"),
        ]);

        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:3000");
        assert_eq!(config.search.max_page_size, 100);
        assert_eq!(config.name_cache.ttl, Duration::from_secs(300));
    }

    #[test]
    fn default_page_size_capped_by_max() {
        let config = from_pairs(&[
            ("BOOKING_MAX_PAGE_SIZE", "5"),
            ("BOOKING_DEFAULT_PAGE_SIZE", "0"),
        ]);
        assert_eq!(config.search.default_page_size, 1);

        let config = from_pairs(&[("BOOKING_MAX_PAGE_SIZE", "5")]);
        assert_eq!(config.search.default_page_size, 5);
    }

    #[test]
    fn max_page_size_capped_at_limit() {
        let config = from_pairs(&[
            ("BOOKING_MAX_PAGE_SIZE", "500"),
            ("BOOKING_DEFAULT_PAGE_SIZE", "250"),
        ]);
        assert_eq!(config.search.max_page_size, 100);
        assert_eq!(config.search.default_page_size, 100);
    }

    #[test]
    fn blank_seed_path_ignored() {
        let config = from_pairs(&[("BOOKING_SEED_FILE", "  ")]);
        assert_eq!(config.seed_file, None);
    }
}
