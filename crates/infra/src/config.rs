//! Environment-driven service configuration.

/// Process configuration, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Listen address for the HTTP server (`HTTP_ADDR`).
    pub http_addr: String,
    /// Use Postgres instead of the seeded in-memory store (`USE_PERSISTENT_STORES`).
    pub use_persistent_stores: bool,
    /// Postgres connection string (`DATABASE_URL`).
    pub database_url: Option<String>,
    /// Pool size (`DATABASE_MAX_CONNECTIONS`).
    pub database_max_connections: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http_addr: "0.0.0.0:8080".to_string(),
            use_persistent_stores: false,
            database_url: None,
            database_max_connections: 5,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unparseable values fall back
    /// to the default with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            http_addr: non_empty("HTTP_ADDR").unwrap_or(defaults.http_addr),
            use_persistent_stores: parse_or(
                "USE_PERSISTENT_STORES",
                non_empty("USE_PERSISTENT_STORES"),
                defaults.use_persistent_stores,
            ),
            database_url: non_empty("DATABASE_URL"),
            database_max_connections: parse_or(
                "DATABASE_MAX_CONNECTIONS",
                non_empty("DATABASE_MAX_CONNECTIONS"),
                defaults.database_max_connections,
            ),
        }
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: core::str::FromStr + core::fmt::Debug,
{
    match raw {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("{key}={raw:?} is not valid; using default {default:?}");
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(config(&[]), AppConfig::default());
    }

    #[test]
    fn reads_all_variables() {
        let cfg = config(&[
            ("HTTP_ADDR", "127.0.0.1:9000"),
            ("USE_PERSISTENT_STORES", "true"),
            ("DATABASE_URL", "postgres://localhost/catalog"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
        ]);
        assert_eq!(cfg.http_addr, "127.0.0.1:9000");
        assert!(cfg.use_persistent_stores);
        assert_eq!(cfg.database_url.as_deref(), Some("postgres://localhost/catalog"));
        assert_eq!(cfg.database_max_connections, 12);
    }

    #[test]
    fn malformed_values_fall_back_to_defaults() {
        let cfg = config(&[
            ("USE_PERSISTENT_STORES", "yes please"),
            ("DATABASE_MAX_CONNECTIONS", "-3"),
        ]);
        assert!(!cfg.use_persistent_stores);
        assert_eq!(cfg.database_max_connections, 5);
    }

    #[test]
    fn blank_database_url_is_absent() {
        assert_eq!(config(&[("DATABASE_URL", "  ")]).database_url, None);
    }
}
