//! 環境変数からの設定読み込み
//!
//! | 変数 | 既定値 |
//! |---|---|
//! | `STORAGE_BACKEND` | `postgres`（`memory`も可） |
//! | `DATABASE_URL` | `postgres://localhost/manga_cafe` |
//! | `DATABASE_MAX_CONNECTIONS` | `5` |
//! | `PORT` | `3000` |
//! | `OVERDUE_SWEEP_INTERVAL_SECS` | `600`（`0`で無効） |
//!
//! ログの出力レベルは`RUST_LOG`で指定する（`main`で読み込む）。
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/manga_cafe";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_OVERDUE_SWEEP_INTERVAL_SECS: u64 = 600;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("Unknown storage backend: {0} (expected 'postgres' or 'memory')")]
    UnknownBackend(String),
}

/// 永続化先
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    #[default]
    Postgres,
    /// プロセス内メモリ（再起動で消える）
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            _ => Err(ConfigError::UnknownBackend(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub storage: StorageBackend,
    pub database_url: String,
    pub max_connections: u32,
    pub port: u16,
    /// Noneの場合、延滞検出バッチを起動しない
    pub overdue_sweep_interval: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageBackend::default(),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            port: DEFAULT_PORT,
            overdue_sweep_interval: Some(Duration::from_secs(DEFAULT_OVERDUE_SWEEP_INTERVAL_SECS)),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 任意の参照関数から読み込む。未設定の項目は既定値。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let storage = match lookup("STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => defaults.storage,
        };
        let database_url = lookup("DATABASE_URL").unwrap_or(defaults.database_url);
        let max_connections =
            parse_var(&lookup, "DATABASE_MAX_CONNECTIONS")?.unwrap_or(defaults.max_connections);
        let port = parse_var(&lookup, "PORT")?.unwrap_or(defaults.port);

        let overdue_sweep_interval = match parse_var::<u64>(&lookup, "OVERDUE_SWEEP_INTERVAL_SECS")? {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => defaults.overdue_sweep_interval,
        };

        if max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                name: "DATABASE_MAX_CONNECTIONS",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            storage,
            database_url,
            max_connections,
            port,
            overdue_sweep_interval,
        })
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    lookup(name)
        .map(|value| {
            value
                .trim()
                .parse::<T>()
                .map_err(|_| ConfigError::InvalidValue { name, value })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.storage, StorageBackend::Postgres);
        assert_eq!(config.port, 3000);
        assert_eq!(config.overdue_sweep_interval, Some(Duration::from_secs(600)));
    }

    #[test]
    fn test_reads_all_variables() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("STORAGE_BACKEND", "memory"),
            ("DATABASE_URL", "postgres://db/cafe"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
            ("PORT", "8080"),
            ("OVERDUE_SWEEP_INTERVAL_SECS", "30"),
        ]))
        .unwrap();

        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.database_url, "postgres://db/cafe");
        assert_eq!(config.max_connections, 12);
        assert_eq!(config.port, 8080);
        assert_eq!(config.overdue_sweep_interval, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_zero_interval_disables_sweep() {
        let config =
            AppConfig::from_lookup(lookup_from(&[("OVERDUE_SWEEP_INTERVAL_SECS", "0")])).unwrap();
        assert_eq!(config.overdue_sweep_interval, None);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[("PORT", "eighty")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                name: "PORT",
                value: "eighty".to_string()
            }
        );

        let err = AppConfig::from_lookup(lookup_from(&[("STORAGE_BACKEND", "sqlite")])).unwrap_err();
        assert_eq!(err, ConfigError::UnknownBackend("sqlite".to_string()));

        let err =
            AppConfig::from_lookup(lookup_from(&[("DATABASE_MAX_CONNECTIONS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
