use std::time::Duration;
use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/booking";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// 設定の読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a valid number (got {value:?})")]
    InvalidNumber { name: &'static str, value: String },
}

/// アプリケーション設定
///
/// 環境変数から読み込む。未設定の項目はデフォルト値を使う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub max_connections: u32,
    pub request_timeout: Duration,
}

impl AppConfig {
    /// プロセスの環境変数から設定を読み込む
    ///
    /// - `DATABASE_URL`
    /// - `PORT`
    /// - `DATABASE_MAX_CONNECTIONS`
    /// - `REQUEST_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 任意の参照関数から設定を読み込む（テスト用に環境変数を差し替えられる）
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let port = parse_or(&lookup, "PORT", DEFAULT_PORT)?;
        let max_connections =
            parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        let timeout_secs =
            parse_or(&lookup, "REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;

        Ok(Self {
            database_url,
            port,
            max_connections,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
        None => Ok(default),
    }
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
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.port, 3000);
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.listen_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_values_from_environment() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db/booking"),
            ("PORT", "8080"),
            ("DATABASE_MAX_CONNECTIONS", "20"),
            ("REQUEST_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.database_url, "postgres://db/booking");
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_connections, 20);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_number_rejected() {
        let result = AppConfig::from_lookup(lookup_from(&[("PORT", "eighty")]));
        assert_eq!(
            result.unwrap_err(),
            ConfigError::InvalidNumber {
                name: "PORT",
                value: "eighty".to_string()
            }
        );
    }
}
