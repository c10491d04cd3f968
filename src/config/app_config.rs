use serde::Deserialize;

use crate::infrastructure::account::RememberTokenGenerator;
use crate::infrastructure::storage::PostgresConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URL; `DATABASE_URL` takes precedence when set
    pub url: Option<String>,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Random bytes per remember token
    pub remember_token_bytes: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 5,
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            remember_token_bytes: RememberTokenGenerator::DEFAULT_TOKEN_BYTES,
        }
    }
}

impl DatabaseConfig {
    /// Resolve the pool settings, preferring `DATABASE_URL` from the environment
    pub fn postgres(&self) -> Option<PostgresConfig> {
        std::env::var("DATABASE_URL")
            .ok()
            .or_else(|| self.url.clone())
            .map(|url| PostgresConfig::new(url).with_max_connections(self.max_connections))
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.security.remember_token_bytes, 16);
    }

    #[test]
    fn test_partial_sources_fill_defaults() {
        let config: AppConfig = config::Config::builder()
            .set_override("logging.format", "json")
            .unwrap()
            .set_override("database.url", "postgres://db/accounts")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.database.url.as_deref(), Some("postgres://db/accounts"));
        assert_eq!(config.security.remember_token_bytes, 16);
    }

    #[test]
    fn test_malformed_value_is_an_error() {
        let result: Result<AppConfig, _> = config::Config::builder()
            .set_override("security.remember_token_bytes", "lots")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize();

        assert!(result.is_err());
    }
}
