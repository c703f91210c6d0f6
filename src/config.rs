//! Configuration is loaded from environment variables with fallback to defaults.

use std::{collections::HashMap, env, str::FromStr};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection string
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret key for signing session tokens
    pub jwt_secret: String,
    pub admin_token_ttl_secs: i64,
    pub user_token_ttl_secs: i64,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Browser origins allowed to call the API (storefront and dashboard)
    pub allowed_origins: Vec<String>,
}

/// Load configuration from the process environment.
pub fn load() -> Result<AppConfig, ConfigError> {
    AppConfig::from_lookup(|key| env::var(key).ok())
}

impl AppConfig {
    /// Build the configuration from any key lookup, so tests can feed a map
    /// instead of mutating the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingRequired(key.to_string()))
        };

        let allowed_origins = ["FRONTEND_URL", "DASHBOARD_URL"]
            .iter()
            .filter_map(|key| lookup(key))
            .filter(|origin| !origin.trim().is_empty())
            .collect();

        Ok(AppConfig {
            server: ServerConfig {
                host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: parse_or(&lookup, "PORT", 3000)?,
            },
            database: DatabaseConfig {
                url: required("DATABASE_URL")?,
                max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
                connection_timeout_secs: parse_or(&lookup, "DATABASE_CONNECTION_TIMEOUT_SECS", 30)?,
            },
            auth: AuthConfig {
                jwt_secret: required("JWT_SECRET_KEY")?,
                admin_token_ttl_secs: parse_or(&lookup, "ADMIN_TOKEN_TTL_SECS", 3600)?, // 1 hour
                user_token_ttl_secs: parse_or(&lookup, "USER_TOKEN_TTL_SECS", 86400)?, // 24 hours
            },
            cors: CorsConfig { allowed_origins },
        })
    }

    pub fn from_map(values: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| values.get(key).cloned())
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> HashMap<String, String> {
        HashMap::from([
            ("DATABASE_URL".to_string(), "postgres://localhost/shop".to_string()),
            ("JWT_SECRET_KEY".to_string(), "secret".to_string()),
        ])
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_map(&base()).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.auth.admin_token_ttl_secs, 3600);
        assert_eq!(config.auth.user_token_ttl_secs, 86400);
        assert!(config.cors.allowed_origins.is_empty());
    }

    #[test]
    fn test_missing_secret() {
        let mut values = base();
        values.remove("JWT_SECRET_KEY");

        let err = AppConfig::from_map(&values).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequired(key) if key == "JWT_SECRET_KEY"));
    }

    #[test]
    fn test_invalid_port() {
        let mut values = base();
        values.insert("PORT".to_string(), "eighty".to_string());

        let err = AppConfig::from_map(&values).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(key) if key == "PORT"));
    }

    #[test]
    fn test_cors_origins() {
        let mut values = base();
        values.insert("FRONTEND_URL".to_string(), "http://localhost:5173".to_string());
        values.insert("DASHBOARD_URL".to_string(), "http://localhost:5174".to_string());

        let config = AppConfig::from_map(&values).unwrap();
        assert_eq!(
            config.cors.allowed_origins,
            vec!["http://localhost:5173", "http://localhost:5174"]
        );
    }
}
