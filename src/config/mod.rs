//! Configuration management
//!
//! Settings come from the process environment (plus a `.env` file when one is
//! present). Every key has a development default except `DATABASE_URL`, which
//! the Postgres backend requires. Production refuses the development secret
//! and the in-memory backend.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::auth::DEFAULT_COST;

/// Secret used when `JWT_SECRET` is unset; refused in production
pub const DEVELOPMENT_JWT_SECRET: &str = "development-secret-change-in-production";

/// Longest accepted token lifetime (ten years)
pub const MAX_TOKEN_TTL_HOURS: i64 = 87_600;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Development),
            "prod" | "production" => Ok(Environment::Production),
            other => Err(ConfigError::invalid(
                "ENVIRONMENT",
                format!("'{}' (expected development or production)", other),
            )),
        }
    }
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

/// Where accounts, diaries and requests are persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres { database_url: String },
    Memory,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Postgres { .. } => "postgres",
            StorageBackend::Memory => "memory",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,

    /// HTTP listen port (`PORT`, default 8080)
    pub port: u16,

    pub storage: StorageBackend,

    /// Postgres pool size (`DB_MAX_CONNECTIONS`, default 5)
    pub db_max_connections: u32,

    /// Upper bound on any single store call (`STORE_TIMEOUT_SECS`, default 100)
    pub store_timeout: Duration,

    /// Comma-separated origin allowlist; unset means permissive CORS
    pub cors_allowed_origins: Option<String>,

    /// Fallback filter when `RUST_LOG` is unset in the subscriber
    pub log_level: String,

    pub jwt_secret: String,
    pub access_token_ttl_hours: i64,
    pub refresh_token_ttl_hours: i64,

    /// bcrypt work factor (`BCRYPT_COST`, default 14)
    pub bcrypt_cost: u32,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is not an error
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = parse_or(&lookup, "ENVIRONMENT", Environment::Development)?;

        let storage = match lookup("STORAGE_BACKEND")
            .unwrap_or_else(|| "postgres".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "postgres" => StorageBackend::Postgres {
                database_url: lookup("DATABASE_URL")
                    .ok_or(ConfigError::MissingEnvVar("DATABASE_URL"))?,
            },
            "memory" => StorageBackend::Memory,
            other => {
                return Err(ConfigError::invalid(
                    "STORAGE_BACKEND",
                    format!("'{}' (expected postgres or memory)", other),
                ))
            }
        };

        let bcrypt_cost = parse_or(&lookup, "BCRYPT_COST", DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::invalid(
                "BCRYPT_COST",
                format!("{} is outside 4..=31", bcrypt_cost),
            ));
        }

        let config = Config {
            environment,
            port: parse_or(&lookup, "PORT", 8080)?,
            storage,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            store_timeout: Duration::from_secs(parse_or(&lookup, "STORE_TIMEOUT_SECS", 100)?),
            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS").filter(|s| !s.trim().is_empty()),
            log_level: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            jwt_secret: lookup("JWT_SECRET")
                .unwrap_or_else(|| DEVELOPMENT_JWT_SECRET.to_string()),
            access_token_ttl_hours: parse_or(&lookup, "ACCESS_TOKEN_TTL_HOURS", 24)?,
            refresh_token_ttl_hours: parse_or(&lookup, "REFRESH_TOKEN_TTL_HOURS", 168)?,
            bcrypt_cost,
        };
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::invalid("JWT_SECRET", "must not be empty"));
        }
        for (key, hours) in [
            ("ACCESS_TOKEN_TTL_HOURS", self.access_token_ttl_hours),
            ("REFRESH_TOKEN_TTL_HOURS", self.refresh_token_ttl_hours),
        ] {
            if !(1..=MAX_TOKEN_TTL_HOURS).contains(&hours) {
                return Err(ConfigError::invalid(
                    key,
                    format!("{} is outside 1..={}", hours, MAX_TOKEN_TTL_HOURS),
                ));
            }
        }

        if self.environment.is_production() {
            if self.jwt_secret == DEVELOPMENT_JWT_SECRET {
                return Err(ConfigError::MissingEnvVar("JWT_SECRET"));
            }
            if self.storage == StorageBackend::Memory {
                return Err(ConfigError::invalid(
                    "STORAGE_BACKEND",
                    "memory is not allowed in production",
                ));
            }
        }

        Ok(())
    }

    pub fn access_token_ttl(&self) -> chrono::Duration {
        token_ttl(self.access_token_ttl_hours)
    }

    pub fn refresh_token_ttl(&self) -> chrono::Duration {
        token_ttl(self.refresh_token_ttl_hours)
    }

    /// Database URL with the password replaced, for logging
    pub fn database_url_masked(&self) -> Option<String> {
        let StorageBackend::Postgres { database_url } = &self.storage else {
            return None;
        };

        let masked = database_url
            .find('@')
            .and_then(|at| database_url[..at].rfind(':').map(|colon| (colon, at)))
            // A colon right before `//` is the scheme, not a password separator
            .filter(|&(colon, _)| !database_url[colon + 1..].starts_with("//"))
            .map(|(colon, at)| {
                format!("{}:****{}", &database_url[..colon], &database_url[at..])
            });

        Some(masked.unwrap_or_else(|| database_url.clone()))
    }
}

// Clamped to the range `validate` accepts
fn token_ttl(hours: i64) -> chrono::Duration {
    chrono::Duration::hours(hours.clamp(1, MAX_TOKEN_TTL_HOURS))
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::invalid(key, format!("'{}'", raw))),
        None => Ok(default),
    }
}
