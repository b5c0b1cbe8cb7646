use std::{env, net::IpAddr, str::FromStr};

use dotenvy::dotenv;
use log::{debug, info, warn};
use serde::Deserialize;

use crate::errors::ConfigError;

// Server-specific configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub workers: usize,
}

// Application-specific configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub name: String,
    pub version: String,
    pub environment: Environment,
    pub log_level: String,
    pub seed_data: bool,
}

// Short code allocation settings
#[derive(Debug, Deserialize, Clone)]
pub struct ShortCodeConfig {
    pub length: usize,
    pub max_attempts: usize,
}

// Session cookie settings
#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub cookie_secure: bool,
    pub max_sessions: usize,
    pub idle_timeout_secs: u64,
}

// Environment enum for different deployment environments
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Testing,
    Production,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "testing" | "test" => Ok(Environment::Testing),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(format!(
                "Invalid environment: {}. Must be one of: development, testing, production",
                s
            )),
        }
    }
}

// Result type for configuration functions
type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub app: AppConfig,
    pub short_code: ShortCodeConfig,
    pub session: SessionConfig,
}

impl Config {
    // Load configuration from environment variables
    pub fn load() -> ConfigResult<Self> {
        match dotenv() {
            Ok(_) => debug!(".env file loaded successfully"),
            Err(e) => warn!("Could not load .env file: {}", e),
        }

        let server = ServerConfig {
            host: get_env_or_default("SERVER_HOST", "127.0.0.1")?,
            port: get_env_or_default("SERVER_PORT", "8080")?,
            workers: get_env_or_default("SERVER_WORKERS", "4")?,
        };

        let version = option_env!("CARGO_PKG_VERSION")
            .unwrap_or("0.1.0")
            .to_string();

        let app = AppConfig {
            name: get_env_or_default("APP_NAME", "tinyurl")?,
            version: env::var("APP_VERSION").unwrap_or(version),
            environment: get_env_or_default("APP_ENVIRONMENT", "development")?,
            log_level: get_env_or_default("RUST_LOG", "info")?,
            seed_data: get_env_or_default("APP_SEED_DATA", "true")?,
        };

        let short_code = ShortCodeConfig {
            length: get_env_or_default("SHORT_CODE_LENGTH", "6")?,
            max_attempts: get_env_or_default("SHORT_CODE_MAX_ATTEMPTS", "5")?,
        };

        let session = SessionConfig {
            cookie_name: get_env_or_default("SESSION_COOKIE_NAME", "session")?,
            cookie_secure: get_env_or_default("SESSION_COOKIE_SECURE", "false")?,
            max_sessions: get_env_or_default("SESSION_MAX_ENTRIES", "10000")?,
            idle_timeout_secs: get_env_or_default("SESSION_IDLE_TIMEOUT_SECS", "86400")?,
        };

        let config = Config {
            server,
            app,
            short_code,
            session,
        };
        config.validate()?;

        info!("Configuration loaded successfully");
        debug!("Loaded config: {:?}", config);

        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.short_code.length == 0 {
            return Err(ConfigError::InvalidValue(
                "SHORT_CODE_LENGTH must be at least 1".to_string(),
            ));
        }
        if self.short_code.max_attempts == 0 {
            return Err(ConfigError::InvalidValue(
                "SHORT_CODE_MAX_ATTEMPTS must be at least 1".to_string(),
            ));
        }
        if self.session.cookie_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "SESSION_COOKIE_NAME must not be empty".to_string(),
            ));
        }
        if self.session.max_sessions == 0 {
            return Err(ConfigError::InvalidValue(
                "SESSION_MAX_ENTRIES must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    /// Defaults used when no environment is present (tests, embedded use).
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: IpAddr::from([127, 0, 0, 1]),
                port: 8080,
                workers: 4,
            },
            app: AppConfig {
                name: "tinyurl".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                environment: Environment::Development,
                log_level: "info".to_string(),
                seed_data: true,
            },
            short_code: ShortCodeConfig {
                length: 6,
                max_attempts: 5,
            },
            session: SessionConfig {
                cookie_name: "session".to_string(),
                cookie_secure: false,
                max_sessions: 10_000,
                idle_timeout_secs: 24 * 60 * 60,
            },
        }
    }
}

/// Helper function to get an env variable with a default value
fn get_env_or_default<T: FromStr>(key: &str, default: &str) -> ConfigResult<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| ConfigError::ParseError(format!("Could not parse {}: {}", key, e))),
        Err(env::VarError::NotPresent) => {
            debug!("{} not set, using default: {}", key, default);
            default.parse::<T>().map_err(|e| {
                ConfigError::ParseError(format!("Could not parse default for {}: {}", key, e))
            })
        }
        Err(e) => Err(ConfigError::EnvVarError(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_from_str() {
        assert_eq!("prod".parse::<Environment>(), Ok(Environment::Production));
        assert_eq!("Testing".parse::<Environment>(), Ok(Environment::Testing));
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn test_get_env_or_default_uses_default() {
        let port: u16 = get_env_or_default("TINYURL_TEST_UNSET_PORT", "8080").unwrap();
        assert_eq!(port, 8080);

        let bad: ConfigResult<u16> = get_env_or_default("TINYURL_TEST_UNSET_PORT", "nope");
        assert!(matches!(bad, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_validate_rejects_zero_length_codes() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.short_code.length = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));

        let mut config = Config::default();
        config.session.max_sessions = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));
    }
}
