use std::env::VarError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Represents an error related to environment variables.
    #[error("Environment variable error: {0}")]
    EnvVarError(#[from] VarError),

    /// A variable was present (or defaulted) but could not be parsed into its target type.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A parsed value is outside the range the service can work with.
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}
