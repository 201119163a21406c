//! Error types for the inverter historic store.
//!
//! Every store operation returns [`Error`]. Callers that need to tell a schema
//! mismatch apart from any other failure (for example to run a migration)
//! should match on [`Error::WrongSchema`] or call [`Error::is_wrong_schema`].

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type alias using our custom error types.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Base error for all historic store failures.
#[derive(Error, Debug)]
pub enum Error {
    /// Persisted schema does not match what the store expects
    #[error("wrong schema: expected {expected}, found {found}")]
    WrongSchema { expected: String, found: String },

    /// A sample already exists for this serial, timestamp and sample type
    #[error("duplicate sample for '{serial}' at {timestamp}")]
    Duplicate {
        serial: String,
        timestamp: DateTime<Utc>,
    },

    /// Sample rejected before reaching storage
    #[error("invalid sample: {0}")]
    InvalidSample(String),

    /// Sample type code or name is not one of the known values
    #[error("unknown sample type: {0}")]
    UnknownSampleType(String),

    /// Storage-level failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration-related errors
    #[error("configuration error")]
    Config(#[from] ConfigError),
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable parsing failed
    #[error("failed to parse environment variables: {0}")]
    EnvParse(String),

    /// Required configuration value is missing
    #[error("missing required configuration: {0}")]
    Missing(String),

    /// Configuration value is invalid
    #[error("invalid configuration value for {field}: {message}")]
    Invalid { field: String, message: String },
}

impl Error {
    /// Returns true when the failure is a schema mismatch.
    pub fn is_wrong_schema(&self) -> bool {
        matches!(self, Self::WrongSchema { .. })
    }

    /// Creates a wrong schema error.
    pub fn wrong_schema(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::WrongSchema {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Creates a duplicate sample error.
    pub fn duplicate(serial: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self::Duplicate {
            serial: serial.into(),
            timestamp,
        }
    }

    /// Creates an invalid sample error.
    pub fn invalid_sample(message: impl Into<String>) -> Self {
        Self::InvalidSample(message.into())
    }
}

impl ConfigError {
    /// Creates a new environment parse error.
    pub fn env_parse(err: impl std::fmt::Display) -> Self {
        Self::EnvParse(err.to_string())
    }

    /// Creates a new missing configuration error.
    pub fn missing(field: impl Into<String>) -> Self {
        Self::Missing(field.into())
    }

    /// Creates a new invalid configuration error.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    mod store_error {
        use super::*;

        #[test]
        fn test_wrong_schema() {
            let err = Error::wrong_schema("version 1", "version 0");
            assert_eq!(err.to_string(), "wrong schema: expected version 1, found version 0");
            assert!(err.is_wrong_schema());
        }

        #[test]
        fn test_duplicate() {
            let ts = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
            let err = Error::duplicate("INV001", ts);
            assert_eq!(
                err.to_string(),
                "duplicate sample for 'INV001' at 2024-01-01 12:00:00 UTC"
            );
            assert!(!err.is_wrong_schema());
        }

        #[test]
        fn test_invalid_sample() {
            let err = Error::invalid_sample("serial must not be empty");
            assert_eq!(err.to_string(), "invalid sample: serial must not be empty");
            assert!(!err.is_wrong_schema());
        }

        #[test]
        fn test_database_error_is_not_wrong_schema() {
            let err: Error = sqlx::Error::PoolClosed.into();
            assert!(matches!(err, Error::Database(_)));
            assert!(!err.is_wrong_schema());
        }
    }

    mod config_error {
        use super::*;

        #[test]
        fn test_env_parse_error() {
            let err = ConfigError::env_parse("invalid format");
            assert_eq!(err.to_string(), "failed to parse environment variables: invalid format");
        }

        #[test]
        fn test_missing_error() {
            let err = ConfigError::missing("STORE_PATH");
            assert_eq!(err.to_string(), "missing required configuration: STORE_PATH");
        }

        #[test]
        fn test_invalid_error() {
            let err = ConfigError::invalid("max_connections", "must be greater than zero");
            assert_eq!(
                err.to_string(),
                "invalid configuration value for max_connections: must be greater than zero"
            );
        }
    }

    mod error_conversion {
        use super::*;

        #[test]
        fn test_config_error_conversion() {
            let config_err = ConfigError::missing("test");
            let err: Error = config_err.into();
            assert!(matches!(err, Error::Config(_)));
        }

        #[test]
        fn test_anyhow_conversion() {
            let err = Error::wrong_schema("version 1", "no schema table");
            let anyhow_err: anyhow::Error = err.into();
            assert!(anyhow_err.to_string().contains("wrong schema"));
            assert!(anyhow_err
                .downcast_ref::<Error>()
                .is_some_and(Error::is_wrong_schema));
        }
    }
}
