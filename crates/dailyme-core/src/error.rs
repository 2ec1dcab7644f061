//! Core error types for dailyme-core.
//!
//! The analyzers in [`crate::insights`] are infallible: insufficient or
//! malformed data is reported through hints and sentinels, never through
//! these types. Errors only arise at the edges: loading configuration and
//! pulling records from a [`crate::engine::PatientDataSource`].

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for dailyme-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A data source could not deliver patient records
    #[error("Data source '{source_name}' failed: {message}")]
    Source {
        source_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// Build a [`CoreError::Source`] without an underlying cause.
    pub fn source_failed(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        CoreError::Source {
            source_name: source_name.into(),
            message: message.into(),
            source: None,
        }
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Dot-path key does not name a configuration field
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Numeric value outside its allowed range
    #[error("Value {value} for '{field}' is outside [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_error_message_names_the_source() {
        let err = CoreError::source_failed("history-service", "timed out");
        assert_eq!(
            err.to_string(),
            "Data source 'history-service' failed: timed out"
        );
    }

    #[test]
    fn config_error_wraps_into_core_error() {
        let err: CoreError = ConfigError::UnknownKey("risk.nope".into()).into();
        assert!(matches!(err, CoreError::Config(ConfigError::UnknownKey(_))));
        assert!(err.to_string().contains("risk.nope"));
    }

    #[test]
    fn out_of_range_formats_bounds() {
        let err = ValidationError::OutOfRange {
            field: "scoring.completion_weight".into(),
            value: 1.5,
            min: 0.0,
            max: 1.0,
        };
        assert_eq!(
            err.to_string(),
            "Value 1.5 for 'scoring.completion_weight' is outside [0, 1]"
        );
    }

    #[test]
    fn json_error_converts_with_question_mark() {
        fn parse(raw: &str) -> Result<serde_json::Value> {
            Ok(serde_json::from_str(raw)?)
        }
        let err = parse("{not json").unwrap_err();
        assert!(matches!(err, CoreError::Json(_)));
        assert!(err.to_string().starts_with("JSON error:"));
    }

    #[test]
    fn source_error_keeps_its_cause() {
        use std::error::Error as _;

        let cause = std::io::Error::new(std::io::ErrorKind::TimedOut, "socket timed out");
        let err = CoreError::Source {
            source_name: "mood-service".into(),
            message: "fetch failed".into(),
            source: Some(Box::new(cause)),
        };
        assert_eq!(err.source().unwrap().to_string(), "socket timed out");
        assert!(CoreError::source_failed("mood-service", "down").source().is_none());
    }
}
