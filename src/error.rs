//! Error types and handling for the aurora engine

use thiserror::Error;

/// Main error type for the aurora engine
#[derive(Error, Debug)]
pub enum AuroraError {
    /// An input value lies outside its physical or documented range
    #[error("Input out of range: {field} = {value} (expected {expected})")]
    InputRange {
        field: &'static str,
        value: f64,
        expected: String,
    },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Reference dataset could not be loaded
    #[error("Dataset error: {message}")]
    Dataset { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl AuroraError {
    /// Create a new input range error
    pub fn input_range<S: Into<String>>(field: &'static str, value: f64, expected: S) -> Self {
        Self::InputRange {
            field,
            value,
            expected: expected.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new dataset error
    pub fn dataset<S: Into<String>>(message: S) -> Self {
        Self::Dataset {
            message: message.into(),
        }
    }

    /// True when the error was caused by bad telemetry or coordinates
    #[must_use]
    pub fn is_input_range(&self) -> bool {
        matches!(self, Self::InputRange { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            AuroraError::InputRange {
                field,
                value,
                expected,
            } => {
                format!("Invalid input: {field} = {value} is outside {expected}. Check the data source.")
            }
            AuroraError::Config { message } => {
                format!("Configuration error: {message}. Please check your config file.")
            }
            AuroraError::Dataset { .. } => {
                "Reference city data could not be loaded. Check the configured dataset path."
                    .to_string()
            }
            AuroraError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let range_err = AuroraError::input_range("kp", 11.0, "[0, 9]");
        assert!(matches!(range_err, AuroraError::InputRange { field: "kp", .. }));
        assert!(range_err.is_input_range());

        let config_err = AuroraError::config("bad pole");
        assert!(matches!(config_err, AuroraError::Config { .. }));
        assert!(!config_err.is_input_range());

        let dataset_err = AuroraError::dataset("empty");
        assert!(matches!(dataset_err, AuroraError::Dataset { .. }));
    }

    #[test]
    fn test_display_names_field() {
        let err = AuroraError::input_range("speed", -3.0, "a value >= 0 km/s");
        let text = err.to_string();
        assert!(text.contains("speed"));
        assert!(text.contains("-3"));
    }

    #[test]
    fn test_user_messages() {
        let range_err = AuroraError::input_range("latitude", 95.0, "[-90, 90]");
        assert!(range_err.user_message().contains("latitude"));

        let config_err = AuroraError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let dataset_err = AuroraError::dataset("broken json");
        assert!(dataset_err.user_message().contains("Reference city data"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let aurora_err: AuroraError = io_err.into();
        assert!(matches!(aurora_err, AuroraError::Io { .. }));
    }
}
