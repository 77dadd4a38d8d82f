//! Error types and handling for the Tripwise front end

use thiserror::Error;

/// Main error type for the Tripwise application
#[derive(Error, Debug)]
pub enum TripwiseError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Backend or third-party API communication errors
    #[error("API error: {message}")]
    Api { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// The mapping provider could not resolve an address
    #[error("Geocoding failed for '{address}': {status}")]
    Geocoding { address: String, status: String },

    /// A single translation request failed
    #[error("Translation error: {message}")]
    Translation { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl TripwiseError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn geocoding<A: Into<String>, S: Into<String>>(address: A, status: S) -> Self {
        Self::Geocoding {
            address: address.into(),
            status: status.into(),
        }
    }

    pub fn translation<S: Into<String>>(message: S) -> Self {
        Self::Translation {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            TripwiseError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            TripwiseError::Api { .. } => {
                "Unable to reach the travel services. Please try again later.".to_string()
            }
            TripwiseError::Validation { message } => message.clone(),
            TripwiseError::Geocoding { address, .. } => {
                format!("Could not locate '{address}' on the map.")
            }
            TripwiseError::Translation { .. } => {
                "Translation is currently unavailable.".to_string()
            }
            TripwiseError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for TripwiseError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::api(format!("Invalid response body: {err}"))
        } else {
            Self::api(format!("Request failed: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = TripwiseError::config("missing base url");
        assert!(matches!(config_err, TripwiseError::Config { .. }));

        let api_err = TripwiseError::api("connection failed");
        assert!(matches!(api_err, TripwiseError::Api { .. }));

        let geo_err = TripwiseError::geocoding("Atlantis", "ZERO_RESULTS");
        assert_eq!(
            geo_err.to_string(),
            "Geocoding failed for 'Atlantis': ZERO_RESULTS"
        );
    }

    #[test]
    fn test_user_messages() {
        let api_err = TripwiseError::api("test");
        assert!(api_err.user_message().contains("Unable to reach"));

        let validation_err = TripwiseError::validation("Please enter a destination.");
        assert_eq!(validation_err.user_message(), "Please enter a destination.");

        let geo_err = TripwiseError::geocoding("Atlantis", "ZERO_RESULTS");
        assert!(geo_err.user_message().contains("Atlantis"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: TripwiseError = io_err.into();
        assert!(matches!(err, TripwiseError::Io { .. }));
    }
}
