//! Error types and handling for `TripScout`

use thiserror::Error;

/// Main error type for the `TripScout` pipelines
#[derive(Error, Debug)]
pub enum TripScoutError {
    /// A credential still holds its placeholder value
    #[error("Configuration missing: {message}")]
    ConfigurationMissing { message: String },

    /// Blank search query
    #[error("Empty input: {message}")]
    EmptyInput { message: String },

    /// Non-success HTTP status or transport failure
    #[error("Network error: {message}")]
    Network { message: String },

    /// Payload could not be decoded or lacked a required field
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    /// Invalid request parameters
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Configuration file errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl TripScoutError {
    /// Create a new configuration-missing error
    pub fn configuration_missing<S: Into<String>>(message: S) -> Self {
        Self::ConfigurationMissing {
            message: message.into(),
        }
    }

    /// Create a new empty-input error
    pub fn empty_input<S: Into<String>>(message: S) -> Self {
        Self::EmptyInput {
            message: message.into(),
        }
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a new malformed-response error
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Get the message shown to the user at a pipeline boundary.
    ///
    /// Pipeline failures carry their description verbatim so the view can
    /// interpolate it after the `Error:` marker.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            TripScoutError::ConfigurationMissing { message }
            | TripScoutError::EmptyInput { message }
            | TripScoutError::Network { message }
            | TripScoutError::MalformedResponse { message }
            | TripScoutError::Validation { message } => message.clone(),
            TripScoutError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            TripScoutError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}
