// src/error.rs

//! Unified error handling for the NOTAM search application.

use std::fmt;

use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Location code is not a 4-character ICAO/FIR identifier
    #[error("Invalid location '{location}': expected a 4-character ICAO code")]
    InvalidLocation { location: String },

    /// Upstream fetch for a single location failed
    #[error("Fetch error for {location}: {message}")]
    Fetch { location: String, message: String },

    /// User-supplied regex failed to compile
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Nothing to run
    #[error("Nothing to search: {0}")]
    EmptyInput(String),
}

impl AppError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an invalid location error.
    pub fn invalid_location(location: impl Into<String>) -> Self {
        Self::InvalidLocation {
            location: location.into(),
        }
    }

    /// Create a fetch error with the location it belongs to.
    pub fn fetch(location: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Fetch {
            location: location.into(),
            message: message.to_string(),
        }
    }

    /// Create a pattern compilation error.
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.to_string(),
        }
    }

    /// Create an empty input error.
    pub fn empty_input(message: impl Into<String>) -> Self {
        Self::EmptyInput(message.into())
    }
}
