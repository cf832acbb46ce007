//! Error types for adsync
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for adsync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for adsync
#[derive(Error, Debug)]
pub enum Error {
    /// A required CSV cell is empty
    #[error("Row {row}: the {entity} has no {field}")]
    MissingField {
        /// 1-based data row number
        row: usize,
        /// Entity kind being loaded ("campaign", "ad group", "keyword")
        entity: &'static str,
        /// Human-readable field name
        field: &'static str,
    },

    /// A header referenced by the heading map is absent from the file
    #[error(
        "Column '{column}' (field '{field}') is missing from the CSV header. \
         The CSV delimiter must be wrong or the file doesn't follow the heading map"
    )]
    MissingColumn {
        /// Logical field name
        field: &'static str,
        /// Physical header expected in the file
        column: String,
    },

    /// A keyword targeting value matched none of the configured labels
    #[error("Row {row}: the keyword has an invalid targeting '{value}' (must match the targeting map)")]
    InvalidTargeting {
        /// 1-based data row number
        row: usize,
        /// Raw value found in the file
        value: String,
    },

    /// Invalid input (command line, file names, account ids)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// CSV reader errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// Authentication errors
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limiting errors
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Remote entity not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Directory-specific error
    #[error("Directory error ({directory}): {message}")]
    Directory {
        /// Directory name
        directory: String,
        /// Error message
        message: String,
    },

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a missing-field error
    pub fn missing_field(row: usize, entity: &'static str, field: &'static str) -> Self {
        Self::MissingField { row, entity, field }
    }

    /// Create a missing-column error
    pub fn missing_column(field: &'static str, column: impl Into<String>) -> Self {
        Self::MissingColumn {
            field,
            column: column.into(),
        }
    }

    /// Create an invalid targeting error
    pub fn invalid_targeting(row: usize, value: impl Into<String>) -> Self {
        Self::InvalidTargeting {
            row,
            value: value.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a rate limit error
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a directory-specific error
    pub fn directory(directory: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Directory {
            directory: directory.into(),
            message: message.into(),
        }
    }

    /// Whether this error comes from validating user input
    ///
    /// Validation errors abort before any remote call is made and map to
    /// a different process exit code than remote failures.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingField { .. }
                | Self::MissingColumn { .. }
                | Self::InvalidTargeting { .. }
                | Self::InvalidInput(_)
                | Self::Config(_)
                | Self::Csv(_)
        )
    }
}
