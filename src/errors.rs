/*!
 * Error types for the ollama-i18n application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),
}

/// Errors raised while validating, translating or persisting locale documents
#[derive(Error, Debug)]
pub enum TranslationError {
    /// A value other than a string, array or object was found in a locale document
    #[error("Invalid value type at {path}. Only strings, arrays, and objects are allowed. Found: {found}")]
    InvalidValueType {
        /// Dot/bracket key path of the offending value
        path: String,
        /// JSON type name of the offending value
        found: String,
    },

    /// The model call failed or its answer did not match the response schema
    #[error("Translation failed: {cause}")]
    TranslationFailure {
        /// Underlying cause
        cause: String,
    },

    /// A translation failure attached to the key that was being translated
    #[error("Failed to translate key {path}: {source}")]
    KeyPath {
        /// Key path of the string leaf
        path: String,
        /// The wrapped failure
        #[source]
        source: Box<TranslationError>,
    },

    /// A previously written target file exists but cannot be used as a cache
    #[error("Cannot read cached translations from {path}: {cause}")]
    CacheReadFailure {
        /// Target file path
        path: String,
        /// Underlying cause
        cause: String,
    },

    /// Reading or writing a locale file failed
    #[error("I/O error on {path}: {cause}")]
    Io {
        /// File path
        path: String,
        /// Underlying cause
        cause: String,
    },
}

impl TranslationError {
    /// Build a `TranslationFailure` from anything printable
    pub fn failure(cause: impl std::fmt::Display) -> Self {
        Self::TranslationFailure {
            cause: cause.to_string(),
        }
    }

    /// Attach the key path of the leaf being translated
    pub fn at_key(self, path: &str) -> Self {
        match self {
            // Keep the innermost path only
            Self::KeyPath { .. } => self,
            other => Self::KeyPath {
                path: path.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// Whether this error is (or wraps) a model translation failure
    pub fn is_translation_failure(&self) -> bool {
        match self {
            Self::TranslationFailure { .. } => true,
            Self::KeyPath { source, .. } => source.is_translation_failure(),
            _ => false,
        }
    }
}

impl From<ProviderError> for TranslationError {
    fn from(error: ProviderError) -> Self {
        Self::failure(error)
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// One or more locales failed while the others were attempted
    #[error("Translation failed for {count} locale(s): {locales}")]
    LocalesFailed {
        /// Number of failed jobs
        count: usize,
        /// Comma separated failed locale labels
        locales: String,
    },

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
