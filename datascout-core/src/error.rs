//! Error types for DataScout.
//!
//! Only configuration problems are fatal and surface through this enum at
//! scan level. Every per-file failure is absorbed by the analyzer and
//! recorded as data on the [`crate::models::FileRecord`] instead.

use thiserror::Error;

/// Main error type for DataScout operations.
#[derive(Debug, Error)]
pub enum DataScoutError {
    /// Pattern document or CLI configuration error. Fatal: aborts the scan
    /// before any file is processed.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// I/O operation failed
    #[error("I/O operation failed: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization or deserialization failed
    #[error("Serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results with DataScoutError
pub type Result<T> = std::result::Result<T, DataScoutError>;

impl DataScoutError {
    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates an I/O error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Creates a serialization error with context
    pub fn serialization(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            context: context.into(),
            source,
        }
    }
}
