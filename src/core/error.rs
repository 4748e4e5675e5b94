//! Error types for Pixstack.
//!
//! Uses thiserror for structured errors with context. Errors are designed to:
//! - Name the file or parameter that caused the failure
//! - Leave the session untouched whenever they are returned
//! - Support error chaining for codec failures

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for an editing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Create a new random session ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a session ID from a UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Top-level error type for editor operations.
#[derive(Error, Debug)]
pub enum EditorError {
    /// An input file could not be read or decoded.
    #[error("Failed to decode image {path}: {source}")]
    Decode {
        /// File that was being opened
        path: PathBuf,
        /// Underlying codec error
        #[source]
        source: image::ImageError,
    },

    /// The current image could not be written.
    #[error("Failed to encode image {path}: {source}")]
    Encode {
        /// Destination after extension normalization
        path: PathBuf,
        /// Underlying codec error
        #[source]
        source: image::ImageError,
    },

    /// Undo was requested while only the floor state remains.
    #[error("Nothing to undo: history holds only the initial state")]
    EmptyHistory,

    /// A staged line carried a malformed color.
    #[error("Color error: {0}")]
    Color(#[from] ColorError),

    /// A filter rejected its parameters or input.
    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),

    /// No filter is registered under this id.
    #[error("Filter '{0}' is not registered")]
    UnknownFilter(String),

    /// Settings could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors from decoding a color specification.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorError {
    /// Not exactly six digits after the optional `#`.
    #[error("Invalid hex color '{input}': expected 6 hex digits, got {len}")]
    InvalidLength {
        /// The string as supplied
        input: String,
        /// Number of characters found
        len: usize,
    },

    /// Six characters, but not all of them hex digits.
    #[error("Invalid hex color '{input}': '{digits}' is not hexadecimal")]
    InvalidDigit {
        /// The string as supplied
        input: String,
        /// The offending digits
        digits: String,
    },
}

/// Errors raised by a pixel filter before it produces an image.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterError {
    /// A parameter value the filter cannot work with.
    #[error("Invalid parameter '{parameter}' for filter '{filter}': {reason}")]
    InvalidParameter {
        /// Filter id
        filter: String,
        /// Parameter name
        parameter: String,
        /// What is wrong with the value
        reason: String,
    },

    /// The image itself cannot be processed.
    #[error("Filter '{filter}' cannot process this image: {reason}")]
    Unsupported {
        /// Filter id
        filter: String,
        /// Why the image was rejected
        reason: String,
    },
}

/// Errors from loading a session configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config {path}: {source}")]
    Io {
        /// Config file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for a session config.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

// ============================================================================
// Error Utilities
// ============================================================================

impl EditorError {
    /// Check if this error comes from a caller skipping a precondition check.
    ///
    /// Usage errors indicate a bug in the caller (for example undoing without
    /// consulting `can_undo`), as opposed to a bad file or parameter.
    pub fn is_usage_error(&self) -> bool {
        matches!(self, EditorError::EmptyHistory | EditorError::UnknownFilter(_))
    }

    /// Get the file path involved in this error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            EditorError::Decode { path, .. } | EditorError::Encode { path, .. } => Some(path),
            EditorError::Config(ConfigError::Io { path, .. }) => Some(path),
            _ => None,
        }
    }
}

impl FilterError {
    /// Shorthand for an invalid parameter error.
    pub fn invalid_parameter(
        filter: impl Into<String>,
        parameter: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        FilterError::InvalidParameter {
            filter: filter.into(),
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

/// Result type alias for filter operations.
pub type FilterResult<T> = Result<T, FilterError>;
