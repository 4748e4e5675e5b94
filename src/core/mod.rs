//! Core types and traits for the Pixstack editor.
//!
//! This module contains the foundational pieces shared by the session, history
//! and filter modules:
//! - Color values and the blank canvas constructor
//! - Session configuration and filter parameters
//! - The ImageFilter trait and its metadata
//! - Error types

pub mod config;
pub mod error;
pub mod node;
pub mod types;

// Re-export commonly used types
pub use config::{ClaheParams, FilterSettings, ResizeFilter, ScaleParams, SessionConfig};
pub use error::{ColorError, ConfigError, EditorError, EditorResult, FilterError, SessionId};
pub use node::{Category, FilterMetadata, ImageFilter};
pub use types::{Color, Rgb};
