//! # Pixstack - Versioned Image Editing
//!
//! Pixstack keeps an editing session as a linear history of committed images.
//! Every filter pushes exactly one new image; undo pops exactly one. Line
//! annotations are staged separately and flattened into a single history entry on
//! commit, so one undo removes a whole batch of strokes.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pixstack::prelude::*;
//!
//! let mut session = EditorSession::new();
//! session.load("input.png")?;
//! session.clahe(ClaheParams::default())?;
//!
//! session.record_line(10, 10, 200, 200, 3, "#FF0000");
//! session.record_line(10, 200, 200, 10, 3, Rgb::new(0, 0, 255));
//! session.commit_overlay()?;
//!
//! if session.can_undo() {
//!     session.undo()?;
//! }
//! session.save("output")?; // written as output.jpg
//! # Ok::<(), EditorError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: Colors, configuration, the `ImageFilter` trait, and error types
//! - [`history`]: The history stack and the overlay staging buffer
//! - [`filters`]: Filter registry and built-in pixel filters
//! - [`session`]: The editing session tying history, overlay and filters together

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod filters;
pub mod history;
pub mod session;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust,ignore
/// use pixstack::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::core::types::{blank_canvas, Color, Rgb};

    // Configuration
    pub use crate::core::config::{
        ClaheParams, FilterSettings, ResizeFilter, ScaleParams, SessionConfig,
    };

    // Filters
    pub use crate::core::node::{Category, FilterMetadata, ImageFilter};
    pub use crate::filters::builtin::{
        Clahe, ContrastScale, Grayscale, HistogramEqualize, Negative, Resize,
    };
    pub use crate::filters::registry::{FilterFactory, FilterRegistry};

    // Errors
    pub use crate::core::error::{
        ColorError, ConfigError, EditorError, EditorResult, FilterError, SessionId,
    };

    // History
    pub use crate::history::{HistoryStack, LineRequest, OverlayStagingBuffer};

    // Session
    pub use crate::session::{EditorSession, SharedSession};
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
