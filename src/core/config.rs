//! Session configuration.
//!
//! Every numeric knob the editor forwards to a pixel filter lives here as a named
//! field. None of these values is validated or clamped: what the caller sets is
//! exactly what the filter receives.

use crate::core::error::ConfigError;
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default canvas width in pixels.
pub const DEFAULT_WIDTH: u32 = 512;

/// Default canvas height in pixels.
pub const DEFAULT_HEIGHT: u32 = 512;

/// Top-level configuration for an [`EditorSession`](crate::session::EditorSession).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Width every loaded image is resized to.
    pub canvas_width: u32,
    /// Height every loaded image is resized to.
    pub canvas_height: u32,
    /// Resampling filter used on load.
    pub resize_filter: ResizeFilter,
    /// Parameters handed to registry filters by [`apply`](crate::session::EditorSession::apply).
    pub filters: FilterSettings,
}

/// Parameters for every parameterized built-in filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Used by the `clahe` filter
    pub clahe: ClaheParams,
    /// Used by the `scale_contrast` filter
    pub scale: ScaleParams,
}

/// Contrast-limited adaptive histogram equalization parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaheParams {
    /// Number of tile columns.
    pub grid_cols: u32,
    /// Number of tile rows.
    pub grid_rows: u32,
    /// Histogram clip limit relative to a uniform bin. `<= 0` disables clipping.
    pub clip_limit: f64,
}

/// Linear `alpha * v + beta` scaling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleParams {
    /// Multiplicative gain (contrast).
    pub alpha: f64,
    /// Additive offset (brightness).
    pub beta: f64,
}

/// Resampling filter for the load-time resize.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeFilter {
    /// Nearest neighbour
    Nearest,
    /// Bilinear
    #[default]
    Triangle,
    /// Cubic
    CatmullRom,
    /// Gaussian
    Gaussian,
    /// Lanczos with window 3
    Lanczos3,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_WIDTH,
            canvas_height: DEFAULT_HEIGHT,
            resize_filter: ResizeFilter::default(),
            filters: FilterSettings::default(),
        }
    }
}

impl Default for ClaheParams {
    fn default() -> Self {
        Self {
            grid_cols: 8,
            grid_rows: 8,
            clip_limit: 2.0,
        }
    }
}

impl Default for ScaleParams {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            beta: 0.0,
        }
    }
}

impl SessionConfig {
    /// Parse a configuration from TOML. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Set the canvas size.
    pub fn with_canvas_size(mut self, width: u32, height: u32) -> Self {
        self.canvas_width = width;
        self.canvas_height = height;
        self
    }
}

impl ClaheParams {
    /// Create CLAHE parameters.
    pub fn new(grid_cols: u32, grid_rows: u32, clip_limit: f64) -> Self {
        Self {
            grid_cols,
            grid_rows,
            clip_limit,
        }
    }
}

impl ScaleParams {
    /// Create scaling parameters.
    pub fn new(alpha: f64, beta: f64) -> Self {
        Self { alpha, beta }
    }
}

impl ResizeFilter {
    /// Map to the `image` crate's filter type.
    pub fn to_filter_type(self) -> FilterType {
        match self {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}
