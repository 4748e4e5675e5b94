//! ImageFilter trait and filter metadata.
//!
//! The ImageFilter trait is the seam between the editing session and the pixel
//! algorithms. The session only ever hands a filter a private copy of the current
//! image and pushes whatever comes back, so filters are free to consume and
//! mutate their input.

use crate::core::error::FilterResult;
use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// Category for organizing filters in listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Basic transformations (resize)
    Transform,
    /// Tone adjustments (equalization, contrast)
    Adjust,
    /// Color manipulation (grayscale, negative)
    Color,
    /// Custom/user-defined
    Custom,
}

impl Category {
    /// Get the display name for this category.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Transform => "Transform",
            Category::Adjust => "Adjust",
            Category::Color => "Color",
            Category::Custom => "Custom",
        }
    }

    /// Get all categories in display order.
    pub fn all() -> &'static [Category] {
        &[
            Category::Transform,
            Category::Adjust,
            Category::Color,
            Category::Custom,
        ]
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Custom
    }
}

/// A named, documented filter parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterInfo {
    /// Field name in `FilterSettings`
    pub name: String,
    /// What the parameter controls
    pub description: String,
}

/// Metadata describing a filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterMetadata {
    /// Unique identifier for this filter type (e.g., "equalize_histogram")
    pub id: String,
    /// Human-readable name (e.g., "Histogram Equalization")
    pub name: String,
    /// Category for organization
    pub category: Category,
    /// Detailed description
    pub description: String,
    /// Parameters read from [`FilterSettings`](crate::core::config::FilterSettings)
    pub parameters: Vec<ParameterInfo>,
    /// Whether the output may have a different channel count than the input
    pub changes_channels: bool,
}

impl FilterMetadata {
    /// Create a new metadata builder.
    pub fn builder(id: impl Into<String>, name: impl Into<String>) -> FilterMetadataBuilder {
        FilterMetadataBuilder::new(id, name)
    }

    /// Get all parameter names.
    pub fn parameter_names(&self) -> Vec<&str> {
        self.parameters.iter().map(|p| p.name.as_str()).collect()
    }
}

/// Builder for FilterMetadata.
pub struct FilterMetadataBuilder {
    id: String,
    name: String,
    category: Category,
    description: String,
    parameters: Vec<ParameterInfo>,
    changes_channels: bool,
}

impl FilterMetadataBuilder {
    /// Create a new builder with required fields.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: Category::Custom,
            description: String::new(),
            parameters: Vec::new(),
            changes_channels: false,
        }
    }

    /// Set the category.
    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a parameter.
    pub fn parameter(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.parameters.push(ParameterInfo {
            name: name.into(),
            description: description.into(),
        });
        self
    }

    /// Mark as possibly changing the channel layout.
    pub fn changes_channels(mut self) -> Self {
        self.changes_channels = true;
        self
    }

    /// Build the metadata.
    pub fn build(self) -> FilterMetadata {
        FilterMetadata {
            id: self.id,
            name: self.name,
            category: self.category,
            description: self.description,
            parameters: self.parameters,
            changes_channels: self.changes_channels,
        }
    }
}

/// The core trait for pixel filters.
///
/// # Contract
///
/// `apply` receives an owned copy of the session's current image and returns the
/// transformed image. It must either return a complete image or fail without side
/// effects; the session pushes the result only on success.
///
/// # Thread Safety
///
/// `Send + Sync` bounds allow filters to sit in a shared registry.
///
/// # Example Implementation
///
/// ```ignore
/// #[derive(Clone)]
/// struct Flip;
///
/// impl ImageFilter for Flip {
///     fn metadata(&self) -> FilterMetadata {
///         FilterMetadata::builder("flip", "Flip")
///             .category(Category::Transform)
///             .build()
///     }
///
///     fn apply(&self, image: DynamicImage) -> FilterResult<DynamicImage> {
///         Ok(image.fliph())
///     }
///
///     fn clone_box(&self) -> Box<dyn ImageFilter> {
///         Box::new(self.clone())
///     }
/// }
/// ```
pub trait ImageFilter: Send + Sync {
    /// Return metadata describing this filter.
    fn metadata(&self) -> FilterMetadata;

    /// Transform an image.
    fn apply(&self, image: DynamicImage) -> FilterResult<DynamicImage>;

    /// Clone this filter into a box.
    fn clone_box(&self) -> Box<dyn ImageFilter>;
}

impl Clone for Box<dyn ImageFilter> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
