//! Transform filters: Resize

use crate::core::config::ResizeFilter;
use crate::core::error::{FilterError, FilterResult};
use crate::core::node::{Category, FilterMetadata, ImageFilter};
use image::DynamicImage;

/// Resizes an image to exact dimensions, ignoring aspect ratio.
#[derive(Debug, Clone)]
pub struct Resize {
    width: u32,
    height: u32,
    filter: ResizeFilter,
}

impl Resize {
    /// Resize to exactly `width` x `height`.
    pub fn new(width: u32, height: u32, filter: ResizeFilter) -> Self {
        Self {
            width,
            height,
            filter,
        }
    }
}

impl ImageFilter for Resize {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::builder("resize", "Resize")
            .description("Resize an image to exact dimensions")
            .category(Category::Transform)
            .parameter("width", "Target width in pixels")
            .parameter("height", "Target height in pixels")
            .build()
    }

    fn apply(&self, image: DynamicImage) -> FilterResult<DynamicImage> {
        if self.width == 0 || self.height == 0 {
            return Err(FilterError::invalid_parameter(
                "resize",
                "size",
                format!("target size must be non-zero, got {}x{}", self.width, self.height),
            ));
        }

        if image.width() == self.width && image.height() == self.height {
            return Ok(image);
        }

        Ok(image.resize_exact(self.width, self.height, self.filter.to_filter_type()))
    }

    fn clone_box(&self) -> Box<dyn ImageFilter> {
        Box::new(self.clone())
    }
}
