//! Color filters: Grayscale, Negative, ContrastScale

use super::apply_lut;
use crate::core::config::ScaleParams;
use crate::core::error::FilterResult;
use crate::core::node::{Category, FilterMetadata, ImageFilter};
use crate::filters::registry::FilterRegistry;
use image::DynamicImage;

/// Register color filters.
pub fn register(registry: &mut FilterRegistry) {
    registry.register(|_| Box::new(Grayscale));
    registry.register(|_| Box::new(Negative));
    registry.register(|settings| Box::new(ContrastScale::new(settings.scale)));
}

/// Converts an image to single-channel luma.
#[derive(Debug, Clone)]
pub struct Grayscale;

impl ImageFilter for Grayscale {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::builder("grayscale", "Grayscale")
            .description("Convert an image to a single luma channel")
            .category(Category::Color)
            .changes_channels()
            .build()
    }

    fn apply(&self, image: DynamicImage) -> FilterResult<DynamicImage> {
        Ok(DynamicImage::ImageLuma8(image.to_luma8()))
    }

    fn clone_box(&self) -> Box<dyn ImageFilter> {
        Box::new(self.clone())
    }
}

/// Inverts every channel: `v -> 255 - v`.
///
/// Applied to all channels alike, alpha included, so applying it twice restores
/// the original samples exactly.
#[derive(Debug, Clone)]
pub struct Negative;

impl ImageFilter for Negative {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::builder("negative", "Negative")
            .description("Replace every channel value v with 255 - v")
            .category(Category::Color)
            .build()
    }

    fn apply(&self, image: DynamicImage) -> FilterResult<DynamicImage> {
        let mut lut = [0u8; 256];
        for (i, v) in lut.iter_mut().enumerate() {
            *v = 255 - i as u8;
        }
        Ok(apply_lut(image, &lut))
    }

    fn clone_box(&self) -> Box<dyn ImageFilter> {
        Box::new(self.clone())
    }
}

/// Linear brightness/contrast scaling with absolute value and saturation.
///
/// `dst = min(255, round(|alpha * src + beta|))`. Parameters are used as given.
#[derive(Debug, Clone)]
pub struct ContrastScale {
    params: ScaleParams,
}

impl ContrastScale {
    /// Create the filter with fixed parameters.
    pub fn new(params: ScaleParams) -> Self {
        Self { params }
    }

    /// Parameters this filter was built with.
    pub fn params(&self) -> ScaleParams {
        self.params
    }

    fn lut(&self) -> [u8; 256] {
        let ScaleParams { alpha, beta } = self.params;
        let mut lut = [0u8; 256];
        for (i, v) in lut.iter_mut().enumerate() {
            // NaN saturates to 0 through the cast.
            *v = (alpha * i as f64 + beta).abs().round().min(255.0) as u8;
        }
        lut
    }
}

impl ImageFilter for ContrastScale {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::builder("scale_contrast", "Contrast & Brightness")
            .description("Scale every channel by alpha, add beta, take the absolute value and saturate")
            .category(Category::Adjust)
            .parameter("alpha", "Multiplicative gain")
            .parameter("beta", "Additive offset")
            .build()
    }

    fn apply(&self, image: DynamicImage) -> FilterResult<DynamicImage> {
        Ok(apply_lut(image, &self.lut()))
    }

    fn clone_box(&self) -> Box<dyn ImageFilter> {
        Box::new(self.clone())
    }
}
