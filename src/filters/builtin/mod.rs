//! Built-in filter implementations.
//!
//! This module contains the pixel algorithms the editor ships with. Resize and
//! line drawing are used by the session directly and are not registered.

mod color;
mod draw;
mod equalize;
mod transform;

use crate::filters::registry::FilterRegistry;
use image::DynamicImage;
use rayon::prelude::*;

/// Register all built-in filters.
pub fn register_all(registry: &mut FilterRegistry) {
    color::register(registry);
    equalize::register(registry);
}

// Re-export for direct access
pub use color::{ContrastScale, Grayscale, Negative};
pub use draw::draw_line;
pub use equalize::{clahe_gray, Clahe, HistogramEqualize};
pub use transform::Resize;

/// Borrow the samples of an 8-bit image as one flat slice.
fn u8_samples_mut(image: &mut DynamicImage) -> Option<&mut [u8]> {
    match image {
        DynamicImage::ImageLuma8(buf) => Some(&mut **buf),
        DynamicImage::ImageLumaA8(buf) => Some(&mut **buf),
        DynamicImage::ImageRgb8(buf) => Some(&mut **buf),
        DynamicImage::ImageRgba8(buf) => Some(&mut **buf),
        _ => None,
    }
}

/// Map every channel of every pixel through a lookup table.
///
/// Images with wider samples are narrowed to 8-bit RGB first.
pub(crate) fn apply_lut(mut image: DynamicImage, lut: &[u8; 256]) -> DynamicImage {
    if u8_samples_mut(&mut image).is_none() {
        image = DynamicImage::ImageRgb8(image.to_rgb8());
    }

    if let Some(samples) = u8_samples_mut(&mut image) {
        samples
            .par_chunks_mut(4096)
            .for_each(|chunk| chunk.iter_mut().for_each(|v| *v = lut[*v as usize]));
    }

    image
}
