//! Histogram filters: HistogramEqualize, Clahe
//!
//! Both work on luma and hand back a 3-channel image so later color operations
//! (overlay lines in particular) keep their color.

use crate::core::config::ClaheParams;
use crate::core::error::{FilterError, FilterResult};
use crate::core::node::{Category, FilterMetadata, ImageFilter};
use crate::filters::registry::FilterRegistry;
use image::{DynamicImage, GrayImage};
use rayon::prelude::*;

const BINS: usize = 256;

/// Register histogram filters.
pub fn register(registry: &mut FilterRegistry) {
    registry.register(|_| Box::new(HistogramEqualize));
    registry.register(|settings| Box::new(Clahe::new(settings.clahe)));
}

/// Global histogram equalization.
#[derive(Debug, Clone)]
pub struct HistogramEqualize;

impl ImageFilter for HistogramEqualize {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::builder("equalize_histogram", "Histogram Equalization")
            .description("Equalize the luma histogram of the whole image")
            .category(Category::Adjust)
            .changes_channels()
            .build()
    }

    fn apply(&self, image: DynamicImage) -> FilterResult<DynamicImage> {
        let gray = image.to_luma8();
        let equalized = imageproc::contrast::equalize_histogram(&gray);
        Ok(DynamicImage::ImageRgb8(
            DynamicImage::ImageLuma8(equalized).to_rgb8(),
        ))
    }

    fn clone_box(&self) -> Box<dyn ImageFilter> {
        Box::new(self.clone())
    }
}

/// Contrast-limited adaptive histogram equalization.
#[derive(Debug, Clone)]
pub struct Clahe {
    params: ClaheParams,
}

impl Clahe {
    /// Create the filter with fixed parameters.
    pub fn new(params: ClaheParams) -> Self {
        Self { params }
    }

    /// Parameters this filter was built with.
    pub fn params(&self) -> ClaheParams {
        self.params
    }
}

impl ImageFilter for Clahe {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::builder("clahe", "CLAHE")
            .description("Contrast-limited adaptive histogram equalization over a tile grid")
            .category(Category::Adjust)
            .parameter("grid_cols", "Number of tile columns")
            .parameter("grid_rows", "Number of tile rows")
            .parameter("clip_limit", "Histogram clip limit, <= 0 disables clipping")
            .changes_channels()
            .build()
    }

    fn apply(&self, image: DynamicImage) -> FilterResult<DynamicImage> {
        let equalized = clahe_gray(&image.to_luma8(), &self.params)?;
        Ok(DynamicImage::ImageRgb8(
            DynamicImage::ImageLuma8(equalized).to_rgb8(),
        ))
    }

    fn clone_box(&self) -> Box<dyn ImageFilter> {
        Box::new(self.clone())
    }
}

/// Split `len` pixels into `tiles` contiguous spans and compute, for every pixel,
/// the two neighbouring tiles and the blend weight between their centers.
struct Axis {
    bounds: Vec<u32>,
    neighbours: Vec<(usize, usize, f32)>,
}

impl Axis {
    fn new(len: u32, tiles: u32) -> Self {
        let bounds: Vec<u32> = (0..=tiles)
            .map(|i| (i as u64 * len as u64 / tiles as u64) as u32)
            .collect();
        let centers: Vec<f32> = bounds
            .windows(2)
            .map(|w| (w[0] + w[1] - 1) as f32 / 2.0)
            .collect();
        let last = centers.len() - 1;

        let mut neighbours = Vec::with_capacity(len as usize);
        let mut cursor = 0;
        for p in 0..len {
            let pf = p as f32;
            if pf <= centers[0] {
                neighbours.push((0, 0, 0.0));
            } else if pf >= centers[last] {
                neighbours.push((last, last, 0.0));
            } else {
                while centers[cursor + 1] <= pf {
                    cursor += 1;
                }
                let weight = (pf - centers[cursor]) / (centers[cursor + 1] - centers[cursor]);
                neighbours.push((cursor, cursor + 1, weight));
            }
        }

        Self { bounds, neighbours }
    }

    fn span(&self, tile: usize) -> std::ops::Range<u32> {
        self.bounds[tile]..self.bounds[tile + 1]
    }
}

/// Clip a tile histogram and redistribute the excess evenly.
fn clip_histogram(hist: &mut [u32; BINS], limit: u32) {
    let mut excess: u32 = 0;
    for count in hist.iter_mut() {
        if *count > limit {
            excess += *count - limit;
            *count = limit;
        }
    }

    let batch = excess / BINS as u32;
    let mut residual = excess - batch * BINS as u32;
    for count in hist.iter_mut() {
        *count += batch;
    }

    if residual > 0 {
        let step = (BINS / residual as usize).max(1);
        let mut i = 0;
        while i < BINS && residual > 0 {
            hist[i] += 1;
            residual -= 1;
            i += step;
        }
    }
}

/// Run CLAHE on a gray image.
///
/// Fails when either grid dimension is zero or exceeds the image size.
pub fn clahe_gray(gray: &GrayImage, params: &ClaheParams) -> FilterResult<GrayImage> {
    let (width, height) = gray.dimensions();
    let ClaheParams {
        grid_cols,
        grid_rows,
        clip_limit,
    } = *params;

    if grid_cols == 0 || grid_rows == 0 {
        return Err(FilterError::invalid_parameter(
            "clahe",
            "grid",
            format!("tile grid must be non-empty, got {}x{}", grid_cols, grid_rows),
        ));
    }
    if grid_cols > width || grid_rows > height {
        return Err(FilterError::invalid_parameter(
            "clahe",
            "grid",
            format!(
                "tile grid {}x{} exceeds image size {}x{}",
                grid_cols, grid_rows, width, height
            ),
        ));
    }

    let xs = Axis::new(width, grid_cols);
    let ys = Axis::new(height, grid_rows);
    let cols = grid_cols as usize;

    let luts: Vec<[u8; BINS]> = (0..(grid_rows as usize * cols))
        .into_par_iter()
        .map(|index| {
            let (ty, tx) = (index / cols, index % cols);
            let mut hist = [0u32; BINS];
            let mut area = 0u32;
            for y in ys.span(ty) {
                for x in xs.span(tx) {
                    hist[gray.get_pixel(x, y)[0] as usize] += 1;
                    area += 1;
                }
            }

            if clip_limit > 0.0 {
                let limit = ((clip_limit * area as f64 / BINS as f64) as u32).max(1);
                clip_histogram(&mut hist, limit);
            }

            let scale = 255.0 / area as f32;
            let mut lut = [0u8; BINS];
            let mut sum = 0u32;
            for (value, count) in lut.iter_mut().zip(hist.iter()) {
                sum += count;
                *value = (sum as f32 * scale).round().min(255.0) as u8;
            }
            lut
        })
        .collect();

    let mut samples = vec![0u8; width as usize * height as usize];
    samples
        .par_chunks_mut(width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            let (ty0, ty1, wy) = ys.neighbours[y];
            for (x, out) in row.iter_mut().enumerate() {
                let (tx0, tx1, wx) = xs.neighbours[x];
                let v = gray.get_pixel(x as u32, y as u32)[0] as usize;

                let top = luts[ty0 * cols + tx0][v] as f32 * (1.0 - wx)
                    + luts[ty0 * cols + tx1][v] as f32 * wx;
                let bottom = luts[ty1 * cols + tx0][v] as f32 * (1.0 - wx)
                    + luts[ty1 * cols + tx1][v] as f32 * wx;

                *out = (top * (1.0 - wy) + bottom * wy).round().clamp(0.0, 255.0) as u8;
            }
        });

    GrayImage::from_raw(width, height, samples).ok_or_else(|| FilterError::Unsupported {
        filter: "clahe".to_string(),
        reason: "output buffer size mismatch".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb, RgbImage};

    fn gradient(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, _| Luma([(x * 255 / (width - 1)) as u8]))
    }

    #[test]
    fn test_equalize_returns_three_channels() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([10, 20, 30])));
        let out = HistogramEqualize.apply(image).unwrap();
        assert_eq!(out.color(), image::ColorType::Rgb8);
        assert_eq!((out.width(), out.height()), (8, 8));
    }

    #[test]
    fn test_equalize_stretches_narrow_range() {
        let narrow = GrayImage::from_fn(16, 1, |x, _| Luma([100 + (x as u8 % 2)]));
        let out = HistogramEqualize
            .apply(DynamicImage::ImageLuma8(narrow))
            .unwrap()
            .to_luma8();
        let max = out.pixels().map(|p| p[0]).max().unwrap();
        assert_eq!(max, 255);
    }

    #[test]
    fn test_clahe_uniform_image_stays_uniform() {
        let flat = GrayImage::from_pixel(64, 64, Luma([90]));
        let out = clahe_gray(&flat, &ClaheParams::default()).unwrap();
        let first = out.get_pixel(0, 0)[0];
        assert!(out.pixels().all(|p| p[0] == first));
    }

    #[test]
    fn test_clahe_preserves_order_on_gradient() {
        let out = clahe_gray(&gradient(64, 8), &ClaheParams::new(4, 2, 2.0)).unwrap();
        assert_eq!(out.dimensions(), (64, 8));
        assert!(out.get_pixel(0, 4)[0] <= out.get_pixel(63, 4)[0]);
    }

    #[test]
    fn test_clahe_uneven_tiles() {
        let out = clahe_gray(&gradient(13, 7), &ClaheParams::new(3, 2, 0.0)).unwrap();
        assert_eq!(out.dimensions(), (13, 7));
    }

    #[test]
    fn test_clahe_rejects_empty_grid() {
        let err = clahe_gray(&gradient(8, 8), &ClaheParams::new(0, 8, 2.0)).unwrap_err();
        assert!(matches!(err, FilterError::InvalidParameter { .. }));
    }

    #[test]
    fn test_clahe_rejects_grid_larger_than_image() {
        assert!(clahe_gray(&gradient(4, 4), &ClaheParams::new(8, 8, 2.0)).is_err());
    }

    #[test]
    fn test_clahe_filter_returns_three_channels() {
        let image = DynamicImage::ImageLuma8(gradient(32, 32));
        let out = Clahe::new(ClaheParams::default()).apply(image).unwrap();
        assert_eq!(out.color(), image::ColorType::Rgb8);
    }

    #[test]
    fn test_clip_histogram_conserves_mass() {
        let mut hist = [0u32; BINS];
        hist[10] = 1000;
        hist[200] = 24;
        clip_histogram(&mut hist, 40);
        assert_eq!(hist.iter().sum::<u32>(), 1024);
        assert!(hist[10] <= 44);
    }
}
