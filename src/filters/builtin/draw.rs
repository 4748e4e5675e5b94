//! Line rasterization for overlay commits.

use crate::core::types::Rgb;
use image::{DynamicImage, ImageBuffer, Luma, LumaA, Pixel, Rgba};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut, BresenhamLineIter};

/// Draw a straight line of the given stroke width onto an image.
///
/// A width of zero or less draws nothing. Width 1 is a plain Bresenham segment;
/// wider strokes stamp filled discs of radius `width / 2` along the segment, which
/// gives round caps. Pixels outside the image are clipped. Gray images receive the
/// color's luma.
pub fn draw_line(image: &mut DynamicImage, start: (i32, i32), end: (i32, i32), width: i32, color: Rgb) {
    if width <= 0 {
        return;
    }

    match image {
        DynamicImage::ImageRgb8(buf) => stroke(buf, start, end, width, image::Rgb(color.to_array())),
        DynamicImage::ImageRgba8(buf) => {
            stroke(buf, start, end, width, Rgba([color.r, color.g, color.b, 255]))
        }
        DynamicImage::ImageLuma8(buf) => stroke(buf, start, end, width, Luma([color.luma()])),
        DynamicImage::ImageLumaA8(buf) => stroke(buf, start, end, width, LumaA([color.luma(), 255])),
        other => {
            let mut rgb = other.to_rgb8();
            stroke(&mut rgb, start, end, width, image::Rgb(color.to_array()));
            *other = DynamicImage::ImageRgb8(rgb);
        }
    }
}

fn stroke<P>(
    canvas: &mut ImageBuffer<P, Vec<P::Subpixel>>,
    start: (i32, i32),
    end: (i32, i32),
    width: i32,
    pixel: P,
) where
    P: Pixel,
{
    let (w, h) = canvas.dimensions();
    if w == 0 || h == 0 {
        return;
    }

    // A disc never needs to be larger than the canvas diagonal.
    let diagonal = (w as f64).hypot(h as f64).ceil();
    let radius = (width / 2).min(diagonal as i32);

    let margin = radius as f64;
    let clipped = clip_segment(
        (start.0 as f64, start.1 as f64),
        (end.0 as f64, end.1 as f64),
        (-margin, -margin),
        (w as f64 - 1.0 + margin, h as f64 - 1.0 + margin),
    );
    let Some((from, to)) = clipped else {
        return;
    };
    let from = (from.0.round() as f32, from.1.round() as f32);
    let to = (to.0.round() as f32, to.1.round() as f32);

    if width == 1 {
        draw_line_segment_mut(canvas, from, to, pixel);
        return;
    }

    for center in BresenhamLineIter::new(from, to) {
        draw_filled_circle_mut(canvas, center, radius, pixel);
    }
}

/// Liang-Barsky clip of the segment `from..to` to an axis-aligned box.
fn clip_segment(
    from: (f64, f64),
    to: (f64, f64),
    min: (f64, f64),
    max: (f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;

    for (p, q) in [
        (-dx, from.0 - min.0),
        (dx, max.0 - from.0),
        (-dy, from.1 - min.1),
        (dy, max.1 - from.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    Some((
        (from.0 + t0 * dx, from.1 + t0 * dy),
        (from.0 + t1 * dx, from.1 + t1 * dy),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::blank_canvas;

    #[test]
    fn test_thin_line() {
        let mut image = blank_canvas(16, 16, Rgb::WHITE);
        draw_line(&mut image, (0, 0), (10, 10), 1, Rgb::new(255, 0, 0));
        let rgb = image.to_rgb8();
        assert_eq!(rgb.get_pixel(5, 5).0, [255, 0, 0]);
        assert_eq!(rgb.get_pixel(10, 0).0, [255, 255, 255]);
    }

    #[test]
    fn test_thick_line_covers_neighbours() {
        let mut image = blank_canvas(16, 16, Rgb::WHITE);
        draw_line(&mut image, (2, 8), (13, 8), 4, Rgb::BLACK);
        let rgb = image.to_rgb8();
        assert_eq!(rgb.get_pixel(8, 8).0, [0, 0, 0]);
        assert_eq!(rgb.get_pixel(8, 6).0, [0, 0, 0]);
        assert_eq!(rgb.get_pixel(8, 10).0, [0, 0, 0]);
        assert_eq!(rgb.get_pixel(8, 14).0, [255, 255, 255]);
    }

    #[test]
    fn test_non_positive_width_draws_nothing() {
        let blank = blank_canvas(8, 8, Rgb::WHITE);
        let mut image = blank.clone();
        draw_line(&mut image, (0, 0), (7, 7), 0, Rgb::BLACK);
        draw_line(&mut image, (0, 0), (7, 7), -3, Rgb::BLACK);
        assert_eq!(image, blank);
    }

    #[test]
    fn test_out_of_bounds_is_clipped() {
        let mut image = blank_canvas(8, 8, Rgb::WHITE);
        draw_line(&mut image, (-20, -20), (100, 100), 3, Rgb::BLACK);
        assert_eq!(image.to_rgb8().get_pixel(4, 4).0, [0, 0, 0]);

        let mut image = blank_canvas(8, 8, Rgb::WHITE);
        draw_line(&mut image, (50, 50), (60, 60), 2, Rgb::BLACK);
        assert!(image.as_bytes().iter().all(|&v| v == 255));
    }

    #[test]
    fn test_extreme_coordinates_are_clipped() {
        let mut image = blank_canvas(8, 8, Rgb::WHITE);
        draw_line(&mut image, (i32::MAX - 1, 0), (i32::MAX - 1, 0), 3, Rgb::BLACK);
        draw_line(&mut image, (i32::MIN, i32::MIN), (i32::MIN, i32::MAX), 3, Rgb::BLACK);
        assert!(image.as_bytes().iter().all(|&v| v == 255));

        draw_line(&mut image, (0, 4), (2_000_000_000, 4), 3, Rgb::BLACK);
        let rgb = image.to_rgb8();
        assert_eq!(rgb.get_pixel(0, 4).0, [0, 0, 0]);
        assert_eq!(rgb.get_pixel(7, 4).0, [0, 0, 0]);
        assert_eq!(rgb.get_pixel(7, 0).0, [255, 255, 255]);

        let mut image = blank_canvas(8, 8, Rgb::WHITE);
        draw_line(&mut image, (i32::MIN, 3), (i32::MAX, 3), 1, Rgb::BLACK);
        let rgb = image.to_rgb8();
        assert!((0..8).all(|x| rgb.get_pixel(x, 3).0 == [0, 0, 0]));
        assert_eq!(rgb.get_pixel(3, 2).0, [255, 255, 255]);
    }

    #[test]
    fn test_huge_width_covers_canvas() {
        let mut image = blank_canvas(6, 4, Rgb::WHITE);
        draw_line(&mut image, (2, 2), (3, 2), i32::MAX, Rgb::BLACK);
        assert!(image.as_bytes().iter().all(|&v| v == 0));

        let mut image = blank_canvas(6, 4, Rgb::WHITE);
        draw_line(&mut image, (-1_000_000, -1_000_000), (-1_000_000, -1_000_000), i32::MAX, Rgb::BLACK);
        assert!(image.as_bytes().iter().all(|&v| v == 255));
    }

    #[test]
    fn test_gray_canvas_uses_luma() {
        let mut image = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(8, 8, Luma([255])));
        draw_line(&mut image, (0, 3), (7, 3), 1, Rgb::new(0, 255, 0));
        assert_eq!(image.color(), image::ColorType::L8);
        assert_eq!(image.to_luma8().get_pixel(3, 3)[0], 150);
    }
}
