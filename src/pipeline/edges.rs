//! Edge extraction: RGB source → binary edge map.
//!
//! Grayscale, a small Gaussian blur to knock down scan noise, then Canny
//! with hysteresis thresholds. Page borders in screenshots are often a
//! single pixel wide; a wide kernel smears them below the high threshold.
//!
//! Canny marks the pixel of largest gradient next to a step, which for an
//! inked outline is the background pixel just outside it, and keeps both
//! pixels when they tie. Each edge pixel is therefore snapped onto the
//! darkest pixel within [`SNAP_RADIUS`], so the outermost edge ring lies on
//! the drawn border itself and a box traced from it has the border's size.

use crate::config::SplitConfig;
use crate::error::SplitError;
use crate::pipeline::decode::ensure_non_empty;
use image::{GrayImage, Luma, RgbImage};
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use tracing::debug;

/// Pixel value marking an edge in an [`EdgeMap`].
pub const EDGE: u8 = 255;

/// How far, in pixels, an edge pixel may move when snapped onto ink.
pub const SNAP_RADIUS: u32 = 3;

/// Grey levels above the local minimum that still count as ink.
const INK_TOLERANCE: u8 = 24;

/// Binary H×W grid; every pixel is either `0` or [`EDGE`].
#[derive(Debug, Clone)]
pub struct EdgeMap(GrayImage);

impl EdgeMap {
    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    pub fn as_image(&self) -> &GrayImage {
        &self.0
    }

    pub fn is_edge(&self, x: u32, y: u32) -> bool {
        self.0.get_pixel(x, y).0[0] == EDGE
    }

    pub fn edge_pixel_count(&self) -> usize {
        self.0.pixels().filter(|p| p.0[0] == EDGE).count()
    }

    /// Wrap an existing binary image; any non-zero pixel counts as an edge.
    pub fn from_binary(mut img: GrayImage) -> Self {
        for p in img.pixels_mut() {
            if p.0[0] != 0 {
                p.0[0] = EDGE;
            }
        }
        Self(img)
    }
}

/// Grayscale → blur → Canny.
#[derive(Debug, Clone, Copy)]
pub struct EdgeDetector {
    pub blur_sigma: f32,
    pub low_threshold: f32,
    pub high_threshold: f32,
}

impl Default for EdgeDetector {
    fn default() -> Self {
        Self::from_config(&SplitConfig::default())
    }
}

impl EdgeDetector {
    pub fn from_config(config: &SplitConfig) -> Self {
        Self {
            blur_sigma: config.blur_sigma,
            low_threshold: config.low_threshold,
            high_threshold: config.high_threshold,
        }
    }

    pub fn detect(&self, source: &RgbImage) -> Result<EdgeMap, SplitError> {
        ensure_non_empty(source)?;

        let gray = image::imageops::grayscale(source);
        // gaussian_blur_f32 panics on a non-positive sigma.
        let smoothed = if self.blur_sigma > 0.0 {
            gaussian_blur_f32(&gray, self.blur_sigma)
        } else {
            gray.clone()
        };
        let edges = canny(&smoothed, self.low_threshold, self.high_threshold);

        let map = EdgeMap::from_binary(snap_to_ink(&edges, &gray));
        debug!(
            "Edge map {}x{}: {} edge pixels (σ={}, thresholds {}/{})",
            map.width(),
            map.height(),
            map.edge_pixel_count(),
            self.blur_sigma,
            self.low_threshold,
            self.high_threshold
        );
        Ok(map)
    }
}

/// Move every edge pixel onto the nearest ink pixel around it.
///
/// "Ink" is anything within [`INK_TOLERANCE`] of the darkest grey level in
/// the `(2·SNAP_RADIUS+1)²` window. Pixels that already are ink stay put,
/// as do pixels with nothing darker nearby.
fn snap_to_ink(edges: &GrayImage, gray: &GrayImage) -> GrayImage {
    let (width, height) = edges.dimensions();
    let mut snapped = GrayImage::new(width, height);
    for (x, y, p) in edges.enumerate_pixels() {
        if p.0[0] == 0 {
            continue;
        }
        let (sx, sy) = nearest_ink(gray, x, y);
        snapped.put_pixel(sx, sy, Luma([EDGE]));
    }
    snapped
}

fn nearest_ink(gray: &GrayImage, x: u32, y: u32) -> (u32, u32) {
    let (width, height) = gray.dimensions();
    let xs = x.saturating_sub(SNAP_RADIUS)..=(x + SNAP_RADIUS).min(width - 1);
    let ys = y.saturating_sub(SNAP_RADIUS)..=(y + SNAP_RADIUS).min(height - 1);
    let level = |px: u32, py: u32| gray.get_pixel(px, py).0[0];

    let darkest = ys
        .clone()
        .flat_map(|py| xs.clone().map(move |px| (px, py)))
        .map(|(px, py)| level(px, py))
        .min()
        .unwrap_or(u8::MAX);
    let ink = darkest.saturating_add(INK_TOLERANCE);
    if level(x, y) <= ink {
        return (x, y);
    }

    // Closest ink pixel by squared distance; ties go to the first in scan order.
    let mut best = (x, y);
    let mut best_dist = u32::MAX;
    for py in ys {
        for px in xs.clone() {
            if level(px, py) > ink {
                continue;
            }
            let dist = px.abs_diff(x).pow(2) + py.abs_diff(y).pow(2);
            if dist < best_dist {
                best = (px, py);
                best_dist = dist;
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use imageproc::drawing::draw_filled_rect_mut;
    use imageproc::rect::Rect;

    fn white(w: u32, h: u32) -> RgbImage {
        RgbImage::from_pixel(w, h, Rgb([255, 255, 255]))
    }

    #[test]
    fn blank_image_has_no_edges() {
        let map = EdgeDetector::default().detect(&white(64, 48)).unwrap();
        assert_eq!((map.width(), map.height()), (64, 48));
        assert_eq!(map.edge_pixel_count(), 0);
    }

    #[test]
    fn dark_square_produces_edges_only_near_its_border() {
        let mut img = white(80, 80);
        draw_filled_rect_mut(&mut img, Rect::at(20, 20).of_size(40, 40), Rgb([0, 0, 0]));
        let map = EdgeDetector::default().detect(&img).unwrap();

        assert!(map.edge_pixel_count() > 0);
        // Far from the square: nothing.
        assert!(!map.is_edge(5, 5));
        assert!(!map.is_edge(40, 40));
        // Every edge pixel sits within a few pixels of the square outline.
        for (x, y, p) in map.as_image().enumerate_pixels() {
            if p.0[0] == EDGE {
                let near_x = (16..=64).contains(&x);
                let near_y = (16..=64).contains(&y);
                assert!(near_x && near_y, "stray edge at ({x},{y})");
            }
        }
    }

    #[test]
    fn outline_edges_land_on_the_ink() {
        let mut img = white(120, 100);
        for t in 0..3 {
            imageproc::drawing::draw_hollow_rect_mut(
                &mut img,
                Rect::at(20 + t, 15 + t).of_size(80 - 2 * t as u32, 60 - 2 * t as u32),
                Rgb([0, 0, 0]),
            );
        }
        let map = EdgeDetector::default().detect(&img).unwrap();

        // Outer ring of the outline is edge; the background just outside is not.
        assert!(map.is_edge(20, 45));
        assert!(map.is_edge(99, 45));
        assert!(map.is_edge(60, 15));
        assert!(map.is_edge(60, 74));
        assert!(!map.is_edge(19, 45));
        assert!(!map.is_edge(100, 45));
        assert!(!map.is_edge(60, 14));
        assert!(!map.is_edge(60, 75));
    }

    #[test]
    fn one_pixel_line_collapses_to_single_column() {
        let mut img = white(60, 60);
        draw_filled_rect_mut(&mut img, Rect::at(30, 5).of_size(1, 50), Rgb([0, 0, 0]));
        let map = EdgeDetector::default().detect(&img).unwrap();
        for x in [27, 28, 29, 31, 32, 33] {
            assert!(!map.is_edge(x, 30), "edge left at x={x}");
        }
        assert!(map.is_edge(30, 30));
    }

    #[test]
    fn nearest_ink_prefers_closest_dark_pixel() {
        let mut gray = GrayImage::from_pixel(9, 9, Luma([255]));
        gray.put_pixel(6, 4, Luma([10]));
        gray.put_pixel(7, 4, Luma([10]));
        assert_eq!(nearest_ink(&gray, 4, 4), (6, 4));
        // Already dark: stays.
        assert_eq!(nearest_ink(&gray, 7, 4), (7, 4));
        // Nothing dark in reach: stays.
        let blank = GrayImage::from_pixel(9, 9, Luma([255]));
        assert_eq!(nearest_ink(&blank, 4, 4), (4, 4));
    }

    #[test]
    fn map_is_strictly_binary() {
        let mut img = white(50, 50);
        draw_filled_rect_mut(&mut img, Rect::at(10, 10).of_size(20, 25), Rgb([90, 90, 90]));
        let map = EdgeDetector::default().detect(&img).unwrap();
        assert!(map.as_image().pixels().all(|p| p.0[0] == 0 || p.0[0] == EDGE));
    }

    #[test]
    fn zero_area_source_rejected() {
        let err = EdgeDetector::default().detect(&RgbImage::new(0, 0)).unwrap_err();
        assert!(matches!(err, SplitError::InvalidImage { .. }));
    }

    #[test]
    fn from_binary_normalises_non_zero() {
        let mut g = GrayImage::new(3, 1);
        g.put_pixel(1, 0, image::Luma([7]));
        let map = EdgeMap::from_binary(g);
        assert!(map.is_edge(1, 0));
        assert!(!map.is_edge(0, 0));
    }
}
