//! Geometry and page types shared by every pipeline stage.

use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in source-image pixel coordinates.
///
/// `x`/`y` are the top-left corner; the box covers columns `x..x + width`
/// and rows `y..y + height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// One past the last covered column.
    pub fn right(&self) -> u64 {
        self.x as u64 + self.width as u64
    }

    /// One past the last covered row.
    pub fn bottom(&self) -> u64 {
        self.y as u64 + self.height as u64
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Width over height; `None` for a degenerate box.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.width == 0 || self.height == 0 {
            None
        } else {
            Some(self.width as f64 / self.height as f64)
        }
    }

    /// Whether the box lies entirely inside a `width`×`height` image.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= width as u64 && self.bottom() <= height as u64
    }
}

/// A bounding box accepted by the size filter, with its place in the output.
///
/// Ranks are 0-based and contiguous across one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRegion {
    pub rank: usize,
    pub bbox: BoundingBox,
}

/// Fixed output page dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: u32,
    pub height: u32,
}

impl PageSize {
    /// A4 at roughly 150 dpi.
    pub const A4_150DPI: PageSize = PageSize {
        width: 1240,
        height: 1754,
    };

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::A4_150DPI
    }
}

impl std::fmt::Display for PageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Letterbox fill colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Background(pub [u8; 3]);

impl Background {
    pub const WHITE: Background = Background([255, 255, 255]);

    pub fn to_rgb(self) -> Rgb<u8> {
        Rgb(self.0)
    }
}

impl Default for Background {
    fn default() -> Self {
        Self::WHITE
    }
}

/// One output page: a region's crop scaled and centred on a fixed canvas.
#[derive(Debug, Clone)]
pub struct NormalizedCanvas {
    /// Rank of the region this page came from.
    pub rank: usize,
    /// Region box in source coordinates.
    pub source: BoundingBox,
    /// Rectangle on the canvas covered by the scaled crop.
    pub content: BoundingBox,
    pub image: RgbImage,
}

impl NormalizedCanvas {
    pub fn size(&self) -> PageSize {
        PageSize::new(self.image.width(), self.image.height())
    }
}

/// A serialised multi-page PDF.
#[derive(Debug, Clone)]
pub struct Document {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub page_size: PageSize,
    pub dpi: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bbox_edges_do_not_overflow() {
        let b = BoundingBox::new(u32::MAX - 1, 0, 10, 10);
        assert_eq!(b.right(), u32::MAX as u64 + 9);
        assert!(!b.fits_within(u32::MAX, 10));
    }

    #[test]
    fn bbox_fits_within_is_inclusive_of_edge() {
        let b = BoundingBox::new(10, 20, 90, 80);
        assert!(b.fits_within(100, 100));
        assert!(!b.fits_within(99, 100));
        assert!(!b.fits_within(100, 99));
    }

    #[test]
    fn degenerate_box_has_no_aspect() {
        assert_eq!(BoundingBox::new(0, 0, 0, 5).aspect_ratio(), None);
        assert_eq!(BoundingBox::new(0, 0, 6, 3).aspect_ratio(), Some(2.0));
    }

    #[test]
    fn default_page_size_is_a4() {
        assert_eq!(PageSize::default(), PageSize::new(1240, 1754));
        assert_eq!(PageSize::default().to_string(), "1240x1754");
        assert_eq!(Background::default().to_rgb(), Rgb([255, 255, 255]));
    }
}
