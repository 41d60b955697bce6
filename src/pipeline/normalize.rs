//! Page normalisation: crop a region, scale it to fit the canvas, centre it.
//!
//! Both axes share one scale factor, so the content keeps the crop's aspect
//! ratio; the leftover margin is filled with the background colour. The same
//! inputs always produce the same pixels.

use crate::config::SplitConfig;
use crate::error::SplitError;
use crate::types::{Background, BoundingBox, NormalizedCanvas, PageRegion, PageSize};
use image::imageops::{self, FilterType};
use image::RgbImage;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct PageNormalizer {
    pub target: PageSize,
    pub background: Background,
    pub allow_upscale: bool,
}

impl Default for PageNormalizer {
    fn default() -> Self {
        Self::from_config(&SplitConfig::default())
    }
}

impl PageNormalizer {
    pub fn new(target: PageSize, background: Background) -> Self {
        Self {
            target,
            background,
            allow_upscale: true,
        }
    }

    pub fn from_config(config: &SplitConfig) -> Self {
        Self {
            target: config.target_size,
            background: config.background,
            allow_upscale: config.allow_upscale,
        }
    }

    /// Uniform factor that makes a `width`×`height` crop fit the target.
    pub fn scale_factor(&self, width: u32, height: u32) -> f64 {
        let sx = self.target.width as f64 / width as f64;
        let sy = self.target.height as f64 / height as f64;
        let s = sx.min(sy);
        if self.allow_upscale {
            s
        } else {
            s.min(1.0)
        }
    }

    /// Pixel size of the crop after scaling, never exceeding the target.
    pub fn scaled_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        let s = self.scale_factor(width, height);
        let w = ((width as f64 * s).round() as u32).clamp(1, self.target.width.max(1));
        let h = ((height as f64 * s).round() as u32).clamp(1, self.target.height.max(1));
        (w, h)
    }

    /// Produce the fixed-size canvas for one region of `source`.
    ///
    /// # Errors
    /// * [`SplitError::InvalidConfig`] if the target canvas has a zero side.
    /// * [`SplitError::InvalidRegion`] if the region is empty or does not lie
    ///   inside `source`.
    pub fn normalize(
        &self,
        source: &RgbImage,
        region: &PageRegion,
    ) -> Result<NormalizedCanvas, SplitError> {
        if self.target.width == 0 || self.target.height == 0 {
            return Err(SplitError::InvalidConfig(format!(
                "target page size must be non-zero, got {}",
                self.target
            )));
        }

        let bbox = region.bbox;
        if bbox.width == 0 || bbox.height == 0 || !bbox.fits_within(source.width(), source.height())
        {
            return Err(SplitError::InvalidRegion {
                x: bbox.x,
                y: bbox.y,
                width: bbox.width,
                height: bbox.height,
                image_width: source.width(),
                image_height: source.height(),
            });
        }

        let crop = imageops::crop_imm(source, bbox.x, bbox.y, bbox.width, bbox.height).to_image();

        let (scaled_w, scaled_h) = self.scaled_dimensions(bbox.width, bbox.height);
        let scaled = if (scaled_w, scaled_h) == (bbox.width, bbox.height) {
            crop
        } else {
            imageops::resize(&crop, scaled_w, scaled_h, FilterType::Lanczos3)
        };

        let offset_x = (self.target.width - scaled_w) / 2;
        let offset_y = (self.target.height - scaled_h) / 2;

        let mut canvas = RgbImage::from_pixel(
            self.target.width,
            self.target.height,
            self.background.to_rgb(),
        );
        imageops::replace(&mut canvas, &scaled, offset_x as i64, offset_y as i64);

        debug!(
            "Page {}: {}x{} crop → {}x{} at ({}, {}) on {} canvas",
            region.rank + 1,
            bbox.width,
            bbox.height,
            scaled_w,
            scaled_h,
            offset_x,
            offset_y,
            self.target
        );

        Ok(NormalizedCanvas {
            rank: region.rank,
            source: bbox,
            content: BoundingBox::new(offset_x, offset_y, scaled_w, scaled_h),
            image: canvas,
        })
    }
}
