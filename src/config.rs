//! Configuration types for splitting an image into pages.
//!
//! All behaviour is controlled through [`SplitConfig`], built via its
//! [`SplitConfigBuilder`]. Every knob has a documented default, so the
//! common case is `SplitConfig::default()`.

use crate::error::SplitError;
use crate::progress::ProgressCallback;
use crate::types::{Background, PageSize};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for one split invocation.
///
/// Built via [`SplitConfig::builder()`] or using [`SplitConfig::default()`].
///
/// # Example
/// ```rust
/// use pagesplit::{PageSize, SplitConfig};
///
/// let config = SplitConfig::builder()
///     .min_page_size(300, 300)
///     .target_size(PageSize::new(1654, 2339))
///     .dpi(200)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct SplitConfig {
    /// A region must be strictly wider than this to become a page. Default: 400.
    pub min_page_width: u32,

    /// A region must be strictly taller than this to become a page. Default: 400.
    pub min_page_height: u32,

    /// Output canvas size in pixels. Default: 1240×1754 (A4 at ~150 dpi).
    pub target_size: PageSize,

    /// Letterbox colour around the scaled crop. Default: white.
    pub background: Background,

    /// Gaussian σ applied before edge extraction. Default: 0.8.
    ///
    /// 0.8 is what a 3×3 kernel amounts to. Larger values start to erase
    /// one-pixel page borders, so the builder caps it at 3.0.
    pub blur_sigma: f32,

    /// Canny hysteresis low threshold. Default: 30.
    pub low_threshold: f32,

    /// Canny hysteresis high threshold. Default: 150.
    pub high_threshold: f32,

    /// Resolution written into the PDF. Range: 72–600. Default: 150.
    ///
    /// Only changes the physical page size (points = px · 72 / dpi); the
    /// embedded pixels are untouched.
    pub dpi: u32,

    /// Allow crops smaller than the canvas to be enlarged. Default: true.
    pub allow_upscale: bool,

    /// How page pixels are compressed inside the PDF. Default: lossless.
    pub page_encoding: PageEncoding,

    /// Optional per-page progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            min_page_width: 400,
            min_page_height: 400,
            target_size: PageSize::default(),
            background: Background::default(),
            blur_sigma: 0.8,
            low_threshold: 30.0,
            high_threshold: 150.0,
            dpi: 150,
            allow_upscale: true,
            page_encoding: PageEncoding::default(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for SplitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SplitConfig")
            .field("min_page_width", &self.min_page_width)
            .field("min_page_height", &self.min_page_height)
            .field("target_size", &self.target_size)
            .field("background", &self.background)
            .field("blur_sigma", &self.blur_sigma)
            .field("low_threshold", &self.low_threshold)
            .field("high_threshold", &self.high_threshold)
            .field("dpi", &self.dpi)
            .field("allow_upscale", &self.allow_upscale)
            .field("page_encoding", &self.page_encoding)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn SplitProgressCallback>"),
            )
            .finish()
    }
}

impl SplitConfig {
    /// Create a new builder for `SplitConfig`.
    pub fn builder() -> SplitConfigBuilder {
        SplitConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`SplitConfig`].
pub struct SplitConfigBuilder {
    config: SplitConfig,
}

impl fmt::Debug for SplitConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SplitConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl SplitConfigBuilder {
    pub fn min_page_width(mut self, px: u32) -> Self {
        self.config.min_page_width = px;
        self
    }

    pub fn min_page_height(mut self, px: u32) -> Self {
        self.config.min_page_height = px;
        self
    }

    pub fn min_page_size(self, width: u32, height: u32) -> Self {
        self.min_page_width(width).min_page_height(height)
    }

    pub fn target_size(mut self, size: PageSize) -> Self {
        self.config.target_size = size;
        self
    }

    pub fn background(mut self, bg: Background) -> Self {
        self.config.background = bg;
        self
    }

    pub fn blur_sigma(mut self, sigma: f32) -> Self {
        self.config.blur_sigma = sigma;
        self
    }

    pub fn thresholds(mut self, low: f32, high: f32) -> Self {
        self.config.low_threshold = low;
        self.config.high_threshold = high;
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(72, 600);
        self
    }

    pub fn allow_upscale(mut self, v: bool) -> Self {
        self.config.allow_upscale = v;
        self
    }

    pub fn page_encoding(mut self, encoding: PageEncoding) -> Self {
        self.config.page_encoding = encoding;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SplitConfig, SplitError> {
        let c = &self.config;
        if c.target_size.width == 0 || c.target_size.height == 0 {
            return Err(SplitError::InvalidConfig(format!(
                "Target page size must be non-zero, got {}",
                c.target_size
            )));
        }
        if !(c.blur_sigma > 0.0 && c.blur_sigma <= 3.0) {
            return Err(SplitError::InvalidConfig(format!(
                "Blur sigma must be in (0, 3], got {}",
                c.blur_sigma
            )));
        }
        if !(c.low_threshold >= 0.0 && c.low_threshold <= c.high_threshold) {
            return Err(SplitError::InvalidConfig(format!(
                "Edge thresholds must satisfy 0 ≤ low ≤ high, got {}/{}",
                c.low_threshold, c.high_threshold
            )));
        }
        if let PageEncoding::Jpeg { quality } = c.page_encoding {
            if quality == 0 || quality > 100 {
                return Err(SplitError::InvalidConfig(format!(
                    "JPEG quality must be 1–100, got {quality}"
                )));
            }
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Compression used for page images embedded in the PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PageEncoding {
    /// Raw RGB, Flate-compressed. Lossless and byte-stable. (default)
    #[default]
    Flate,
    /// Baseline JPEG (`DCTDecode`). Much smaller for photographic scans.
    Jpeg { quality: u8 },
}
