//! Size filter and canonical page order.
//!
//! Widths and heights are checked independently: a box survives only when
//! it is strictly larger than both minimums. No area or aspect test is
//! applied, and concentric boxes from the same border are not merged.

use crate::config::SplitConfig;
use crate::error::SplitError;
use crate::types::{BoundingBox, PageRegion};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy)]
pub struct RegionFilter {
    pub min_width: u32,
    pub min_height: u32,
}

impl Default for RegionFilter {
    fn default() -> Self {
        Self::from_config(&SplitConfig::default())
    }
}

impl RegionFilter {
    pub fn new(min_width: u32, min_height: u32) -> Self {
        Self {
            min_width,
            min_height,
        }
    }

    pub fn from_config(config: &SplitConfig) -> Self {
        Self::new(config.min_page_width, config.min_page_height)
    }

    pub fn accepts(&self, bbox: &BoundingBox) -> bool {
        bbox.width > self.min_width && bbox.height > self.min_height
    }

    /// Drop undersized boxes, sort top-to-bottom (then left-to-right) and
    /// assign ranks `0..N`.
    ///
    /// # Errors
    /// [`SplitError::NoPagesDetected`] when nothing survives.
    pub fn filter(&self, boxes: &[BoundingBox]) -> Result<Vec<PageRegion>, SplitError> {
        let mut kept: Vec<BoundingBox> = boxes.iter().copied().filter(|b| self.accepts(b)).collect();

        kept.sort_by_key(|b| (b.y, b.x));

        let regions: Vec<PageRegion> = kept
            .into_iter()
            .enumerate()
            .map(|(rank, bbox)| PageRegion { rank, bbox })
            .collect();

        for r in &regions {
            debug!(
                "Page {}: {}x{} at ({}, {})",
                r.rank + 1,
                r.bbox.width,
                r.bbox.height,
                r.bbox.x,
                r.bbox.y
            );
        }

        if regions.is_empty() {
            warn!(
                "No region larger than {}x{} among {} candidates",
                self.min_width,
                self.min_height,
                boxes.len()
            );
            return Err(SplitError::NoPagesDetected {
                candidates: boxes.len(),
                min_width: self.min_width,
                min_height: self.min_height,
            });
        }

        info!(
            "Accepted {} of {} candidate regions",
            regions.len(),
            boxes.len()
        );
        Ok(regions)
    }
}
