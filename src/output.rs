//! Result types returned by the split entry points.

use crate::types::{Document, NormalizedCanvas, PageRegion, PageSize};
use serde::{Deserialize, Serialize};

/// Everything one successful split produces.
///
/// `pages` are the same canvases that went into `document`, in page order,
/// kept for previews. Nothing here references the source image.
#[derive(Debug, Clone)]
pub struct SplitOutput {
    pub document: Document,
    pub pages: Vec<NormalizedCanvas>,
    pub regions: Vec<PageRegion>,
    pub stats: SplitStats,
}

impl SplitOutput {
    /// Serialisable summary without any pixel data.
    pub fn report(&self) -> SplitReport {
        SplitReport {
            page_count: self.document.page_count,
            page_size: self.document.page_size,
            dpi: self.document.dpi,
            pdf_bytes: self.document.bytes.len(),
            regions: self.regions.clone(),
            stats: self.stats.clone(),
        }
    }
}

/// Timing and counts for one split.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitStats {
    pub source_width: u32,
    pub source_height: u32,
    /// Outer contours found before the size filter.
    pub candidate_regions: usize,
    pub accepted_pages: usize,
    /// Decode, edges, contours and filtering.
    pub detect_duration_ms: u64,
    pub normalize_duration_ms: u64,
    pub assemble_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// JSON-friendly view of a [`SplitOutput`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitReport {
    pub page_count: usize,
    pub page_size: PageSize,
    pub dpi: u32,
    pub pdf_bytes: usize,
    pub regions: Vec<PageRegion>,
    pub stats: SplitStats,
}
