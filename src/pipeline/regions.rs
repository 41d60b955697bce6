//! Candidate regions: outer contours of the edge map and their boxes.

use crate::pipeline::edges::EdgeMap;
use crate::types::BoundingBox;
use imageproc::contours::{find_contours, BorderType, Contour};
use tracing::debug;

/// Extracts the bounding box of every outermost closed contour.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegionFinder;

impl RegionFinder {
    /// Bounding boxes of all outer contours that have no enclosing contour.
    ///
    /// Order follows the tracer's raster scan and carries no meaning; an
    /// edge map with no edges yields an empty vector.
    pub fn find_regions(&self, edges: &EdgeMap) -> Vec<BoundingBox> {
        let contours = find_contours::<u32>(edges.as_image());
        let total = contours.len();

        let boxes: Vec<BoundingBox> = contours
            .iter()
            .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
            .filter_map(contour_bbox)
            .collect();

        debug!(
            "Traced {} contours, {} outermost candidate regions",
            total,
            boxes.len()
        );
        boxes
    }
}

/// Minimal axis-aligned box covering every point of `contour`.
pub fn contour_bbox(contour: &Contour<u32>) -> Option<BoundingBox> {
    let first = contour.points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in &contour.points[1..] {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Some(BoundingBox::new(
        min_x,
        min_y,
        max_x - min_x + 1,
        max_y - min_y + 1,
    ))
}
