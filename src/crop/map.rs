//! Mapping from raster pixel space back to PDF point space.
//!
//! The raster covers the page's visible area (its effective CropBox) with
//! row 0 at the top, while PDF user space y grows upward from the bottom.
//! The vertical axis therefore flips:
//!
//! ```text
//! raster row r        -> point y = boundary.y1 - r / scale
//! raster column c     -> point x = boundary.x0 + c / scale
//! ```
//!
//! where `scale = dpi / 72` is the pixel density per point.

use crate::geometry::RectPt;

use super::detect::PixelBox;

/// Map a pixel-space bounding box into the page's point space.
///
/// The pixel box has inclusive bounds, so the far edges lie at `max + 1` on
/// the pixel grid. The result is expanded by half a pixel on every side:
/// rasterization rounds fractional content edges onto the integer grid, and
/// without the slack anti-aliased edge pixels could be clipped.
pub fn map_to_page_space(bbox: &PixelBox, scale: f64, boundary: RectPt) -> RectPt {
    let pt_per_px = 1.0 / scale;
    let half_px = 0.5 * pt_per_px;

    let x0 = boundary.x0 + f64::from(bbox.min_col) * pt_per_px;
    let x1 = boundary.x0 + f64::from(bbox.max_col + 1) * pt_per_px;
    // Vertical flip: the top raster row maps to the boundary's top edge.
    let y1 = boundary.y1 - f64::from(bbox.min_row) * pt_per_px;
    let y0 = boundary.y1 - f64::from(bbox.max_row + 1) * pt_per_px;

    RectPt::new(x0, y0, x1, y1).expand(half_px)
}
