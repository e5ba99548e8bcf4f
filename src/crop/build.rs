//! Final crop rectangle construction.

use crate::error::{CropError, Result};
use crate::geometry::RectPt;

/// Expand the content rectangle by the margin and clip to the page boundary.
///
/// The crop rectangle never exceeds the original boundary: growing past it
/// would fabricate page area that never existed. Returns
/// [`CropError::DegenerateRectangle`] when clipping leaves no positive area,
/// which callers treat the same as "no content" and leave the page alone.
pub fn build_crop_rect(content: RectPt, margin_pt: f64, boundary: RectPt) -> Result<RectPt> {
    content
        .expand(margin_pt)
        .intersect(&boundary)
        .ok_or(CropError::DegenerateRectangle)
}
