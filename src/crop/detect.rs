//! Content bounding-box detection on grayscale rasters.
//!
//! A sample is content iff its intensity is strictly below the threshold
//! (lower = darker = content). A sample equal to the threshold is background.

use image::GrayImage;

/// Minimal bounding box of content samples, in raster pixel coordinates.
///
/// Rows count from the top of the raster, columns from the left. All bounds
/// are inclusive, so a single qualifying pixel yields a 1x1 box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBox {
    pub min_row: u32,
    pub max_row: u32,
    pub min_col: u32,
    pub max_col: u32,
}

impl PixelBox {
    /// Width in pixels (inclusive bounds).
    pub fn width(&self) -> u32 {
        self.max_col - self.min_col + 1
    }

    /// Height in pixels (inclusive bounds).
    pub fn height(&self) -> u32 {
        self.max_row - self.min_row + 1
    }
}

/// Find the minimal bounding box of all content pixels, or `None` for a
/// blank raster.
///
/// Scans each row as a contiguous slice, locating the first and last content
/// sample from both ends. Rows without content cost a single forward sweep;
/// the per-row slice scans compile down to tight loops over the raw buffer,
/// which keeps this O(pixel count) step fast enough for documents with
/// hundreds of pages.
pub fn detect_content_box(raster: &GrayImage, threshold: u8) -> Option<PixelBox> {
    let width = raster.width() as usize;
    if width == 0 || raster.height() == 0 {
        return None;
    }

    let mut bbox: Option<PixelBox> = None;

    for (row, samples) in raster.as_raw().chunks_exact(width).enumerate() {
        let Some(first) = samples.iter().position(|&s| s < threshold) else {
            continue;
        };
        // A content sample exists, so rposition cannot fail.
        let last = samples.iter().rposition(|&s| s < threshold).unwrap_or(first);

        let row = row as u32;
        let (first, last) = (first as u32, last as u32);

        match bbox.as_mut() {
            None => {
                bbox = Some(PixelBox {
                    min_row: row,
                    max_row: row,
                    min_col: first,
                    max_col: last,
                });
            }
            Some(b) => {
                b.max_row = row;
                b.min_col = b.min_col.min(first);
                b.max_col = b.max_col.max(last);
            }
        }
    }

    bbox
}
