//! Content-fitting crop computation.
//!
//! This module holds the pure per-page pipeline: a grayscale raster of the
//! page's visible area goes in, a crop decision comes out. It touches no
//! document and no filesystem, which keeps the geometry independently
//! testable.
//!
//! # Pipeline
//!
//! 1. Classify samples against the intensity threshold and find the minimal
//!    content bounding box ([`detect_content_box`])
//! 2. Map the box back into PDF point space, flipping the vertical axis
//!    ([`map_to_page_space`])
//! 3. Expand by the margin and clip to the page boundary
//!    ([`build_crop_rect`])
//!
//! # Example
//!
//! ```rust
//! use image::{GrayImage, Luma};
//! use pdfcrop::crop::{decide_crop, CropDecision, CropOptions};
//! use pdfcrop::geometry::RectPt;
//!
//! let raster = GrayImage::from_pixel(200, 260, Luma([255]));
//! let boundary = RectPt::new(0.0, 0.0, 72.0, 93.6);
//! let options = CropOptions::default();
//!
//! assert!(matches!(decide_crop(&raster, boundary, &options), CropDecision::NoContent));
//! ```

mod build;
mod detect;
mod map;

pub use build::build_crop_rect;
pub use detect::{detect_content_box, PixelBox};
pub use map::map_to_page_space;

use image::GrayImage;
use tracing::debug;

use crate::error::{CropError, Result};
use crate::geometry::RectPt;

// ============================================================
// Constants
// ============================================================

/// Default rasterization resolution.
pub const DEFAULT_DPI: u32 = 200;

/// Default intensity threshold; samples below it count as content.
pub const DEFAULT_THRESHOLD: u8 = 245;

/// Default margin kept around the detected content.
pub const DEFAULT_MARGIN: &str = "4mm";

/// Points per inch.
const POINTS_PER_INCH: f64 = 72.0;

// ============================================================
// Options
// ============================================================

/// Per-invocation crop parameters.
///
/// There is no process-wide state: every invocation of the pipeline receives
/// its parameters explicitly through this structure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropOptions {
    /// Rasterization resolution in dots per inch
    pub dpi: u32,
    /// Intensity threshold (0-255); samples strictly below are content
    pub threshold: u8,
    /// Margin kept around the content, already canonicalized to points
    pub margin_pt: f64,
}

impl Default for CropOptions {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            threshold: DEFAULT_THRESHOLD,
            margin_pt: 4.0 * POINTS_PER_INCH / 25.4,
        }
    }
}

impl CropOptions {
    /// Create a new options builder.
    pub fn builder() -> CropOptionsBuilder {
        CropOptionsBuilder::default()
    }

    /// Pixel density per point (`dpi / 72`).
    pub fn scale(&self) -> f64 {
        f64::from(self.dpi) / POINTS_PER_INCH
    }

    /// Validate option values; margin and dpi must both be usable.
    pub fn validate(&self) -> Result<()> {
        if self.dpi == 0 {
            return Err(CropError::InvalidValue("dpi must be positive".into()));
        }
        if !self.margin_pt.is_finite() || self.margin_pt < 0.0 {
            return Err(CropError::InvalidValue(format!(
                "margin must be a non-negative finite length, got {} pt",
                self.margin_pt
            )));
        }
        Ok(())
    }
}

/// Builder for [`CropOptions`].
#[derive(Debug, Default)]
pub struct CropOptionsBuilder {
    options: CropOptions,
}

impl CropOptionsBuilder {
    /// Set the rasterization resolution.
    #[must_use]
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.options.dpi = dpi;
        self
    }

    /// Set the content intensity threshold.
    #[must_use]
    pub fn threshold(mut self, threshold: u8) -> Self {
        self.options.threshold = threshold;
        self
    }

    /// Set the margin in points.
    #[must_use]
    pub fn margin_pt(mut self, margin_pt: f64) -> Self {
        self.options.margin_pt = margin_pt;
        self
    }

    /// Build the options.
    #[must_use]
    pub fn build(self) -> CropOptions {
        self.options
    }
}

// ============================================================
// Decision
// ============================================================

/// Outcome of the pure per-page pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CropDecision {
    /// Content was found; apply this rectangle as the new visible area
    Apply(RectPt),
    /// No sample fell below the threshold; leave the page unchanged
    NoContent,
    /// Clipping collapsed the rectangle; leave the page unchanged
    Degenerate,
}

/// Run detect → map → build for one page raster.
///
/// `boundary` is the page's current visible area (effective CropBox) in PDF
/// points; the raster is assumed to cover exactly that area at
/// `options.dpi`, which is what poppler renders.
pub fn decide_crop(raster: &GrayImage, boundary: RectPt, options: &CropOptions) -> CropDecision {
    let Some(bbox) = detect_content_box(raster, options.threshold) else {
        return CropDecision::NoContent;
    };

    let content = map_to_page_space(&bbox, options.scale(), boundary);
    debug!(
        ?bbox,
        ?content,
        margin_pt = options.margin_pt,
        "content detected"
    );

    match build_crop_rect(content, options.margin_pt, boundary) {
        Ok(rect) => CropDecision::Apply(rect),
        Err(_) => CropDecision::Degenerate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    const EPS: f64 = 1e-9;

    /// 4 mm in points.
    const MARGIN_4MM: f64 = 4.0 * 72.0 / 25.4;

    fn raster_with_block(
        width: u32,
        height: u32,
        rows: std::ops::Range<u32>,
        cols: std::ops::Range<u32>,
    ) -> GrayImage {
        let mut raster = GrayImage::from_pixel(width, height, Luma([255]));
        for y in rows {
            for x in cols.clone() {
                raster.put_pixel(x, y, Luma([20]));
            }
        }
        raster
    }

    #[test]
    fn test_options_default() {
        let options = CropOptions::default();
        assert_eq!(options.dpi, 200);
        assert_eq!(options.threshold, 245);
        assert!((options.margin_pt - MARGIN_4MM).abs() < EPS);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_options_builder() {
        let options = CropOptions::builder()
            .dpi(300)
            .threshold(200)
            .margin_pt(14.4)
            .build();
        assert_eq!(options.dpi, 300);
        assert_eq!(options.threshold, 200);
        assert!((options.margin_pt - 14.4).abs() < EPS);
    }

    #[test]
    fn test_options_validation() {
        let bad_dpi = CropOptions::builder().dpi(0).build();
        assert!(bad_dpi.validate().is_err());

        let bad_margin = CropOptions::builder().margin_pt(-1.0).build();
        assert!(bad_margin.validate().is_err());

        let nan_margin = CropOptions::builder().margin_pt(f64::NAN).build();
        assert!(nan_margin.validate().is_err());
    }

    #[test]
    fn test_scale() {
        let options = CropOptions::builder().dpi(200).build();
        assert!((options.scale() - 200.0 / 72.0).abs() < EPS);
    }

    #[test]
    fn test_blank_page_is_no_content() {
        let raster = GrayImage::from_pixel(400, 520, Luma([255]));
        let boundary = RectPt::new(0.0, 0.0, 144.0, 187.2);

        let decision = decide_crop(&raster, boundary, &CropOptions::default());
        assert_eq!(decision, CropDecision::NoContent);
    }

    #[test]
    fn test_uniform_raster_at_threshold_is_no_content() {
        let raster = GrayImage::from_pixel(400, 520, Luma([245]));
        let boundary = RectPt::new(0.0, 0.0, 144.0, 187.2);

        let decision = decide_crop(&raster, boundary, &CropOptions::default());
        assert_eq!(decision, CropDecision::NoContent);
    }

    #[test]
    fn test_reference_block_scenario() {
        // 2000x2600 px at 200 dpi = 720x936 pt page, dark block at rows
        // [500, 550), cols [300, 400), threshold 245, margin 4 mm.
        let raster = raster_with_block(2000, 2600, 500..550, 300..400);
        let boundary = RectPt::new(0.0, 0.0, 720.0, 936.0);
        let options = CropOptions::builder()
            .dpi(200)
            .threshold(245)
            .margin_pt(MARGIN_4MM)
            .build();

        let CropDecision::Apply(rect) = decide_crop(&raster, boundary, &options) else {
            panic!("expected a crop rectangle");
        };

        // Mapped block with half-pixel slack (0.18 pt), expanded by 4 mm.
        let half_px = 0.18;
        assert!((rect.x0 - (108.0 - half_px - MARGIN_4MM)).abs() < EPS);
        assert!((rect.x1 - (144.0 + half_px + MARGIN_4MM)).abs() < EPS);
        assert!((rect.y0 - (738.0 - half_px - MARGIN_4MM)).abs() < EPS);
        assert!((rect.y1 - (756.0 + half_px + MARGIN_4MM)).abs() < EPS);
        assert!(boundary.contains_with_tolerance(&rect, EPS));
    }

    #[test]
    fn test_full_page_content_clips_to_boundary() {
        let raster = GrayImage::from_pixel(200, 260, Luma([0]));
        let boundary = RectPt::new(0.0, 0.0, 72.0, 93.6);
        let options = CropOptions::builder()
            .dpi(200)
            .margin_pt(MARGIN_4MM)
            .build();

        let CropDecision::Apply(rect) = decide_crop(&raster, boundary, &options) else {
            panic!("expected a crop rectangle");
        };
        assert_eq!(rect, boundary);
    }

    #[test]
    fn test_margin_monotonicity_end_to_end() {
        let raster = raster_with_block(500, 650, 200..300, 100..250);
        let boundary = RectPt::new(0.0, 0.0, 180.0, 234.0);

        let mut last_area = 0.0;
        let mut unmargined: Option<RectPt> = None;

        for margin in [0.0, 1.0, 5.0, 11.34, 40.0, 500.0] {
            let options = CropOptions::builder().dpi(200).margin_pt(margin).build();
            let CropDecision::Apply(rect) = decide_crop(&raster, boundary, &options) else {
                panic!("expected a crop rectangle at margin {}", margin);
            };

            assert!(boundary.contains_with_tolerance(&rect, EPS));
            assert!(rect.area() + EPS >= last_area);
            last_area = rect.area();

            match unmargined {
                None => unmargined = Some(rect),
                Some(base) => assert!(rect.contains_with_tolerance(&base, EPS)),
            }
        }
    }

    #[test]
    fn test_idempotent_on_recrop() {
        // Cropping, then re-running the pipeline on a re-rendered raster of
        // the cropped area with identical settings, changes nothing beyond
        // floating-point tolerance.
        let raster = raster_with_block(2000, 2600, 500..550, 300..400);
        let boundary = RectPt::new(0.0, 0.0, 720.0, 936.0);
        let options = CropOptions::builder()
            .dpi(200)
            .margin_pt(MARGIN_4MM)
            .build();

        let CropDecision::Apply(first) = decide_crop(&raster, boundary, &options) else {
            panic!("expected a crop rectangle");
        };

        // Simulate the second render: the same block, now relative to the
        // cropped boundary.
        let scale = options.scale();
        let new_w = (first.width() * scale).round() as u32;
        let new_h = (first.height() * scale).round() as u32;
        let col_off = ((300.0 * 0.36 - first.x0) * scale).round() as u32;
        let row_off = ((936.0 - 550.0 * 0.36 - first.y0) * scale).round() as u32;
        let block_bottom = new_h - row_off;
        let recrop_raster = raster_with_block(
            new_w,
            new_h,
            (block_bottom - 50)..block_bottom,
            col_off..(col_off + 100),
        );

        let CropDecision::Apply(second) = decide_crop(&recrop_raster, first, &options) else {
            panic!("expected a crop rectangle on re-crop");
        };

        // Allow one raster pixel of drift from re-rendering.
        let tol = 1.5 / scale;
        assert!((second.x0 - first.x0).abs() < tol);
        assert!((second.y0 - first.y0).abs() < tol);
        assert!((second.x1 - first.x1).abs() < tol);
        assert!((second.y1 - first.y1).abs() < tol);
    }
}
