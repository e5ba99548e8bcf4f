//! Automatic blank-margin cropping for PDF files.
//!
//! Pages are rendered to grayscale rasters, the content bounding box is
//! detected against an intensity threshold, mapped back into PDF point
//! space, expanded by a unit-aware margin and written back as each page's
//! CropBox. Page contents are never touched; the crop is reversible by
//! removing the CropBox entries again.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use pdfcrop::crop::CropOptions;
//! use pdfcrop::pipeline::CropPipeline;
//! use pdfcrop::raster::PopplerRasterizer;
//! use pdfcrop::units::Margin;
//!
//! # fn main() -> pdfcrop::Result<()> {
//! let margin: Margin = "4mm".parse()?;
//! let options = CropOptions::builder()
//!     .dpi(200)
//!     .threshold(245)
//!     .margin_pt(margin.to_points(200)?)
//!     .build();
//!
//! let input = Path::new("book.pdf");
//! let rasterizer = PopplerRasterizer::new(input)?;
//! let summary = CropPipeline::new(options).run(input, Path::new("book_cropped.pdf"), &rasterizer)?;
//! println!("cropped {} of {} pages", summary.cropped, summary.page_count);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod crop;
pub mod error;
pub mod geometry;
pub mod pdf;
pub mod pipeline;
pub mod raster;
pub mod units;

pub use error::{CropError, Result};
pub use geometry::RectPt;

/// Process exit codes.
pub mod exit_codes {
    /// The run completed; every page that could be processed was.
    pub const SUCCESS: i32 = 0;
    /// The run failed: unreadable input, unwritable output, missing renderer.
    pub const GENERAL_ERROR: i32 = 1;
    /// Invalid command-line arguments or configuration values.
    pub const INVALID_ARGS: i32 = 2;
}
