//! Error types for PDF margin cropping.

use std::path::PathBuf;
use thiserror::Error;

/// Crop error taxonomy.
///
/// `InvalidUnit`, `InvalidValue`, `UnreadableDocument`, `UnwritableOutput`
/// and `RendererMissing` are fatal and abort the run before or during
/// startup. `Rasterization` and `DegenerateRectangle` are per-page: the page
/// is left unmodified and processing continues.
#[derive(Debug, Error)]
pub enum CropError {
    #[error("unsupported unit: {0:?}")]
    InvalidUnit(String),

    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("cannot read document {path}: {reason}")]
    UnreadableDocument { path: PathBuf, reason: String },

    #[error("cannot write output {path}: {reason}")]
    UnwritableOutput { path: PathBuf, reason: String },

    #[error("pdftoppm not found in PATH; install poppler-utils")]
    RendererMissing,

    #[error("page {page}: rasterization failed: {reason}")]
    Rasterization { page: u32, reason: String },

    #[error("crop rectangle is degenerate after clipping")]
    DegenerateRectangle,

    #[error("PDF structure error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CropError>;
