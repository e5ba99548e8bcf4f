//! Page rasterization via poppler's `pdftoppm`.
//!
//! Each page is rendered to a grayscale PNG in a scratch directory and
//! loaded back as an [`image::GrayImage`]. `pdftoppm` renders the page's
//! visible area (its CropBox), which is exactly the frame the crop pipeline
//! maps back into. Rendering is deterministic for a fixed (page, dpi) pair.

use std::path::{Path, PathBuf};
use std::process::Command;

use image::GrayImage;

use crate::error::{CropError, Result};

/// Renders single pages of a PDF to grayscale rasters.
///
/// The trait seam keeps the pipeline testable with synthetic rasters.
pub trait Rasterizer: Sync {
    /// Render one page (1-based) at the given resolution.
    fn render(&self, page: u32, dpi: u32) -> Result<GrayImage>;
}

/// [`Rasterizer`] backed by the `pdftoppm` binary from poppler-utils.
#[derive(Debug, Clone)]
pub struct PopplerRasterizer {
    input: PathBuf,
}

impl PopplerRasterizer {
    /// Create a rasterizer for the given PDF, verifying that `pdftoppm` is
    /// available up front so the failure surfaces before page processing.
    pub fn new(input: &Path) -> Result<Self> {
        which::which("pdftoppm").map_err(|_| CropError::RendererMissing)?;
        Ok(Self {
            input: input.to_path_buf(),
        })
    }

    fn raster_error(&self, page: u32, reason: impl Into<String>) -> CropError {
        CropError::Rasterization {
            page,
            reason: reason.into(),
        }
    }
}

impl Rasterizer for PopplerRasterizer {
    fn render(&self, page: u32, dpi: u32) -> Result<GrayImage> {
        // Each invocation renders into its own scratch directory, so
        // concurrent workers never collide; the raster file is deleted with
        // the directory as soon as the image is loaded.
        let dir = tempfile::tempdir().map_err(|e| {
            self.raster_error(page, format!("cannot create scratch directory: {}", e))
        })?;
        let prefix = dir.path().join("page");

        let output = Command::new("pdftoppm")
            .arg("-gray")
            .arg("-png")
            .arg("-singlefile")
            .arg("-r")
            .arg(dpi.to_string())
            .arg("-f")
            .arg(page.to_string())
            .arg("-l")
            .arg(page.to_string())
            .arg(&self.input)
            .arg(&prefix)
            .output()
            .map_err(|e| self.raster_error(page, format!("cannot spawn pdftoppm: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.raster_error(
                page,
                format!("pdftoppm exited with {}: {}", output.status, stderr.trim()),
            ));
        }

        let png = prefix.with_extension("png");
        let img = image::open(&png)
            .map_err(|e| self.raster_error(page, format!("cannot read rendered page: {}", e)))?;

        Ok(img.into_luma8())
    }
}

/// In-memory rasterizer used across the test suite.
#[cfg(test)]
pub(crate) struct FakeRasterizer {
    pub pages: Vec<GrayImage>,
}

#[cfg(test)]
impl Rasterizer for FakeRasterizer {
    fn render(&self, page: u32, _dpi: u32) -> Result<GrayImage> {
        self.pages
            .get(page as usize - 1)
            .cloned()
            .ok_or(CropError::Rasterization {
                page,
                reason: "no such page".to_string(),
            })
    }
}
