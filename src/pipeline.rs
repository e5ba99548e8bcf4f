//! Document-level orchestration: render pages in parallel, decide crops,
//! write CropBox entries back, save.
//!
//! Page rendering and detection run on a rayon pool; the document itself is
//! only touched from the calling thread, before and after the parallel
//! phase. Per-page failures are recorded and do not abort the run.

use std::path::Path;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::crop::{decide_crop, CropDecision, CropOptions};
use crate::error::Result;
use crate::geometry::RectPt;
use crate::pdf::PdfDocument;
use crate::raster::Rasterizer;

// ============================================================
// Outcomes
// ============================================================

/// What happened to a single page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    /// The page received this rectangle as its new CropBox
    Cropped(RectPt),
    /// Every sample was background; page left unchanged
    NoContent,
    /// Clipping collapsed the rectangle; page left unchanged
    Degenerate,
    /// The page carries a non-zero /Rotate and was left unchanged
    Rotated(i64),
    /// Rendering or detection failed; page left unchanged
    Failed(String),
}

impl PageOutcome {
    /// Whether the page was modified.
    pub fn is_cropped(&self) -> bool {
        matches!(self, PageOutcome::Cropped(_))
    }
}

/// Per-page result, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct PageReport {
    /// 1-based page number
    pub page: u32,
    pub outcome: PageOutcome,
}

/// Aggregate result of one run.
#[derive(Debug)]
pub struct CropSummary {
    pub page_count: usize,
    pub cropped: usize,
    pub unchanged: usize,
    pub failed: usize,
    pub reports: Vec<PageReport>,
}

impl CropSummary {
    fn from_reports(reports: Vec<PageReport>) -> Self {
        let cropped = reports.iter().filter(|r| r.outcome.is_cropped()).count();
        let failed = reports
            .iter()
            .filter(|r| matches!(r.outcome, PageOutcome::Failed(_)))
            .count();
        Self {
            page_count: reports.len(),
            cropped,
            unchanged: reports.len() - cropped - failed,
            failed,
            reports,
        }
    }
}

// ============================================================
// Pipeline
// ============================================================

/// End-to-end crop run over a whole document.
#[derive(Debug, Clone)]
pub struct CropPipeline {
    options: CropOptions,
    compress: bool,
    threads: Option<usize>,
}

impl CropPipeline {
    pub fn new(options: CropOptions) -> Self {
        Self {
            options,
            compress: true,
            threads: None,
        }
    }

    /// Recompress object streams when saving (on by default).
    #[must_use]
    pub fn compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Cap the worker pool; `None` uses one worker per logical CPU.
    #[must_use]
    pub fn threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads;
        self
    }

    /// Crop `input` and write the result to `output`.
    ///
    /// The output is written even when no page changed, so the caller always
    /// ends up with a complete document at the requested path.
    pub fn run<R: Rasterizer>(
        &self,
        input: &Path,
        output: &Path,
        rasterizer: &R,
    ) -> Result<CropSummary> {
        self.run_with_progress(input, output, rasterizer, &|| {})
    }

    /// Like [`run`](Self::run), invoking `progress` once per finished page.
    pub fn run_with_progress<R: Rasterizer>(
        &self,
        input: &Path,
        output: &Path,
        rasterizer: &R,
        progress: &(dyn Fn() + Sync),
    ) -> Result<CropSummary> {
        self.options.validate()?;

        let mut doc = PdfDocument::open(input)?;
        info!(pages = doc.page_count(), input = %input.display(), "document loaded");

        // Page geometry is read up front on this thread; workers only see
        // plain values.
        let tasks: Vec<PageTask> = doc
            .pages()
            .iter()
            .map(|&(page, page_id)| {
                let boundary = doc.page_boundary(page_id);
                let rotation = doc.page_rotation(page_id).unwrap_or(0);
                PageTask {
                    page,
                    boundary,
                    rotation,
                }
            })
            .collect();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads.unwrap_or_else(num_cpus::get))
            .build()
            .map_err(|e| crate::error::CropError::InvalidValue(e.to_string()))?;

        let reports: Vec<PageReport> = pool.install(|| {
            tasks
                .par_iter()
                .map(|task| {
                    let report = self.process_page(task, rasterizer);
                    progress();
                    report
                })
                .collect()
        });

        // Write-back is sequential; only successfully decided pages change.
        let page_ids: Vec<_> = doc.pages().to_vec();
        for (report, (_, page_id)) in reports.iter().zip(page_ids) {
            if let PageOutcome::Cropped(rect) = &report.outcome {
                doc.set_crop_box(page_id, *rect)?;
            }
        }

        doc.save(output, self.compress)?;

        let summary = CropSummary::from_reports(reports);
        info!(
            cropped = summary.cropped,
            unchanged = summary.unchanged,
            failed = summary.failed,
            output = %output.display(),
            "document saved"
        );
        Ok(summary)
    }

    fn process_page<R: Rasterizer>(&self, task: &PageTask, rasterizer: &R) -> PageReport {
        let outcome = self.page_outcome(task, rasterizer);
        match &outcome {
            PageOutcome::Failed(reason) => {
                warn!(page = task.page, reason, "page skipped");
            }
            PageOutcome::Rotated(degrees) => {
                warn!(page = task.page, degrees, "rotated page left unchanged");
            }
            other => debug!(page = task.page, outcome = ?other, "page processed"),
        }
        PageReport {
            page: task.page,
            outcome,
        }
    }

    fn page_outcome<R: Rasterizer>(&self, task: &PageTask, rasterizer: &R) -> PageOutcome {
        let boundary = match &task.boundary {
            Ok(boundary) => *boundary,
            Err(e) => return PageOutcome::Failed(e.to_string()),
        };
        if task.rotation != 0 {
            return PageOutcome::Rotated(task.rotation);
        }

        // The raster is dropped as soon as the decision is made, so memory
        // stays bounded by the worker count, not the page count.
        let raster = match rasterizer.render(task.page, self.options.dpi) {
            Ok(raster) => raster,
            Err(e) => return PageOutcome::Failed(e.to_string()),
        };

        match decide_crop(&raster, boundary, &self.options) {
            CropDecision::Apply(rect) => PageOutcome::Cropped(rect),
            CropDecision::NoContent => PageOutcome::NoContent,
            CropDecision::Degenerate => PageOutcome::Degenerate,
        }
    }
}

struct PageTask {
    page: u32,
    boundary: Result<RectPt>,
    rotation: i64,
}
