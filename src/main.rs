//! `pdfcrop` command-line entry point.

use std::process;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::fmt;

use pdfcrop::cli::Cli;
use pdfcrop::config::Config;
use pdfcrop::crop::CropOptions;
use pdfcrop::error::CropError;
use pdfcrop::exit_codes;
use pdfcrop::pdf::PdfDocument;
use pdfcrop::pipeline::{CropPipeline, PageOutcome};
use pdfcrop::raster::PopplerRasterizer;
use pdfcrop::units::Margin;

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(&cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(classify(&e));
        }
    }
}

/// Map an error to the process exit code.
fn classify(error: &CropError) -> i32 {
    match error {
        CropError::InvalidUnit(_) | CropError::InvalidValue(_) => exit_codes::INVALID_ARGS,
        _ => exit_codes::GENERAL_ERROR,
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        tracing::Level::ERROR
    } else {
        match cli.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    };
    fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> pdfcrop::Result<i32> {
    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::default(),
    };
    let config = config.merge_with_cli(cli);

    let margin: Margin = config.margin.parse()?;
    let options = CropOptions::builder()
        .dpi(config.dpi)
        .threshold(config.threshold)
        .margin_pt(margin.to_points(config.dpi)?)
        .build();
    options.validate()?;

    let output = cli.output_path();
    let rasterizer = PopplerRasterizer::new(&cli.input)?;

    // Opened once up front so input errors surface before any rendering and
    // the progress bar knows its length.
    let page_count = PdfDocument::open(&cli.input)?.page_count();

    let bar = if cli.quiet {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(page_count as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} pages ({eta})",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
        );
        bar
    };

    let pipeline = CropPipeline::new(options)
        .compress(config.compress)
        .threads(config.threads);
    let summary = pipeline.run_with_progress(&cli.input, &output, &rasterizer, &|| {
        bar.inc(1);
    })?;
    bar.finish_and_clear();

    if !cli.quiet {
        for report in &summary.reports {
            match &report.outcome {
                PageOutcome::Cropped(rect) => println!(
                    "page {:>4}: cropped to [{:.2} {:.2} {:.2} {:.2}]",
                    report.page, rect.x0, rect.y0, rect.x1, rect.y1
                ),
                PageOutcome::NoContent => {
                    println!("page {:>4}: blank, left unchanged", report.page)
                }
                PageOutcome::Degenerate => {
                    println!("page {:>4}: degenerate crop, left unchanged", report.page)
                }
                PageOutcome::Rotated(degrees) => println!(
                    "page {:>4}: rotated {} deg, left unchanged",
                    report.page, degrees
                ),
                PageOutcome::Failed(reason) => {
                    println!("page {:>4}: failed ({})", report.page, reason)
                }
            }
        }
        println!(
            "{} of {} pages cropped, {} unchanged, {} failed -> {}",
            summary.cropped,
            summary.page_count,
            summary.unchanged,
            summary.failed,
            output.display()
        );
        if summary.cropped == 0 && summary.page_count > 0 {
            println!("no crops applied; try a lower --threshold for faint scans");
        }
    }

    if summary.page_count > 0 && summary.failed == summary.page_count {
        return Ok(exit_codes::GENERAL_ERROR);
    }
    Ok(exit_codes::SUCCESS)
}
