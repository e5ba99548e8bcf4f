//! Command-line interface definition.

use std::path::PathBuf;

use clap::Parser;

use crate::crop::{DEFAULT_DPI, DEFAULT_MARGIN, DEFAULT_THRESHOLD};

/// Trim blank margins from PDF pages by rewriting their CropBox.
///
/// Pages are rendered to grayscale, the content bounding box is detected
/// against an intensity threshold, expanded by a margin and written back as
/// the page's CropBox. Page contents are never modified.
#[derive(Debug, Parser)]
#[command(name = "pdfcrop", version, about)]
pub struct Cli {
    /// Input PDF file
    pub input: PathBuf,

    /// Output path (default: <input>_cropped.pdf next to the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Rasterization resolution in dots per inch
    #[arg(long, default_value_t = DEFAULT_DPI)]
    pub dpi: u32,

    /// Intensity threshold (0-255); samples strictly below count as content
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: u8,

    /// Margin kept around the content, e.g. "4mm", "0.2in", "10pt", "12px"
    #[arg(short, long, default_value = DEFAULT_MARGIN)]
    pub margin: String,

    /// Number of worker threads (default: one per logical CPU)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Skip stream recompression when saving
    #[arg(long)]
    pub no_compress: bool,

    /// Suppress the progress bar and per-page output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Resolve the output path, deriving `<stem>_cropped.pdf` when the user
    /// did not pick one.
    pub fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => default_output_path(&self.input),
        }
    }
}

/// Derive the default output path: the input's stem with `_cropped` appended,
/// in the same directory.
pub fn default_output_path(input: &std::path::Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{}_cropped.pdf", stem))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["pdfcrop", "book.pdf"]);
        assert_eq!(cli.input, PathBuf::from("book.pdf"));
        assert_eq!(cli.dpi, 200);
        assert_eq!(cli.threshold, 245);
        assert_eq!(cli.margin, "4mm");
        assert!(cli.output.is_none());
        assert!(cli.threads.is_none());
        assert!(!cli.no_compress);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_explicit_values() {
        let cli = Cli::parse_from([
            "pdfcrop",
            "book.pdf",
            "-o",
            "out.pdf",
            "--dpi",
            "300",
            "--threshold",
            "230",
            "--margin",
            "0.2in",
            "--threads",
            "4",
            "--no-compress",
            "-q",
            "-vv",
        ]);
        assert_eq!(cli.output_path(), PathBuf::from("out.pdf"));
        assert_eq!(cli.dpi, 300);
        assert_eq!(cli.threshold, 230);
        assert_eq!(cli.margin, "0.2in");
        assert_eq!(cli.threads, Some(4));
        assert!(cli.no_compress);
        assert!(cli.quiet);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("book.pdf")),
            PathBuf::from("book_cropped.pdf")
        );
        assert_eq!(
            default_output_path(Path::new("/data/scans/book.pdf")),
            PathBuf::from("/data/scans/book_cropped.pdf")
        );
        // Extension other than .pdf is still replaced, matching the stem rule.
        assert_eq!(
            default_output_path(Path::new("notes.PDF")),
            PathBuf::from("notes_cropped.pdf")
        );
    }

    #[test]
    fn test_missing_input_is_an_error() {
        assert!(Cli::try_parse_from(["pdfcrop"]).is_err());
    }
}
