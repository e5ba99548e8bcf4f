//! TOML configuration file support.
//!
//! A configuration file supplies project defaults; command-line flags win
//! whenever they differ from the built-in defaults. Everything is optional:
//!
//! ```toml
//! dpi = 300
//! threshold = 230
//! margin = "0.2in"
//! compress = false
//! threads = 4
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::crop::{DEFAULT_DPI, DEFAULT_MARGIN, DEFAULT_THRESHOLD};
use crate::error::{CropError, Result};

/// Resolved run settings, from defaults, file and command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Rasterization resolution in dots per inch
    pub dpi: u32,
    /// Intensity threshold (0-255)
    pub threshold: u8,
    /// Margin with unit suffix, e.g. "4mm"
    pub margin: String,
    /// Recompress streams when saving
    pub compress: bool,
    /// Worker thread count; absent means one per logical CPU
    pub threads: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            threshold: DEFAULT_THRESHOLD,
            margin: DEFAULT_MARGIN.to_string(),
            compress: true,
            threads: None,
        }
    }
}

impl Config {
    /// Load a configuration file, rejecting unknown keys.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|e| CropError::InvalidValue(format!(
            "invalid configuration {}: {}",
            path.display(),
            e
        )))
    }

    /// Overlay command-line values onto this configuration.
    ///
    /// A flag overrides the file only when it differs from the built-in
    /// default, so a file value survives unless the user actually typed
    /// something else.
    pub fn merge_with_cli(mut self, cli: &Cli) -> Self {
        if cli.dpi != DEFAULT_DPI {
            self.dpi = cli.dpi;
        }
        if cli.threshold != DEFAULT_THRESHOLD {
            self.threshold = cli.threshold;
        }
        if cli.margin != DEFAULT_MARGIN {
            self.margin = cli.margin.clone();
        }
        if cli.no_compress {
            self.compress = false;
        }
        if cli.threads.is_some() {
            self.threads = cli.threads;
        }
        self
    }
}
