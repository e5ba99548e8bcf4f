//! Length parsing and conversion to PDF points.
//!
//! Margins on the command line carry a unit suffix ("4mm", "0.2in", "12px",
//! bare numbers mean points). Units form a closed enumeration and unknown
//! suffixes are rejected up front instead of silently falling back to a
//! default.

use std::fmt;
use std::str::FromStr;

use crate::error::{CropError, Result};

/// Points per inch, the PDF native scale.
const POINTS_PER_INCH: f64 = 72.0;

/// Millimeters per inch.
const MM_PER_INCH: f64 = 25.4;

/// Centimeters per inch.
const CM_PER_INCH: f64 = 2.54;

/// Supported length units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unit {
    /// PDF points (1/72 inch); the default for bare numbers
    #[default]
    Pt,
    /// Millimeters
    Mm,
    /// Centimeters
    Cm,
    /// Inches
    In,
    /// Raster pixels; conversion depends on the rasterization dpi
    Px,
}

impl Unit {
    /// Convert a value in this unit to points.
    ///
    /// `dpi` is only consulted for [`Unit::Px`] and must be the same value
    /// used for rasterization, since pixel size is resolution-dependent.
    pub fn to_points(&self, value: f64, dpi: u32) -> Result<f64> {
        if dpi == 0 {
            return Err(CropError::InvalidValue("dpi must be positive".into()));
        }
        Ok(match self {
            Unit::Pt => value,
            Unit::Mm => value * POINTS_PER_INCH / MM_PER_INCH,
            Unit::Cm => value * POINTS_PER_INCH / CM_PER_INCH,
            Unit::In => value * POINTS_PER_INCH,
            Unit::Px => value * POINTS_PER_INCH / f64::from(dpi),
        })
    }

    /// Convert a value in points back to this unit.
    pub fn from_points(&self, points: f64, dpi: u32) -> Result<f64> {
        if dpi == 0 {
            return Err(CropError::InvalidValue("dpi must be positive".into()));
        }
        Ok(match self {
            Unit::Pt => points,
            Unit::Mm => points * MM_PER_INCH / POINTS_PER_INCH,
            Unit::Cm => points * CM_PER_INCH / POINTS_PER_INCH,
            Unit::In => points / POINTS_PER_INCH,
            Unit::Px => points * f64::from(dpi) / POINTS_PER_INCH,
        })
    }
}

impl FromStr for Unit {
    type Err = CropError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "" | "pt" => Ok(Unit::Pt),
            "mm" => Ok(Unit::Mm),
            "cm" => Ok(Unit::Cm),
            "in" | "inch" | "inches" => Ok(Unit::In),
            "px" => Ok(Unit::Px),
            other => Err(CropError::InvalidUnit(other.to_string())),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Unit::Pt => "pt",
            Unit::Mm => "mm",
            Unit::Cm => "cm",
            Unit::In => "in",
            Unit::Px => "px",
        };
        write!(f, "{}", s)
    }
}

/// A margin as given on the command line: a non-negative value and a unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    pub value: f64,
    pub unit: Unit,
}

impl Margin {
    /// Create a margin, validating the value.
    pub fn new(value: f64, unit: Unit) -> Result<Self> {
        if !value.is_finite() {
            return Err(CropError::InvalidValue(format!(
                "margin value must be finite, got {}",
                value
            )));
        }
        if value < 0.0 {
            return Err(CropError::InvalidValue(format!(
                "margin value must not be negative, got {}",
                value
            )));
        }
        Ok(Self { value, unit })
    }

    /// Canonicalize to points for the given rasterization dpi.
    pub fn to_points(&self, dpi: u32) -> Result<f64> {
        self.unit.to_points(self.value, dpi)
    }
}

impl FromStr for Margin {
    type Err = CropError;

    /// Parse strings like "4mm", "0.2in", "11.34" (bare value = points).
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().to_ascii_lowercase();
        if s.is_empty() {
            return Err(CropError::InvalidValue("empty margin".into()));
        }

        let split = s
            .find(|c: char| c.is_ascii_alphabetic())
            .unwrap_or(s.len());
        let (number, suffix) = s.split_at(split);

        let value: f64 = number.trim().parse().map_err(|_| {
            CropError::InvalidValue(format!("invalid margin value: {:?}", number.trim()))
        })?;
        let unit: Unit = suffix.trim().parse()?;

        Margin::new(value, unit)
    }
}

impl fmt::Display for Margin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit)
    }
}
