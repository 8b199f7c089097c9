//! # Modkit Common - Shared Types and Utilities
//!
//! Shared data structures and helpers used across the modkit crates: model
//! units, XYZ triplets, RGB colors and the file naming conventions used for
//! staged per-object files.
//!
//! ## Example
//!
//! ```rust
//! use modkit_common::{Rgb, Units, Xyz};
//!
//! let scale = Xyz::parse_csv("10.2,10.2,20").unwrap();
//! assert_eq!(scale.z, 20.0);
//!
//! let factor = Units::Nanometer.length_factor_to(Units::Micrometer).unwrap();
//! assert_eq!(factor, 0.001);
//!
//! let color = Rgb::parse_csv("1,0.5,0").unwrap();
//! assert_eq!(color.to_bytes(), [255, 128, 0]);
//! ```

use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

/// Result type for shared modkit operations
pub type Result<T> = std::result::Result<T, CommonError>;

/// Standard error type for shared modkit operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommonError {
    #[error("Expected three comma separated values as X,Y,Z but got '{input}'")]
    InvalidTriplet { input: String },

    #[error("Color strings must be specified as R,G,B (got '{input}')")]
    InvalidColor { input: String },

    #[error("Improper unit string '{value}'. Available options are: pix, nm, um")]
    UnknownUnits { value: String },

    #[error("Model header units must be set to {requested} (model units are {model})")]
    UnitMismatch { model: Units, requested: Units },
}

/// Length units a model header or a threshold can be expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Units {
    #[strum(to_string = "pix", serialize = "pixel", serialize = "pixels")]
    #[serde(rename = "pix")]
    Pixel,
    #[strum(to_string = "nm", serialize = "nanometer", serialize = "nanometers")]
    #[serde(rename = "nm")]
    Nanometer,
    #[strum(to_string = "um", serialize = "micron", serialize = "microns")]
    #[serde(rename = "um")]
    Micrometer,
}

impl Units {
    /// Parse a units string, reporting unknown values as a [`CommonError`]
    pub fn parse(value: &str) -> Result<Self> {
        value.trim().parse().map_err(|_| CommonError::UnknownUnits {
            value: value.to_string(),
        })
    }

    /// Factor converting a length in `self` into a length in `target`.
    ///
    /// Pixels carry no physical size, so converting between pixels and a
    /// physical unit fails with [`CommonError::UnitMismatch`].
    pub fn length_factor_to(self, target: Units) -> Result<f64> {
        match (self, target) {
            (Units::Nanometer, Units::Micrometer) => Ok(0.001),
            (Units::Micrometer, Units::Nanometer) => Ok(1000.0),
            (a, b) if a == b => Ok(1.0),
            (model, requested) => Err(CommonError::UnitMismatch { model, requested }),
        }
    }
}

/// Three floating point values along X, Y and Z
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Xyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Xyz {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Parse an `X,Y,Z` string
    pub fn parse_csv(input: &str) -> Result<Self> {
        let values = parse_floats(input, ',').ok_or_else(|| CommonError::InvalidTriplet {
            input: input.to_string(),
        })?;
        Ok(Self::new(values[0], values[1], values[2]))
    }
}

impl std::fmt::Display for Xyz {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}, {}", self.x, self.y, self.z)
    }
}

/// An RGB color with components in the range 0-1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    /// Tolerance used when comparing colors read back from a model file
    pub const MATCH_TOLERANCE: f64 = 1e-3;

    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Parse an `R,G,B` string
    pub fn parse_csv(input: &str) -> Result<Self> {
        let values = parse_floats(input, ',').ok_or_else(|| CommonError::InvalidColor {
            input: input.to_string(),
        })?;
        Ok(Self::new(values[0], values[1], values[2]))
    }

    pub fn components(&self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }

    /// Components scaled to 0-255
    pub fn to_bytes(&self) -> [u8; 3] {
        self.components()
            .map(|c| (c * 255.0).round().clamp(0.0, 255.0) as u8)
    }

    /// Compare two colors within [`Rgb::MATCH_TOLERANCE`]
    pub fn approx_eq(&self, other: &Rgb) -> bool {
        self.components()
            .iter()
            .zip(other.components())
            .all(|(a, b)| (a - b).abs() <= Self::MATCH_TOLERANCE)
    }
}

fn parse_floats(input: &str, separator: char) -> Option<[f64; 3]> {
    let parts: Vec<&str> = input.split(separator).map(str::trim).collect();
    if parts.len() != 3 {
        return None;
    }
    let mut values = [0.0; 3];
    for (slot, part) in values.iter_mut().zip(parts) {
        *slot = part.parse().ok()?;
    }
    Some(values)
}

/// Path and naming helpers shared by the utilities
pub mod utils {
    use super::*;

    /// Directory the output file will be written into; an output given as a
    /// bare file name resolves to the current directory.
    pub fn output_dir(output: &Path) -> PathBuf {
        match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Zero padded file name such as `obj_00000012.mod`
    pub fn numbered_file(prefix: &str, index: usize, width: usize, extension: &str) -> String {
        format!("{prefix}_{index:0width$}.{extension}")
    }

    /// Backup file the toolkit leaves next to a file it overwrites
    pub fn backup_path(path: &Path) -> PathBuf {
        let mut name = path.as_os_str().to_os_string();
        name.push("~");
        PathBuf::from(name)
    }

    /// Rename a file, copying it when the rename crosses filesystems
    pub fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
        if std::fs::rename(from, to).is_err() {
            std::fs::copy(from, to)?;
            std::fs::remove_file(from)?;
        }
        Ok(())
    }
}
