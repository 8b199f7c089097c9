//! # Stack Align
//!
//! Utilities that put a model back in register with its image stack:
//!
//! - [`SceneExporter`] converts a meshed model to a VRML scene whose points are
//!   in stack coordinates, using the stack's pixel spacing and origin.
//! - [`ModelRescaler`] rebuilds a model on a stack whose pixel spacing has
//!   changed, keeping object names and colors.

pub mod error;
pub mod export;
pub mod header;
pub mod rescale;
pub mod vrml;

pub use error::{AlignError, Result};
pub use export::{ExportReport, SceneExporter};
pub use header::parse_header_triplet;
pub use rescale::{ModelRescaler, RescaleReport, RescaledObject};
pub use vrml::{SceneTransform, rewrite_scene};
