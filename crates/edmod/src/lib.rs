//! # edmod - Object and Field Editor
//!
//! Edits the fields of objects in a model (name, color, transparency, line
//! width, fill, point size) and removes objects or contours by selection,
//! identity, type, contour count, point count or geometric measurements.
//!
//! A run converts the model to text through a [`toolkit::Toolkit`], stages
//! one text file per object in a `tmp` directory next to the output, edits
//! them and joins the survivors back into a single model.

pub mod assembler;
pub mod config;
pub mod editor;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod pruner;
pub mod selector;

pub use config::{EditConfig, EditOptions, IgnoredTypes};
pub use editor::{ColorEdit, FieldEditor, FieldEdits};
pub use error::{EditError, Result};
pub use filter::{GeometricBounds, GeometricFilter, ObjectMetrics, parse_metrics, sphericity};
pub use pipeline::{EditPipeline, EditReport, Stage};
pub use pruner::{RemovalRule, RemovalScope, prune_contours};
pub use selector::{ObjectSelection, select_objects};
