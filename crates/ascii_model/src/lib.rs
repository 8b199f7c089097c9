//! Typed reading and writing of the toolkit's text model format.
//!
//! A text model is line oriented: each line starts with a tag (`imod`,
//! `object`, `name`, `color`, `contour`, ...) followed by space separated
//! values. [`ModelText`] parses every line into a [`LineKind`] while keeping
//! its exact text, so a model can be edited field by field and written back
//! without disturbing the lines that were not touched.

pub mod classify;
pub mod error;
pub mod line;
pub mod model;

pub use classify::{ObjectType, classify};
pub use error::{ModelError, Result};
pub use line::{Line, LineKind};
pub use model::ModelText;
