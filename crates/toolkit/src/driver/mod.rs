pub mod imod;

use std::path::{Path, PathBuf};

use strum::{Display, IntoStaticStr};

#[derive(thiserror::Error, Debug)]
pub enum ToolkitError {
    #[error("Failed to initialize toolkit: {0}")]
    Initialization(String),
    #[error("Failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} failed ({status}): {stderr}")]
    Execution {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("The input file {0} does not exist")]
    MissingInput(String),
    #[error("The output path {0} does not exist.")]
    MissingOutputDir(String),
    #[error("There is already a folder with the name tmp in the output path {0}")]
    StagingExists(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ToolkitError {
    /// Errors caused by how the utility was invoked rather than by the toolkit
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            ToolkitError::MissingInput(_)
                | ToolkitError::MissingOutputDir(_)
                | ToolkitError::StagingExists(_)
        )
    }
}

/// Field that can be read from an image stack header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum HeaderField {
    /// Pixel spacing in X, Y and Z
    Pixel,
    /// Stack origin in X, Y and Z
    Origin,
}

/// Inputs for rebuilding a model from a point list against an image stack
#[derive(Debug, Clone, PartialEq)]
pub struct PointModelRequest {
    pub points: PathBuf,
    pub output: PathBuf,
    pub image: PathBuf,
    pub name: Option<String>,
    /// Object color as 0-255 components
    pub color: Option<[u8; 3]>,
}

/// The external modeling toolkit.
///
/// Every operation is one blocking invocation of an external program. An
/// invocation that cannot be launched or exits unsuccessfully is an error.
pub trait Toolkit {
    /// Write the text representation of a model to `text`
    fn model_to_text(&self, model: &Path, text: &Path) -> Result<(), ToolkitError>;

    /// Per-object metrics table (volume, surface area, ...) of a model
    fn object_metrics(&self, model: &Path) -> Result<String, ToolkitError>;

    /// Extract the object with the given 1-based index into its own model
    fn extract_object(&self, index: usize, model: &Path, output: &Path) -> Result<(), ToolkitError>;

    /// Join models, in order, into one output model
    fn join(&self, inputs: &[PathBuf], output: &Path) -> Result<(), ToolkitError>;

    /// Convert a model into a point list, tagging points with their object
    fn model_to_points(&self, model: &Path, points: &Path) -> Result<(), ToolkitError>;

    /// Rebuild a model from a point list
    fn points_to_model(&self, request: &PointModelRequest) -> Result<(), ToolkitError>;

    /// Convert a meshed model into a VRML 2 scene
    fn model_to_scene(&self, model: &Path, scene: &Path) -> Result<(), ToolkitError>;

    /// Raw header output of an image stack for one field
    fn stack_header(&self, stack: &Path, field: HeaderField) -> Result<String, ToolkitError>;
}
