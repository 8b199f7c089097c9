use ascii_model::ModelError;
use modkit_common::CommonError;
use thiserror::Error;
use toolkit::{HeaderField, ToolkitError};

#[derive(Error, Debug)]
pub enum AlignError {
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Common(#[from] CommonError),

    #[error("Toolkit error: {0}")]
    Toolkit(#[from] ToolkitError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Could not read the {field} triplet from the stack header: '{output}'")]
    Header { field: HeaderField, output: String },

    #[error("The model Z scale must not be zero")]
    ZeroZScale,

    #[error("The model {0} has no objects")]
    EmptyModel(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AlignError {
    /// Errors caused by how the utility was invoked; these are reported
    /// together with the help text.
    pub fn is_usage(&self) -> bool {
        match self {
            AlignError::Usage(_) | AlignError::Common(_) => true,
            AlignError::Toolkit(err) => err.is_usage(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, AlignError>;
