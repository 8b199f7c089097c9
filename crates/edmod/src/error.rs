use ascii_model::ModelError;
use modkit_common::CommonError;
use thiserror::Error;
use toolkit::ToolkitError;

#[derive(Error, Debug)]
pub enum EditError {
    #[error("{0}")]
    Usage(String),

    #[error("Improper object string {0}.")]
    ObjectList(String),

    #[error(transparent)]
    Common(#[from] CommonError),

    #[error("Toolkit error: {0}")]
    Toolkit(#[from] ToolkitError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Could not read metrics line {line}: '{text}'")]
    Metrics { line: usize, text: String },

    #[error("No objects remain after filtering, nothing to write to {0}")]
    NothingToAssemble(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EditError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    /// Errors caused by how the utility was invoked; these are reported
    /// together with the help text.
    pub fn is_usage(&self) -> bool {
        match self {
            EditError::Usage(_) | EditError::ObjectList(_) | EditError::Common(_) => true,
            EditError::Toolkit(err) => err.is_usage(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, EditError>;
