use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Text model has no '{0}' line")]
    MissingField(&'static str),

    #[error("Failed to read text model {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write text model {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
