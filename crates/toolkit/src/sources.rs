use std::fmt::Debug;
use std::path::{Path, PathBuf};

use modkit_common::utils;

use crate::driver::ToolkitError;

/// Generic trait for files a utility reads
pub trait Source: Debug + Clone {
    /// Check that the source is accessible
    fn validate(&self) -> Result<(), ToolkitError>;

    /// Get a human-readable description of this source
    fn description(&self) -> String;
}

/// Generic trait for files a utility writes
pub trait Sink: Debug + Clone {
    /// Check that the sink can be written to
    fn validate(&self) -> Result<(), ToolkitError>;

    /// Get a human-readable description of this sink
    fn description(&self) -> String;
}

/// An existing input file (model, image stack)
#[derive(Debug, Clone)]
pub struct FileSource {
    pub path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Source for FileSource {
    fn validate(&self) -> Result<(), ToolkitError> {
        if self.path.is_file() {
            Ok(())
        } else {
            Err(ToolkitError::MissingInput(self.path.display().to_string()))
        }
    }

    fn description(&self) -> String {
        format!("File: {}", self.path.display())
    }
}

/// An output file whose directory must already exist
#[derive(Debug, Clone)]
pub struct FileSink {
    pub path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Directory the output is written into
    pub fn dir(&self) -> PathBuf {
        utils::output_dir(&self.path)
    }

    /// Remove the `<output>~` backup the toolkit leaves when it overwrites a file
    pub fn remove_backup(&self) -> Result<(), ToolkitError> {
        let backup = utils::backup_path(&self.path);
        if backup.is_file() {
            std::fs::remove_file(backup)?;
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn validate(&self) -> Result<(), ToolkitError> {
        let dir = self.dir();
        if dir.is_dir() {
            Ok(())
        } else {
            Err(ToolkitError::MissingOutputDir(dir.display().to_string()))
        }
    }

    fn description(&self) -> String {
        format!("File: {}", self.path.display())
    }
}
