use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::driver::ToolkitError;

/// The `tmp` directory intermediate files are staged in.
///
/// It is created next to the output and must not exist beforehand. It is only
/// removed by [`StagingDir::remove`], so a failed run leaves its intermediate
/// files behind for inspection.
#[derive(Debug)]
pub struct StagingDir {
    path: PathBuf,
}

impl StagingDir {
    pub const NAME: &'static str = "tmp";

    pub fn create(output_dir: &Path) -> Result<Self, ToolkitError> {
        let path = output_dir.join(Self::NAME);
        if path.exists() {
            return Err(ToolkitError::StagingExists(output_dir.display().to_string()));
        }
        fs::create_dir(&path)?;
        debug!("Created staging directory {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of a file inside the staging directory
    pub fn file(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    pub fn remove(self) -> Result<(), ToolkitError> {
        fs::remove_dir_all(&self.path)?;
        debug!("Removed staging directory {}", self.path.display());
        Ok(())
    }
}
