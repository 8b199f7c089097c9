use std::fs;
use std::path::PathBuf;

use modkit_common::utils;
use toolkit::{FileSink, Toolkit};
use tracing::{debug, info};

use crate::error::{EditError, Result};

/// Merge staged per-object text files into the output model.
///
/// `staged` must already be in ascending object order. Each text file is
/// renamed to a model file (the toolkit reads text models), then a single
/// survivor is moved into place and several are joined.
pub fn assemble<T: Toolkit>(toolkit: &T, staged: &[PathBuf], sink: &FileSink) -> Result<()> {
    let mut models = Vec::with_capacity(staged.len());
    for text in staged {
        let model = text.with_extension("mod");
        fs::rename(text, &model)?;
        models.push(model);
    }

    match models.as_slice() {
        [] => {
            return Err(EditError::NothingToAssemble(sink.path().display().to_string()));
        }
        [single] => {
            debug!("Moving {} to {}", single.display(), sink.path().display());
            utils::move_file(single, sink.path())?;
        }
        many => {
            info!("Joining {} objects into {}", many.len(), sink.path().display());
            toolkit.join(many, sink.path())?;
        }
    }

    sink.remove_backup()?;
    Ok(())
}
