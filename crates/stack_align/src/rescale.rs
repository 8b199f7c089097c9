use std::fs;
use std::path::Path;

use ascii_model::ModelText;
use modkit_common::utils;
use serde::Serialize;
use toolkit::{FileSink, FileSource, PointModelRequest, Sink, Source, StagingDir, Toolkit};
use tracing::{debug, info, warn};

use crate::error::{AlignError, Result};

/// Name and color carried over for one object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RescaledObject {
    pub index: usize,
    pub name: Option<String>,
    pub color: Option<[u8; 3]>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RescaleReport {
    pub objects: Vec<RescaledObject>,
}

/// Rebuilds a model against a stack with different pixel spacing.
///
/// Every object goes through a point list and is rebuilt on the new stack,
/// keeping its name and color. Meshes are not carried over.
pub struct ModelRescaler<'a, T: Toolkit> {
    toolkit: &'a T,
}

impl<'a, T: Toolkit> ModelRescaler<'a, T> {
    pub fn new(toolkit: &'a T) -> Self {
        Self { toolkit }
    }

    pub fn run(&self, stack: &Path, model: &Path, output: &Path) -> Result<RescaleReport> {
        let stack = FileSource::new(stack);
        stack.validate()?;
        let model = FileSource::new(model);
        model.validate()?;
        let sink = FileSink::new(output);
        sink.validate()?;
        info!(
            "Rescaling {} against {} into {}",
            model.description(),
            stack.description(),
            sink.description()
        );
        let staging = StagingDir::create(&sink.dir())?;

        match self.rescale(&stack, &model, &sink, &staging) {
            Ok(report) => {
                staging.remove()?;
                info!("{} created", sink.path().display());
                warn!("Meshes must be regenerated with imodmesh");
                Ok(report)
            }
            Err(err) if err.is_usage() => {
                if let Err(cleanup) = staging.remove() {
                    warn!("Could not remove staging directory: {cleanup}");
                }
                Err(err)
            }
            Err(err) => {
                warn!(
                    "Leaving staging directory {} for inspection",
                    staging.path().display()
                );
                Err(err)
            }
        }
    }

    fn rescale(
        &self,
        stack: &FileSource,
        model: &FileSource,
        sink: &FileSink,
        staging: &StagingDir,
    ) -> Result<RescaleReport> {
        info!("Determining the number of objects in {}", model.path.display());
        let text = staging.file("ascii.txt");
        self.toolkit.model_to_text(&model.path, &text)?;
        let object_count = ModelText::read_file(&text)?.object_count()?;
        fs::remove_file(&text)?;
        info!("Objects found: {object_count}");
        if object_count == 0 {
            return Err(AlignError::EmptyModel(model.path.display().to_string()));
        }

        let mut report = RescaleReport::default();
        for index in 1..=object_count {
            info!("Processing object {index}");
            let object_model = staging.file(&utils::numbered_file("object", index, 6, "mod"));
            let points = object_model.with_extension("txt");

            self.toolkit.extract_object(index, &model.path, &object_model)?;

            self.toolkit.model_to_text(&object_model, &text)?;
            let object_text = ModelText::read_file(&text)?;
            fs::remove_file(&text)?;
            let object = RescaledObject {
                index,
                name: object_text.name().map(str::to_string),
                color: object_text.color().map(|rgb| rgb.to_bytes()),
            };
            debug!(?object, "rebuilding object");

            self.toolkit.model_to_points(&object_model, &points)?;
            fs::remove_file(&object_model)?;
            self.toolkit.points_to_model(&PointModelRequest {
                points: points.clone(),
                output: object_model.clone(),
                image: stack.path.clone(),
                name: object.name.clone(),
                color: object.color,
            })?;
            fs::remove_file(&points)?;

            if index == 1 {
                utils::move_file(&object_model, sink.path())?;
            } else {
                let inputs = [sink.path.clone(), object_model.clone()];
                self.toolkit.join(&inputs, sink.path())?;
                fs::remove_file(&object_model)?;
            }
            report.objects.push(object);
        }

        sink.remove_backup()?;
        Ok(report)
    }
}
