use std::fs;
use std::path::Path;

use ascii_model::ModelText;
use modkit_common::Xyz;
use serde::Serialize;
use toolkit::{FileSink, FileSource, HeaderField, Sink, Source, StagingDir, Toolkit};
use tracing::{debug, info, warn};

use crate::error::{AlignError, Result};
use crate::header::parse_header_triplet;
use crate::vrml::{SceneTransform, rewrite_scene};

/// Outcome of a scene export
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportReport {
    pub transform: SceneTransform,
    pub points_rewritten: usize,
}

/// Exports a meshed model as a VRML scene aligned with its image stack
pub struct SceneExporter<'a, T: Toolkit> {
    toolkit: &'a T,
    /// Pixel spacing overriding the stack header
    scale: Option<Xyz>,
}

impl<'a, T: Toolkit> SceneExporter<'a, T> {
    pub fn new(toolkit: &'a T, scale: Option<Xyz>) -> Self {
        Self { toolkit, scale }
    }

    pub fn run(&self, stack: &Path, model: &Path, output: &Path) -> Result<ExportReport> {
        let stack = FileSource::new(stack);
        stack.validate()?;
        let model = FileSource::new(model);
        model.validate()?;
        let sink = FileSink::new(output);
        sink.validate()?;
        info!(
            "Exporting {} against {} into {}",
            model.description(),
            stack.description(),
            sink.description()
        );
        let staging = StagingDir::create(&sink.dir())?;

        match self.export(&stack, &model, &sink, &staging) {
            Ok(report) => {
                staging.remove()?;
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

    fn export(
        &self,
        stack: &FileSource,
        model: &FileSource,
        sink: &FileSink,
        staging: &StagingDir,
    ) -> Result<ExportReport> {
        let scale = match self.scale {
            Some(scale) => scale,
            None => self.header_triplet(&stack.path, HeaderField::Pixel)?,
        };
        let origin = self.header_triplet(&stack.path, HeaderField::Origin)?;

        let text = staging.file("ascii.txt");
        self.toolkit.model_to_text(&model.path, &text)?;
        let model_z_scale = ModelText::read_file(&text)?.scale()?.z;
        if model_z_scale == 0.0 {
            return Err(AlignError::ZeroZScale);
        }

        info!("Scale (x,y,z): {}", scale);
        info!("Origin (x,y,z): {}", origin);
        debug!("Model Z scale: {model_z_scale}");

        let transform = SceneTransform {
            scale,
            origin,
            model_z_scale,
        };

        self.toolkit.model_to_scene(&model.path, sink.path())?;
        let scene = fs::read_to_string(sink.path())?;
        let (scene, points_rewritten) = rewrite_scene(&scene, &transform);
        fs::write(sink.path(), scene)?;
        info!("Rewrote {points_rewritten} points in {}", sink.path().display());

        Ok(ExportReport {
            transform,
            points_rewritten,
        })
    }

    fn header_triplet(&self, stack: &Path, field: HeaderField) -> Result<Xyz> {
        let output = self.toolkit.stack_header(stack, field)?;
        parse_header_triplet(&output, field)
    }
}
