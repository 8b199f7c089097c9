use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use ascii_model::{LineKind, ModelText, classify};
use modkit_common::{Units, utils};
use serde::Serialize;
use strum::Display;
use toolkit::{FileSink, FileSource, Sink, Source, StagingDir, Toolkit};
use tracing::{debug, info, warn};

use crate::assembler::assemble;
use crate::config::EditConfig;
use crate::editor::FieldEditor;
use crate::error::Result;
use crate::filter::{GeometricFilter, parse_metrics};
use crate::pruner::{RemovalScope, prune_contours};

/// Stages of an editor run, entered in this order and never revisited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    HeaderRead,
    MetricsPass,
    ObjectScan,
    FieldEdit,
    Assemble,
    Done,
}

/// What a run did to each object
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EditReport {
    pub object_count: usize,
    /// Objects written to the output, in order
    pub kept: Vec<usize>,
    pub removed: Vec<usize>,
    /// Objects passed through untouched because of their type
    pub ignored: Vec<usize>,
    pub edited: Vec<usize>,
    pub contours_removed: usize,
}

/// Runs the object editor against a toolkit
pub struct EditPipeline<'a, T: Toolkit> {
    toolkit: &'a T,
    config: &'a EditConfig,
}

impl<'a, T: Toolkit> EditPipeline<'a, T> {
    pub fn new(toolkit: &'a T, config: &'a EditConfig) -> Self {
        Self { toolkit, config }
    }

    pub fn run(&self, input: &Path, output: &Path) -> Result<EditReport> {
        let source = FileSource::new(input);
        source.validate()?;
        let sink = FileSink::new(output);
        sink.validate()?;
        info!("Editing {} into {}", source.description(), sink.description());
        let staging = StagingDir::create(&sink.dir())?;

        match self.run_staged(&source, &sink, &staging) {
            Ok(report) => {
                staging.remove()?;
                self.enter(Stage::Done);
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

    fn enter(&self, stage: Stage) {
        debug!(%stage, "entering stage");
    }

    fn run_staged(&self, source: &FileSource, sink: &FileSink, staging: &StagingDir) -> Result<EditReport> {
        self.enter(Stage::HeaderRead);
        let stem = source
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "model".to_string());
        let whole_text = staging.file(&format!("{stem}.txt"));
        self.toolkit.model_to_text(&source.path, &whole_text)?;
        let model = ModelText::read_file(&whole_text)?;
        let object_count = model.object_count()?;
        info!("Objects found: {object_count}");

        if self.config.whole_file {
            return self.edit_whole_file(model, object_count, sink);
        }
        fs::remove_file(&whole_text)?;

        let excluded = if self.config.bounds.is_active() {
            self.enter(Stage::MetricsPass);
            self.metrics_pass(&source.path, &model)?
        } else {
            BTreeSet::new()
        };

        let mut selected: Vec<usize> = match &self.config.selection {
            Some(selection) => selection.expand(object_count),
            None => (1..=object_count).collect(),
        };

        self.enter(Stage::ObjectScan);
        let mut report = EditReport {
            object_count,
            ..Default::default()
        };
        let mut removed = BTreeSet::new();
        let mut ignored = BTreeSet::new();

        for index in 1..=object_count {
            let text_path = object_text_path(staging, index);
            let model_path = text_path.with_extension("mod");
            self.toolkit.extract_object(index, &source.path, &model_path)?;
            self.toolkit.model_to_text(&model_path, &text_path)?;
            fs::remove_file(&model_path)?;
            let mut object = ModelText::read_file(&text_path)?;

            if self.config.ignore.any() {
                let object_type = classify(&object);
                if self.config.ignore.contains(object_type) {
                    debug!("Object {index} is {object_type}, ignoring");
                    ignored.insert(index);
                    continue;
                }
            }

            if excluded.contains(&index) {
                debug!("Object {index} is outside the geometric bounds");
                removed.insert(index);
                fs::remove_file(&text_path)?;
                continue;
            }

            if self.config.removal_scope == RemovalScope::AllObjects && self.removes(&object)? {
                debug!("Object {index} removed by contour count");
                removed.insert(index);
                fs::remove_file(&text_path)?;
                continue;
            }

            if !selected.contains(&index) {
                continue;
            }

            if self.config.matches_identity() && !self.identity_matches(&object) {
                debug!("Object {index} does not match --colorin/--namein");
                selected.retain(|&i| i != index);
                continue;
            }

            if self.config.removal_scope == RemovalScope::Selected && self.removes(&object)? {
                debug!("Object {index} removed by contour count");
                removed.insert(index);
                fs::remove_file(&text_path)?;
                continue;
            }

            if let Some(max_points) = self.config.min_points {
                let pruned = prune_contours(&mut object, max_points);
                if pruned > 0 {
                    debug!("Object {index}: removed {pruned} contours");
                    object.write_file(&text_path)?;
                    report.contours_removed += pruned;
                }
            }
        }

        if !self.config.edits.is_empty() {
            self.enter(Stage::FieldEdit);
            let mut editor = FieldEditor::new(self.config.edits.clone(), self.config.seed);
            for index in 1..=object_count {
                if !selected.contains(&index) || removed.contains(&index) || ignored.contains(&index) {
                    continue;
                }
                let text_path = object_text_path(staging, index);
                let mut object = ModelText::read_file(&text_path)?;
                editor.apply(&mut object);
                object.write_file(&text_path)?;
                report.edited.push(index);
            }
        }

        self.enter(Stage::Assemble);
        report.kept = (1..=object_count).filter(|i| !removed.contains(i)).collect();
        let staged: Vec<PathBuf> = report
            .kept
            .iter()
            .map(|&index| object_text_path(staging, index))
            .collect();
        assemble(self.toolkit, &staged, sink)?;

        report.removed = removed.into_iter().collect();
        report.ignored = ignored.into_iter().collect();
        info!(
            "Kept {} of {} objects ({} removed, {} edited, {} contours removed)",
            report.kept.len(),
            object_count,
            report.removed.len(),
            report.edited.len(),
            report.contours_removed
        );
        Ok(report)
    }

    fn edit_whole_file(&self, mut model: ModelText, object_count: usize, sink: &FileSink) -> Result<EditReport> {
        if self.config.filters_objects() {
            warn!("--all edits every object; selection and removal options are ignored");
        }

        self.enter(Stage::FieldEdit);
        let mut editor = FieldEditor::new(self.config.edits.clone(), self.config.seed);
        let changed = editor.apply(&mut model);
        debug!("Rewrote {changed} lines");
        model.write_file(sink.path())?;

        let all: Vec<usize> = (1..=object_count).collect();
        Ok(EditReport {
            object_count,
            kept: all.clone(),
            edited: if self.config.edits.is_empty() { Vec::new() } else { all },
            ..Default::default()
        })
    }

    fn metrics_pass(&self, input: &Path, model: &ModelText) -> Result<BTreeSet<usize>> {
        let model_units = Units::parse(model.units()?)?;
        let filter = GeometricFilter::new(&self.config.bounds, model_units)?;
        let metrics = parse_metrics(&self.toolkit.object_metrics(input)?)?;
        let excluded = filter.exclusion_set(&metrics);
        info!(
            "Geometric filter excludes {} of {} measured objects",
            excluded.len(),
            metrics.len()
        );
        Ok(excluded)
    }

    fn removes(&self, object: &ModelText) -> Result<bool> {
        match self.config.removal {
            Some(rule) => Ok(rule.removes(object.contour_count()?)),
            None => Ok(false),
        }
    }

    /// Check `--colorin`/`--namein` against the lines before the first contour
    fn identity_matches(&self, object: &ModelText) -> bool {
        let color_ok = self.config.match_color.is_none_or(|wanted| {
            object
                .object_header()
                .any(|kind| matches!(kind, LineKind::Color { rgb, .. } if rgb.approx_eq(&wanted)))
        });
        let name_ok = self.config.match_name.as_deref().is_none_or(|wanted| {
            object
                .object_header()
                .any(|kind| matches!(kind, LineKind::Name(name) if name.starts_with(wanted)))
        });
        color_ok && name_ok
    }
}

fn object_text_path(staging: &StagingDir, index: usize) -> PathBuf {
    staging.file(&utils::numbered_file("obj", index, 8, "txt"))
}
