#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use ascii_model::{LineKind, ModelText};
use modkit_common::Rgb;
use toolkit::{HeaderField, PointModelRequest, Toolkit, ToolkitError};

/// Four objects:
/// 1. closed "Mito", two contours with 3 and 1 points
/// 2. scattered "Vesicle", one single point contour
/// 3. closed "Mito" without contours
/// 4. open "ER", one contour with 2 points
pub const MODEL: &str = "# imod ascii file version 2.0
imod 4
max 512 512 40
offsets 0 0 0
angles 0 0 0
scale 1 1 1
pixsize 1.5
units nm

object 0 2 0
name Mito
color 1 0 0 0
width2D 1
symflags 0
pointsize 0
contour 0 0 3
1 1 1
2 2 1
3 1 1
contour 1 0 1
5 5 2

object 1 1 0
name Vesicle
color 0 1 0 0
open
scattered
width2D 1
symflags 0
pointsize 4
contour 0 0 1
9 9 3

object 2 0 0
name Mito
color 1 0 0 0
width2D 1
symflags 0
pointsize 0

object 3 1 0
name ER
color 0 0 1 0
open
width2D 2
symflags 0
pointsize 0
contour 0 0 2
7 7 4
8 8 4
";

/// Per-object metrics for [`MODEL`], one row per object
pub const METRICS: &str = "\
# Object info for model.mod
#
# obj  type  ncont  volume      surface     meshed  open  npoints
#-------------------------------------------------------------------
  1    C     2      500.0       300.0       yes     no    4
  2    S     1      0           0           no      yes   1
  3    C     0      50.0        80.0        yes     no    0
  4    O     1      20.0        90.0        yes     yes   2
";

/// Toolkit that treats model files as text models.
///
/// Extraction and joining split and concatenate at `object` lines, which is
/// enough to exercise the editor without the real programs.
#[derive(Debug, Default)]
pub struct TextToolkit {
    pub metrics: String,
    pub calls: RefCell<Vec<String>>,
}

impl TextToolkit {
    pub fn new() -> Self {
        Self {
            metrics: METRICS.to_string(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn called(&self, program: &str) -> bool {
        self.calls.borrow().iter().any(|call| call == program)
    }

    fn record(&self, program: &str) {
        self.calls.borrow_mut().push(program.to_string());
    }
}

fn read(path: &Path) -> Result<String, ToolkitError> {
    Ok(fs::read_to_string(path)?)
}

/// Split a text model into its header and one chunk per object
fn split(text: &str) -> (Vec<String>, Vec<Vec<String>>) {
    let mut header = Vec::new();
    let mut objects: Vec<Vec<String>> = Vec::new();
    for line in text.lines() {
        if line.starts_with("object ") {
            objects.push(Vec::new());
        }
        match objects.last_mut() {
            Some(object) => object.push(line.to_string()),
            None => header.push(line.to_string()),
        }
    }
    (header, objects)
}

fn render(header: &[String], objects: &[Vec<String>]) -> String {
    let mut out = String::new();
    for line in header {
        if line.starts_with("imod ") {
            out.push_str(&format!("imod {}\n", objects.len()));
        } else {
            out.push_str(line);
            out.push('\n');
        }
    }
    for line in objects.iter().flatten() {
        out.push_str(line);
        out.push('\n');
    }
    out
}

impl Toolkit for TextToolkit {
    fn model_to_text(&self, model: &Path, text: &Path) -> Result<(), ToolkitError> {
        self.record("imodinfo");
        fs::copy(model, text)?;
        Ok(())
    }

    fn object_metrics(&self, _model: &Path) -> Result<String, ToolkitError> {
        self.record("imodinfo -F");
        Ok(self.metrics.clone())
    }

    fn extract_object(&self, index: usize, model: &Path, output: &Path) -> Result<(), ToolkitError> {
        self.record("imodextract");
        let (header, objects) = split(&read(model)?);
        let object = objects
            .get(index - 1)
            .cloned()
            .ok_or_else(|| ToolkitError::Initialization(format!("no object {index}")))?;
        fs::write(output, render(&header, &[object]))?;
        Ok(())
    }

    fn join(&self, inputs: &[PathBuf], output: &Path) -> Result<(), ToolkitError> {
        self.record("imodjoin");
        let mut header = Vec::new();
        let mut joined = Vec::new();
        for (i, input) in inputs.iter().enumerate() {
            let (input_header, objects) = split(&read(input)?);
            if i == 0 {
                header = input_header;
            }
            joined.extend(objects);
        }
        fs::write(output, render(&header, &joined))?;
        Ok(())
    }

    fn model_to_points(&self, _model: &Path, _points: &Path) -> Result<(), ToolkitError> {
        Err(ToolkitError::Initialization("model2point is not available".into()))
    }

    fn points_to_model(&self, _request: &PointModelRequest) -> Result<(), ToolkitError> {
        Err(ToolkitError::Initialization("point2model is not available".into()))
    }

    fn model_to_scene(&self, _model: &Path, _scene: &Path) -> Result<(), ToolkitError> {
        Err(ToolkitError::Initialization("imod2vrml2 is not available".into()))
    }

    fn stack_header(&self, _stack: &Path, _field: HeaderField) -> Result<String, ToolkitError> {
        Err(ToolkitError::Initialization("header is not available".into()))
    }
}

/// Object names of a text model, in order
pub fn names(model: &ModelText) -> Vec<String> {
    model
        .kinds()
        .filter_map(|kind| match kind {
            LineKind::Name(name) => Some(name.clone()),
            _ => None,
        })
        .collect()
}

pub fn colors(model: &ModelText) -> Vec<Rgb> {
    model
        .kinds()
        .filter_map(|kind| match kind {
            LineKind::Color { rgb, .. } => Some(*rgb),
            _ => None,
        })
        .collect()
}

/// Working directory holding `model.mod`, with the output path next to it
pub fn workspace() -> (tempfile::TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("model.mod");
    fs::write(&input, MODEL).unwrap();
    let output = dir.path().join("edited.mod");
    (dir, input, output)
}
