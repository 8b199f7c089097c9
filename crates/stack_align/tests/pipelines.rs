use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use ascii_model::ModelText;
use modkit_common::{Xyz, utils};
use stack_align::{AlignError, ModelRescaler, SceneExporter};
use toolkit::{HeaderField, PointModelRequest, Toolkit, ToolkitError};

const MODEL: &str = "imod 2
scale 1 1 2
units nm

object 0 1 0
name Nucleus
color 0 0.5 1 0
contour 0 0 1
1 1 1

object 1 1 0
name Golgi apparatus
color 1 0 0 0
contour 0 0 1
2 2 2
";

const SCENE: &str = "#VRML V2.0 utf8
Shape {
  geometry IndexedFaceSet {
    coord Coordinate {
      point [
        1 1 1,
        2 2 2,
      ]
    }
  }
}
";

#[derive(Debug)]
struct FakeToolkit {
    pixel: String,
    origin: String,
    calls: RefCell<Vec<String>>,
    rebuilt: RefCell<Vec<PointModelRequest>>,
}

impl FakeToolkit {
    fn new() -> Self {
        Self {
            pixel: "   10.000   10.000   20.000\n".into(),
            origin: "0.1000E+030.2000E+03-0.5000E+01\n".into(),
            calls: RefCell::new(Vec::new()),
            rebuilt: RefCell::new(Vec::new()),
        }
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.borrow_mut().push(call.into());
    }

    fn called(&self, call: &str) -> bool {
        self.calls.borrow().iter().any(|c| c == call)
    }
}

fn objects(text: &str) -> Vec<String> {
    let mut objects: Vec<String> = Vec::new();
    for line in text.lines() {
        if line.starts_with("object ") {
            objects.push(String::new());
        }
        if let Some(object) = objects.last_mut() {
            object.push_str(line);
            object.push('\n');
        }
    }
    objects
}

fn with_header(objects: &[String]) -> String {
    format!("imod {}\nscale 1 1 2\n{}", objects.len(), objects.concat())
}

impl Toolkit for FakeToolkit {
    fn model_to_text(&self, model: &Path, text: &Path) -> Result<(), ToolkitError> {
        self.record("imodinfo");
        fs::copy(model, text)?;
        Ok(())
    }

    fn object_metrics(&self, _model: &Path) -> Result<String, ToolkitError> {
        Err(ToolkitError::Initialization("not needed".into()))
    }

    fn extract_object(&self, index: usize, model: &Path, output: &Path) -> Result<(), ToolkitError> {
        self.record("imodextract");
        let object = objects(&fs::read_to_string(model)?).swap_remove(index - 1);
        fs::write(output, with_header(&[object]))?;
        Ok(())
    }

    fn join(&self, inputs: &[PathBuf], output: &Path) -> Result<(), ToolkitError> {
        self.record("imodjoin");
        let mut joined = Vec::new();
        for input in inputs {
            joined.extend(objects(&fs::read_to_string(input)?));
        }
        if output.exists() {
            fs::rename(output, utils::backup_path(output))?;
        }
        fs::write(output, with_header(&joined))?;
        Ok(())
    }

    fn model_to_points(&self, model: &Path, points: &Path) -> Result<(), ToolkitError> {
        self.record("model2point");
        fs::copy(model, points)?;
        Ok(())
    }

    fn points_to_model(&self, request: &PointModelRequest) -> Result<(), ToolkitError> {
        self.record("point2model");
        let [r, g, b] = request.color.unwrap_or([255, 255, 255]);
        let object = format!(
            "object 0 0 0\nname {}\ncolor {} {} {} 0\n",
            request.name.as_deref().unwrap_or(""),
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0,
        );
        fs::write(&request.output, with_header(&[object]))?;
        self.rebuilt.borrow_mut().push(request.clone());
        Ok(())
    }

    fn model_to_scene(&self, _model: &Path, scene: &Path) -> Result<(), ToolkitError> {
        self.record("imod2vrml2");
        fs::write(scene, SCENE)?;
        Ok(())
    }

    fn stack_header(&self, _stack: &Path, field: HeaderField) -> Result<String, ToolkitError> {
        self.record(format!("header -{field}"));
        Ok(match field {
            HeaderField::Pixel => self.pixel.clone(),
            HeaderField::Origin => self.origin.clone(),
        })
    }
}

fn workspace() -> (tempfile::TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let stack = dir.path().join("stack.mrc");
    fs::write(&stack, "MRC").unwrap();
    let model = dir.path().join("model.mod");
    fs::write(&model, MODEL).unwrap();
    (dir, stack, model)
}

#[test]
fn test_scene_export_uses_stack_header() {
    let (dir, stack, model) = workspace();
    let output = dir.path().join("scene.wrl");
    let toolkit = FakeToolkit::new();

    let report = SceneExporter::new(&toolkit, None)
        .run(&stack, &model, &output)
        .unwrap();

    assert_eq!(report.points_rewritten, 2);
    assert_eq!(report.transform.scale, Xyz::new(10.0, 10.0, 20.0));
    assert_eq!(report.transform.origin, Xyz::new(100.0, 200.0, -5.0));
    assert_eq!(report.transform.model_z_scale, 2.0);

    let scene = fs::read_to_string(&output).unwrap();
    assert!(scene.contains("\n        110.0 210.0 5.0,\n"));
    assert!(scene.contains("\n        120.0 220.0 15.0,\n"));
    assert!(!dir.path().join("tmp").exists());
}

#[test]
fn test_scene_export_scale_override() {
    let (dir, stack, model) = workspace();
    let output = dir.path().join("scene.wrl");
    let toolkit = FakeToolkit::new();

    let report = SceneExporter::new(&toolkit, Some(Xyz::new(1.0, 1.0, 1.0)))
        .run(&stack, &model, &output)
        .unwrap();

    assert!(!toolkit.called("header -pixel"));
    assert!(toolkit.called("header -origin"));
    assert_eq!(report.transform.scale, Xyz::new(1.0, 1.0, 1.0));
    let scene = fs::read_to_string(&output).unwrap();
    assert!(scene.contains("101.0 201.0 -4.5,"));
}

#[test]
fn test_scene_export_bad_header_keeps_staging() {
    let (dir, stack, model) = workspace();
    let mut toolkit = FakeToolkit::new();
    toolkit.origin = "not a header".into();

    let err = SceneExporter::new(&toolkit, None)
        .run(&stack, &model, &dir.path().join("scene.wrl"))
        .unwrap_err();

    assert!(matches!(err, AlignError::Header { field: HeaderField::Origin, .. }));
    assert!(!err.is_usage());
    assert!(dir.path().join("tmp").is_dir());
}

#[test]
fn test_scene_export_missing_stack() {
    let (dir, _, model) = workspace();
    let toolkit = FakeToolkit::new();

    let err = SceneExporter::new(&toolkit, None)
        .run(&dir.path().join("missing.mrc"), &model, &dir.path().join("scene.wrl"))
        .unwrap_err();

    assert!(err.is_usage());
    assert!(toolkit.calls.borrow().is_empty());
}

#[test]
fn test_rescale_keeps_names_and_colors() {
    let (dir, stack, model) = workspace();
    let output = dir.path().join("rescaled.mod");
    let toolkit = FakeToolkit::new();

    let report = ModelRescaler::new(&toolkit).run(&stack, &model, &output).unwrap();

    assert_eq!(report.objects.len(), 2);
    assert_eq!(report.objects[1].name.as_deref(), Some("Golgi apparatus"));

    let rebuilt = toolkit.rebuilt.borrow();
    assert_eq!(rebuilt[0].color, Some([0, 128, 255]));
    assert_eq!(rebuilt[1].color, Some([255, 0, 0]));
    assert!(rebuilt.iter().all(|request| request.image == stack));

    let result = ModelText::read_file(&output).unwrap();
    assert_eq!(result.object_count().unwrap(), 2);
    assert!(result.to_string().contains("name Golgi apparatus\n"));

    assert!(!utils::backup_path(&output).exists());
    assert!(!dir.path().join("tmp").exists());
}

#[test]
fn test_rescale_refuses_existing_staging_dir() {
    let (dir, stack, model) = workspace();
    fs::create_dir(dir.path().join("tmp")).unwrap();
    let toolkit = FakeToolkit::new();

    let err = ModelRescaler::new(&toolkit)
        .run(&stack, &model, &dir.path().join("rescaled.mod"))
        .unwrap_err();

    assert!(matches!(err, AlignError::Toolkit(ToolkitError::StagingExists(_))));
    assert!(err.is_usage());
}
