use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::driver::{HeaderField, PointModelRequest, Toolkit, ToolkitError};

/// Toolkit backed by the IMOD command line programs
#[derive(Debug, Clone)]
pub struct ImodToolkit {
    bin_dir: Option<PathBuf>,
}

impl ImodToolkit {
    /// Locate the programs through `$IMOD_DIR/bin`, falling back to `PATH`
    pub fn new() -> Result<Self, ToolkitError> {
        if let Some(imod_dir) = std::env::var_os("IMOD_DIR") {
            let bin_dir = PathBuf::from(imod_dir).join("bin");
            if bin_dir.is_dir() {
                return Self::with_bin_dir(bin_dir);
            }
        }

        Self::find_on_path("imodinfo")?;
        Ok(Self { bin_dir: None })
    }

    /// Use the programs in a specific directory
    pub fn with_bin_dir(bin_dir: impl Into<PathBuf>) -> Result<Self, ToolkitError> {
        let bin_dir = bin_dir.into();

        if !bin_dir.join("imodinfo").exists() {
            return Err(ToolkitError::Initialization(format!(
                "imodinfo not found in {}",
                bin_dir.display()
            )));
        }

        Ok(Self {
            bin_dir: Some(bin_dir),
        })
    }

    /// An explicit directory when given, otherwise the default lookup
    pub fn locate(bin_dir: Option<&Path>) -> Result<Self, ToolkitError> {
        match bin_dir {
            Some(dir) => Self::with_bin_dir(dir),
            None => Self::new(),
        }
    }

    fn find_on_path(program: &str) -> Result<PathBuf, ToolkitError> {
        if let Ok(output) = Command::new("which").arg(program).output() {
            if output.status.success() {
                let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !path.is_empty() {
                    return Ok(PathBuf::from(path));
                }
            }
        }

        Err(ToolkitError::Initialization(format!(
            "{program} not found. Please install IMOD, set IMOD_DIR, or pass --imod-dir."
        )))
    }

    fn program(&self, name: &str) -> Command {
        match &self.bin_dir {
            Some(dir) => Command::new(dir.join(name)),
            None => Command::new(name),
        }
    }

    fn build_info_command(&self, flag: &str, model: &Path) -> Command {
        let mut cmd = self.program("imodinfo");
        cmd.arg(flag).arg(model);
        cmd
    }

    fn build_extract_command(&self, index: usize, model: &Path, output: &Path) -> Command {
        let mut cmd = self.program("imodextract");
        cmd.arg(index.to_string()).arg(model).arg(output);
        cmd
    }

    fn build_join_command(&self, inputs: &[PathBuf], output: &Path) -> Command {
        let mut cmd = self.program("imodjoin");
        cmd.args(inputs).arg(output);
        cmd
    }

    fn build_model_to_points_command(&self, model: &Path, points: &Path) -> Command {
        let mut cmd = self.program("model2point");
        cmd.arg("-object").arg(model).arg(points);
        cmd
    }

    fn build_points_to_model_command(&self, request: &PointModelRequest) -> Command {
        let mut cmd = self.program("point2model");
        cmd.arg("-image").arg(&request.image);
        if let Some(name) = &request.name {
            cmd.arg("-name").arg(name);
        }
        if let Some([r, g, b]) = request.color {
            cmd.arg("-color").arg(format!("{r},{g},{b}"));
        }
        cmd.arg(&request.points).arg(&request.output);
        cmd
    }

    fn build_scene_command(&self, model: &Path, scene: &Path) -> Command {
        let mut cmd = self.program("imod2vrml2");
        cmd.arg(model).arg(scene);
        cmd
    }

    fn build_header_command(&self, stack: &Path, field: HeaderField) -> Command {
        let mut cmd = self.program("header");
        cmd.arg(format!("-{field}")).arg(stack);
        cmd
    }

    fn program_name(cmd: &Command) -> String {
        Path::new(cmd.get_program())
            .file_name()
            .unwrap_or(cmd.get_program())
            .to_string_lossy()
            .into_owned()
    }

    fn run(&self, mut cmd: Command) -> Result<std::process::Output, ToolkitError> {
        debug!("Executing toolkit command: {:?}", cmd);

        let program = Self::program_name(&cmd);
        let output = cmd
            .output()
            .map_err(|source| ToolkitError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ToolkitError::Execution {
                program,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output)
    }

    fn execute_command(&self, cmd: Command) -> Result<(), ToolkitError> {
        self.run(cmd).map(|_| ())
    }

    fn capture_command(&self, cmd: Command) -> Result<String, ToolkitError> {
        let output = self.run(cmd)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn execute_to_file(&self, mut cmd: Command, path: &Path) -> Result<(), ToolkitError> {
        let file = File::create(path)?;
        cmd.stdout(Stdio::from(file));
        self.execute_command(cmd)
    }
}

impl Toolkit for ImodToolkit {
    fn model_to_text(&self, model: &Path, text: &Path) -> Result<(), ToolkitError> {
        self.execute_to_file(self.build_info_command("-a", model), text)
    }

    fn object_metrics(&self, model: &Path) -> Result<String, ToolkitError> {
        self.capture_command(self.build_info_command("-c", model))
    }

    fn extract_object(&self, index: usize, model: &Path, output: &Path) -> Result<(), ToolkitError> {
        self.execute_command(self.build_extract_command(index, model, output))
    }

    fn join(&self, inputs: &[PathBuf], output: &Path) -> Result<(), ToolkitError> {
        self.execute_command(self.build_join_command(inputs, output))
    }

    fn model_to_points(&self, model: &Path, points: &Path) -> Result<(), ToolkitError> {
        self.execute_command(self.build_model_to_points_command(model, points))
    }

    fn points_to_model(&self, request: &PointModelRequest) -> Result<(), ToolkitError> {
        self.execute_command(self.build_points_to_model_command(request))
    }

    fn model_to_scene(&self, model: &Path, scene: &Path) -> Result<(), ToolkitError> {
        self.execute_command(self.build_scene_command(model, scene))
    }

    fn stack_header(&self, stack: &Path, field: HeaderField) -> Result<String, ToolkitError> {
        self.capture_command(self.build_header_command(stack, field))
    }
}
