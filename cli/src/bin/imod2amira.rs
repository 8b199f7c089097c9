use std::path::PathBuf;

use clap::Parser;
use cli::{parse_or_exit, usage_exit};
use color_eyre::eyre::Result;
use modkit_common::Xyz;
use stack_align::SceneExporter;
use toolkit::ImodToolkit;
use tracing::info;

/// Convert a meshed model to a VRML scene that lines up with its image stack
/// when both are loaded into Amira
#[derive(Parser)]
#[command(
    name = "imod2amira",
    version,
    override_usage = "imod2amira [options] file.mrc file_in.mod file_out.wrl"
)]
struct Cli {
    /// Pixel scales in X,Y,Z. Read from the stack header when not given
    #[arg(long, value_name = "X,Y,Z")]
    scale: Option<String>,

    /// IMOD installation to use instead of $IMOD_DIR or PATH
    #[arg(long, value_name = "DIR")]
    imod_dir: Option<PathBuf>,

    /// Image stack, input model and output scene
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    cli::init_tracing();

    let cli: Cli = parse_or_exit();

    let [stack, model, output] = match cli.files.as_slice() {
        [stack, model, output] => [stack, model, output],
        _ => usage_exit::<Cli>("Improper number of arguments. See the usage below."),
    };

    let scale = match cli.scale.as_deref().map(Xyz::parse_csv).transpose() {
        Ok(scale) => scale,
        Err(err) => usage_exit::<Cli>(&err.to_string()),
    };

    let toolkit = ImodToolkit::locate(cli.imod_dir.as_deref())?;
    match SceneExporter::new(&toolkit, scale).run(stack, model, output) {
        Ok(report) => info!(
            "{} created with {} points",
            output.display(),
            report.points_rewritten
        ),
        Err(err) if err.is_usage() => usage_exit::<Cli>(&err.to_string()),
        Err(err) => return Err(err.into()),
    }
    Ok(())
}
