use std::path::PathBuf;

use clap::Parser;
use cli::{parse_or_exit, usage_exit};
use color_eyre::eyre::Result;
use stack_align::ModelRescaler;
use toolkit::ImodToolkit;
use tracing::info;

/// Rebuild a model on an image stack whose pixel spacing has changed, keeping
/// object names and colors
#[derive(Parser)]
#[command(
    name = "rescale-model",
    version,
    override_usage = "rescale-model [options] file.mrc file_in.mod file_out.mod"
)]
struct Cli {
    /// IMOD installation to use instead of $IMOD_DIR or PATH
    #[arg(long, value_name = "DIR")]
    imod_dir: Option<PathBuf>,

    /// Image stack, input model and output model
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

    let toolkit = ImodToolkit::locate(cli.imod_dir.as_deref())?;
    match ModelRescaler::new(&toolkit).run(stack, model, output) {
        Ok(report) => info!("Rescaled {} objects", report.objects.len()),
        Err(err) if err.is_usage() => usage_exit::<Cli>(&err.to_string()),
        Err(err) => return Err(err.into()),
    }
    Ok(())
}
