use std::path::PathBuf;

use clap::Parser;
use cli::{load_profile, parse_or_exit, usage_exit};
use color_eyre::eyre::Result;
use edmod::{EditOptions, EditPipeline};
use toolkit::ImodToolkit;
use tracing::{debug, info};

/// Edit the object fields of a model file, or remove objects and contours
#[derive(Parser)]
#[command(
    name = "edmod",
    version,
    override_usage = "edmod [options] file_in.mod file_out.mod"
)]
struct Cli {
    #[command(flatten)]
    options: EditOptions,

    /// Profile (.toml or .json) with default values for the options above
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// IMOD installation to use instead of $IMOD_DIR or PATH
    #[arg(long, value_name = "DIR")]
    imod_dir: Option<PathBuf>,

    /// Print the JSON schema of the profile format and exit
    #[arg(long)]
    print_schema: bool,

    /// Input and output model files
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    cli::init_tracing();

    let cli: Cli = parse_or_exit();

    if cli.print_schema {
        let schema = schemars::schema_for!(EditOptions);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        return Ok(());
    }

    let [input, output] = match cli.files.as_slice() {
        [input, output] => [input, output],
        _ => usage_exit::<Cli>("Improper number of arguments. See the usage below."),
    };

    let options = match &cli.config {
        Some(path) => cli.options.clone().overlay(load_profile(path)?),
        None => cli.options.clone(),
    };
    let config = match options.validate() {
        Ok(config) => config,
        Err(err) => usage_exit::<Cli>(&err.to_string()),
    };

    let toolkit = ImodToolkit::locate(cli.imod_dir.as_deref())?;
    let report = match EditPipeline::new(&toolkit, &config).run(input, output) {
        Ok(report) => report,
        Err(err) if err.is_usage() => usage_exit::<Cli>(&err.to_string()),
        Err(err) => return Err(err.into()),
    };

    debug!("Report: {}", serde_json::to_string(&report)?);
    info!("{} created", output.display());
    Ok(())
}
