use std::fs;
use std::path::Path;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use edmod::EditOptions;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error("Unsupported profile format {0}. Please use .toml or .json files")]
    UnsupportedFileFormat(String),
}

/// Load editor options from a TOML profile
pub fn profile_from_toml(content: &str) -> Result<EditOptions, CliError> {
    Ok(toml::from_str(content)?)
}

/// Load editor options from a JSON profile
pub fn profile_from_json(content: &str) -> Result<EditOptions, CliError> {
    Ok(serde_json::from_str(content)?)
}

/// Auto-detect the profile format from the extension and load it
pub fn load_profile<P: AsRef<Path>>(path: P) -> Result<EditOptions, CliError> {
    let path = path.as_ref();
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => profile_from_toml(&fs::read_to_string(path)?),
        Some("json") => profile_from_json(&fs::read_to_string(path)?),
        _ => Err(CliError::UnsupportedFileFormat(path.display().to_string())),
    }
}

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Print the error followed by the help text and exit with status 1
pub fn usage_exit<C: CommandFactory>(message: &str) -> ! {
    println!();
    println!("ERROR: {message}");
    println!();
    // nothing left to report if stdout is gone
    let _ = C::command().print_help();
    println!();
    std::process::exit(1)
}

/// Parse the command line, routing argument errors through [`usage_exit`]
pub fn parse_or_exit<C: Parser>() -> C {
    match C::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            _ => {
                let rendered = err.to_string();
                let message = rendered
                    .lines()
                    .next()
                    .unwrap_or_default()
                    .trim_start_matches("error: ")
                    .to_string();
                usage_exit::<C>(&message)
            }
        },
    }
}
