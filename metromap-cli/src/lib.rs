//! Command-line interface for rendering transit network maps.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod render;

pub use error::CliError;

use render::{RenderArgs, run_render};

const ARG_DATASET: &str = "dataset";
const ARG_FORMAT: &str = "format";
const ARG_OUTPUT: &str = "output";
const ARG_TARGET_WIDTH: &str = "target-width";
const ARG_TARGET_HEIGHT: &str = "target-height";
const ARG_PADDING: &str = "padding";
const ARG_BOTTOM_PADDING: &str = "bottom-padding";
const ARG_REWRITES: &str = "rewrites";
const ENV_DATASET: &str = "METROMAP_CMDS_RENDER_DATASET";

/// Run the metromap CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments, configuration, input files or
/// rendering fail.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Render(args) => run_render(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "metromap",
    about = "Turn transit line data into a drawable network map",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render a dataset into line paths, station markers and canvas bounds.
    Render(RenderArgs),
}

#[cfg(test)]
mod tests;
