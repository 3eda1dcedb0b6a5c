//! Render command implementation for the metromap CLI.

use std::io::{BufReader, BufWriter, Write};

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, ValueEnum};
use log::info;
use metromap_core::{
    CanvasConfig, Dataset, NameRewrites, NetworkMap, RenderOptions, render_network,
};
use metromap_data::{InputFormat, create_utf8_file, file_is_file, open_utf8_file};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_BOTTOM_PADDING, ARG_DATASET, ARG_FORMAT, ARG_OUTPUT, ARG_PADDING, ARG_REWRITES,
    ARG_TARGET_HEIGHT, ARG_TARGET_WIDTH, CliError, ENV_DATASET,
};

/// Layout of the dataset file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum DatasetFormat {
    /// Lines already resolved to ways and stops.
    #[default]
    Dataset,
    /// Route masters and route relations.
    Relations,
}

impl From<DatasetFormat> for InputFormat {
    fn from(format: DatasetFormat) -> Self {
        match format {
            DatasetFormat::Dataset => Self::Dataset,
            DatasetFormat::Relations => Self::Relations,
        }
    }
}

/// CLI arguments for the `render` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Render a transit dataset into per-line path instructions, \
                 merged station markers and canvas bounds, written as JSON. \
                 Settings can come from CLI flags, configuration files, or \
                 environment variables.",
    about = "Render a network map from a dataset"
)]
#[ortho_config(prefix = "METROMAP")]
pub(crate) struct RenderArgs {
    /// Path to the dataset JSON file.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) dataset: Option<Utf8PathBuf>,
    /// Layout of the dataset file.
    #[arg(long = ARG_FORMAT, value_enum, value_name = "format")]
    #[serde(default)]
    pub(crate) format: Option<DatasetFormat>,
    /// Write the map to this file instead of standard output.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
    /// Width budget of the drawing before padding.
    #[arg(long = ARG_TARGET_WIDTH, value_name = "units")]
    #[serde(default)]
    pub(crate) target_width: Option<f64>,
    /// Height budget of the drawing before padding.
    #[arg(long = ARG_TARGET_HEIGHT, value_name = "units")]
    #[serde(default)]
    pub(crate) target_height: Option<f64>,
    /// Margin around the drawing.
    #[arg(long = ARG_PADDING, value_name = "units")]
    #[serde(default)]
    pub(crate) padding: Option<f64>,
    /// Extra bottom margin for the attribution caption.
    #[arg(long = ARG_BOTTOM_PADDING, value_name = "units")]
    #[serde(default)]
    pub(crate) bottom_padding: Option<f64>,
    /// JSON file of extra stop-name rewrite rules keyed by network name.
    #[arg(long = ARG_REWRITES, value_name = "path")]
    #[serde(default)]
    pub(crate) rewrites: Option<Utf8PathBuf>,
}

impl RenderArgs {
    pub(crate) fn into_config(self) -> Result<RenderConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RenderConfig::try_from(merged)
    }
}

/// Resolved `render` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RenderConfig {
    /// Dataset file.
    pub(crate) dataset: Utf8PathBuf,
    /// Dataset layout.
    pub(crate) format: DatasetFormat,
    /// Output file; standard output when absent.
    pub(crate) output: Option<Utf8PathBuf>,
    /// Validated canvas settings.
    pub(crate) canvas: CanvasConfig,
    /// Extra rewrite rules file.
    pub(crate) rewrites: Option<Utf8PathBuf>,
}

impl RenderConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        Self::require_existing(&self.dataset, ARG_DATASET)?;
        if let Some(rewrites) = &self.rewrites {
            Self::require_existing(rewrites, ARG_REWRITES)?;
        }
        Ok(())
    }

    fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
        match file_is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field,
                path: path.to_path_buf(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field,
                    path: path.to_path_buf(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field,
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub(crate) fn render_options(&self) -> Result<RenderOptions, CliError> {
        let mut rewrites = NameRewrites::builtin();
        if let Some(path) = &self.rewrites {
            rewrites.extend(load_rewrites(path)?);
        }
        Ok(RenderOptions {
            canvas: self.canvas,
            rewrites,
        })
    }
}

impl TryFrom<RenderArgs> for RenderConfig {
    type Error = CliError;

    fn try_from(args: RenderArgs) -> Result<Self, Self::Error> {
        let dataset = args.dataset.ok_or(CliError::MissingArgument {
            field: ARG_DATASET,
            env: ENV_DATASET,
        })?;
        let defaults = CanvasConfig::default();
        let canvas = CanvasConfig {
            target_width: args.target_width.unwrap_or(defaults.target_width),
            target_height: args.target_height.unwrap_or(defaults.target_height),
            padding: args.padding.unwrap_or(defaults.padding),
            bottom_padding: args.bottom_padding.unwrap_or(defaults.bottom_padding),
        };
        canvas.validate().map_err(CliError::InvalidCanvas)?;
        Ok(Self {
            dataset,
            format: args.format.unwrap_or_default(),
            output: args.output,
            canvas,
            rewrites: args.rewrites,
        })
    }
}

pub(super) fn run_render(args: RenderArgs) -> Result<(), CliError> {
    let config = resolve_render_config(args)?;
    match &config.output {
        Some(path) => {
            let file = create_utf8_file(path).map_err(|source| CliError::CreateOutput {
                path: path.clone(),
                source,
            })?;
            let mut writer = BufWriter::new(file);
            run_render_with(&config, &mut writer)?;
            writer.flush().map_err(CliError::WriteOutput)?;
            info!("wrote network map to {path}");
            Ok(())
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            run_render_with(&config, &mut stdout)
        }
    }
}

pub(super) fn run_render_with(
    config: &RenderConfig,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let map = execute_render(config)?;
    write_network_map(writer, &map)
}

fn execute_render(config: &RenderConfig) -> Result<NetworkMap, CliError> {
    let options = config.render_options()?;
    let dataset: Dataset = InputFormat::from(config.format).load(&config.dataset)?;
    info!(
        "loaded {} lines, {} ways and {} nodes from {}",
        dataset.lines.len(),
        dataset.ways.len(),
        dataset.nodes.len(),
        config.dataset
    );
    render_network(&dataset, &options).map_err(CliError::Render)
}

fn resolve_render_config(args: RenderArgs) -> Result<RenderConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

/// Loads JSON-encoded [`NameRewrites`] from disk.
pub(super) fn load_rewrites(path: &Utf8Path) -> Result<NameRewrites, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenRewrites {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::ParseRewrites {
        path: path.to_path_buf(),
        source,
    })
}

fn write_network_map(writer: &mut dyn Write, map: &NetworkMap) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(map).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
