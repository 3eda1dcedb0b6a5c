//! Error types emitted by the metromap CLI.
//!
//! Keep this error type reasonably small, as every CLI helper returns
//! `Result<_, CliError>`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use metromap_core::{MapError, ProjectionError};
use metromap_data::DatasetError;
use thiserror::Error;

/// Errors emitted by the metromap CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name.
        field: &'static str,
        /// Environment variable name.
        env: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Flag naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Flag naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Canvas settings were rejected.
    #[error("invalid canvas settings: {0}")]
    InvalidCanvas(#[source] ProjectionError),
    /// The dataset could not be loaded.
    #[error("failed to load dataset: {0}")]
    LoadDataset(#[from] DatasetError),
    /// Opening the rewrite rules file failed.
    #[error("failed to open rewrite rules at {path:?}: {source}")]
    OpenRewrites {
        /// Rules path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The rewrite rules file could not be decoded.
    #[error("failed to parse rewrite rules at {path:?}: {source}")]
    ParseRewrites {
        /// Rules path.
        path: Utf8PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
    /// Rendering the network failed.
    #[error("failed to render network: {0}")]
    Render(#[from] MapError),
    /// Serialising the network map failed.
    #[error("failed to serialise network map: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Creating the output file failed.
    #[error("failed to create output file {path:?}: {source}")]
    CreateOutput {
        /// Output path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Writing the network map failed.
    #[error("failed to write network map: {0}")]
    WriteOutput(#[source] std::io::Error),
}
