//! Error types emitted by the depot CLI.
//!
//! Keep this error type reasonably small, as every CLI helper returns
//! `Result<_, CliError>`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use depot_core::{FleetError, SimulationError, TrackError, ValidationError};
use depot_dispatch::DispatchConfigError;
use thiserror::Error;

/// Errors emitted by the depot CLI.
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
        field: &'static str,
        env: &'static str,
    },
    /// A numeric option is out of range.
    #[error("{field} must be {expected}")]
    InvalidOption {
        field: &'static str,
        expected: &'static str,
    },
    /// Dispatch policy options were rejected.
    #[error(transparent)]
    DispatchConfig(#[from] DispatchConfigError),
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Opening the scenario file failed.
    #[error("failed to open scenario at {path:?}: {source}")]
    OpenScenario {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Scenario JSON could not be decoded.
    #[error("failed to parse scenario JSON at {path:?}: {source}")]
    ParseScenario {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// A vehicle or package in the scenario was rejected.
    #[error("scenario in {path:?} is invalid: {source}")]
    InvalidScenario {
        path: Utf8PathBuf,
        #[source]
        source: ValidationError,
    },
    /// Creating the scenario output file failed.
    #[error("failed to create scenario file at {path:?}: {source}")]
    CreateScenario {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A dispatch cycle could not be committed.
    #[error("dispatch failed: {0}")]
    Dispatch(#[from] FleetError),
    /// Advancing the simulation failed.
    #[error("simulation failed: {0}")]
    Simulation(#[from] SimulationError),
    /// The requested package is not part of the scenario.
    #[error(transparent)]
    Track(#[from] TrackError),
    /// Serializing command output failed.
    #[error("failed to serialize output: {0}")]
    SerializeOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
