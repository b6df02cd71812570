//! Track command: simulate a scenario and report one package.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use depot_core::{PackageId, PackageSnapshot};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::simulate::{SimulationConfig, load_fleet, simulate_fleet};
use crate::{
    ARG_HORIZON_HOURS, ARG_SCENARIO, ARG_SERVICE_BUFFER, ARG_STEP_MINUTES, ARG_TRACK_PACKAGE,
    ARG_VEHICLE_ORDER, CliError, ENV_TRACK_PACKAGE, ENV_TRACK_SCENARIO,
};

/// CLI arguments for the `track` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Run the same simulation as `depot simulate`, then print \
                 the tracking card of one package: status, vehicle, pickup, \
                 estimated and actual delivery.",
    about = "Print a package's tracking card after simulating"
)]
#[ortho_config(prefix = "DEPOT")]
pub(crate) struct TrackArgs {
    /// Path to a JSON scenario file.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) scenario_path: Option<Utf8PathBuf>,
    /// Identifier of the package to report.
    #[arg(value_name = "package")]
    #[serde(default)]
    pub(crate) package: Option<String>,
    /// Minutes the clock moves between dispatch cycles.
    #[arg(long = ARG_STEP_MINUTES, value_name = "minutes")]
    #[serde(default)]
    pub(crate) step_minutes: Option<u64>,
    /// Give up after this many simulated hours.
    #[arg(long = ARG_HORIZON_HOURS, value_name = "hours")]
    #[serde(default)]
    pub(crate) horizon_hours: Option<u64>,
    /// Factor applied to travel time for delivery estimates.
    #[arg(long = ARG_SERVICE_BUFFER, value_name = "factor")]
    #[serde(default)]
    pub(crate) service_buffer: Option<f64>,
    /// Vehicle order: `largest-first` or `id-order`.
    #[arg(long = ARG_VEHICLE_ORDER, value_name = "order")]
    #[serde(default)]
    pub(crate) vehicle_order: Option<String>,
}

impl TrackArgs {
    pub(crate) fn into_config(self) -> Result<TrackConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        TrackConfig::try_from(merged)
    }
}

/// Resolved `track` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TrackConfig {
    pub(crate) simulation: SimulationConfig,
    pub(crate) package: PackageId,
}

impl TryFrom<TrackArgs> for TrackConfig {
    type Error = CliError;

    fn try_from(args: TrackArgs) -> Result<Self, Self::Error> {
        let scenario_path = args.scenario_path.ok_or(CliError::MissingArgument {
            field: ARG_SCENARIO,
            env: ENV_TRACK_SCENARIO,
        })?;
        let package = args
            .package
            .filter(|id| !id.trim().is_empty())
            .ok_or(CliError::MissingArgument {
                field: ARG_TRACK_PACKAGE,
                env: ENV_TRACK_PACKAGE,
            })?;
        let simulation = SimulationConfig::resolve(
            scenario_path,
            args.step_minutes,
            args.horizon_hours,
            args.service_buffer,
            args.vehicle_order.as_deref(),
        )?;
        Ok(Self {
            simulation,
            package: PackageId::from(package),
        })
    }
}

pub(crate) fn run_track(args: TrackArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_track_with(args, &mut stdout)
}

pub(crate) fn run_track_with(args: TrackArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let snapshot = track_package(&config)?;
    writeln!(writer, "{snapshot}").map_err(CliError::WriteOutput)
}

/// Simulate the scenario, then look the package up, delivered or not.
pub(crate) fn track_package(config: &TrackConfig) -> Result<PackageSnapshot, CliError> {
    let mut fleet = load_fleet(&config.simulation)?;
    // An unknown id fails before any simulated work is done.
    fleet.track(&config.package)?;
    simulate_fleet(&mut fleet, &config.simulation)?;
    Ok(fleet.track(&config.package)?)
}
