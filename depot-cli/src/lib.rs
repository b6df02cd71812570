//! Command-line interface for the depot dispatch engine.
//!
//! `depot generate` writes a seeded scenario, `depot simulate` runs it to
//! completion with the greedy dispatcher, and `depot track` reports where
//! one package ended up.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod fs;
mod generate;
mod scenario;
mod simulate;
mod track;

pub use error::CliError;
pub use scenario::Scenario;
pub use simulate::SimulationOutcome;

use generate::{GenerateArgs, run_generate};
use simulate::{SimulateArgs, run_simulate};
use track::{TrackArgs, run_track};

pub(crate) const ARG_GENERATE_VEHICLES: &str = "vehicles";
pub(crate) const ARG_GENERATE_PACKAGES: &str = "packages";
pub(crate) const ARG_GENERATE_SEED: &str = "seed";
pub(crate) const ARG_GENERATE_OUTPUT: &str = "output";
pub(crate) const ENV_GENERATE_VEHICLES: &str = "DEPOT_CMDS_GENERATE_VEHICLES";
pub(crate) const ENV_GENERATE_PACKAGES: &str = "DEPOT_CMDS_GENERATE_PACKAGES";

pub(crate) const ARG_SCENARIO: &str = "scenario";
pub(crate) const ARG_STEP_MINUTES: &str = "step-minutes";
pub(crate) const ARG_HORIZON_HOURS: &str = "horizon-hours";
pub(crate) const ARG_SERVICE_BUFFER: &str = "service-buffer";
pub(crate) const ARG_VEHICLE_ORDER: &str = "vehicle-order";
pub(crate) const ENV_SIMULATE_SCENARIO: &str = "DEPOT_CMDS_SIMULATE_SCENARIO_PATH";

pub(crate) const ARG_TRACK_PACKAGE: &str = "package";
pub(crate) const ENV_TRACK_SCENARIO: &str = "DEPOT_CMDS_TRACK_SCENARIO_PATH";
pub(crate) const ENV_TRACK_PACKAGE: &str = "DEPOT_CMDS_TRACK_PACKAGE";

/// Run the depot CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] for invalid arguments, unreadable scenarios and
/// failed simulations.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Simulate(args) => run_simulate(args),
        Command::Track(args) => run_track(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "depot",
    about = "Dispatch and delivery simulation for a single-depot fleet",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write a seeded random scenario as JSON.
    Generate(GenerateArgs),
    /// Dispatch and deliver a scenario until it settles.
    Simulate(SimulateArgs),
    /// Simulate a scenario and print one package's tracking card.
    Track(TrackArgs),
}

#[cfg(test)]
mod tests;
