//! Simulate command: dispatch and advance a scenario until it settles.

use std::io::Write;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use depot_core::{
    AdvanceReport, DeliverySimulator, DispatchReport, Fleet, FleetSummary, PackageId,
    PackageStatus, UnassignableReason,
};
use depot_dispatch::{DispatchConfig, GreedyDispatcher, VehicleOrder};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::scenario::{load_scenario, require_existing, write_json};
use crate::{
    ARG_HORIZON_HOURS, ARG_SCENARIO, ARG_SERVICE_BUFFER, ARG_STEP_MINUTES, ARG_VEHICLE_ORDER,
    CliError, ENV_SIMULATE_SCENARIO,
};

const DEFAULT_STEP_MINUTES: u64 = 15;
const DEFAULT_HORIZON_HOURS: u64 = 24;

/// CLI arguments for the `simulate` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Load a JSON scenario, then alternate greedy dispatch \
                 cycles with fixed clock steps until every deliverable \
                 package is delivered or the horizon elapses. Prints the \
                 dispatch and advance reports with a final summary as JSON.",
    about = "Simulate a scenario to completion"
)]
#[ortho_config(prefix = "DEPOT")]
pub(crate) struct SimulateArgs {
    /// Path to a JSON scenario file.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) scenario_path: Option<Utf8PathBuf>,
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

impl SimulateArgs {
    pub(crate) fn into_config(self) -> Result<SimulationConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SimulationConfig::try_from(merged)
    }
}

/// Resolved simulation settings shared by `simulate` and `track`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SimulationConfig {
    pub(crate) scenario_path: Utf8PathBuf,
    pub(crate) step: Duration,
    pub(crate) horizon: Duration,
    pub(crate) dispatch: DispatchConfig,
}

impl SimulationConfig {
    /// Resolve optional knobs, applying defaults and range checks.
    pub(crate) fn resolve(
        scenario_path: Utf8PathBuf,
        step_minutes: Option<u64>,
        horizon_hours: Option<u64>,
        service_buffer: Option<f64>,
        vehicle_order: Option<&str>,
    ) -> Result<Self, CliError> {
        let step_minutes = step_minutes.unwrap_or(DEFAULT_STEP_MINUTES);
        if step_minutes == 0 {
            return Err(CliError::InvalidOption {
                field: ARG_STEP_MINUTES,
                expected: "at least 1",
            });
        }
        let horizon_hours = horizon_hours.unwrap_or(DEFAULT_HORIZON_HOURS);
        if horizon_hours == 0 {
            return Err(CliError::InvalidOption {
                field: ARG_HORIZON_HOURS,
                expected: "at least 1",
            });
        }
        let order = vehicle_order
            .map(str::parse::<VehicleOrder>)
            .transpose()?
            .unwrap_or_default();
        let dispatch = DispatchConfig::new(
            service_buffer.unwrap_or(DispatchConfig::NO_BUFFER),
            order,
        )?;
        Ok(Self {
            scenario_path,
            step: Duration::from_secs(step_minutes.saturating_mul(60)),
            horizon: Duration::from_secs(horizon_hours.saturating_mul(3600)),
            dispatch,
        })
    }

    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.scenario_path, ARG_SCENARIO)
    }
}

impl TryFrom<SimulateArgs> for SimulationConfig {
    type Error = CliError;

    fn try_from(args: SimulateArgs) -> Result<Self, Self::Error> {
        let scenario_path = args.scenario_path.ok_or(CliError::MissingArgument {
            field: ARG_SCENARIO,
            env: ENV_SIMULATE_SCENARIO,
        })?;
        Self::resolve(
            scenario_path,
            args.step_minutes,
            args.horizon_hours,
            args.service_buffer,
            args.vehicle_order.as_deref(),
        )
    }
}

/// Everything that happened during one simulated session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutcome {
    /// Dispatch cycles that moved at least one package.
    pub dispatches: Vec<DispatchReport>,
    /// One report per clock step.
    pub advances: Vec<AdvanceReport>,
    /// Packages no vehicle in the fleet can carry.
    pub stranded: Vec<PackageId>,
    /// Whether the horizon elapsed before the fleet settled.
    pub horizon_reached: bool,
    /// Fleet state at the end.
    pub summary: FleetSummary,
}

/// Run `fleet` to completion under `config`.
///
/// Each iteration dispatches first, then advances the clock by one step.
/// The loop ends once nothing deliverable is left or the horizon elapses.
pub(crate) fn simulate_fleet(
    fleet: &mut Fleet,
    config: &SimulationConfig,
) -> Result<SimulationOutcome, CliError> {
    let dispatcher = GreedyDispatcher::new(config.dispatch);
    let simulator = DeliverySimulator::new();
    let mut dispatches = Vec::new();
    let mut advances = Vec::new();
    let mut elapsed = Duration::ZERO;
    loop {
        let report = fleet.dispatch(&dispatcher)?;
        if !report.is_noop() {
            dispatches.push(report);
        }
        if is_finished(fleet) || elapsed >= config.horizon {
            break;
        }
        let step = config.step.min(config.horizon.saturating_sub(elapsed));
        advances.push(simulator.advance(fleet, step)?);
        elapsed = elapsed.saturating_add(step);
    }
    let stranded = stranded_packages(fleet);
    let horizon_reached = !is_finished(fleet);
    if horizon_reached {
        log::warn!(
            "horizon of {}h reached with {} package(s) undelivered",
            config.horizon.as_secs() / 3600,
            fleet.active_packages().count()
        );
    }
    log::debug!(
        "simulation ended after {} dispatch cycle(s) and {} step(s)",
        dispatches.len(),
        advances.len()
    );
    Ok(SimulationOutcome {
        dispatches,
        advances,
        stranded,
        horizon_reached,
        summary: fleet.summary(),
    })
}

/// Every vehicle is home and only packages heavier than any vehicle remain.
fn is_finished(fleet: &Fleet) -> bool {
    fleet.moving_vehicles().next().is_none()
        && fleet.active_packages().all(|package| {
            package.status() == PackageStatus::Sorting
                && UnassignableReason::for_weight(fleet, package.weight())
                    == UnassignableReason::CapacityUnsatisfiable
        })
}

fn stranded_packages(fleet: &Fleet) -> Vec<PackageId> {
    fleet
        .pending_packages()
        .filter(|package| {
            UnassignableReason::for_weight(fleet, package.weight())
                == UnassignableReason::CapacityUnsatisfiable
        })
        .map(|package| package.id().clone())
        .collect()
}

/// Load, validate and build the fleet named by `config`.
pub(crate) fn load_fleet(config: &SimulationConfig) -> Result<Fleet, CliError> {
    config.validate_sources()?;
    let path: &Utf8Path = &config.scenario_path;
    load_scenario(path)?.into_fleet(path)
}

pub(crate) fn run_simulate(args: SimulateArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_simulate_with(args, &mut stdout)
}

pub(crate) fn run_simulate_with(args: SimulateArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let mut fleet = load_fleet(&config)?;
    let outcome = simulate_fleet(&mut fleet, &config)?;
    write_json(writer, &outcome)
}

#[cfg(test)]
pub(crate) fn simulate_config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SimulationConfig, CliError> {
    let merged = SimulateArgs::merge_from_layers(layers).map_err(CliError::from)?;
    SimulationConfig::try_from(merged)
}
