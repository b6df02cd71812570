//! Behaviour-driven step definitions driving the simulate CLI scenarios.

use super::helpers::{small_scenario, write_scenario, write_utf8};
use super::*;
use crate::simulate::run_simulate_with;
use camino::Utf8PathBuf;
use clap::Parser;
use depot_core::PackageId;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use tempfile::TempDir;

#[derive(Debug)]
struct SimulateWorld {
    _tmp: TempDir,
    scenario_path: Utf8PathBuf,
    include_scenario: RefCell<bool>,
    cli_args: RefCell<Vec<String>>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl SimulateWorld {
    fn new() -> Self {
        let tmp = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
        Self {
            _tmp: tmp,
            scenario_path: root.join("scenario.json"),
            include_scenario: RefCell::new(true),
            cli_args: RefCell::new(Vec::new()),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn build_command_line(&self) -> Vec<String> {
        let mut argv = vec!["depot".to_string(), "simulate".to_string()];
        if *self.include_scenario.borrow() {
            argv.push(self.scenario_path.as_str().to_string());
        }
        argv.extend(self.cli_args.borrow().iter().cloned());
        argv
    }

    fn outcome(&self) -> SimulationOutcome {
        let borrowed = self.result.borrow();
        let result = borrowed.as_ref().expect("result recorded");
        result.as_ref().expect("expected success");
        serde_json::from_slice(&self.stdout.borrow()).expect("output should be JSON outcome")
    }

    fn error<R>(&self, check: impl FnOnce(&CliError) -> R) -> R {
        let borrowed = self.result.borrow();
        let error = borrowed
            .as_ref()
            .expect("result recorded")
            .as_ref()
            .expect_err("expected error");
        check(error)
    }
}

#[fixture]
fn world() -> SimulateWorld {
    SimulateWorld::new()
}

#[given("a scenario with one van and an oversized package exists on disk")]
fn scenario_exists(#[from(world)] world: &SimulateWorld) {
    write_scenario(&world.scenario_path, &small_scenario());
}

#[given("the horizon is limited to one hour")]
fn horizon_is_limited(#[from(world)] world: &SimulateWorld) {
    world.cli_args.borrow_mut().extend([
        format!("--{ARG_HORIZON_HOURS}"),
        "1".to_string(),
        format!("--{ARG_STEP_MINUTES}"),
        "30".to_string(),
    ]);
}

#[given("the scenario file contains invalid JSON")]
fn scenario_contains_invalid_json(#[from(world)] world: &SimulateWorld) {
    write_utf8(&world.scenario_path, b"{ not valid json");
}

#[given("I omit the scenario path")]
fn omit_scenario_path(#[from(world)] world: &SimulateWorld) {
    *world.include_scenario.borrow_mut() = false;
}

#[when("I run the simulate command")]
fn run_simulate_command(#[from(world)] world: &SimulateWorld) {
    let invocation = world.build_command_line();
    let parsed = Cli::try_parse_from(invocation).map_err(CliError::from);
    let outcome = parsed.and_then(|cli| match cli.command {
        Command::Simulate(args) => {
            let mut buffer = world.stdout.borrow_mut();
            run_simulate_with(args, &mut *buffer)
        }
        other => panic!("expected simulate command, found {other:?}"),
    });
    world.result.replace(Some(outcome));
}

#[then("the command succeeds and reports two deliveries")]
fn command_reports_two_deliveries(#[from(world)] world: &SimulateWorld) {
    let outcome = world.outcome();
    assert_eq!(outcome.summary.packages.delivered, 2);
    assert!(!outcome.horizon_reached);
}

#[then("the oversized package is reported as stranded")]
fn oversized_package_is_stranded(#[from(world)] world: &SimulateWorld) {
    assert_eq!(world.outcome().stranded, vec![PackageId::from("P3")]);
}

#[then("the command succeeds and reports the horizon was reached")]
fn command_reports_horizon(#[from(world)] world: &SimulateWorld) {
    let outcome = world.outcome();
    assert!(outcome.horizon_reached);
    assert_eq!(outcome.summary.packages.in_transit, 1);
}

#[then("the command fails because the scenario JSON is invalid")]
fn command_fails_invalid_json(#[from(world)] world: &SimulateWorld) {
    world.error(|error| match error {
        CliError::ParseScenario { path, .. } => assert_eq!(*path, world.scenario_path),
        other => panic!("expected ParseScenario, found {other:?}"),
    });
}

#[then("the command fails because the scenario path is missing")]
fn command_fails_missing_scenario_path(#[from(world)] world: &SimulateWorld) {
    world.error(|error| match error {
        CliError::MissingArgument { field, .. } => assert_eq!(*field, ARG_SCENARIO),
        other => panic!("expected MissingArgument, found {other:?}"),
    });
}

macro_rules! register_simulate_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/simulate_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: SimulateWorld) {
            let _ = world;
        }
    };
}

register_simulate_scenario!(simulate_happy_path, "simulating a scenario to completion");
register_simulate_scenario!(simulate_horizon, "stopping at the horizon");
register_simulate_scenario!(simulate_invalid_json, "rejecting invalid JSON input");
register_simulate_scenario!(simulate_missing_scenario, "rejecting missing scenario paths");
