//! Unit tests for the `track` command.

use super::helpers::{small_scenario, workspace, write_scenario};
use crate::track::{TrackArgs, TrackConfig, run_track_with};
use crate::*;
use depot_core::{PackageId, TrackError};
use rstest::rstest;

fn track_args(path: camino::Utf8PathBuf, package: &str) -> TrackArgs {
    TrackArgs {
        scenario_path: Some(path),
        package: Some(package.to_owned()),
        ..TrackArgs::default()
    }
}

#[rstest]
#[case(None, Some("P1"), ARG_SCENARIO, ENV_TRACK_SCENARIO)]
#[case(Some("s.json"), None, ARG_TRACK_PACKAGE, ENV_TRACK_PACKAGE)]
#[case(Some("s.json"), Some("  "), ARG_TRACK_PACKAGE, ENV_TRACK_PACKAGE)]
fn converting_without_required_fields_errors(
    #[case] scenario: Option<&str>,
    #[case] package: Option<&str>,
    #[case] field: &'static str,
    #[case] env_var: &'static str,
) {
    let args = TrackArgs {
        scenario_path: scenario.map(Into::into),
        package: package.map(str::to_owned),
        ..TrackArgs::default()
    };
    let err = TrackConfig::try_from(args).expect_err("missing field should error");
    match err {
        CliError::MissingArgument {
            field: missing,
            env,
        } => {
            assert_eq!(missing, field);
            assert_eq!(env, env_var);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn track_prints_the_card_of_a_late_delivery() {
    let (_tmp, root) = workspace();
    let path = root.join("small.json");
    write_scenario(&path, &small_scenario());

    let mut stdout = Vec::new();
    run_track_with(track_args(path, "P2"), &mut stdout).expect("track succeeds");

    let card = String::from_utf8(stdout).expect("stdout utf-8");
    assert!(card.starts_with("Package   P2\n"), "card was {card}");
    assert!(card.contains("Status    delivered\n"));
    assert!(card.contains("Vehicle   V1\n"));
    assert!(card.contains("Estimate  T+00:12:00\n"));
    assert!(card.contains("minutes late"));
}

#[rstest]
fn track_reports_stranded_packages_as_sorting() {
    let (_tmp, root) = workspace();
    let path = root.join("small.json");
    write_scenario(&path, &small_scenario());

    let mut stdout = Vec::new();
    run_track_with(track_args(path, "P3"), &mut stdout).expect("track succeeds");

    let card = String::from_utf8(stdout).expect("stdout utf-8");
    assert!(card.contains("Status    sorting\n"));
    assert!(card.contains("Vehicle   -\n"));
}

#[rstest]
fn unknown_package_is_not_found() {
    let (_tmp, root) = workspace();
    let path = root.join("small.json");
    write_scenario(&path, &small_scenario());

    let err = run_track_with(track_args(path, "P404"), &mut Vec::new())
        .expect_err("unknown package should error");
    match err {
        CliError::Track(TrackError::NotFound(id)) => assert_eq!(id, PackageId::from("P404")),
        other => panic!("expected NotFound, found {other:?}"),
    }
}
