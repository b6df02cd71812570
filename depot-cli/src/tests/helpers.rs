//! Test helpers for writing scenarios into temporary workspaces.

use camino::{Utf8Path, Utf8PathBuf};
use depot_core::{PackageSpec, Priority, VehicleSpec};
use geo::Coord;
use std::fs;
use tempfile::TempDir;

use crate::Scenario;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write test file");
}

/// Temporary directory with a UTF-8 root path.
pub(super) fn workspace() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
    (tmp, root)
}

/// One van of capacity 10 at speed 50, two deliverable packages and one
/// that no vehicle can carry.
///
/// P1 sits 50 units out (one hour), P2 10 units out (twelve minutes) but is
/// visited second, so it arrives late.
pub(super) fn small_scenario() -> Scenario {
    Scenario {
        vehicles: vec![VehicleSpec::new("V1", 10.0, 50.0)],
        packages: vec![
            PackageSpec::new("P1", Coord { x: 30.0, y: 40.0 }, Priority::Highest, 4.0),
            PackageSpec::new("P2", Coord { x: -6.0, y: -8.0 }, Priority::Normal, 3.0),
            PackageSpec::new("P3", Coord { x: 1.0, y: 1.0 }, Priority::Highest, 50.0),
        ],
    }
}

pub(super) fn write_scenario(path: &Utf8Path, scenario: &Scenario) {
    let payload = serde_json::to_string_pretty(scenario).expect("serialize scenario");
    write_utf8(path, payload.as_bytes());
}
