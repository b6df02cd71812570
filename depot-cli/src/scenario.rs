//! Scenario files: the vehicles and packages of one simulated session.

use std::io::{BufReader, Write};

use camino::Utf8Path;
use depot_core::{Fleet, PackageSpec, VehicleSpec};
use serde::{Deserialize, Serialize};

use crate::CliError;
use crate::fs::{file_is_file, open_utf8_file};

/// Fleet and workload as exchanged on disk.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scenario {
    /// Vehicles parked at the depot when the session starts.
    pub vehicles: Vec<VehicleSpec>,
    /// Packages waiting in sorting when the session starts.
    pub packages: Vec<PackageSpec>,
}

impl Scenario {
    /// Build a fresh fleet, validating every spec.
    ///
    /// # Errors
    /// Returns [`CliError::InvalidScenario`] naming `path` for the first
    /// rejected spec.
    pub fn into_fleet(self, path: &Utf8Path) -> Result<Fleet, CliError> {
        Fleet::new(self.vehicles, self.packages).map_err(|source| CliError::InvalidScenario {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Fail unless `path` names an existing regular file.
pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
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

/// Loads a JSON-encoded [`Scenario`] from disk.
pub(crate) fn load_scenario(path: &Utf8Path) -> Result<Scenario, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenScenario {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| CliError::ParseScenario {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize `value` as pretty JSON followed by a newline.
pub(crate) fn write_json<T: Serialize>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerializeOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
