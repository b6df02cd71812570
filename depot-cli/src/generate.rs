//! Generate command: seeded random scenarios.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use depot_core::{PackageSpec, Priority, VehicleSpec};
use geo::Coord;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::fs::create_utf8_file;
use crate::scenario::write_json;
use crate::{
    ARG_GENERATE_OUTPUT, ARG_GENERATE_PACKAGES, ARG_GENERATE_SEED, ARG_GENERATE_VEHICLES,
    CliError, ENV_GENERATE_PACKAGES, ENV_GENERATE_VEHICLES, Scenario,
};

const DEFAULT_SEED: u64 = 1;
const COORDINATE_SPAN: f64 = 50.0;

/// CLI arguments for the `generate` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Generate a reproducible scenario. Vehicle i gets capacity \
                 100 + 20i and speed 50 + 5i; packages are scattered \
                 uniformly within 50 units of the depot.",
    about = "Generate a seeded scenario"
)]
#[ortho_config(prefix = "DEPOT")]
pub(crate) struct GenerateArgs {
    /// Number of vehicles.
    #[arg(long = ARG_GENERATE_VEHICLES, value_name = "count")]
    #[serde(default)]
    pub(crate) vehicles: Option<usize>,
    /// Number of packages.
    #[arg(long = ARG_GENERATE_PACKAGES, value_name = "count")]
    #[serde(default)]
    pub(crate) packages: Option<usize>,
    /// Seed for the random generator.
    #[arg(long = ARG_GENERATE_SEED, value_name = "seed")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
    /// Write the scenario here instead of stdout.
    #[arg(long = ARG_GENERATE_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl GenerateArgs {
    pub(crate) fn into_config(self) -> Result<GenerateConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        GenerateConfig::try_from(merged)
    }
}

/// Resolved `generate` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GenerateConfig {
    pub(crate) vehicles: usize,
    pub(crate) packages: usize,
    pub(crate) seed: u64,
    pub(crate) output: Option<Utf8PathBuf>,
}

impl TryFrom<GenerateArgs> for GenerateConfig {
    type Error = CliError;

    fn try_from(args: GenerateArgs) -> Result<Self, Self::Error> {
        let vehicles = args.vehicles.ok_or(CliError::MissingArgument {
            field: ARG_GENERATE_VEHICLES,
            env: ENV_GENERATE_VEHICLES,
        })?;
        if vehicles == 0 {
            return Err(CliError::InvalidOption {
                field: ARG_GENERATE_VEHICLES,
                expected: "at least 1",
            });
        }
        let packages = args.packages.ok_or(CliError::MissingArgument {
            field: ARG_GENERATE_PACKAGES,
            env: ENV_GENERATE_PACKAGES,
        })?;
        Ok(Self {
            vehicles,
            packages,
            seed: args.seed.unwrap_or(DEFAULT_SEED),
            output: args.output,
        })
    }
}

/// Build the scenario for `config`; the same seed always yields the same
/// scenario.
pub(crate) fn generate_scenario(config: &GenerateConfig) -> Scenario {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let vehicles = (0..config.vehicles)
        .map(|index| {
            let step = index as f64;
            VehicleSpec::new(
                format!("V{}", index + 1),
                100.0 + 20.0 * step,
                50.0 + 5.0 * step,
            )
        })
        .collect();
    let packages = (1..=config.packages)
        .map(|number| {
            let destination = Coord {
                x: rng.gen_range(-COORDINATE_SPAN..=COORDINATE_SPAN),
                y: rng.gen_range(-COORDINATE_SPAN..=COORDINATE_SPAN),
            };
            let priority = match rng.gen_range(1..=3_u8) {
                1 => Priority::Highest,
                2 => Priority::Normal,
                _ => Priority::Lowest,
            };
            let weight = rng.gen_range(0.5..10.0);
            PackageSpec::new(format!("P{number}"), destination, priority, weight)
        })
        .collect();
    Scenario { vehicles, packages }
}

pub(crate) fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_generate_with(args, &mut stdout)
}

/// Generate a scenario and write it to the configured file, or to `writer`
/// when no output path is set.
pub(crate) fn run_generate_with(
    args: GenerateArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let scenario = generate_scenario(&config);
    match &config.output {
        Some(path) => {
            let mut file = create_utf8_file(path).map_err(|source| CliError::CreateScenario {
                path: path.clone(),
                source,
            })?;
            write_json(&mut file, &scenario)?;
            log::info!(
                "wrote {} vehicles and {} packages to {path}",
                scenario.vehicles.len(),
                scenario.packages.len()
            );
            Ok(())
        }
        None => write_json(writer, &scenario),
    }
}

#[cfg(test)]
pub(crate) fn generate_config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<GenerateConfig, CliError> {
    let merged = GenerateArgs::merge_from_layers(layers).map_err(CliError::from)?;
    GenerateConfig::try_from(merged)
}
