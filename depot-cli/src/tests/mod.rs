//! Shared test harness modules for the depot CLI.

use super::*;

mod helpers;
mod simulate_steps;
mod track_unit;
