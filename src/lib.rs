//! Facade crate for the depot dispatch engine.
//!
//! This crate re-exports the core domain types and exposes the greedy
//! dispatch policy behind the `greedy-dispatch` feature.
//!
//! ```
//! # #[cfg(feature = "greedy-dispatch")]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use depot_engine::{Fleet, GreedyDispatcher, PackageSpec, Priority, VehicleSpec};
//! use geo::Coord;
//!
//! let mut fleet = Fleet::new(
//!     [VehicleSpec::new("V1", 10.0, 50.0)],
//!     [PackageSpec::new("P1", Coord { x: 3.0, y: 4.0 }, Priority::Highest, 2.0)],
//! )?;
//! let report = fleet.dispatch(&GreedyDispatcher::default())?;
//! assert_eq!(report.dispatched_count(), 1);
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "greedy-dispatch"))]
//! # fn main() {}
//! ```

#![forbid(unsafe_code)]

pub use depot_core::{
    AdvanceReport, Assignment, BatchAdvance, DEPOT, DeliveryRecord, DeliverySimulator,
    DispatchPlan, DispatchReport, Dispatcher, Fleet, FleetError, FleetSummary, ManifestEntry,
    Package, PackageCounts, PackageId, PackageSnapshot, PackageSpec, PackageStatus,
    ParseStatusError, Priority, Punctuality, SharedFleet, SimTime, SimulationError, Stop,
    TrackError, TransitionError, Trip, Unassignable, UnassignableReason, ValidationError, Vehicle,
    VehicleCounts, VehicleId, VehicleSnapshot, VehicleSpec, VehicleStatus, distance, travel_time,
    travel_time_between,
};

#[cfg(feature = "greedy-dispatch")]
pub use depot_dispatch::{DispatchConfig, DispatchConfigError, GreedyDispatcher, VehicleOrder};
