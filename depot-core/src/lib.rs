//! Core domain types for the depot dispatch engine.
//!
//! A [`Fleet`] owns every [`Package`] and [`Vehicle`] of one operational
//! session and is the only place where their state changes. Packages enter
//! in [`PackageStatus::Sorting`], a [`Dispatcher`] plans which vehicle carries
//! them, and the [`DeliverySimulator`] moves departed vehicles along their
//! single-trip schedule until every package is delivered and the vehicle is
//! back at the depot.
//!
//! Constructors validate their input and return `Result` so that invalid
//! specs never reach the dispatcher.
//!
//! # Examples
//!
//! ```
//! use geo::Coord;
//! use depot_core::{
//!     Assignment, DeliverySimulator, DispatchPlan, Dispatcher, Fleet, PackageSpec, Priority,
//!     VehicleSpec,
//! };
//! use std::time::Duration;
//!
//! /// Loads every pending package onto the first available vehicle.
//! struct AllOnFirst;
//!
//! impl Dispatcher for AllOnFirst {
//!     fn plan(&self, fleet: &Fleet) -> DispatchPlan {
//!         let Some(vehicle) = fleet.available_vehicles().next() else {
//!             return DispatchPlan::empty();
//!         };
//!         DispatchPlan {
//!             assignments: vec![Assignment {
//!                 vehicle: vehicle.id().clone(),
//!                 packages: fleet.pending_packages().map(|p| p.id().clone()).collect(),
//!             }],
//!             ..DispatchPlan::empty()
//!         }
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut fleet = Fleet::new(
//!     [VehicleSpec::new("V1", 100.0, 50.0)],
//!     [PackageSpec::new("P1", Coord { x: 30.0, y: 40.0 }, Priority::Highest, 5.0)],
//! )?;
//! fleet.dispatch(&AllOnFirst)?;
//! let report = DeliverySimulator::new().advance(&mut fleet, Duration::from_secs(5400))?;
//! assert_eq!(report.delivered.len(), 1);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod clock;
pub mod dispatch;
mod error;
pub mod fleet;
pub mod geometry;
mod ids;
mod package;
mod shared;
pub mod simulator;
#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;
pub mod tracking;
mod vehicle;

pub use clock::SimTime;
pub use dispatch::{
    Assignment, DispatchPlan, DispatchReport, Dispatcher, Unassignable, UnassignableReason,
};
pub use error::{ParseStatusError, TransitionError, ValidationError};
pub use fleet::{Fleet, FleetError};
pub use geometry::{DEPOT, distance, hours_to_duration, travel_time, travel_time_between};
pub use ids::{PackageId, VehicleId};
pub use package::{Package, PackageSpec, PackageStatus, Priority, Punctuality};
pub use shared::SharedFleet;
pub use simulator::{
    AdvanceReport, BatchAdvance, DeliveryRecord, DeliverySimulator, SimulationError,
};
pub use tracking::{
    FleetSummary, ManifestEntry, PackageCounts, PackageSnapshot, TrackError, VehicleCounts,
    VehicleSnapshot,
};
pub use vehicle::{Stop, Trip, Vehicle, VehicleSpec, VehicleStatus};
