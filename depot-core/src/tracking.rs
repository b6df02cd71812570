//! Read-only views of fleet state.
//!
//! Snapshots are owned copies, so they stay consistent after the lock or
//! borrow they were taken under is released.

use std::fmt;

use geo::Coord;
use thiserror::Error;

use crate::{
    Fleet, Package, PackageId, PackageStatus, Priority, Punctuality, SimTime, Vehicle,
    VehicleId, VehicleStatus,
};

/// Errors from tracking lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackError {
    /// No active or delivered package has this id.
    #[error("package {0} not found")]
    NotFound(PackageId),
}

/// Point-in-time copy of a package.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PackageSnapshot {
    /// Identifier.
    pub id: PackageId,
    /// Drop-off point.
    pub destination: Coord<f64>,
    /// Urgency.
    pub priority: Priority,
    /// Weight in capacity units.
    pub weight: f64,
    /// Lifecycle status.
    pub status: PackageStatus,
    /// Carrying vehicle, once assigned.
    pub assigned_vehicle: Option<VehicleId>,
    /// Loading instant.
    pub pickup_time: Option<SimTime>,
    /// Promised delivery instant.
    pub estimated_delivery: Option<SimTime>,
    /// Actual delivery instant.
    pub actual_delivery: Option<SimTime>,
    /// Punctuality, once delivered.
    pub punctuality: Option<Punctuality>,
}

impl From<&Package> for PackageSnapshot {
    fn from(package: &Package) -> Self {
        Self {
            id: package.id().clone(),
            destination: package.destination(),
            priority: package.priority(),
            weight: package.weight(),
            status: package.status(),
            assigned_vehicle: package.assigned_vehicle().cloned(),
            pickup_time: package.pickup_time(),
            estimated_delivery: package.estimated_delivery(),
            actual_delivery: package.actual_delivery(),
            punctuality: package.punctuality(),
        }
    }
}

fn write_instant(f: &mut fmt::Formatter<'_>, label: &str, instant: Option<SimTime>) -> fmt::Result {
    match instant {
        Some(at) => writeln!(f, "{label:<10}{at}"),
        None => writeln!(f, "{label:<10}-"),
    }
}

impl fmt::Display for PackageSnapshot {
    /// Multi-line tracking card.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<10}{}", "Package", self.id)?;
        writeln!(f, "{:<10}{}", "Status", self.status)?;
        writeln!(
            f,
            "{:<10}({:.2}, {:.2})",
            "Dest", self.destination.x, self.destination.y
        )?;
        writeln!(f, "{:<10}{}", "Priority", self.priority)?;
        writeln!(f, "{:<10}{:.2}", "Weight", self.weight)?;
        match &self.assigned_vehicle {
            Some(vehicle) => writeln!(f, "{:<10}{vehicle}", "Vehicle")?,
            None => writeln!(f, "{:<10}-", "Vehicle")?,
        }
        write_instant(f, "Pickup", self.pickup_time)?;
        write_instant(f, "Estimate", self.estimated_delivery)?;
        write_instant(f, "Actual", self.actual_delivery)?;
        match self.punctuality {
            Some(punctuality) => write!(f, "{:<10}{punctuality}", "Result"),
            None => write!(f, "{:<10}-", "Result"),
        }
    }
}

/// A package aboard a vehicle.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ManifestEntry {
    /// Package aboard.
    pub package: PackageId,
    /// Its priority.
    pub priority: Priority,
    /// Its weight.
    pub weight: f64,
}

/// Point-in-time copy of a vehicle.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleSnapshot {
    /// Identifier.
    pub id: VehicleId,
    /// Cycle status.
    pub status: VehicleStatus,
    /// Last known position.
    pub location: Coord<f64>,
    /// Maximum load.
    pub capacity: f64,
    /// Distance units per hour.
    pub speed: f64,
    /// Packages aboard in visiting order.
    pub manifest: Vec<ManifestEntry>,
    /// Weight aboard.
    pub load: f64,
    /// Capacity still free.
    pub remaining_capacity: f64,
    /// Scheduled return to the depot, while travelling.
    pub back_at_depot: Option<SimTime>,
}

impl VehicleSnapshot {
    fn capture(vehicle: &Vehicle, fleet: &Fleet) -> Self {
        let manifest = vehicle
            .manifest()
            .iter()
            .filter_map(|id| fleet.package(id))
            .map(|package| ManifestEntry {
                package: package.id().clone(),
                priority: package.priority(),
                weight: package.weight(),
            })
            .collect();
        Self {
            id: vehicle.id().clone(),
            status: vehicle.status(),
            location: vehicle.location(),
            capacity: vehicle.capacity(),
            speed: vehicle.speed(),
            manifest,
            load: vehicle.load(),
            remaining_capacity: vehicle.remaining_capacity(),
            back_at_depot: vehicle.trip().map(crate::Trip::back_at_depot),
        }
    }
}

/// Packages per status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PackageCounts {
    /// Waiting at the depot.
    pub sorting: usize,
    /// Assigned, not departed.
    pub processed: usize,
    /// On the road.
    pub in_transit: usize,
    /// Handed over.
    pub delivered: usize,
}

/// Vehicles per status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleCounts {
    /// Idle at the depot.
    pub available: usize,
    /// Loading at the depot.
    pub loading: usize,
    /// Delivering.
    pub in_transit: usize,
    /// Driving back.
    pub returning: usize,
}

/// Headline numbers for a fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FleetSummary {
    /// Session clock.
    pub now: SimTime,
    /// Packages per status.
    pub packages: PackageCounts,
    /// Vehicles per status.
    pub vehicles: VehicleCounts,
    /// Delivered packages that met their estimate.
    pub on_time: usize,
}

impl Fleet {
    /// Snapshot of one package.
    ///
    /// # Errors
    /// Returns [`TrackError::NotFound`] when no package has this id.
    ///
    /// # Examples
    /// ```
    /// use depot_core::{Fleet, PackageId, TrackError};
    ///
    /// let fleet = Fleet::default();
    /// let missing = PackageId::from("P404");
    /// assert_eq!(fleet.track(&missing), Err(TrackError::NotFound(missing.clone())));
    /// ```
    pub fn track(&self, id: &PackageId) -> Result<PackageSnapshot, TrackError> {
        self.package(id)
            .map(PackageSnapshot::from)
            .ok_or_else(|| TrackError::NotFound(id.clone()))
    }

    /// Snapshots of all packages, optionally restricted to one status.
    ///
    /// Active packages come first, ordered by id, followed by delivered
    /// packages in delivery order.
    #[must_use]
    pub fn list_packages(&self, status: Option<PackageStatus>) -> Vec<PackageSnapshot> {
        self.active_packages()
            .chain(self.delivered_packages())
            .filter(|package| status.is_none_or(|wanted| package.status() == wanted))
            .map(PackageSnapshot::from)
            .collect()
    }

    /// Snapshots of all vehicles ordered by id, optionally restricted to one
    /// status.
    #[must_use]
    pub fn list_vehicles(&self, status: Option<VehicleStatus>) -> Vec<VehicleSnapshot> {
        self.vehicles()
            .filter(|vehicle| status.is_none_or(|wanted| vehicle.status() == wanted))
            .map(|vehicle| VehicleSnapshot::capture(vehicle, self))
            .collect()
    }

    /// Counts per package and vehicle status.
    #[must_use]
    pub fn summary(&self) -> FleetSummary {
        let mut summary = FleetSummary {
            now: self.now(),
            on_time: self
                .delivered_packages()
                .iter()
                .filter(|package| package.punctuality().is_some_and(Punctuality::is_on_time))
                .count(),
            ..FleetSummary::default()
        };
        for package in self.active_packages().chain(self.delivered_packages()) {
            let counts = &mut summary.packages;
            match package.status() {
                PackageStatus::Sorting => counts.sorting += 1,
                PackageStatus::Processed => counts.processed += 1,
                PackageStatus::InTransit => counts.in_transit += 1,
                PackageStatus::Delivered => counts.delivered += 1,
            }
        }
        for vehicle in self.vehicles() {
            let counts = &mut summary.vehicles;
            match vehicle.status() {
                VehicleStatus::Available => counts.available += 1,
                VehicleStatus::Loading => counts.loading += 1,
                VehicleStatus::InTransit => counts.in_transit += 1,
                VehicleStatus::Returning => counts.returning += 1,
            }
        }
        summary
    }
}
