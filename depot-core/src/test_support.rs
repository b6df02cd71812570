//! Fixtures and a trivial dispatcher shared by unit, behaviour and property
//! tests across the workspace.

use geo::Coord;

use crate::{
    Assignment, DispatchPlan, Dispatcher, Fleet, PackageSpec, PackageStatus, Priority,
    Unassignable, UnassignableReason, VehicleSpec, VehicleStatus,
};

/// Dispatcher that takes pending packages in id order and puts each on the
/// first available vehicle, by id, with room for it.
///
/// Priority is ignored; the production policy lives in `depot-dispatch`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstFitDispatcher;

impl Dispatcher for FirstFitDispatcher {
    fn plan(&self, fleet: &Fleet) -> DispatchPlan {
        let mut bins: Vec<(Assignment, f64, f64)> = fleet
            .available_vehicles()
            .map(|vehicle| {
                let assignment = Assignment {
                    vehicle: vehicle.id().clone(),
                    packages: Vec::new(),
                };
                (assignment, 0.0, vehicle.capacity())
            })
            .collect();
        let mut unassignable = Vec::new();
        for package in fleet.pending_packages() {
            let bin = bins
                .iter_mut()
                .find(|(_, load, capacity)| *load + package.weight() <= *capacity);
            match bin {
                Some((assignment, load, _)) => {
                    assignment.packages.push(package.id().clone());
                    *load += package.weight();
                }
                None => unassignable.push(Unassignable {
                    package: package.id().clone(),
                    weight: package.weight(),
                    reason: UnassignableReason::for_weight(fleet, package.weight()),
                }),
            }
        }
        DispatchPlan {
            assignments: bins
                .into_iter()
                .map(|(assignment, _, _)| assignment)
                .filter(|assignment| !assignment.packages.is_empty())
                .collect(),
            unassignable,
            ..DispatchPlan::empty()
        }
    }
}

/// Package spec from plain numbers.
///
/// # Panics
/// Panics if `rank` is outside `1..=3`.
#[must_use]
pub fn package_spec(id: &str, x: f64, y: f64, rank: u8, weight: f64) -> PackageSpec {
    let priority = Priority::try_from(rank).expect("priority rank in 1..=3");
    PackageSpec::new(id, Coord { x, y }, priority, weight)
}

/// Three vehicles and eight packages within reach of the depot; every
/// package fits at least one vehicle.
///
/// # Panics
/// Never, for the fixed data it builds.
#[must_use]
pub fn sample_fleet() -> Fleet {
    Fleet::new(
        [
            VehicleSpec::new("V1", 10.0, 40.0),
            VehicleSpec::new("V2", 15.0, 50.0),
            VehicleSpec::new("V3", 8.0, 60.0),
        ],
        [
            package_spec("P1", 12.0, -5.0, 1, 4.0),
            package_spec("P2", -20.0, 14.0, 2, 6.5),
            package_spec("P3", 3.0, 30.0, 3, 2.0),
            package_spec("P4", -8.0, -8.0, 1, 7.0),
            package_spec("P5", 25.0, 25.0, 2, 3.5),
            package_spec("P6", -40.0, 2.0, 3, 9.0),
            package_spec("P7", 5.0, -35.0, 1, 1.5),
            package_spec("P8", 18.0, 9.0, 2, 5.0),
        ],
    )
    .expect("sample fleet is valid")
}

/// Assert the structural invariants of the entity model.
///
/// * every package weight is positive;
/// * a vehicle is assigned exactly when the status requires one;
/// * delivered packages carry an actual delivery instant and nothing else
///   does;
/// * no vehicle carries more than its capacity;
/// * an available vehicle is empty and parked at the depot;
/// * every manifest entry is an in-transit package assigned to that vehicle.
///
/// # Panics
/// Panics with a description of the first violated invariant.
pub fn assert_fleet_invariants(fleet: &Fleet) {
    let packages = fleet.active_packages().chain(fleet.delivered_packages());
    for package in packages {
        assert!(package.weight() > 0.0, "{} has non-positive weight", package.id());
        assert_eq!(
            package.assigned_vehicle().is_some(),
            package.status().requires_vehicle(),
            "{} is {} with vehicle {:?}",
            package.id(),
            package.status(),
            package.assigned_vehicle()
        );
        assert_eq!(
            package.actual_delivery().is_some(),
            package.status() == PackageStatus::Delivered,
            "{} delivery instant does not match status",
            package.id()
        );
    }
    for package in fleet.delivered_packages() {
        assert_eq!(package.status(), PackageStatus::Delivered);
    }
    for vehicle in fleet.vehicles() {
        let manifest_weight: f64 = vehicle
            .manifest()
            .iter()
            .filter_map(|id| fleet.package(id))
            .map(crate::Package::weight)
            .sum();
        assert!(
            manifest_weight <= vehicle.capacity(),
            "{} carries {manifest_weight} over capacity {}",
            vehicle.id(),
            vehicle.capacity()
        );
        if vehicle.status() == VehicleStatus::Available {
            assert!(vehicle.manifest().is_empty(), "{} idle but loaded", vehicle.id());
            assert_eq!(vehicle.location(), crate::DEPOT, "{} idle away from depot", vehicle.id());
        }
        for id in vehicle.manifest() {
            let package = fleet.package(id).expect("manifest entry is a known package");
            assert_eq!(package.status(), PackageStatus::InTransit);
            assert_eq!(package.assigned_vehicle(), Some(vehicle.id()));
        }
    }
}
