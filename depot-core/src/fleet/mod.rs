//! The fleet aggregate: the single owner of every package and vehicle.
//!
//! All state changes go through `&mut Fleet`, so the borrow checker rules out
//! two writers at once. Packages live in an active partition keyed by id
//! until delivered, then move exactly once into an append-only history kept
//! in delivery order.

mod error;

use std::collections::{BTreeMap, BTreeSet};

pub use error::FleetError;

use crate::geometry::{hours_to_duration, travel_time};
use crate::{
    Assignment, DeliveryRecord, DispatchPlan, DispatchReport, Dispatcher, Package, PackageId,
    PackageSpec, PackageStatus, Punctuality, SimTime, Trip, UnassignableReason, ValidationError,
    Vehicle, VehicleId, VehicleSpec, VehicleStatus,
};

/// Packages and vehicles of one operational session.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use depot_core::{Fleet, PackageSpec, PackageStatus, Priority, VehicleSpec};
///
/// # fn main() -> Result<(), depot_core::ValidationError> {
/// let fleet = Fleet::new(
///     [VehicleSpec::new("V1", 100.0, 50.0)],
///     [PackageSpec::new("P1", Coord { x: 3.0, y: 4.0 }, Priority::Normal, 1.0)],
/// )?;
/// assert_eq!(fleet.pending_packages().count(), 1);
/// assert_eq!(fleet.package(&"P1".into()).map(|p| p.status()), Some(PackageStatus::Sorting));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Fleet {
    now: SimTime,
    vehicles: BTreeMap<VehicleId, Vehicle>,
    active: BTreeMap<PackageId, Package>,
    history: Vec<Package>,
    history_index: BTreeMap<PackageId, usize>,
}

impl Fleet {
    /// Validate every spec and build a fleet at [`SimTime::EPOCH`].
    ///
    /// # Errors
    /// Returns the first [`ValidationError`] encountered, including duplicate
    /// package or vehicle ids.
    pub fn new<V, P>(vehicles: V, packages: P) -> Result<Self, ValidationError>
    where
        V: IntoIterator<Item = VehicleSpec>,
        P: IntoIterator<Item = PackageSpec>,
    {
        let mut fleet = Self::default();
        for spec in vehicles {
            fleet.add_vehicle(spec)?;
        }
        for spec in packages {
            fleet.add_package(spec)?;
        }
        Ok(fleet)
    }

    /// Take in a new package; it starts in [`PackageStatus::Sorting`].
    ///
    /// # Errors
    /// Returns [`ValidationError`] for an invalid spec or an id already used
    /// by an active or delivered package.
    pub fn add_package(&mut self, spec: PackageSpec) -> Result<&Package, ValidationError> {
        let package = Package::new(spec)?;
        let id = package.id().clone();
        if self.active.contains_key(&id) || self.history_index.contains_key(&id) {
            return Err(ValidationError::DuplicatePackageId(id));
        }
        Ok(self.active.entry(id).or_insert(package))
    }

    /// Register a new vehicle; it starts available at the depot.
    ///
    /// # Errors
    /// Returns [`ValidationError`] for an invalid spec or a duplicate id.
    pub fn add_vehicle(&mut self, spec: VehicleSpec) -> Result<&Vehicle, ValidationError> {
        let vehicle = Vehicle::new(spec)?;
        let id = vehicle.id().clone();
        if self.vehicles.contains_key(&id) {
            return Err(ValidationError::DuplicateVehicleId(id));
        }
        Ok(self.vehicles.entry(id).or_insert(vehicle))
    }

    /// Current session instant.
    #[must_use]
    pub const fn now(&self) -> SimTime {
        self.now
    }

    /// Look up a vehicle.
    #[must_use]
    pub fn vehicle(&self, id: &VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(id)
    }

    /// All vehicles ordered by id.
    pub fn vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.values()
    }

    /// Vehicles idle at the depot, ordered by id.
    pub fn available_vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles()
            .filter(|vehicle| vehicle.status() == VehicleStatus::Available)
    }

    /// Vehicles delivering or returning, ordered by id.
    pub fn moving_vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles().filter(|vehicle| vehicle.is_moving())
    }

    /// Look up a package in either partition.
    #[must_use]
    pub fn package(&self, id: &PackageId) -> Option<&Package> {
        self.active.get(id).or_else(|| {
            self.history_index
                .get(id)
                .and_then(|&index| self.history.get(index))
        })
    }

    /// Packages not yet delivered, ordered by id.
    pub fn active_packages(&self) -> impl Iterator<Item = &Package> {
        self.active.values()
    }

    /// Packages waiting in sorting, ordered by id.
    pub fn pending_packages(&self) -> impl Iterator<Item = &Package> {
        self.active_packages()
            .filter(|package| package.status() == PackageStatus::Sorting)
    }

    /// Delivered packages in the order they were delivered.
    #[must_use]
    pub fn delivered_packages(&self) -> &[Package] {
        &self.history
    }

    /// Whether nothing is waiting and no vehicle is on the road.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.active.is_empty() && self.moving_vehicles().next().is_none()
    }

    /// Plan a dispatch cycle with `dispatcher` and commit it.
    ///
    /// # Errors
    /// Returns [`FleetError`] when the plan is inconsistent with the fleet;
    /// the fleet is left unchanged in that case.
    pub fn dispatch(&mut self, dispatcher: &dyn Dispatcher) -> Result<DispatchReport, FleetError> {
        let plan = dispatcher.plan(self);
        self.commit(plan)
    }

    /// Validate `plan` against the current state and apply it.
    ///
    /// Every assigned package moves `sorting -> processed -> in-transit` and
    /// every assigned vehicle moves `available -> loading -> in-transit`,
    /// departing at [`Fleet::now`].
    ///
    /// # Errors
    /// Returns [`FleetError`] without mutating anything when an assignment
    /// names an unknown or busy vehicle, a package that is not pending, a
    /// package twice, or exceeds a vehicle's capacity.
    pub fn commit(&mut self, plan: DispatchPlan) -> Result<DispatchReport, FleetError> {
        self.validate(&plan)?;
        let DispatchPlan {
            assignments,
            unassignable,
            service_buffer,
        } = plan;
        for assignment in &assignments {
            self.load_and_depart(assignment, service_buffer)?;
        }
        for left in &unassignable {
            match left.reason {
                UnassignableReason::CapacityUnsatisfiable => log::warn!(
                    "package {} ({}) is heavier than any vehicle can carry",
                    left.package,
                    left.weight
                ),
                UnassignableReason::AwaitingCapacity => {
                    log::debug!("package {} waits for capacity", left.package);
                }
            }
        }
        let report = DispatchReport {
            dispatched_at: self.now,
            assigned: assignments,
            unassignable,
        };
        if !report.is_noop() {
            log::info!(
                "dispatched {} package(s) on {} vehicle(s) at {}",
                report.dispatched_count(),
                report.assigned.len(),
                self.now
            );
        }
        Ok(report)
    }

    fn validate(&self, plan: &DispatchPlan) -> Result<(), FleetError> {
        if !(plan.service_buffer.is_finite() && plan.service_buffer > 0.0) {
            return Err(FleetError::InvalidServiceBuffer(plan.service_buffer));
        }
        let mut seen_vehicles = BTreeSet::new();
        let mut seen_packages = BTreeSet::new();
        for assignment in &plan.assignments {
            let vehicle = self
                .vehicles
                .get(&assignment.vehicle)
                .ok_or_else(|| FleetError::UnknownVehicle(assignment.vehicle.clone()))?;
            if !seen_vehicles.insert(vehicle.id()) {
                return Err(FleetError::DuplicateVehicleAssignment(vehicle.id().clone()));
            }
            if vehicle.status() != VehicleStatus::Available {
                return Err(FleetError::VehicleUnavailable {
                    vehicle: vehicle.id().clone(),
                    status: vehicle.status(),
                });
            }
            if assignment.packages.is_empty() {
                return Err(FleetError::EmptyAssignment(vehicle.id().clone()));
            }
            let mut load = 0.0;
            for id in &assignment.packages {
                let package = self
                    .package(id)
                    .ok_or_else(|| FleetError::UnknownPackage(id.clone()))?;
                if package.status() != PackageStatus::Sorting {
                    return Err(FleetError::PackageNotPending {
                        package: id.clone(),
                        status: package.status(),
                    });
                }
                if !seen_packages.insert(id) {
                    return Err(FleetError::PackageAssignedTwice(id.clone()));
                }
                load += package.weight();
            }
            if load > vehicle.capacity() {
                return Err(FleetError::CapacityExceeded {
                    vehicle: vehicle.id().clone(),
                    load,
                    capacity: vehicle.capacity(),
                });
            }
        }
        Ok(())
    }

    fn load_and_depart(
        &mut self,
        assignment: &Assignment,
        service_buffer: f64,
    ) -> Result<(), FleetError> {
        let now = self.now;
        let vehicle = self
            .vehicles
            .get_mut(&assignment.vehicle)
            .ok_or_else(|| FleetError::UnknownVehicle(assignment.vehicle.clone()))?;
        vehicle.begin_loading()?;
        let mut drops = Vec::with_capacity(assignment.packages.len());
        for id in &assignment.packages {
            let package = self
                .active
                .get_mut(id)
                .ok_or_else(|| FleetError::UnknownPackage(id.clone()))?;
            let hours = travel_time(vehicle, package.destination()) * service_buffer;
            package.assign(vehicle.id().clone(), now, now + hours_to_duration(hours))?;
            vehicle.load_package(id.clone(), package.weight());
            drops.push((id.clone(), package.destination()));
        }
        vehicle.depart(Trip::schedule(now, vehicle.speed(), drops))?;
        for id in &assignment.packages {
            if let Some(package) = self.active.get_mut(id) {
                package.depart()?;
            }
        }
        log::debug!(
            "vehicle {} left with {} package(s), back at {}",
            assignment.vehicle,
            assignment.packages.len(),
            vehicle.trip().map_or(now, Trip::back_at_depot)
        );
        Ok(())
    }

    /// Hand `package` over at the next stop of `vehicle` and move it into
    /// the delivered history.
    pub(crate) fn record_delivery(
        &mut self,
        vehicle_id: &VehicleId,
        package_id: &PackageId,
    ) -> Result<DeliveryRecord, FleetError> {
        let package = self
            .active
            .get(package_id)
            .ok_or_else(|| FleetError::UnknownPackage(package_id.clone()))?;
        if package.status() != PackageStatus::InTransit
            || package.assigned_vehicle() != Some(vehicle_id)
        {
            return Err(FleetError::PackageNotAboard {
                package: package_id.clone(),
                vehicle: vehicle_id.clone(),
            });
        }
        let weight = package.weight();
        let vehicle = self
            .vehicles
            .get_mut(vehicle_id)
            .ok_or_else(|| FleetError::UnknownVehicle(vehicle_id.clone()))?;
        let stop = vehicle
            .unload(package_id, weight)
            .ok_or_else(|| FleetError::StopOutOfOrder {
                package: package_id.clone(),
                vehicle: vehicle_id.clone(),
            })?;
        let mut package = self
            .active
            .remove(package_id)
            .ok_or_else(|| FleetError::UnknownPackage(package_id.clone()))?;
        package.deliver(stop.arrival)?;
        let estimated = package.estimated_delivery().unwrap_or(stop.arrival);
        let record = DeliveryRecord {
            package: package_id.clone(),
            vehicle: vehicle_id.clone(),
            delivered_at: stop.arrival,
            estimated,
            punctuality: Punctuality::evaluate(estimated, stop.arrival),
        };
        self.history_index
            .insert(package_id.clone(), self.history.len());
        self.history.push(package);
        Ok(record)
    }

    /// Turn an emptied vehicle back towards the depot.
    pub(crate) fn begin_return(&mut self, vehicle_id: &VehicleId) -> Result<(), FleetError> {
        self.vehicles
            .get_mut(vehicle_id)
            .ok_or_else(|| FleetError::UnknownVehicle(vehicle_id.clone()))?
            .begin_return()?;
        Ok(())
    }

    /// Park a returning vehicle at the depot, available again.
    pub(crate) fn complete_return(&mut self, vehicle_id: &VehicleId) -> Result<(), FleetError> {
        self.vehicles
            .get_mut(vehicle_id)
            .ok_or_else(|| FleetError::UnknownVehicle(vehicle_id.clone()))?
            .complete_return()?;
        log::info!("vehicle {vehicle_id} is back at the depot");
        Ok(())
    }

    /// Move the clock forward. The clock never runs backwards.
    pub(crate) fn set_clock(&mut self, instant: SimTime) {
        self.now = self.now.max(instant);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FirstFitDispatcher, package_spec};
    use crate::{Priority, Unassignable};
    use geo::Coord;
    use rstest::{fixture, rstest};

    #[fixture]
    fn fleet() -> Fleet {
        Fleet::new(
            [
                VehicleSpec::new("V1", 10.0, 50.0),
                VehicleSpec::new("V2", 20.0, 50.0),
            ],
            [
                package_spec("P1", 30.0, 40.0, 1, 4.0),
                package_spec("P2", 0.0, 10.0, 2, 5.0),
            ],
        )
        .expect("valid fleet")
    }

    fn plan(vehicle: &str, packages: &[&str]) -> DispatchPlan {
        DispatchPlan {
            assignments: vec![Assignment {
                vehicle: VehicleId::from(vehicle),
                packages: packages.iter().map(|&id| PackageId::from(id)).collect(),
            }],
            ..DispatchPlan::empty()
        }
    }

    #[rstest]
    fn rejects_duplicate_package_ids() {
        let err = Fleet::new(
            [VehicleSpec::new("V1", 10.0, 50.0)],
            [
                package_spec("P1", 1.0, 1.0, 1, 1.0),
                package_spec("P1", 2.0, 2.0, 1, 1.0),
            ],
        )
        .expect_err("duplicate ids");
        assert_eq!(err, ValidationError::DuplicatePackageId("P1".into()));
    }

    #[rstest]
    fn rejects_duplicate_vehicle_ids(mut fleet: Fleet) {
        let err = fleet
            .add_vehicle(VehicleSpec::new("V2", 5.0, 5.0))
            .expect_err("duplicate id");
        assert_eq!(err, ValidationError::DuplicateVehicleId("V2".into()));
    }

    #[rstest]
    fn commit_moves_packages_and_vehicle_in_transit(mut fleet: Fleet) {
        let report = fleet.commit(plan("V1", &["P1", "P2"])).expect("valid plan");
        assert_eq!(report.dispatched_count(), 2);

        let vehicle = fleet.vehicle(&"V1".into()).expect("V1");
        assert_eq!(vehicle.status(), VehicleStatus::InTransit);
        assert_eq!(vehicle.load(), 9.0);
        let package = fleet.package(&"P1".into()).expect("P1");
        assert_eq!(package.status(), PackageStatus::InTransit);
        assert_eq!(package.pickup_time(), Some(SimTime::EPOCH));
        assert_eq!(package.estimated_delivery(), Some(SimTime::from_hours(1.0)));
    }

    #[rstest]
    fn service_buffer_scales_estimate(mut fleet: Fleet) {
        let buffered = DispatchPlan {
            service_buffer: 1.5,
            ..plan("V1", &["P1"])
        };
        fleet.commit(buffered).expect("valid plan");
        let package = fleet.package(&"P1".into()).expect("P1");
        assert_eq!(package.estimated_delivery(), Some(SimTime::from_hours(1.5)));
    }

    #[rstest]
    #[case(plan("V9", &["P1"]), FleetError::UnknownVehicle("V9".into()))]
    #[case(plan("V1", &["P9"]), FleetError::UnknownPackage("P9".into()))]
    #[case(plan("V1", &[]), FleetError::EmptyAssignment("V1".into()))]
    #[case(plan("V1", &["P1", "P1"]), FleetError::PackageAssignedTwice("P1".into()))]
    fn rejects_malformed_plans(
        mut fleet: Fleet,
        #[case] bad: DispatchPlan,
        #[case] expected: FleetError,
    ) {
        let before = fleet.clone();
        assert_eq!(fleet.commit(bad), Err(expected));
        assert_eq!(fleet.list_packages(None), before.list_packages(None));
        assert_eq!(fleet.list_vehicles(None), before.list_vehicles(None));
    }

    #[rstest]
    fn rejects_overloaded_vehicle_without_mutating(mut fleet: Fleet) {
        fleet
            .add_package(package_spec("P3", 1.0, 1.0, 3, 2.0))
            .expect("valid package");
        let err = fleet
            .commit(plan("V1", &["P1", "P2", "P3"]))
            .expect_err("11 > 10");
        assert!(matches!(err, FleetError::CapacityExceeded { .. }));
        assert_eq!(fleet.pending_packages().count(), 3);
        assert_eq!(
            fleet.vehicle(&"V1".into()).map(Vehicle::status),
            Some(VehicleStatus::Available)
        );
    }

    #[rstest]
    fn second_commit_cannot_reuse_packages_or_vehicles(mut fleet: Fleet) {
        fleet.commit(plan("V1", &["P1"])).expect("first plan");
        assert_eq!(
            fleet.commit(plan("V2", &["P1"])),
            Err(FleetError::PackageNotPending {
                package: "P1".into(),
                status: PackageStatus::InTransit,
            })
        );
        assert!(matches!(
            fleet.commit(plan("V1", &["P2"])),
            Err(FleetError::VehicleUnavailable { .. })
        ));
    }

    #[rstest]
    fn dispatch_reports_unassignable(mut fleet: Fleet) {
        fleet
            .add_package(PackageSpec::new(
                "P9",
                Coord { x: 1.0, y: 1.0 },
                Priority::Highest,
                150.0,
            ))
            .expect("valid package");
        let report = fleet.dispatch(&FirstFitDispatcher).expect("dispatch");
        assert_eq!(
            report.unassignable,
            vec![Unassignable {
                package: "P9".into(),
                weight: 150.0,
                reason: UnassignableReason::CapacityUnsatisfiable,
            }]
        );
        assert_eq!(
            fleet.package(&"P9".into()).map(Package::status),
            Some(PackageStatus::Sorting)
        );
    }

    #[rstest]
    fn deliveries_must_follow_stop_order(mut fleet: Fleet) {
        fleet.commit(plan("V1", &["P1", "P2"])).expect("valid plan");
        let err = fleet
            .record_delivery(&"V1".into(), &"P2".into())
            .expect_err("P1 comes first");
        assert!(matches!(err, FleetError::StopOutOfOrder { .. }));
        let record = fleet
            .record_delivery(&"V1".into(), &"P1".into())
            .expect("first stop");
        assert_eq!(record.delivered_at, SimTime::from_hours(1.0));
        assert!(record.punctuality.is_on_time());
        assert_eq!(fleet.delivered_packages().len(), 1);
        assert!(fleet.active_packages().all(|p| p.id().as_str() != "P1"));
    }

    #[rstest]
    fn clock_never_runs_backwards(mut fleet: Fleet) {
        fleet.set_clock(SimTime::from_hours(2.0));
        fleet.set_clock(SimTime::from_hours(1.0));
        assert_eq!(fleet.now(), SimTime::from_hours(2.0));
    }
}
