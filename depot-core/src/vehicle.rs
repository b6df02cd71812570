//! Vehicles, their manifests, and the schedule of a departed trip.
//!
//! A vehicle cycles `available -> loading -> in-transit -> returning ->
//! available`. While available it sits empty at the depot.

use std::fmt;
use std::time::Duration;

use geo::Coord;

use crate::geometry::{DEPOT, hours_to_duration, travel_time_between};
use crate::{PackageId, ParseStatusError, SimTime, TransitionError, ValidationError, VehicleId};

/// Where a vehicle is in its trip cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum VehicleStatus {
    /// Idle at the depot with an empty manifest.
    Available,
    /// Taking on packages at the depot.
    Loading,
    /// Delivering its manifest.
    InTransit,
    /// Driving back to the depot after the last drop-off.
    Returning,
}

impl VehicleStatus {
    /// Every status in cycle order.
    pub const ALL: [Self; 4] = [
        Self::Available,
        Self::Loading,
        Self::InTransit,
        Self::Returning,
    ];

    /// The next status in the cycle.
    #[must_use]
    pub const fn successor(self) -> Self {
        match self {
            Self::Available => Self::Loading,
            Self::Loading => Self::InTransit,
            Self::InTransit => Self::Returning,
            Self::Returning => Self::Available,
        }
    }

    /// Lowercase label, matching the serialised form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Loading => "loading",
            Self::InTransit => "in-transit",
            Self::Returning => "returning",
        }
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VehicleStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseStatusError::Vehicle(s.to_owned()))
    }
}

/// Externally supplied description of a vehicle.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleSpec {
    /// Unique identifier.
    pub id: VehicleId,
    /// Maximum total weight carried at once.
    pub capacity: f64,
    /// Distance units per hour.
    pub speed: f64,
}

impl VehicleSpec {
    /// Convenience constructor.
    pub fn new(id: impl Into<VehicleId>, capacity: f64, speed: f64) -> Self {
        Self {
            id: id.into(),
            capacity,
            speed,
        }
    }
}

/// One scheduled drop-off on a trip.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stop {
    /// Package dropped at this stop.
    pub package: PackageId,
    /// Drop-off point.
    pub destination: Coord<f64>,
    /// Scheduled arrival.
    pub arrival: SimTime,
}

/// Fixed schedule of a departed vehicle.
///
/// Stops are visited in manifest order. Arrival instants are computed once,
/// at departure, with the same travel-time formula used for estimates.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trip {
    departed_at: SimTime,
    stops: Vec<Stop>,
    back_at_depot: SimTime,
    completed: usize,
}

impl Trip {
    /// Schedule a trip leaving the depot at `departed_at` and visiting
    /// `drops` in order at `speed`.
    #[must_use]
    pub fn schedule<I>(departed_at: SimTime, speed: f64, drops: I) -> Self
    where
        I: IntoIterator<Item = (PackageId, Coord<f64>)>,
    {
        let mut clock = departed_at;
        let mut position = DEPOT;
        let stops: Vec<Stop> = drops
            .into_iter()
            .map(|(package, destination)| {
                clock += hours_to_duration(travel_time_between(position, destination, speed));
                position = destination;
                Stop {
                    package,
                    destination,
                    arrival: clock,
                }
            })
            .collect();
        let back_at_depot = clock + hours_to_duration(travel_time_between(position, DEPOT, speed));
        Self {
            departed_at,
            stops,
            back_at_depot,
            completed: 0,
        }
    }

    /// Departure instant.
    #[must_use]
    pub const fn departed_at(&self) -> SimTime {
        self.departed_at
    }

    /// All stops in visiting order.
    #[must_use]
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Stops not yet reached.
    #[must_use]
    pub fn remaining_stops(&self) -> &[Stop] {
        self.stops.get(self.completed..).unwrap_or_default()
    }

    /// Scheduled arrival of the final stop, or departure for an empty trip.
    #[must_use]
    pub fn last_arrival(&self) -> SimTime {
        self.stops
            .last()
            .map_or(self.departed_at, |stop| stop.arrival)
    }

    /// Scheduled instant the vehicle is back at the depot.
    #[must_use]
    pub const fn back_at_depot(&self) -> SimTime {
        self.back_at_depot
    }

    /// Total scheduled duration from departure to depot return.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.back_at_depot.saturating_since(self.departed_at)
    }

    fn complete_next(&mut self, package: &PackageId) -> Option<&Stop> {
        let stop = self.stops.get(self.completed)?;
        if &stop.package != package {
            return None;
        }
        self.completed += 1;
        Some(stop)
    }
}

/// A delivery vehicle.
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    id: VehicleId,
    capacity: f64,
    speed: f64,
    location: Coord<f64>,
    status: VehicleStatus,
    manifest: Vec<PackageId>,
    load: f64,
    trip: Option<Trip>,
}

impl Vehicle {
    /// Validate `spec` and create an available vehicle at the depot.
    ///
    /// # Errors
    /// Returns [`ValidationError`] for an empty id or a non-positive or
    /// non-finite capacity or speed.
    pub fn new(spec: VehicleSpec) -> Result<Self, ValidationError> {
        let VehicleSpec {
            id,
            capacity,
            speed,
        } = spec;
        if id.is_blank() {
            return Err(ValidationError::EmptyVehicleId);
        }
        if !(capacity.is_finite() && capacity > 0.0) {
            return Err(ValidationError::NonPositiveCapacity { id, capacity });
        }
        if !(speed.is_finite() && speed > 0.0) {
            return Err(ValidationError::NonPositiveSpeed { id, speed });
        }
        Ok(Self {
            id,
            capacity,
            speed,
            location: DEPOT,
            status: VehicleStatus::Available,
            manifest: Vec::new(),
            load: 0.0,
            trip: None,
        })
    }

    /// Identifier.
    #[must_use]
    pub const fn id(&self) -> &VehicleId {
        &self.id
    }

    /// Maximum total weight carried at once.
    #[must_use]
    pub const fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Distance units per hour.
    #[must_use]
    pub const fn speed(&self) -> f64 {
        self.speed
    }

    /// Last known position: the depot, or the latest drop-off.
    #[must_use]
    pub const fn location(&self) -> Coord<f64> {
        self.location
    }

    /// Cycle status.
    #[must_use]
    pub const fn status(&self) -> VehicleStatus {
        self.status
    }

    /// Packages currently aboard, in visiting order.
    #[must_use]
    pub fn manifest(&self) -> &[PackageId] {
        &self.manifest
    }

    /// Total weight currently aboard.
    #[must_use]
    pub const fn load(&self) -> f64 {
        self.load
    }

    /// Capacity still free.
    #[must_use]
    pub fn remaining_capacity(&self) -> f64 {
        (self.capacity - self.load).max(0.0)
    }

    /// Schedule of the current trip, if the vehicle has departed.
    #[must_use]
    pub const fn trip(&self) -> Option<&Trip> {
        self.trip.as_ref()
    }

    /// Whether the vehicle is travelling (delivering or returning).
    #[must_use]
    pub const fn is_moving(&self) -> bool {
        matches!(
            self.status,
            VehicleStatus::InTransit | VehicleStatus::Returning
        )
    }

    /// `available -> loading`.
    pub(crate) fn begin_loading(&mut self) -> Result<(), TransitionError> {
        self.step(VehicleStatus::Loading)
    }

    /// Put a package aboard. Capacity was checked by the fleet.
    pub(crate) fn load_package(&mut self, package: PackageId, weight: f64) {
        debug_assert_eq!(self.status, VehicleStatus::Loading);
        self.manifest.push(package);
        self.load += weight;
    }

    /// `loading -> in-transit` on the given schedule.
    pub(crate) fn depart(&mut self, trip: Trip) -> Result<(), TransitionError> {
        self.step(VehicleStatus::InTransit)?;
        self.trip = Some(trip);
        Ok(())
    }

    /// Drop `package` at its scheduled stop. Returns the stop on success.
    pub(crate) fn unload(&mut self, package: &PackageId, weight: f64) -> Option<Stop> {
        let stop = self.trip.as_mut()?.complete_next(package)?.clone();
        self.manifest.retain(|aboard| aboard != package);
        self.load = (self.load - weight).max(0.0);
        self.location = stop.destination;
        Some(stop)
    }

    /// `in-transit -> returning` once the manifest is empty.
    pub(crate) fn begin_return(&mut self) -> Result<(), TransitionError> {
        if !self.manifest.is_empty() {
            return Err(TransitionError::ManifestNotEmpty {
                id: self.id.clone(),
                remaining: self.manifest.len(),
            });
        }
        self.step(VehicleStatus::Returning)
    }

    /// `returning -> available`, parked empty at the depot.
    pub(crate) fn complete_return(&mut self) -> Result<(), TransitionError> {
        self.step(VehicleStatus::Available)?;
        self.location = DEPOT;
        self.load = 0.0;
        self.trip = None;
        Ok(())
    }

    fn step(&mut self, to: VehicleStatus) -> Result<(), TransitionError> {
        if self.status.successor() != to {
            return Err(TransitionError::Vehicle {
                id: self.id.clone(),
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[rstest]
    fn vehicle_status_labels_parse_or_fail_typed() {
        assert_eq!(" Returning ".parse::<VehicleStatus>(), Ok(VehicleStatus::Returning));
        assert_eq!(
            "parked".parse::<VehicleStatus>(),
            Err(ParseStatusError::Vehicle("parked".to_owned()))
        );
    }

    #[fixture]
    fn van() -> Vehicle {
        Vehicle::new(VehicleSpec::new("V1", 100.0, 50.0)).expect("valid vehicle")
    }

    #[rstest]
    #[case(0.0, 50.0)]
    #[case(-5.0, 50.0)]
    #[case(f64::INFINITY, 50.0)]
    fn rejects_bad_capacity(#[case] capacity: f64, #[case] speed: f64) {
        let err = Vehicle::new(VehicleSpec::new("V1", capacity, speed)).expect_err("invalid");
        assert!(matches!(err, ValidationError::NonPositiveCapacity { .. }));
    }

    #[rstest]
    #[case(0.0)]
    #[case(-1.0)]
    #[case(f64::NAN)]
    fn rejects_bad_speed(#[case] speed: f64) {
        let err = Vehicle::new(VehicleSpec::new("V1", 10.0, speed)).expect_err("invalid");
        assert!(matches!(err, ValidationError::NonPositiveSpeed { .. }));
    }

    #[rstest]
    fn new_vehicle_is_available_at_depot(van: Vehicle) {
        assert_eq!(van.status(), VehicleStatus::Available);
        assert_eq!(van.location(), DEPOT);
        assert!(van.manifest().is_empty());
        assert!(van.trip().is_none());
    }

    #[rstest]
    fn trip_schedule_accumulates_legs() {
        let trip = Trip::schedule(
            SimTime::EPOCH,
            50.0,
            [
                (PackageId::from("P1"), Coord { x: 30.0, y: 40.0 }),
                (PackageId::from("P2"), Coord { x: 30.0, y: 90.0 }),
            ],
        );
        let arrivals: Vec<_> = trip.stops().iter().map(|stop| stop.arrival).collect();
        assert_eq!(
            arrivals,
            vec![SimTime::from_hours(1.0), SimTime::from_hours(2.0)]
        );
        // (30, 90) is sqrt(900 + 8100) ~= 94.87 units from the depot.
        assert!(trip.back_at_depot() > SimTime::from_hours(3.8));
        assert!(trip.back_at_depot() < SimTime::from_hours(3.9));
    }

    #[rstest]
    fn full_cycle_returns_to_depot(mut van: Vehicle) {
        let parcel = PackageId::from("P1");
        let destination = Coord { x: 30.0, y: 40.0 };
        van.begin_loading().expect("available -> loading");
        van.load_package(parcel.clone(), 10.0);
        van.depart(Trip::schedule(
            SimTime::EPOCH,
            van.speed(),
            [(parcel.clone(), destination)],
        ))
        .expect("loading -> in-transit");
        van.begin_return().expect_err("manifest still loaded");

        let stop = van.unload(&parcel, 10.0).expect("scheduled stop");
        assert_eq!(stop.arrival, SimTime::from_hours(1.0));
        assert_eq!(van.location(), destination);
        van.begin_return().expect("in-transit -> returning");
        van.complete_return().expect("returning -> available");

        assert_eq!(van.status(), VehicleStatus::Available);
        assert_eq!(van.location(), DEPOT);
        assert_eq!(van.load(), 0.0);
        assert!(van.trip().is_none());
    }

    #[rstest]
    fn unload_rejects_out_of_order_package(mut van: Vehicle) {
        van.begin_loading().expect("loading");
        van.load_package(PackageId::from("P1"), 1.0);
        van.load_package(PackageId::from("P2"), 1.0);
        van.depart(Trip::schedule(
            SimTime::EPOCH,
            van.speed(),
            [
                (PackageId::from("P1"), Coord { x: 1.0, y: 0.0 }),
                (PackageId::from("P2"), Coord { x: 2.0, y: 0.0 }),
            ],
        ))
        .expect("depart");
        assert!(van.unload(&PackageId::from("P2"), 1.0).is_none());
        assert_eq!(van.manifest().len(), 2);
    }

    #[rstest]
    fn cannot_skip_loading(mut van: Vehicle) {
        let err = van
            .depart(Trip::schedule(SimTime::EPOCH, 50.0, []))
            .expect_err("available cannot depart directly");
        assert!(matches!(err, TransitionError::Vehicle { .. }));
    }
}
