//! Per-vehicle progress over a time window.
//!
//! Progress is read-only: each moving vehicle's trip schedule is compared
//! against the window's end to find the events that have come due. Vehicles
//! do not interact, so the scan runs on the rayon pool.

use rayon::prelude::*;

use crate::{Fleet, PackageId, SimTime, Vehicle, VehicleId, VehicleStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum EventKind {
    Deliver(PackageId),
    BeginReturn,
    ArriveAtDepot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Event {
    pub(super) at: SimTime,
    pub(super) vehicle: VehicleId,
    pub(super) kind: EventKind,
}

/// Events due on or before `until`, in the order they must be applied.
///
/// Events of one vehicle keep their trip order; events of different vehicles
/// are merged by time, ties falling back to vehicle id.
pub(super) fn due_events(fleet: &Fleet, until: SimTime) -> Vec<Event> {
    let moving: Vec<&Vehicle> = fleet.moving_vehicles().collect();
    let mut events: Vec<Event> = moving
        .par_iter()
        .flat_map_iter(|vehicle| vehicle_events(vehicle, until))
        .collect();
    events.sort_by(|a, b| a.at.cmp(&b.at));
    events
}

fn vehicle_events(vehicle: &Vehicle, until: SimTime) -> Vec<Event> {
    let Some(trip) = vehicle.trip() else {
        return Vec::new();
    };
    let event = |at, kind| Event {
        at,
        vehicle: vehicle.id().clone(),
        kind,
    };
    let mut events: Vec<Event> = trip
        .remaining_stops()
        .iter()
        .take_while(|stop| stop.arrival <= until)
        .map(|stop| event(stop.arrival, EventKind::Deliver(stop.package.clone())))
        .collect();
    let emptied = events.len() == trip.remaining_stops().len();
    if vehicle.status() == VehicleStatus::InTransit && emptied {
        events.push(event(trip.last_arrival(), EventKind::BeginReturn));
    }
    if emptied && trip.back_at_depot() <= until {
        events.push(event(trip.back_at_depot(), EventKind::ArriveAtDepot));
    }
    events
}
