//! Advances departed vehicles along their trips.
//!
//! Each call looks at the window `(now, now + elapsed]`. Deliveries, the turn
//! back towards the depot and the arrival at the depot are applied in time
//! order through the [`Fleet`], so no lifecycle state is ever skipped even
//! when the window spans a whole trip.

mod batch;
mod progress;

use std::time::Duration;

use thiserror::Error;

pub use batch::BatchAdvance;

use self::progress::{EventKind, due_events};
use crate::{Fleet, FleetError, PackageId, PackageStatus, Punctuality, SimTime, VehicleId};

/// Errors from [`DeliverySimulator`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// A batch advance was asked to move in steps of zero length.
    #[error("advance step must be greater than zero")]
    ZeroStep,
    /// The fleet rejected a scheduled event.
    #[error(transparent)]
    Fleet(#[from] FleetError),
}

/// One package handed over during an advance.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeliveryRecord {
    /// Delivered package.
    pub package: PackageId,
    /// Vehicle that carried it.
    pub vehicle: VehicleId,
    /// Scheduled arrival at the destination.
    pub delivered_at: SimTime,
    /// Promise made at dispatch.
    pub estimated: SimTime,
    /// On time or late, and by how much.
    pub punctuality: Punctuality,
}

/// Outcome of [`DeliverySimulator::advance`].
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdvanceReport {
    /// Fleet clock after the advance.
    pub now: SimTime,
    /// Deliveries in the order they happened.
    pub delivered: Vec<DeliveryRecord>,
    /// Packages still aboard a vehicle, ordered by id.
    pub still_in_transit: Vec<PackageId>,
    /// Vehicles that reached the depot during the advance.
    pub returned: Vec<VehicleId>,
}

/// Moves simulated time forward for a [`Fleet`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DeliverySimulator;

impl DeliverySimulator {
    /// Create a simulator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Advance `fleet` by `elapsed`.
    ///
    /// # Errors
    /// Returns [`SimulationError::Fleet`] if the fleet rejects a scheduled
    /// event, which only happens when its invariants were already broken.
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    /// use depot_core::{DeliverySimulator, Fleet};
    ///
    /// # fn main() -> Result<(), depot_core::SimulationError> {
    /// let mut fleet = Fleet::default();
    /// let report = DeliverySimulator::new().advance(&mut fleet, Duration::from_secs(60))?;
    /// assert!(report.delivered.is_empty());
    /// assert_eq!(fleet.now().offset(), Duration::from_secs(60));
    /// # Ok(())
    /// # }
    /// ```
    pub fn advance(
        &self,
        fleet: &mut Fleet,
        elapsed: Duration,
    ) -> Result<AdvanceReport, SimulationError> {
        let until = fleet.now() + elapsed;
        let mut report = AdvanceReport::default();
        for event in due_events(fleet, until) {
            fleet.set_clock(event.at);
            match event.kind {
                EventKind::Deliver(package) => {
                    let record = fleet.record_delivery(&event.vehicle, &package)?;
                    if let Punctuality::Late(delay) = record.punctuality {
                        log::debug!("package {package} arrived {delay:?} late");
                    }
                    report.delivered.push(record);
                }
                EventKind::BeginReturn => fleet.begin_return(&event.vehicle)?,
                EventKind::ArriveAtDepot => {
                    fleet.complete_return(&event.vehicle)?;
                    report.returned.push(event.vehicle);
                }
            }
        }
        fleet.set_clock(until);
        report.now = fleet.now();
        report.still_in_transit = fleet
            .active_packages()
            .filter(|package| package.status() == PackageStatus::InTransit)
            .map(|package| package.id().clone())
            .collect();
        log::debug!(
            "advanced to {}: {} delivered, {} in transit, {} returned",
            report.now,
            report.delivered.len(),
            report.still_in_transit.len(),
            report.returned.len()
        );
        Ok(report)
    }
}
