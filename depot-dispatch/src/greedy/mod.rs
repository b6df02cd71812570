//! `GreedyDispatcher`: priority-first bin packing over available vehicles.

use std::cmp::Ordering;

use depot_core::{
    Assignment, DispatchPlan, Dispatcher, Fleet, Package, Unassignable, UnassignableReason,
    Vehicle,
};

use crate::{DispatchConfig, VehicleOrder};

/// Greedy dispatch policy.
///
/// Vehicles are filled one after another. For each vehicle the pending
/// packages are scanned in priority order (rank 1 first), heaviest first
/// within a rank, ties broken by package id; a package is loaded when it fits
/// in the remaining capacity and skipped otherwise.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use depot_core::{Fleet, PackageSpec, Priority, VehicleSpec};
/// use depot_dispatch::GreedyDispatcher;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut fleet = Fleet::new(
///     [VehicleSpec::new("V1", 10.0, 50.0)],
///     [
///         PackageSpec::new("P1", Coord { x: 1.0, y: 0.0 }, Priority::Lowest, 6.0),
///         PackageSpec::new("P2", Coord { x: 2.0, y: 0.0 }, Priority::Highest, 6.0),
///     ],
/// )?;
/// let report = fleet.dispatch(&GreedyDispatcher::default())?;
/// assert_eq!(report.assigned[0].packages, vec!["P2".into()]);
/// assert_eq!(report.unassignable[0].package.as_str(), "P1");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct GreedyDispatcher {
    config: DispatchConfig,
}

impl GreedyDispatcher {
    /// Construct a dispatcher with explicit configuration.
    #[must_use]
    pub const fn new(config: DispatchConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &DispatchConfig {
        &self.config
    }

    fn vehicle_queue<'a>(&self, fleet: &'a Fleet) -> Vec<&'a Vehicle> {
        let mut vehicles: Vec<&Vehicle> = fleet.available_vehicles().collect();
        if self.config.vehicle_order() == VehicleOrder::LargestFirst {
            vehicles.sort_by(|lhs, rhs| {
                rhs.capacity()
                    .total_cmp(&lhs.capacity())
                    .then_with(|| lhs.id().cmp(rhs.id()))
            });
        }
        vehicles
    }
}

/// Pending packages in the order vehicles consider them.
fn candidate_queue(fleet: &Fleet) -> Vec<&Package> {
    let mut packages: Vec<&Package> = fleet.pending_packages().collect();
    packages.sort_by(|lhs, rhs| by_priority_then_weight(lhs, rhs));
    packages
}

fn by_priority_then_weight(lhs: &Package, rhs: &Package) -> Ordering {
    lhs.priority()
        .cmp(&rhs.priority())
        .then_with(|| rhs.weight().total_cmp(&lhs.weight()))
        .then_with(|| lhs.id().cmp(rhs.id()))
}

#[expect(clippy::float_arithmetic, reason = "capacity check sums weights")]
fn fits(load: f64, weight: f64, capacity: f64) -> bool {
    load + weight <= capacity
}

#[expect(clippy::float_arithmetic, reason = "capacity bookkeeping sums weights")]
fn add_weight(load: &mut f64, weight: f64) {
    *load += weight;
}

impl Dispatcher for GreedyDispatcher {
    fn plan(&self, fleet: &Fleet) -> DispatchPlan {
        let candidates = candidate_queue(fleet);
        let mut taken = vec![false; candidates.len()];
        let mut remaining = candidates.len();
        let mut assignments = Vec::new();

        for vehicle in self.vehicle_queue(fleet) {
            if remaining == 0 {
                break;
            }
            let mut load = 0.0;
            let mut packages = Vec::new();
            for (slot, package) in taken.iter_mut().zip(&candidates) {
                if *slot || !fits(load, package.weight(), vehicle.capacity()) {
                    continue;
                }
                add_weight(&mut load, package.weight());
                *slot = true;
                remaining -= 1;
                packages.push(package.id().clone());
            }
            if !packages.is_empty() {
                log::debug!(
                    "planned {} package(s), load {load}/{}, on vehicle {}",
                    packages.len(),
                    vehicle.capacity(),
                    vehicle.id()
                );
                assignments.push(Assignment {
                    vehicle: vehicle.id().clone(),
                    packages,
                });
            }
        }

        let unassignable = candidates
            .iter()
            .zip(&taken)
            .filter(|&(_, &was_taken)| !was_taken)
            .map(|(package, _)| Unassignable {
                package: package.id().clone(),
                weight: package.weight(),
                reason: UnassignableReason::for_weight(fleet, package.weight()),
            })
            .collect();

        DispatchPlan {
            assignments,
            unassignable,
            service_buffer: self.config.service_buffer(),
        }
    }
}
