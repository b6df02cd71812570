//! Planning seam between the fleet and dispatch policies.
//!
//! A [`Dispatcher`] inspects the fleet read-only and returns a
//! [`DispatchPlan`]. The fleet validates and commits the plan, so a policy can
//! never leave packages or vehicles half-updated.

use crate::{Fleet, PackageId, SimTime, VehicleId};

/// Packages bound for one vehicle, in visiting order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment {
    /// Vehicle receiving the packages.
    pub vehicle: VehicleId,
    /// Packages in the order they were packed; the trip visits them in this
    /// order.
    pub packages: Vec<PackageId>,
}

/// Why a pending package was left at the depot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum UnassignableReason {
    /// The package is heavier than the capacity of every vehicle in the
    /// fleet; no amount of waiting will get it dispatched.
    CapacityUnsatisfiable,
    /// Some vehicle could carry it, but none had room this cycle.
    AwaitingCapacity,
}

impl UnassignableReason {
    /// Classify a package of `weight` left behind by a dispatch cycle.
    ///
    /// Every vehicle counts, busy or not: a package that fits a vehicle
    /// currently on the road only has to wait for it.
    #[must_use]
    pub fn for_weight(fleet: &Fleet, weight: f64) -> Self {
        if fleet.vehicles().any(|vehicle| vehicle.capacity() >= weight) {
            Self::AwaitingCapacity
        } else {
            Self::CapacityUnsatisfiable
        }
    }
}

/// A pending package that stays in sorting after a dispatch cycle.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Unassignable {
    /// Package left behind.
    pub package: PackageId,
    /// Its weight.
    pub weight: f64,
    /// Why it was left behind.
    pub reason: UnassignableReason,
}

/// Output of a [`Dispatcher`]: what to load where.
///
/// # Examples
/// ```
/// use depot_core::DispatchPlan;
///
/// let plan = DispatchPlan::empty();
/// assert!(plan.assignments.is_empty());
/// assert_eq!(plan.service_buffer, 1.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchPlan {
    /// Vehicles to load, each with a non-empty package list.
    pub assignments: Vec<Assignment>,
    /// Pending packages the policy chose not to, or could not, assign.
    pub unassignable: Vec<Unassignable>,
    /// Factor applied to direct travel time when computing estimates.
    /// `1.0` means no buffer.
    pub service_buffer: f64,
}

impl DispatchPlan {
    /// Plan that dispatches nothing.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            assignments: Vec::new(),
            unassignable: Vec::new(),
            service_buffer: 1.0,
        }
    }
}

impl Default for DispatchPlan {
    fn default() -> Self {
        Self::empty()
    }
}

/// Result of a committed dispatch cycle.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DispatchReport {
    /// Instant the vehicles departed; pickup time of every assigned package.
    pub dispatched_at: SimTime,
    /// Vehicles that departed, with their packages.
    pub assigned: Vec<Assignment>,
    /// Packages that remain in sorting.
    pub unassignable: Vec<Unassignable>,
}

impl DispatchReport {
    /// Whether the cycle moved any package.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.assigned.is_empty()
    }

    /// Number of packages that departed this cycle.
    #[must_use]
    pub fn dispatched_count(&self) -> usize {
        self.assigned
            .iter()
            .map(|assignment| assignment.packages.len())
            .sum()
    }
}

/// Decide which pending packages each available vehicle should carry.
///
/// Implementations must be deterministic: identical fleet state and
/// configuration yield an identical plan. Dispatchers must be `Send + Sync`
/// so a shared session can hold one across threads.
///
/// # Examples
///
/// ```rust
/// use depot_core::{DispatchPlan, Dispatcher, Fleet};
///
/// struct HoldEverything;
///
/// impl Dispatcher for HoldEverything {
///     fn plan(&self, _fleet: &Fleet) -> DispatchPlan {
///         DispatchPlan::empty()
///     }
/// }
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut fleet = Fleet::default();
/// let report = fleet.dispatch(&HoldEverything)?;
/// assert!(report.is_noop());
/// # Ok(())
/// # }
/// ```
pub trait Dispatcher: Send + Sync {
    /// Plan the next dispatch cycle for `fleet`.
    fn plan(&self, fleet: &Fleet) -> DispatchPlan;
}
