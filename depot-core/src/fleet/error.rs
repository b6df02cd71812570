use thiserror::Error;

use crate::{PackageId, PackageStatus, TransitionError, VehicleId, VehicleStatus};

/// Errors from fleet mutations.
///
/// Dispatch plans are validated in full before anything changes, so a
/// rejected plan leaves the fleet untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FleetError {
    /// A plan or event referred to a vehicle the fleet does not own.
    #[error("unknown vehicle {0}")]
    UnknownVehicle(VehicleId),
    /// A plan or event referred to a package the fleet does not own.
    #[error("unknown package {0}")]
    UnknownPackage(PackageId),
    /// A plan tried to load a vehicle that is not available at the depot.
    #[error("vehicle {vehicle} is {status}, not available")]
    VehicleUnavailable {
        /// Vehicle named by the plan.
        vehicle: VehicleId,
        /// Its current status.
        status: VehicleStatus,
    },
    /// A plan listed the same vehicle twice.
    #[error("vehicle {0} appears in more than one assignment")]
    DuplicateVehicleAssignment(VehicleId),
    /// A plan listed a vehicle with no packages.
    #[error("assignment for vehicle {0} carries no packages")]
    EmptyAssignment(VehicleId),
    /// A plan tried to assign a package that is not waiting in sorting.
    #[error("package {package} is {status}, not sorting")]
    PackageNotPending {
        /// Package named by the plan.
        package: PackageId,
        /// Its current status.
        status: PackageStatus,
    },
    /// A plan assigned the same package more than once.
    #[error("package {0} is assigned more than once")]
    PackageAssignedTwice(PackageId),
    /// A plan loaded more weight onto a vehicle than it can carry.
    #[error("vehicle {vehicle} would carry {load} over its capacity {capacity}")]
    CapacityExceeded {
        /// Overloaded vehicle.
        vehicle: VehicleId,
        /// Planned load.
        load: f64,
        /// Vehicle capacity.
        capacity: f64,
    },
    /// A plan carried a service buffer that is not a positive finite factor.
    #[error("service buffer {0} must be positive and finite")]
    InvalidServiceBuffer(f64),
    /// A delivery named a package that is not aboard the given vehicle.
    #[error("package {package} is not aboard vehicle {vehicle}")]
    PackageNotAboard {
        /// Package to deliver.
        package: PackageId,
        /// Vehicle expected to carry it.
        vehicle: VehicleId,
    },
    /// A delivery named a package that is not the vehicle's next stop.
    #[error("package {package} is not the next stop of vehicle {vehicle}")]
    StopOutOfOrder {
        /// Package to deliver.
        package: PackageId,
        /// Vehicle carrying it.
        vehicle: VehicleId,
    },
    /// A lifecycle state machine rejected a transition.
    #[error(transparent)]
    Transition(#[from] TransitionError),
}
