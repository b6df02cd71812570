//! Construction and lifecycle errors shared by the entity model.

use thiserror::Error;

use crate::{PackageId, PackageStatus, VehicleId, VehicleStatus};

/// Errors returned when a package or vehicle spec is rejected.
///
/// Validation happens once, at construction, so the dispatcher and simulator
/// only ever see well-formed entities.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A package id was empty or whitespace.
    #[error("package id must not be empty")]
    EmptyPackageId,
    /// A vehicle id was empty or whitespace.
    #[error("vehicle id must not be empty")]
    EmptyVehicleId,
    /// A package weight was zero, negative or not finite.
    #[error("package {id} weight {weight} must be positive and finite")]
    NonPositiveWeight {
        /// Offending package.
        id: PackageId,
        /// Rejected weight.
        weight: f64,
    },
    /// A package destination had a NaN or infinite component.
    #[error("package {id} destination must be finite")]
    NonFiniteDestination {
        /// Offending package.
        id: PackageId,
    },
    /// A vehicle capacity was zero, negative or not finite.
    #[error("vehicle {id} capacity {capacity} must be positive and finite")]
    NonPositiveCapacity {
        /// Offending vehicle.
        id: VehicleId,
        /// Rejected capacity.
        capacity: f64,
    },
    /// A vehicle speed was zero, negative or not finite.
    #[error("vehicle {id} speed {speed} must be positive and finite")]
    NonPositiveSpeed {
        /// Offending vehicle.
        id: VehicleId,
        /// Rejected speed.
        speed: f64,
    },
    /// A priority rank outside `1..=3` was supplied.
    #[error("priority rank {rank} is outside 1..=3")]
    PriorityOutOfRange {
        /// Rejected rank.
        rank: u8,
    },
    /// Two packages share an id.
    #[error("duplicate package id {0}")]
    DuplicatePackageId(PackageId),
    /// Two vehicles share an id.
    #[error("duplicate vehicle id {0}")]
    DuplicateVehicleId(VehicleId),
}

/// A lifecycle transition that the state machines do not allow.
///
/// The fleet validates every plan before mutating, so these surface only when
/// an invariant has already been broken elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// A package was asked to skip or reverse a lifecycle step.
    #[error("package {id} cannot move from {from} to {to}")]
    Package {
        /// Affected package.
        id: PackageId,
        /// Current status.
        from: PackageStatus,
        /// Requested status.
        to: PackageStatus,
    },
    /// A vehicle was asked to skip or reverse a lifecycle step.
    #[error("vehicle {id} cannot move from {from} to {to}")]
    Vehicle {
        /// Affected vehicle.
        id: VehicleId,
        /// Current status.
        from: VehicleStatus,
        /// Requested status.
        to: VehicleStatus,
    },
    /// A vehicle tried to start its return with packages still aboard.
    #[error("vehicle {id} still carries {remaining} package(s)")]
    ManifestNotEmpty {
        /// Affected vehicle.
        id: VehicleId,
        /// Packages still loaded.
        remaining: usize,
    },
}

/// A status label that names no known status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseStatusError {
    /// Not one of the package status labels.
    #[error("unknown package status '{0}'")]
    Package(String),
    /// Not one of the vehicle status labels.
    #[error("unknown vehicle status '{0}'")]
    Vehicle(String),
}
