//! Packages and their delivery lifecycle.
//!
//! A package moves `sorting -> processed -> in-transit -> delivered` and never
//! skips or reverses a step. Fields are private: the only way to change a
//! package is through the [`Fleet`](crate::Fleet), which drives the
//! transitions below.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use geo::Coord;

use crate::geometry::is_finite;
use crate::{PackageId, ParseStatusError, SimTime, TransitionError, ValidationError, VehicleId};

/// Delivery urgency. Rank 1 is served first.
///
/// # Examples
/// ```
/// use depot_core::Priority;
///
/// assert_eq!(Priority::try_from(1), Ok(Priority::Highest));
/// assert!(Priority::Highest < Priority::Lowest);
/// assert_eq!(Priority::Normal.rank(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u8", into = "u8")
)]
pub enum Priority {
    /// Rank 1.
    Highest,
    /// Rank 2.
    Normal,
    /// Rank 3.
    Lowest,
}

impl Priority {
    /// Numeric rank in `1..=3`.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Highest => 1,
            Self::Normal => 2,
            Self::Lowest => 3,
        }
    }
}

impl TryFrom<u8> for Priority {
    type Error = ValidationError;

    fn try_from(rank: u8) -> Result<Self, Self::Error> {
        match rank {
            1 => Ok(Self::Highest),
            2 => Ok(Self::Normal),
            3 => Ok(Self::Lowest),
            _ => Err(ValidationError::PriorityOutOfRange { rank }),
        }
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority.rank()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rank())
    }
}

/// Where a package is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum PackageStatus {
    /// Waiting at the depot for a vehicle.
    Sorting,
    /// Assigned to a vehicle that has not yet departed.
    Processed,
    /// Aboard a departed vehicle.
    InTransit,
    /// Handed over at its destination. Terminal.
    Delivered,
}

impl PackageStatus {
    /// Every status in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::Sorting,
        Self::Processed,
        Self::InTransit,
        Self::Delivered,
    ];

    /// The only status this one may move to, if any.
    #[must_use]
    pub const fn successor(self) -> Option<Self> {
        match self {
            Self::Sorting => Some(Self::Processed),
            Self::Processed => Some(Self::InTransit),
            Self::InTransit => Some(Self::Delivered),
            Self::Delivered => None,
        }
    }

    /// Whether a vehicle must be assigned in this status.
    #[must_use]
    pub const fn requires_vehicle(self) -> bool {
        !matches!(self, Self::Sorting)
    }

    /// Whether the package still belongs to the active partition.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Delivered)
    }

    /// Lowercase label, matching the serialised form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sorting => "sorting",
            Self::Processed => "processed",
            Self::InTransit => "in-transit",
            Self::Delivered => "delivered",
        }
    }
}

impl fmt::Display for PackageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseStatusError::Package(s.to_owned()))
    }
}

/// Outcome of comparing the actual delivery instant with the estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Punctuality {
    /// Delivered at or before the estimate.
    OnTime,
    /// Delivered after the estimate by the contained amount.
    Late(Duration),
}

impl Punctuality {
    /// Compare `actual` against `estimated`.
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    /// use depot_core::{Punctuality, SimTime};
    ///
    /// let estimate = SimTime::from_hours(1.0);
    /// assert_eq!(Punctuality::evaluate(estimate, estimate), Punctuality::OnTime);
    /// let late = estimate + Duration::from_millis(1);
    /// assert_eq!(
    ///     Punctuality::evaluate(estimate, late),
    ///     Punctuality::Late(Duration::from_millis(1)),
    /// );
    /// ```
    #[must_use]
    pub fn evaluate(estimated: SimTime, actual: SimTime) -> Self {
        match actual.checked_since(estimated) {
            Some(delay) if !delay.is_zero() => Self::Late(delay),
            _ => Self::OnTime,
        }
    }

    /// Whether the delivery met its estimate.
    #[must_use]
    pub const fn is_on_time(self) -> bool {
        matches!(self, Self::OnTime)
    }
}

impl fmt::Display for Punctuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OnTime => f.write_str("On time"),
            Self::Late(delay) if delay.as_secs() >= 60 => {
                // Nearest whole minute.
                let minutes = delay.as_secs().saturating_add(30) / 60;
                if minutes == 1 {
                    f.write_str("1 minute late")
                } else {
                    write!(f, "{minutes} minutes late")
                }
            }
            // Sub-minute delays keep their precision instead of printing "0 minutes".
            Self::Late(delay) => write!(f, "{:.3} seconds late", delay.as_secs_f64()),
        }
    }
}

/// Externally supplied description of a package to take in.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use depot_core::{PackageSpec, Priority};
///
/// let spec = PackageSpec::new("P1", Coord { x: 3.0, y: 4.0 }, Priority::Normal, 2.5);
/// assert_eq!(spec.id.as_str(), "P1");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PackageSpec {
    /// Unique, stable identifier.
    pub id: PackageId,
    /// Drop-off point relative to the depot.
    pub destination: Coord<f64>,
    /// Delivery urgency.
    pub priority: Priority,
    /// Weight in capacity units.
    pub weight: f64,
}

impl PackageSpec {
    /// Convenience constructor.
    pub fn new(
        id: impl Into<PackageId>,
        destination: Coord<f64>,
        priority: Priority,
        weight: f64,
    ) -> Self {
        Self {
            id: id.into(),
            destination,
            priority,
            weight,
        }
    }
}

/// A package tracked by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    id: PackageId,
    destination: Coord<f64>,
    priority: Priority,
    weight: f64,
    status: PackageStatus,
    assigned_vehicle: Option<VehicleId>,
    pickup_time: Option<SimTime>,
    estimated_delivery: Option<SimTime>,
    actual_delivery: Option<SimTime>,
}

impl Package {
    /// Validate `spec` and create a package in [`PackageStatus::Sorting`].
    ///
    /// # Errors
    /// Returns [`ValidationError`] for an empty id, a non-positive or
    /// non-finite weight, or a non-finite destination.
    pub fn new(spec: PackageSpec) -> Result<Self, ValidationError> {
        let PackageSpec {
            id,
            destination,
            priority,
            weight,
        } = spec;
        if id.is_blank() {
            return Err(ValidationError::EmptyPackageId);
        }
        if !(weight.is_finite() && weight > 0.0) {
            return Err(ValidationError::NonPositiveWeight { id, weight });
        }
        if !is_finite(destination) {
            return Err(ValidationError::NonFiniteDestination { id });
        }
        Ok(Self {
            id,
            destination,
            priority,
            weight,
            status: PackageStatus::Sorting,
            assigned_vehicle: None,
            pickup_time: None,
            estimated_delivery: None,
            actual_delivery: None,
        })
    }

    /// Identifier.
    #[must_use]
    pub const fn id(&self) -> &PackageId {
        &self.id
    }

    /// Drop-off point.
    #[must_use]
    pub const fn destination(&self) -> Coord<f64> {
        self.destination
    }

    /// Urgency.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Weight in capacity units.
    #[must_use]
    pub const fn weight(&self) -> f64 {
        self.weight
    }

    /// Lifecycle status.
    #[must_use]
    pub const fn status(&self) -> PackageStatus {
        self.status
    }

    /// Vehicle carrying or having carried the package.
    #[must_use]
    pub const fn assigned_vehicle(&self) -> Option<&VehicleId> {
        self.assigned_vehicle.as_ref()
    }

    /// Instant the package was loaded.
    #[must_use]
    pub const fn pickup_time(&self) -> Option<SimTime> {
        self.pickup_time
    }

    /// Promised delivery instant. Never changes once set.
    #[must_use]
    pub const fn estimated_delivery(&self) -> Option<SimTime> {
        self.estimated_delivery
    }

    /// Instant the package reached its destination.
    #[must_use]
    pub const fn actual_delivery(&self) -> Option<SimTime> {
        self.actual_delivery
    }

    /// Punctuality of a delivered package; `None` before delivery.
    #[must_use]
    pub fn punctuality(&self) -> Option<Punctuality> {
        match (self.estimated_delivery, self.actual_delivery) {
            (Some(estimated), Some(actual)) => Some(Punctuality::evaluate(estimated, actual)),
            _ => None,
        }
    }

    /// `sorting -> processed`: bind the package to `vehicle`.
    pub(crate) fn assign(
        &mut self,
        vehicle: VehicleId,
        pickup: SimTime,
        estimate: SimTime,
    ) -> Result<(), TransitionError> {
        self.step(PackageStatus::Processed)?;
        self.assigned_vehicle = Some(vehicle);
        self.pickup_time = Some(pickup);
        self.estimated_delivery = Some(estimate);
        Ok(())
    }

    /// `processed -> in-transit`: the carrying vehicle has departed.
    pub(crate) fn depart(&mut self) -> Result<(), TransitionError> {
        self.step(PackageStatus::InTransit)
    }

    /// `in-transit -> delivered` at the scheduled arrival instant.
    pub(crate) fn deliver(&mut self, at: SimTime) -> Result<(), TransitionError> {
        self.step(PackageStatus::Delivered)?;
        self.actual_delivery = Some(at);
        Ok(())
    }

    fn step(&mut self, to: PackageStatus) -> Result<(), TransitionError> {
        if self.status.successor() != Some(to) {
            return Err(TransitionError::Package {
                id: self.id.clone(),
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}
