//! Distances and travel times between depot-relative coordinates.
//!
//! Coordinates are planar with the depot at the origin. Speeds are expressed
//! in distance units per hour, so `distance / speed` yields hours.

use std::time::Duration;

use geo::Coord;

use crate::Vehicle;

/// Location of the depot every vehicle starts from and returns to.
pub const DEPOT: Coord<f64> = Coord { x: 0.0, y: 0.0 };

const SECONDS_PER_HOUR: f64 = 3_600.0;

/// Euclidean distance between two coordinates.
///
/// Both coordinates must be finite. Packages and vehicles reject non-finite
/// positions at construction, so callers inside the engine never violate this.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use depot_core::{DEPOT, distance};
///
/// assert_eq!(distance(DEPOT, Coord { x: 30.0, y: 40.0 }), 50.0);
/// ```
#[must_use]
pub fn distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    debug_assert!(is_finite(a) && is_finite(b), "coordinates must be finite");
    let delta = b - a;
    delta.x.hypot(delta.y)
}

/// Hours a vehicle moving at `speed` needs to cover the leg `from -> to`.
///
/// `speed` must be positive; [`Vehicle`] guarantees this at construction.
#[must_use]
pub fn travel_time_between(from: Coord<f64>, to: Coord<f64>, speed: f64) -> f64 {
    debug_assert!(speed > 0.0, "speed must be positive");
    distance(from, to) / speed
}

/// Hours `vehicle` needs to reach `destination` from its current location.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use depot_core::{Vehicle, VehicleSpec, travel_time};
///
/// # fn main() -> Result<(), depot_core::ValidationError> {
/// let vehicle = Vehicle::new(VehicleSpec::new("V1", 100.0, 50.0))?;
/// assert_eq!(travel_time(&vehicle, Coord { x: 30.0, y: 40.0 }), 1.0);
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn travel_time(vehicle: &Vehicle, destination: Coord<f64>) -> f64 {
    travel_time_between(vehicle.location(), destination, vehicle.speed())
}

/// Convert fractional hours into a [`Duration`].
///
/// Values too large to represent saturate at [`Duration::MAX`].
#[must_use]
pub fn hours_to_duration(hours: f64) -> Duration {
    debug_assert!(hours >= 0.0, "travel time must not be negative");
    Duration::try_from_secs_f64(hours * SECONDS_PER_HOUR).unwrap_or(Duration::MAX)
}

pub(crate) const fn is_finite(coord: Coord<f64>) -> bool {
    coord.x.is_finite() && coord.y.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VehicleSpec;
    use rstest::rstest;

    #[rstest]
    #[case(Coord { x: 30.0, y: 40.0 }, 50.0)]
    #[case(Coord { x: -3.0, y: 4.0 }, 5.0)]
    #[case(DEPOT, 0.0)]
    fn distance_from_depot(#[case] target: Coord<f64>, #[case] expected: f64) {
        assert_eq!(distance(DEPOT, target), expected);
    }

    #[rstest]
    fn distance_is_symmetric() {
        let a = Coord { x: 12.5, y: -7.0 };
        let b = Coord { x: -1.0, y: 3.25 };
        assert_eq!(distance(a, b), distance(b, a));
    }

    #[rstest]
    fn travel_time_is_one_hour_for_fifty_units_at_fifty() {
        let vehicle = Vehicle::new(VehicleSpec::new("V1", 100.0, 50.0)).expect("valid vehicle");
        let hours = travel_time(&vehicle, Coord { x: 30.0, y: 40.0 });
        assert_eq!(hours, 1.0);
        assert_eq!(hours_to_duration(hours), Duration::from_secs(3_600));
    }

    #[rstest]
    fn hours_to_duration_saturates() {
        assert_eq!(hours_to_duration(f64::MAX), Duration::MAX);
    }
}
