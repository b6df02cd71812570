//! Tunable policy for [`GreedyDispatcher`](crate::GreedyDispatcher).

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Order in which available vehicles get to pick packages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VehicleOrder {
    /// Highest capacity first; equal capacities by id.
    #[default]
    LargestFirst,
    /// Strictly by vehicle id.
    IdOrder,
}

impl VehicleOrder {
    /// Kebab-case name accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LargestFirst => "largest-first",
            Self::IdOrder => "id-order",
        }
    }
}

impl fmt::Display for VehicleOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleOrder {
    type Err = DispatchConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::LargestFirst, Self::IdOrder]
            .into_iter()
            .find(|order| order.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DispatchConfigError::UnknownVehicleOrder(s.to_owned()))
    }
}

/// Errors raised while building a [`DispatchConfig`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchConfigError {
    /// The buffer factor was below one or not finite.
    #[error("service buffer must be a finite factor of at least 1.0, got {0}")]
    ServiceBufferOutOfRange(f64),
    /// A vehicle order name was not recognised.
    #[error("unknown vehicle order '{0}', expected largest-first or id-order")]
    UnknownVehicleOrder(String),
}

/// Configuration for [`GreedyDispatcher`](crate::GreedyDispatcher).
///
/// # Examples
/// ```
/// use depot_dispatch::{DispatchConfig, VehicleOrder};
///
/// let config = DispatchConfig::new(1.2, VehicleOrder::IdOrder).expect("valid buffer");
/// assert_eq!(config.service_buffer(), 1.2);
/// assert!(DispatchConfig::new(0.5, VehicleOrder::IdOrder).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispatchConfig {
    service_buffer: f64,
    vehicle_order: VehicleOrder,
}

impl DispatchConfig {
    /// Factor applied when no buffer is wanted.
    pub const NO_BUFFER: f64 = 1.0;

    /// Validate and build a configuration.
    ///
    /// # Errors
    /// Returns [`DispatchConfigError::ServiceBufferOutOfRange`] when
    /// `service_buffer` is below `1.0` or not finite.
    pub fn new(
        service_buffer: f64,
        vehicle_order: VehicleOrder,
    ) -> Result<Self, DispatchConfigError> {
        if !(service_buffer.is_finite() && service_buffer >= Self::NO_BUFFER) {
            return Err(DispatchConfigError::ServiceBufferOutOfRange(service_buffer));
        }
        Ok(Self {
            service_buffer,
            vehicle_order,
        })
    }

    /// Multiplier applied to direct travel time for estimated delivery.
    #[must_use]
    pub const fn service_buffer(&self) -> f64 {
        self.service_buffer
    }

    /// Order in which vehicles pick packages.
    #[must_use]
    pub const fn vehicle_order(&self) -> VehicleOrder {
        self.vehicle_order
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            service_buffer: Self::NO_BUFFER,
            vehicle_order: VehicleOrder::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.99)]
    #[case(0.0)]
    #[case(-1.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn rejects_buffers_below_one(#[case] buffer: f64) {
        let result = DispatchConfig::new(buffer, VehicleOrder::LargestFirst);
        assert!(matches!(
            result,
            Err(DispatchConfigError::ServiceBufferOutOfRange(_))
        ));
    }

    #[rstest]
    fn default_has_no_buffer() {
        let config = DispatchConfig::default();
        assert_eq!(config.service_buffer().to_bits(), 1.0_f64.to_bits());
        assert_eq!(config.vehicle_order(), VehicleOrder::LargestFirst);
    }

    #[rstest]
    #[case("largest-first", VehicleOrder::LargestFirst)]
    #[case(" ID-ORDER ", VehicleOrder::IdOrder)]
    fn parses_vehicle_order(#[case] raw: &str, #[case] expected: VehicleOrder) {
        assert_eq!(raw.parse::<VehicleOrder>(), Ok(expected));
    }

    #[rstest]
    fn rejects_unknown_vehicle_order() {
        assert_eq!(
            "smallest-first".parse::<VehicleOrder>(),
            Err(DispatchConfigError::UnknownVehicleOrder(
                "smallest-first".to_owned()
            ))
        );
    }
}
