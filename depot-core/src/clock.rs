//! Simulation clock.
//!
//! [`SimTime`] is an instant measured as an offset from the start of the
//! operational session. Offsets are plain [`Duration`] values so arithmetic
//! stays exact to the nanosecond.

use std::fmt;
use std::ops::{Add, AddAssign};
use std::time::Duration;

use crate::geometry::hours_to_duration;

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 3_600;

/// An instant on the session clock.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use depot_core::SimTime;
///
/// let start = SimTime::EPOCH;
/// let later = start + Duration::from_secs(5_400);
/// assert_eq!(later.as_hours(), 1.5);
/// assert_eq!(later.to_string(), "T+01:30:00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct SimTime(Duration);

impl SimTime {
    /// Start of the session.
    pub const EPOCH: Self = Self(Duration::ZERO);

    /// Build an instant from its offset since [`SimTime::EPOCH`].
    #[must_use]
    pub const fn from_offset(offset: Duration) -> Self {
        Self(offset)
    }

    /// Build an instant from fractional hours since [`SimTime::EPOCH`].
    #[must_use]
    pub fn from_hours(hours: f64) -> Self {
        Self(hours_to_duration(hours))
    }

    /// Offset since [`SimTime::EPOCH`].
    #[must_use]
    pub const fn offset(self) -> Duration {
        self.0
    }

    /// Offset since [`SimTime::EPOCH`] in fractional hours.
    #[must_use]
    pub fn as_hours(self) -> f64 {
        self.0.as_secs_f64() / 3_600.0
    }

    /// Time elapsed from `earlier` to `self`, or `None` if `earlier` is later.
    #[must_use]
    pub fn checked_since(self, earlier: Self) -> Option<Duration> {
        self.0.checked_sub(earlier.0)
    }

    /// Time elapsed from `earlier` to `self`, clamped at zero.
    #[must_use]
    pub const fn saturating_since(self, earlier: Self) -> Duration {
        self.0.saturating_sub(earlier.0)
    }
}

impl Add<Duration> for SimTime {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Self(self.0.saturating_add(rhs))
    }
}

impl AddAssign<Duration> for SimTime {
    fn add_assign(&mut self, rhs: Duration) {
        *self = *self + rhs;
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.0.as_secs();
        let hours = total / SECONDS_PER_HOUR;
        let minutes = (total % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
        let seconds = total % SECONDS_PER_MINUTE;
        write!(f, "T+{hours:02}:{minutes:02}:{seconds:02}")
    }
}
