use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use super::{AdvanceReport, DeliverySimulator, SimulationError};
use crate::Fleet;

/// Reports from a stepped advance.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BatchAdvance {
    /// One report per completed step.
    pub reports: Vec<AdvanceReport>,
    /// Whether the cancellation flag stopped the batch early.
    pub cancelled: bool,
}

impl BatchAdvance {
    /// Packages delivered across all completed steps.
    #[must_use]
    pub fn delivered_count(&self) -> usize {
        self.reports.iter().map(|report| report.delivered.len()).sum()
    }
}

impl DeliverySimulator {
    /// Advance `fleet` by `total` in increments of at most `step`.
    ///
    /// `cancel` is checked before every step; once it reads `true` the batch
    /// stops and reports what it has done so far. The final step is shortened
    /// so the batch never overshoots `total`.
    ///
    /// # Errors
    /// Returns [`SimulationError::ZeroStep`] when `step` is zero and
    /// propagates any error from [`DeliverySimulator::advance`].
    pub fn advance_in_steps(
        &self,
        fleet: &mut Fleet,
        total: Duration,
        step: Duration,
        cancel: &AtomicBool,
    ) -> Result<BatchAdvance, SimulationError> {
        if step.is_zero() {
            return Err(SimulationError::ZeroStep);
        }
        let mut batch = BatchAdvance::default();
        let mut remaining = total;
        while !remaining.is_zero() {
            if cancel.load(Ordering::Relaxed) {
                log::info!("batch advance cancelled at {}", fleet.now());
                batch.cancelled = true;
                break;
            }
            let this_step = remaining.min(step);
            batch.reports.push(self.advance(fleet, this_step)?);
            remaining = remaining.saturating_sub(this_step);
        }
        Ok(batch)
    }
}
