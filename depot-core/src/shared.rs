//! A fleet shared between one writer and many readers.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use parking_lot::RwLock;

use crate::{
    AdvanceReport, BatchAdvance, DeliverySimulator, DispatchReport, Dispatcher, Fleet, FleetError,
    FleetSummary, PackageId, PackageSnapshot, PackageStatus, SimulationError, TrackError,
    VehicleSnapshot, VehicleStatus,
};

/// Thread-safe handle to a [`Fleet`].
///
/// Dispatch and advance hold the write lock for their whole duration, so they
/// exclude each other and every reader. Queries hold the read lock only long
/// enough to copy out owned snapshots, which means a reader never sees a
/// package halfway through a transition.
///
/// # Examples
/// ```
/// use std::thread;
/// use depot_core::{Fleet, SharedFleet};
///
/// let shared = SharedFleet::new(Fleet::default());
/// let reader = shared.clone();
/// let handle = thread::spawn(move || reader.summary());
/// let summary = handle.join().expect("reader thread");
/// assert_eq!(summary.packages.sorting, 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedFleet {
    inner: Arc<RwLock<Fleet>>,
}

impl SharedFleet {
    /// Share `fleet`.
    #[must_use]
    pub fn new(fleet: Fleet) -> Self {
        Self {
            inner: Arc::new(RwLock::new(fleet)),
        }
    }

    /// Run a dispatch cycle under the write lock.
    ///
    /// # Errors
    /// See [`Fleet::dispatch`].
    pub fn dispatch(&self, dispatcher: &dyn Dispatcher) -> Result<DispatchReport, FleetError> {
        self.inner.write().dispatch(dispatcher)
    }

    /// Advance the fleet under the write lock.
    ///
    /// # Errors
    /// See [`DeliverySimulator::advance`].
    pub fn advance(
        &self,
        simulator: &DeliverySimulator,
        elapsed: Duration,
    ) -> Result<AdvanceReport, SimulationError> {
        simulator.advance(&mut self.inner.write(), elapsed)
    }

    /// Stepped advance under one write lock held for the whole batch.
    ///
    /// `cancel` may be set from another thread to stop between steps.
    ///
    /// # Errors
    /// See [`DeliverySimulator::advance_in_steps`].
    pub fn advance_in_steps(
        &self,
        simulator: &DeliverySimulator,
        total: Duration,
        step: Duration,
        cancel: &AtomicBool,
    ) -> Result<BatchAdvance, SimulationError> {
        simulator.advance_in_steps(&mut self.inner.write(), total, step, cancel)
    }

    /// See [`Fleet::track`].
    ///
    /// # Errors
    /// Returns [`TrackError::NotFound`] for an unknown id.
    pub fn track(&self, id: &PackageId) -> Result<PackageSnapshot, TrackError> {
        self.inner.read().track(id)
    }

    /// See [`Fleet::list_packages`].
    #[must_use]
    pub fn list_packages(&self, status: Option<PackageStatus>) -> Vec<PackageSnapshot> {
        self.inner.read().list_packages(status)
    }

    /// See [`Fleet::list_vehicles`].
    #[must_use]
    pub fn list_vehicles(&self, status: Option<VehicleStatus>) -> Vec<VehicleSnapshot> {
        self.inner.read().list_vehicles(status)
    }

    /// See [`Fleet::summary`].
    #[must_use]
    pub fn summary(&self) -> FleetSummary {
        self.inner.read().summary()
    }

    /// Run `f` against the fleet under the read lock.
    pub fn read<R>(&self, f: impl FnOnce(&Fleet) -> R) -> R {
        f(&self.inner.read())
    }

    /// Owned copy of the whole fleet.
    #[must_use]
    pub fn snapshot(&self) -> Fleet {
        self.inner.read().clone()
    }
}

impl From<Fleet> for SharedFleet {
    fn from(fleet: Fleet) -> Self {
        Self::new(fleet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FirstFitDispatcher, assert_fleet_invariants, sample_fleet};
    use rstest::rstest;
    use std::thread;

    #[rstest]
    fn readers_see_whole_transitions() {
        let shared = SharedFleet::new(sample_fleet());
        shared.dispatch(&FirstFitDispatcher).expect("dispatch");

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let reader = shared.clone();
                thread::spawn(move || {
                    for _ in 0..50 {
                        reader.read(assert_fleet_invariants);
                        let summary = reader.summary();
                        let counts = summary.packages;
                        assert_eq!(
                            counts.sorting + counts.processed + counts.in_transit + counts.delivered,
                            reader.list_packages(None).len()
                        );
                    }
                })
            })
            .collect();

        let simulator = DeliverySimulator::new();
        for _ in 0..20 {
            shared
                .advance(&simulator, Duration::from_secs(600))
                .expect("advance");
            shared.dispatch(&FirstFitDispatcher).expect("dispatch");
        }
        for reader in readers {
            reader.join().expect("reader thread");
        }
        shared.read(assert_fleet_invariants);
    }

    #[rstest]
    fn snapshot_is_detached() {
        let shared = SharedFleet::new(sample_fleet());
        let before = shared.snapshot();
        shared.dispatch(&FirstFitDispatcher).expect("dispatch");
        assert!(before.pending_packages().count() > shared.read(|f| f.pending_packages().count()));
    }
}
