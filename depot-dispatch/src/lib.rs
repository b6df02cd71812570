//! Priority-first greedy dispatch for the depot engine.
//!
//! This crate provides [`GreedyDispatcher`], the default implementation of
//! the [`Dispatcher`](depot_core::Dispatcher) trait. Each cycle it fills the
//! available vehicles one at a time, largest first, with pending packages
//! taken in priority order and heaviest first within a priority. Packages that
//! do not fit are skipped, not queued, so a later and lighter package can
//! still use the remaining room.
//!
//! The policy is a bin-packing heuristic, not an optimiser: it is fast,
//! deterministic for identical fleet state and configuration, and never
//! reorders a vehicle's stops once planned.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod config;
mod greedy;

pub use config::{DispatchConfig, DispatchConfigError, VehicleOrder};
pub use greedy::GreedyDispatcher;
