//! Behaviour tests for dispatch, advance and tracking through a `Fleet`.

use std::cell::RefCell;
use std::time::Duration;

use depot_core::test_support::{FirstFitDispatcher, assert_fleet_invariants, package_spec};
use depot_core::{
    AdvanceReport, DEPOT, DeliverySimulator, Fleet, PackageId, PackageSnapshot, PackageStatus,
    Punctuality, SimTime, TrackError, VehicleId, VehicleSpec, VehicleStatus,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

#[fixture]
fn fleet() -> RefCell<Fleet> {
    RefCell::new(Fleet::default())
}

#[fixture]
fn advanced() -> RefCell<Option<AdvanceReport>> {
    RefCell::new(None)
}

#[fixture]
fn lookup() -> RefCell<Option<Result<PackageSnapshot, TrackError>>> {
    RefCell::new(None)
}

fn advance(fleet: &RefCell<Fleet>, report: &RefCell<Option<AdvanceReport>>, secs: u64) {
    let outcome = DeliverySimulator::new()
        .advance(&mut fleet.borrow_mut(), Duration::from_secs(secs))
        .expect("advance succeeds");
    report.replace(Some(outcome));
}

#[given("a fleet with one van and a package 50 units from the depot")]
fn one_van_one_package(#[from(fleet)] fleet: &RefCell<Fleet>) {
    let built = Fleet::new(
        [VehicleSpec::new("V1", 100.0, 50.0)],
        [package_spec("P1", 30.0, 40.0, 1, 5.0)],
    )
    .expect("valid fleet");
    fleet.replace(built);
}

#[when("the fleet is dispatched")]
fn dispatched(#[from(fleet)] fleet: &RefCell<Fleet>) {
    let report = fleet
        .borrow_mut()
        .dispatch(&FirstFitDispatcher)
        .expect("dispatch succeeds");
    assert_eq!(report.dispatched_count(), 1);
}

#[when("the fleet advances by 90 minutes")]
fn advance_ninety_minutes(
    #[from(fleet)] fleet: &RefCell<Fleet>,
    #[from(advanced)] advanced: &RefCell<Option<AdvanceReport>>,
) {
    advance(fleet, advanced, 5_400);
}

#[when("the fleet advances by 30 minutes")]
fn advance_thirty_minutes(
    #[from(fleet)] fleet: &RefCell<Fleet>,
    #[from(advanced)] advanced: &RefCell<Option<AdvanceReport>>,
) {
    advance(fleet, advanced, 1_800);
}

#[when("the fleet advances by 3 hours")]
fn advance_three_hours(
    #[from(fleet)] fleet: &RefCell<Fleet>,
    #[from(advanced)] advanced: &RefCell<Option<AdvanceReport>>,
) {
    advance(fleet, advanced, 10_800);
}

#[when("package P404 is tracked")]
fn track_missing(
    #[from(fleet)] fleet: &RefCell<Fleet>,
    #[from(lookup)] lookup: &RefCell<Option<Result<PackageSnapshot, TrackError>>>,
) {
    lookup.replace(Some(fleet.borrow().track(&PackageId::from("P404"))));
}

#[then("the package is delivered one hour after pickup")]
fn delivered_after_one_hour(#[from(fleet)] fleet: &RefCell<Fleet>) {
    let snapshot = fleet.borrow().track(&"P1".into()).expect("P1 tracked");
    assert_eq!(snapshot.status, PackageStatus::Delivered);
    assert_eq!(snapshot.pickup_time, Some(SimTime::EPOCH));
    assert_eq!(snapshot.actual_delivery, Some(SimTime::from_hours(1.0)));
}

#[then("the delivery is on time")]
fn on_time(#[from(advanced)] advanced: &RefCell<Option<AdvanceReport>>) {
    let report = advanced.borrow();
    let report = report.as_ref().expect("advance ran");
    let punctuality: Vec<_> = report
        .delivered
        .iter()
        .map(|record| record.punctuality)
        .collect();
    assert_eq!(punctuality, vec![Punctuality::OnTime]);
}

#[then("the package is still in transit")]
fn still_in_transit(
    #[from(fleet)] fleet: &RefCell<Fleet>,
    #[from(advanced)] advanced: &RefCell<Option<AdvanceReport>>,
) {
    let report = advanced.borrow();
    let report = report.as_ref().expect("advance ran");
    assert!(report.delivered.is_empty());
    assert_eq!(report.still_in_transit, vec![PackageId::from("P1")]);
    let snapshot = fleet.borrow().track(&"P1".into()).expect("P1 tracked");
    assert_eq!(snapshot.status, PackageStatus::InTransit);
    assert!(snapshot.actual_delivery.is_none());
}

#[then("the van is available at the depot")]
fn van_available(
    #[from(fleet)] fleet: &RefCell<Fleet>,
    #[from(advanced)] advanced: &RefCell<Option<AdvanceReport>>,
) {
    let report = advanced.borrow();
    let report = report.as_ref().expect("advance ran");
    assert_eq!(report.returned, vec![VehicleId::from("V1")]);
    let vehicles = fleet.borrow().list_vehicles(None);
    let van = vehicles.first().expect("one van");
    assert_eq!(van.status, VehicleStatus::Available);
    assert_eq!(van.location, DEPOT);
    assert!(van.manifest.is_empty());
}

#[then("the fleet invariants hold")]
fn invariants_hold(#[from(fleet)] fleet: &RefCell<Fleet>) {
    assert_fleet_invariants(&fleet.borrow());
}

#[then("tracking reports not found")]
fn not_found(#[from(lookup)] lookup: &RefCell<Option<Result<PackageSnapshot, TrackError>>>) {
    let outcome = lookup.borrow();
    assert_eq!(
        outcome.as_ref().expect("lookup ran"),
        &Err(TrackError::NotFound(PackageId::from("P404")))
    );
}

#[scenario(path = "tests/features/fleet_lifecycle.feature", index = 0)]
fn delivered_on_time(
    fleet: RefCell<Fleet>,
    advanced: RefCell<Option<AdvanceReport>>,
    lookup: RefCell<Option<Result<PackageSnapshot, TrackError>>>,
) {
    let _ = (fleet, advanced, lookup);
}

#[scenario(path = "tests/features/fleet_lifecycle.feature", index = 1)]
fn short_advance(
    fleet: RefCell<Fleet>,
    advanced: RefCell<Option<AdvanceReport>>,
    lookup: RefCell<Option<Result<PackageSnapshot, TrackError>>>,
) {
    let _ = (fleet, advanced, lookup);
}

#[scenario(path = "tests/features/fleet_lifecycle.feature", index = 2)]
fn van_returns(
    fleet: RefCell<Fleet>,
    advanced: RefCell<Option<AdvanceReport>>,
    lookup: RefCell<Option<Result<PackageSnapshot, TrackError>>>,
) {
    let _ = (fleet, advanced, lookup);
}

#[scenario(path = "tests/features/fleet_lifecycle.feature", index = 3)]
fn unknown_package(
    fleet: RefCell<Fleet>,
    advanced: RefCell<Option<AdvanceReport>>,
    lookup: RefCell<Option<Result<PackageSnapshot, TrackError>>>,
) {
    let _ = (fleet, advanced, lookup);
}
