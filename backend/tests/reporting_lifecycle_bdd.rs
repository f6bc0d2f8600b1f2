//! Behaviour-driven development (BDD) tests for the report lifecycle.
//!
//! These scenarios drive the reporting service against the in-memory
//! repository: registration, filing, status changes under each transition
//! policy, and role changes.

use std::future::Future;
use std::sync::Arc;

use civic_backend::domain::{
    CorruptionReport, CorruptionReportDraft, ReportStatus, ReportingError, ReportingService,
    TransitionPolicy, User, UserDraft, UserRole,
};
use civic_backend::outbound::memory::InMemoryUserRepository;
use civic_backend::test_support::{FixtureClock, fixture_timestamp};
use chrono::Duration;
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use tokio::runtime::Runtime;

// -----------------------------------------------------------------------------
// Test World
// -----------------------------------------------------------------------------

/// Wrapper for non-Clone types to enable storage in `Slot`.
#[derive(Clone)]
struct RuntimeHandle(Arc<Runtime>);

type Service = ReportingService<InMemoryUserRepository>;

#[derive(Clone)]
struct ServiceHandle(Arc<Service>);

/// Test world holding the service and the latest results.
#[derive(Default, ScenarioState)]
struct LifecycleWorld {
    runtime: Slot<RuntimeHandle>,
    policy: Slot<TransitionPolicy>,
    service: Slot<ServiceHandle>,
    user: Slot<User>,
    report: Slot<CorruptionReport>,
    last_error: Slot<ReportingError>,
}

impl LifecycleWorld {
    fn runtime(&self) -> Arc<Runtime> {
        if let Some(handle) = self.runtime.get() {
            return handle.0;
        }
        let runtime = Arc::new(Runtime::new().expect("create runtime"));
        self.runtime.set(RuntimeHandle(Arc::clone(&runtime)));
        runtime
    }

    fn service(&self) -> Arc<Service> {
        if let Some(handle) = self.service.get() {
            return handle.0;
        }
        let policy = self.policy.get().unwrap_or_default();
        let service = Arc::new(ReportingService::with_transitions(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(FixtureClock::default()),
            policy.table(),
        ));
        self.service.set(ServiceHandle(Arc::clone(&service)));
        service
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime().block_on(future)
    }

    fn register(&self, username: &str, email: &str) -> Result<User, ReportingError> {
        let service = self.service();
        self.block_on(service.register_user(UserDraft::new(username, email, "hash1")))
    }

    fn user(&self) -> User {
        self.user.get().expect("a citizen should be registered")
    }

    fn report(&self) -> CorruptionReport {
        self.report.get().expect("a report should be filed")
    }

    fn stored_user(&self) -> User {
        let service = self.service();
        let user_id = self.user().id();
        self.block_on(service.find_user(user_id))
            .expect("lookup succeeds")
            .expect("citizen is stored")
    }
}

#[fixture]
fn world() -> LifecycleWorld {
    LifecycleWorld::default()
}

// -----------------------------------------------------------------------------
// Given Steps
// -----------------------------------------------------------------------------

#[given("the {policy_name} transition policy")]
fn the_transition_policy(world: &LifecycleWorld, policy_name: String) {
    let policy: TransitionPolicy = policy_name.parse().expect("known policy");
    world.policy.set(policy);
}

#[given("a citizen registered as {username} with email {email}")]
fn a_registered_citizen(world: &LifecycleWorld, username: String, email: String) {
    let user = world
        .register(&username, &email)
        .expect("registration succeeds");
    world.user.set(user);
}

// -----------------------------------------------------------------------------
// When Steps
// -----------------------------------------------------------------------------

#[when("another citizen registers as {username} with email {email}")]
fn another_citizen_registers(world: &LifecycleWorld, username: String, email: String) {
    if let Err(error) = world.register(&username, &email) {
        world.last_error.set(error);
    }
}

#[when("the citizen files a report titled {title}")]
fn the_citizen_files_a_report(world: &LifecycleWorld, title: String) {
    let service = world.service();
    let draft = CorruptionReportDraft {
        title,
        description: "Official demanded payment for a permit.".to_owned(),
        reporter_id: world.user().id(),
        occurred_on: fixture_timestamp() - Duration::days(1),
    };
    let report = world
        .block_on(service.submit_report(draft))
        .expect("submission succeeds");
    world.report.set(report);
}

#[when("the report status changes to {status_name}")]
fn the_report_status_changes(world: &LifecycleWorld, status_name: String) {
    let status: ReportStatus = status_name.parse().expect("known status");
    let service = world.service();
    let report_id = world.report().id();
    match world.block_on(service.change_report_status(report_id, status)) {
        Ok(report) => world.report.set(report),
        Err(error) => world.last_error.set(error),
    }
}

#[when("the citizen's role changes to {role}")]
fn the_citizens_role_changes(world: &LifecycleWorld, role: String) {
    let service = world.service();
    let user = world
        .block_on(service.change_user_role(world.user().id(), &role))
        .expect("role change succeeds");
    world.user.set(user);
}

// -----------------------------------------------------------------------------
// Then Steps
// -----------------------------------------------------------------------------

#[then("the stored email is {email}")]
fn the_stored_email_is(world: &LifecycleWorld, email: String) {
    assert_eq!(world.stored_user().email().as_ref(), email);
}

#[then("the citizen has {count} report")]
fn the_citizen_has_reports(world: &LifecycleWorld, count: String) {
    let expected: usize = count.parse().expect("numeric report count");
    assert_eq!(world.stored_user().reports().len(), expected);
}

#[then("the report status is {status}")]
fn the_report_status_is(world: &LifecycleWorld, status: String) {
    let expected: ReportStatus = status.parse().expect("known status");
    let stored = world.stored_user();
    let report = stored
        .report(world.report().id())
        .expect("report is stored with its reporter");
    assert_eq!(report.status(), expected);
}

#[then("the report was last modified by its reporter")]
fn the_report_was_last_modified_by_its_reporter(world: &LifecycleWorld) {
    let report = world.report();
    assert_eq!(report.audit().last_modified_by(), Some(report.reporter_id()));
}

#[then("registration fails because the email is taken")]
fn registration_fails_because_email_taken(world: &LifecycleWorld) {
    let error = world.last_error.get().expect("registration should fail");
    assert!(
        matches!(error, ReportingError::EmailTaken { .. }),
        "expected EmailTaken, got {error}"
    );
}

#[then("the status change is rejected")]
fn the_status_change_is_rejected(world: &LifecycleWorld) {
    let error = world.last_error.get().expect("status change should fail");
    match error {
        ReportingError::Domain(domain) => assert_eq!(domain.parameter(), Some("new_status")),
        other => panic!("expected a validation failure, got {other}"),
    }
}

#[then("the citizen's role is {role}")]
fn the_citizens_role_is(world: &LifecycleWorld, role: String) {
    let expected: UserRole = role.parse().expect("known role");
    let stored = world.stored_user();
    assert_eq!(stored.role(), expected);
    assert_eq!(stored.audit().last_modified_by(), Some(stored.id()));
}

// -----------------------------------------------------------------------------
// Scenario Bindings
// -----------------------------------------------------------------------------

#[scenario(
    path = "tests/features/reporting_lifecycle.feature",
    name = "Citizen files a report that goes under investigation"
)]
fn citizen_files_a_report(world: LifecycleWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/reporting_lifecycle.feature",
    name = "Email addresses are unique after normalisation"
)]
fn email_addresses_are_unique(world: LifecycleWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/reporting_lifecycle.feature",
    name = "Forward-only policy refuses to reopen a resolved report"
)]
fn forward_only_policy_refuses_reopen(world: LifecycleWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/reporting_lifecycle.feature",
    name = "Citizen is promoted to investigator"
)]
fn citizen_is_promoted(world: LifecycleWorld) {
    let _ = world;
}
