//! Domain primitives, aggregates and services.
//!
//! Purpose: model citizens filing corruption reports. Entities validate
//! themselves on construction, carry an [`AuditTrail`] of who created and
//! last modified them, and are restored from storage through a separate
//! `rehydrate` path that never bypasses their invariants.
//!
//! Public surface:
//! - [`User`] aggregate owning its [`CorruptionReport`]s.
//! - [`Evidence`] uploaded in support of a report.
//! - [`StatusTransitions`] table governing report status changes.
//! - [`ReportingService`] orchestrating the lifecycle over
//!   [`ports::UserRepository`].
//! - [`DomainError`] raised by constructors, mutators and hydration.

pub mod audit;
mod enums;
mod error;
mod evidence;
pub mod ports;
mod records;
mod report;
mod reporting_service;
mod status_transitions;
mod text;
mod user;

pub use self::audit::{AuditTrail, EntityId, Modification};
pub use self::enums::{ParseReportStatusError, ParseUserRoleError, ReportStatus, UserRole};
pub use self::error::{DomainError, ValidationReason};
pub use self::evidence::{Evidence, EvidenceDraft, EvidenceId, MediaType};
pub use self::records::{AuditRecord, CorruptionReportRecord, EvidenceRecord, UserRecord};
pub use self::report::{CorruptionReport, CorruptionReportDraft, ReportId};
pub use self::reporting_service::{ReportingError, ReportingService};
pub use self::status_transitions::{
    ParseTransitionPolicyError, StatusTransitions, TransitionPolicy,
};
pub use self::user::{
    EmailAddress, PasswordHash, USERNAME_MIN, User, UserDraft, UserId, Username,
};
