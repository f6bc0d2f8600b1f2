//! Corruption report entity.
//!
//! A report is filed by one user, starts its life as
//! [`ReportStatus::Submitted`], and afterwards only its description and
//! status may change. Every change is attributed to the reporter.

use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::debug;

use super::audit::{AuditTrail, define_entity_id};
use super::records::CorruptionReportRecord;
use super::text::trimmed_non_blank;
use super::{DomainError, ReportStatus, StatusTransitions, UserId, ValidationReason};

define_entity_id! {
    /// Stable corruption report identifier.
    pub struct ReportId;
}

/// Input payload for [`CorruptionReport::new`].
#[derive(Debug, Clone)]
pub struct CorruptionReportDraft {
    /// Short headline; trimmed on filing.
    pub title: String,
    /// Free-text account of the incident; trimmed on filing.
    pub description: String,
    /// Filing user, recorded as the report's creator.
    pub reporter_id: UserId,
    /// When the incident happened.
    pub occurred_on: DateTime<Utc>,
}

/// A single report of suspected corruption.
///
/// ## Invariants
/// - `title` and `description` are trimmed and never blank.
/// - `reporter_id` is never nil and never changes.
/// - `occurred_on` was not in the future when the report was filed.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use civic_backend::domain::{CorruptionReport, CorruptionReportDraft, ReportStatus, UserId};
/// use mockable::DefaultClock;
///
/// let report = CorruptionReport::new(
///     CorruptionReportDraft {
///         title: "  Bribery Case  ".to_owned(),
///         description: "  details  ".to_owned(),
///         reporter_id: UserId::random(),
///         occurred_on: Utc::now() - Duration::days(1),
///     },
///     &DefaultClock,
/// )?;
/// assert_eq!(report.title(), "Bribery Case");
/// assert_eq!(report.status(), ReportStatus::Submitted);
/// # Ok::<(), civic_backend::domain::DomainError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorruptionReport {
    audit: AuditTrail<ReportId>,
    title: String,
    description: String,
    reporter_id: UserId,
    occurred_on: DateTime<Utc>,
    status: ReportStatus,
}

impl CorruptionReport {
    /// File a new report. The reporter is recorded as its creator.
    pub fn new(draft: CorruptionReportDraft, clock: &dyn Clock) -> Result<Self, DomainError> {
        let CorruptionReportDraft {
            title: raw_title,
            description: raw_description,
            reporter_id,
            occurred_on,
        } = draft;

        let title = trimmed_non_blank("title", &raw_title)?;
        let description = trimmed_non_blank("description", &raw_description)?;
        let now = clock.utc();
        if occurred_on > now {
            return Err(DomainError::validation(
                "occurred_on",
                ValidationReason::InFuture,
            ));
        }
        if reporter_id.is_nil() {
            return Err(DomainError::nil_identifier("reporter_id"));
        }

        let id = ReportId::random();
        debug!(report_id = %id, reporter_id = %reporter_id, "corruption report filed");
        Ok(Self {
            audit: AuditTrail::created(id, reporter_id, now),
            title,
            description,
            reporter_id,
            occurred_on,
            status: ReportStatus::Submitted,
        })
    }

    /// Replace the description, attributing the edit to the reporter.
    pub fn update_description(
        &mut self,
        new_description: &str,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.description = trimmed_non_blank("new_description", new_description)?;
        self.audit.mark_modified(self.reporter_id, clock.utc());
        debug!(report_id = %self.id(), "report description updated");
        Ok(())
    }

    /// Move the report to `new_status` if `transitions` allows it.
    ///
    /// With the default table every move is legal, so this only fails
    /// under a restricted table.
    pub fn change_status(
        &mut self,
        new_status: ReportStatus,
        transitions: &StatusTransitions,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        transitions.check(self.status, new_status)?;
        let previous = self.status;
        self.status = new_status;
        self.audit.mark_modified(self.reporter_id, clock.utc());
        debug!(
            report_id = %self.id(),
            from = %previous,
            to = %new_status,
            "report status changed"
        );
        Ok(())
    }

    /// Restore a report from storage without consulting the clock.
    pub fn rehydrate(record: CorruptionReportRecord) -> Result<Self, DomainError> {
        let CorruptionReportRecord {
            audit: audit_record,
            title: raw_title,
            description: raw_description,
            reporter_id: raw_reporter_id,
            occurred_on,
            status,
        } = record;

        let audit = AuditTrail::rehydrate(&audit_record)?;
        let title = trimmed_non_blank("title", &raw_title)?;
        let description = trimmed_non_blank("description", &raw_description)?;
        let reporter_id = UserId::from_uuid(raw_reporter_id);
        if reporter_id.is_nil() {
            return Err(DomainError::nil_identifier("reporter_id"));
        }

        Ok(Self {
            audit,
            title,
            description,
            reporter_id,
            occurred_on,
            status,
        })
    }

    /// Flatten the report into its persisted columns.
    #[must_use]
    pub fn to_record(&self) -> CorruptionReportRecord {
        CorruptionReportRecord {
            audit: self.audit.to_record(),
            title: self.title.clone(),
            description: self.description.clone(),
            reporter_id: *self.reporter_id.as_uuid(),
            occurred_on: self.occurred_on,
            status: self.status,
        }
    }

    /// Stable report identifier.
    #[must_use]
    pub const fn id(&self) -> ReportId {
        self.audit.id()
    }

    /// Trimmed headline.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Trimmed incident account.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// User who filed the report.
    #[must_use]
    pub const fn reporter_id(&self) -> UserId {
        self.reporter_id
    }

    /// When the incident happened.
    #[must_use]
    pub const fn occurred_on(&self) -> DateTime<Utc> {
        self.occurred_on
    }

    /// Current lifecycle status.
    #[must_use]
    pub const fn status(&self) -> ReportStatus {
        self.status
    }

    /// Creation and modification metadata.
    #[must_use]
    pub const fn audit(&self) -> &AuditTrail<ReportId> {
        &self.audit
    }
}

impl TryFrom<CorruptionReportRecord> for CorruptionReport {
    type Error = DomainError;

    fn try_from(value: CorruptionReportRecord) -> Result<Self, Self::Error> {
        Self::rehydrate(value)
    }
}

impl From<&CorruptionReport> for CorruptionReportRecord {
    fn from(value: &CorruptionReport) -> Self {
        value.to_record()
    }
}
