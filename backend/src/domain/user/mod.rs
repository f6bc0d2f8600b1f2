//! User aggregate.
//!
//! A user owns the reports they filed. Reports enter the aggregate through
//! [`User::add_report`] or [`User::rehydrate`], and both refuse reports
//! filed by someone else.

mod values;

use mockable::Clock;
use tracing::debug;

pub use self::values::{EmailAddress, PasswordHash, USERNAME_MIN, Username};

use super::audit::{AuditTrail, define_entity_id};
use super::records::UserRecord;
use super::{CorruptionReport, DomainError, ReportId, UserRole};

define_entity_id! {
    /// Stable user identifier stored as a UUID.
    pub struct UserId;
}

/// Input payload for [`User::new`].
///
/// Raw strings are validated by the constructor. `created_by` names the
/// principal performing the registration; leave it unset for
/// self-registration.
#[derive(Debug, Clone)]
pub struct UserDraft {
    /// Raw username; trimmed on registration.
    pub username: String,
    /// Raw email address; normalised on registration.
    pub email: String,
    /// Opaque password hash produced by the caller.
    pub password_hash: String,
    /// Initial role.
    pub role: UserRole,
    /// Registering principal, if not the user themselves.
    pub created_by: Option<UserId>,
}

impl UserDraft {
    /// Self-registration draft with the default role.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            role: UserRole::default(),
            created_by: None,
        }
    }

    /// Register with `role` instead of the default.
    #[must_use]
    pub const fn with_role(mut self, role: UserRole) -> Self {
        self.role = role;
        self
    }

    /// Attribute the registration to another principal.
    #[must_use]
    pub const fn created_by(mut self, actor: UserId) -> Self {
        self.created_by = Some(actor);
        self
    }
}

/// Registered account.
///
/// ## Invariants
/// - `username` is trimmed and at least [`USERNAME_MIN`] characters.
/// - `email` is trimmed, lower-cased and shaped `local@domain.tld`.
/// - Every report in `reports` names this user as its reporter.
///
/// # Examples
/// ```
/// use civic_backend::domain::{User, UserDraft, UserRole};
/// use mockable::DefaultClock;
///
/// let user = User::new(
///     UserDraft::new("  johndoe ", "John.Doe@Example.com", "$argon2id$hash"),
///     &DefaultClock,
/// )?;
/// assert_eq!(user.username().as_ref(), "johndoe");
/// assert_eq!(user.email().as_ref(), "john.doe@example.com");
/// assert_eq!(user.role(), UserRole::Citizen);
/// assert_eq!(user.audit().created_by(), user.id());
/// # Ok::<(), civic_backend::domain::DomainError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    audit: AuditTrail<UserId>,
    username: Username,
    email: EmailAddress,
    password_hash: PasswordHash,
    role: UserRole,
    reports: Vec<CorruptionReport>,
}

impl User {
    /// Validate a draft and register the user.
    ///
    /// Fields are checked in the order username, email, password hash,
    /// creating principal.
    pub fn new(draft: UserDraft, clock: &dyn Clock) -> Result<Self, DomainError> {
        let UserDraft {
            username: raw_username,
            email: raw_email,
            password_hash: raw_password_hash,
            role,
            created_by: actor,
        } = draft;

        let username = Username::new(raw_username)?;
        let email = EmailAddress::new(raw_email)?;
        let password_hash = PasswordHash::new(raw_password_hash)?;

        let id = UserId::random();
        let created_by = match actor {
            Some(actor) if actor.is_nil() => {
                return Err(DomainError::nil_identifier("created_by"));
            }
            Some(actor) => actor,
            None => id,
        };

        debug!(user_id = %id, role = %role, "user registered");
        Ok(Self {
            audit: AuditTrail::created(id, created_by, clock.utc()),
            username,
            email,
            password_hash,
            role,
            reports: Vec::new(),
        })
    }

    /// Assign a new role. The user is recorded as the modifier.
    pub fn change_role(&mut self, new_role: UserRole, clock: &dyn Clock) {
        let previous = self.role;
        self.role = new_role;
        self.audit.mark_modified(self.id(), clock.utc());
        debug!(user_id = %self.id(), from = %previous, to = %new_role, "user role changed");
    }

    /// Attach a report filed by this user.
    ///
    /// Attaching does not count as a modification of the user.
    pub fn add_report(&mut self, report: CorruptionReport) -> Result<(), DomainError> {
        self.check_owner(&report)?;
        debug!(user_id = %self.id(), report_id = %report.id(), "report attached");
        self.reports.push(report);
        Ok(())
    }

    fn check_owner(&self, report: &CorruptionReport) -> Result<(), DomainError> {
        if report.reporter_id() == self.id() {
            return Ok(());
        }
        Err(DomainError::Ownership {
            report_id: report.id(),
            reporter_id: report.reporter_id(),
            user_id: self.id(),
        })
    }

    /// Reports in the order they were attached.
    #[must_use]
    pub fn reports(&self) -> &[CorruptionReport] {
        &self.reports
    }

    /// Owned report with the given identifier.
    #[must_use]
    pub fn report(&self, report_id: ReportId) -> Option<&CorruptionReport> {
        self.reports.iter().find(|report| report.id() == report_id)
    }

    /// Mutable access to one owned report. The collection itself stays
    /// closed.
    pub fn report_mut(&mut self, report_id: ReportId) -> Option<&mut CorruptionReport> {
        self.reports
            .iter_mut()
            .find(|report| report.id() == report_id)
    }

    /// Restore a user and their reports from storage.
    ///
    /// Value types are re-validated, and every report must name this user
    /// as its reporter.
    pub fn rehydrate(record: UserRecord) -> Result<Self, DomainError> {
        let UserRecord {
            audit,
            username,
            email,
            password_hash,
            role,
            reports: report_records,
        } = record;

        let mut user = Self {
            audit: AuditTrail::rehydrate(&audit)?,
            username: Username::new(username)?,
            email: EmailAddress::new(email)?,
            password_hash: PasswordHash::new(password_hash)?,
            role,
            reports: Vec::with_capacity(report_records.len()),
        };
        for report_record in report_records {
            let report = CorruptionReport::rehydrate(report_record)?;
            user.check_owner(&report)?;
            user.reports.push(report);
        }
        Ok(user)
    }

    /// Flatten the user and their reports into persisted columns.
    #[must_use]
    pub fn to_record(&self) -> UserRecord {
        UserRecord {
            audit: self.audit.to_record(),
            username: self.username.to_string(),
            email: self.email.to_string(),
            password_hash: self.password_hash.expose().to_owned(),
            role: self.role,
            reports: self.reports.iter().map(CorruptionReport::to_record).collect(),
        }
    }

    /// Stable user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.audit.id()
    }

    /// Validated username.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Normalised email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Stored password hash.
    #[must_use]
    pub const fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Current role.
    #[must_use]
    pub const fn role(&self) -> UserRole {
        self.role
    }

    /// Creation and modification metadata.
    #[must_use]
    pub const fn audit(&self) -> &AuditTrail<UserId> {
        &self.audit
    }
}

impl TryFrom<UserRecord> for User {
    type Error = DomainError;

    fn try_from(value: UserRecord) -> Result<Self, Self::Error> {
        Self::rehydrate(value)
    }
}

impl From<&User> for UserRecord {
    fn from(value: &User) -> Self {
        value.to_record()
    }
}
