//! Reporting service.
//!
//! Orchestrates the user and report lifecycles against a
//! [`UserRepository`]: every operation validates its input, loads the owning
//! user, applies one entity operation, and saves the aggregate back.

use std::str::FromStr;
use std::sync::Arc;

use mockable::Clock;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{
    CorruptionReport, CorruptionReportDraft, DomainError, ReportId, ReportStatus,
    StatusTransitions, User, UserDraft, UserId, UserRole, ValidationReason,
};

/// Failures surfaced by [`ReportingService`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportingError {
    /// An entity rejected the input.
    #[error(transparent)]
    Domain(#[from] DomainError),
    /// The user store failed.
    #[error(transparent)]
    Repository(#[from] UserRepositoryError),
    /// No user has the given identifier.
    #[error("user {user_id} not found")]
    UserNotFound {
        /// The identifier that was looked up.
        user_id: UserId,
    },
    /// No stored user owns the given report.
    #[error("report {report_id} not found")]
    ReportNotFound {
        /// The identifier that was looked up.
        report_id: ReportId,
    },
    /// Another user already registered this address.
    #[error("email {email} is already registered")]
    EmailTaken {
        /// The normalised address.
        email: String,
    },
}

/// Application service for registering users and filing reports.
#[derive(Clone)]
pub struct ReportingService<U> {
    users: Arc<U>,
    clock: Arc<dyn Clock>,
    transitions: StatusTransitions,
}

impl<U> ReportingService<U> {
    /// Create a service using the permissive transition table.
    #[must_use]
    pub fn new(users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self::with_transitions(users, clock, StatusTransitions::default())
    }

    /// Create a service that enforces `transitions` on status changes.
    #[must_use]
    pub const fn with_transitions(
        users: Arc<U>,
        clock: Arc<dyn Clock>,
        transitions: StatusTransitions,
    ) -> Self {
        Self {
            users,
            clock,
            transitions,
        }
    }

    /// Transition table applied by [`Self::change_report_status`].
    #[must_use]
    pub const fn transitions(&self) -> &StatusTransitions {
        &self.transitions
    }
}

impl<U> ReportingService<U>
where
    U: UserRepository,
{
    /// Register a user. Email addresses are unique after normalisation.
    pub async fn register_user(&self, draft: UserDraft) -> Result<User, ReportingError> {
        let user = User::new(draft, self.clock.as_ref())?;
        if self.users.find_by_email(user.email()).await?.is_some() {
            warn!(email = %user.email(), "registration rejected: email taken");
            return Err(ReportingError::EmailTaken {
                email: user.email().to_string(),
            });
        }

        self.users.save(&user).await?;
        info!(user_id = %user.id(), role = %user.role(), "user registered");
        Ok(user)
    }

    /// File a report on behalf of `draft.reporter_id`.
    ///
    /// The draft is validated before the reporter is looked up.
    pub async fn submit_report(
        &self,
        draft: CorruptionReportDraft,
    ) -> Result<CorruptionReport, ReportingError> {
        let report = CorruptionReport::new(draft, self.clock.as_ref())?;
        let mut user = self.load_user(report.reporter_id()).await?;
        let filed = report.clone();

        user.add_report(report)?;
        self.users.save(&user).await?;
        info!(user_id = %user.id(), report_id = %filed.id(), "report submitted");
        Ok(filed)
    }

    /// Replace a report's description.
    pub async fn update_report_description(
        &self,
        report_id: ReportId,
        new_description: &str,
    ) -> Result<CorruptionReport, ReportingError> {
        self.edit_report(report_id, |report, clock| {
            report.update_description(new_description, clock)
        })
        .await
    }

    /// Move a report to `new_status` under the configured transition table.
    pub async fn change_report_status(
        &self,
        report_id: ReportId,
        new_status: ReportStatus,
    ) -> Result<CorruptionReport, ReportingError> {
        let transitions = &self.transitions;
        self.edit_report(report_id, |report, clock| {
            report.change_status(new_status, transitions, clock)
        })
        .await
    }

    /// Assign a role given by its symbolic name, e.g. `"Investigator"`.
    pub async fn change_user_role(
        &self,
        user_id: UserId,
        new_role: &str,
    ) -> Result<User, ReportingError> {
        let role = UserRole::from_str(new_role.trim()).map_err(|err| {
            DomainError::validation(
                "new_role",
                ValidationReason::UnknownValue { value: err.input },
            )
        })?;

        let mut user = self.load_user(user_id).await?;
        user.change_role(role, self.clock.as_ref());
        self.users.save(&user).await?;
        info!(user_id = %user_id, role = %role, "user role changed");
        Ok(user)
    }

    /// Look up a user together with their reports.
    pub async fn find_user(&self, user_id: UserId) -> Result<Option<User>, ReportingError> {
        Ok(self.users.find_by_id(&user_id).await?)
    }

    async fn load_user(&self, user_id: UserId) -> Result<User, ReportingError> {
        self.users
            .find_by_id(&user_id)
            .await?
            .ok_or(ReportingError::UserNotFound { user_id })
    }

    async fn edit_report<F>(
        &self,
        report_id: ReportId,
        edit: F,
    ) -> Result<CorruptionReport, ReportingError>
    where
        F: FnOnce(&mut CorruptionReport, &dyn Clock) -> Result<(), DomainError> + Send,
    {
        let not_found = ReportingError::ReportNotFound { report_id };
        let mut user = self
            .users
            .find_by_report_id(&report_id)
            .await?
            .ok_or_else(|| not_found.clone())?;
        let report = user.report_mut(report_id).ok_or(not_found)?;

        if let Err(err) = edit(&mut *report, self.clock.as_ref()) {
            warn!(report_id = %report_id, error = %err, "report edit rejected");
            return Err(err.into());
        }
        let edited = report.clone();

        self.users.save(&user).await?;
        info!(report_id = %report_id, status = %edited.status(), "report updated");
        Ok(edited)
    }
}

#[cfg(test)]
#[path = "reporting_service_tests.rs"]
mod tests;
