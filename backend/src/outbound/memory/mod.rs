//! In-process user repository.
//!
//! Stores [`UserRecord`]s keyed by user id and applies the same column
//! widths and unique email constraint as the relational schema, so adapter
//! behaviour matches production storage in tests and local runs.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{EmailAddress, ReportId, User, UserId, UserRecord};

/// Width of the `users.username` column.
pub const USERNAME_MAX: usize = 100;
/// Width of the `users.email` column.
pub const EMAIL_MAX: usize = 200;
/// Width of the `corruption_reports.title` column.
pub const REPORT_TITLE_MAX: usize = 200;

/// Mutex-guarded map of persisted user rows.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    rows: Mutex<HashMap<Uuid, UserRecord>>,
}

impl InMemoryUserRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub fn len(&self) -> Result<usize, UserRepositoryError> {
        Ok(self.rows()?.len())
    }

    /// Whether no user is stored.
    pub fn is_empty(&self) -> Result<bool, UserRepositoryError> {
        Ok(self.rows()?.is_empty())
    }

    fn rows(&self) -> Result<MutexGuard<'_, HashMap<Uuid, UserRecord>>, UserRepositoryError> {
        self.rows
            .lock()
            .map_err(|_| UserRepositoryError::connection("user store lock poisoned"))
    }

    fn find_where(
        &self,
        predicate: impl Fn(&UserRecord) -> bool,
    ) -> Result<Option<User>, UserRepositoryError> {
        let rows = self.rows()?;
        rows.values()
            .find(|record| predicate(record))
            .cloned()
            .map(rehydrate)
            .transpose()
    }
}

fn check_width(
    column: &'static str,
    value: &str,
    max: usize,
) -> Result<(), UserRepositoryError> {
    if value.chars().count() > max {
        return Err(UserRepositoryError::column_too_long(column, max));
    }
    Ok(())
}

fn check_columns(record: &UserRecord) -> Result<(), UserRepositoryError> {
    check_width("username", &record.username, USERNAME_MAX)?;
    check_width("email", &record.email, EMAIL_MAX)?;
    record
        .reports
        .iter()
        .try_for_each(|report| check_width("title", &report.title, REPORT_TITLE_MAX))
}

fn rehydrate(record: UserRecord) -> Result<User, UserRepositoryError> {
    let id = record.audit.id;
    User::rehydrate(record).map_err(|err| {
        UserRepositoryError::corrupt(format!("user {id} failed hydration: {err}"))
    })
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn save(&self, user: &User) -> Result<(), UserRepositoryError> {
        let record = user.to_record();
        check_columns(&record)?;

        let mut rows = self.rows()?;
        let email_taken = rows
            .values()
            .any(|row| row.email == record.email && row.audit.id != record.audit.id);
        if email_taken {
            return Err(UserRepositoryError::query(format!(
                "unique constraint violated on email {}",
                record.email
            )));
        }

        debug!(user_id = %user.id(), reports = record.reports.len(), "user row upserted");
        rows.insert(record.audit.id, record);
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let row = self.rows()?.get(id.as_uuid()).cloned();
        row.map(rehydrate).transpose()
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserRepositoryError> {
        self.find_where(|record| record.email == email.as_ref())
    }

    async fn find_by_report_id(
        &self,
        report_id: &ReportId,
    ) -> Result<Option<User>, UserRepositoryError> {
        let wanted = *report_id.as_uuid();
        self.find_where(|record| record.reports.iter().any(|report| report.audit.id == wanted))
    }
}
